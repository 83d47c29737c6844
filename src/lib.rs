//! crossgc - garbage collection for objects shared across threads and
//! embedded interpreter states
//!
//! Each interpreter instance only sees its own heap, so objects handed to
//! several of them (or to plain threads) need a collector of their own.
//! Holders are counted atomically; links between objects are not counted
//! and are traced by a periodic mark-and-sweep pass instead.

pub mod config;
pub mod error;
pub mod gc;
pub mod host;
pub mod logging;
pub mod table;

// Re-export core types
pub use config::GcConfig;
pub use error::Error;
pub use gc::{Collectible, CollectionStats, Collector, GcObject, GcState, GcStats, Handle};
pub use host::{collect_with_host, HostRuntime};
pub use table::{Key, SharedTable, Value};
