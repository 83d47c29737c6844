//! Garbage collector - reference counting + mark-sweep over links
//!
//! Design: Hybrid approach for objects shared across threads and
//! interpreter states:
//! 1. Atomic holder counting (cheap root detection)
//! 2. Tricolor mark-sweep over object links (cycle safe)
//! 3. Throughput-triggered collection (one pass per `step` creations)

mod collector;
mod cycles;
mod handle;
mod object;
mod registry;
mod roots;


pub use collector::Collector;
pub use handle::Handle;
pub use object::{Collectible, GcObject, Links};
pub use registry::Registry;

use crate::logging::info;
use once_cell::sync::Lazy;
use std::time::Duration;

/// Process-wide collector
static GLOBAL: Lazy<Collector> = Lazy::new(|| {
    info!(target: "gc", "global collector initializing");
    Collector::new()
});

/// The process-wide collector instance
///
/// Independent collectors can still be built with [`Collector::new`] when
/// objects must live in separate isolation domains.
pub fn global() -> &'static Collector {
    &GLOBAL
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GcState {
    Idle,
    Running,
    Stopped,
}

/// Result of a single pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionStats {
    /// Registered objects when the pass started
    pub examined: usize,
    pub reachable: usize,
    pub swept: usize,
    pub duration: Duration,
}

/// Cumulative statistics for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GcStats {
    pub live_objects: usize,
    pub collections_run: usize,
    pub objects_swept: usize,
}
