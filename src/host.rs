//! Embedded interpreter boundary
//!
//! An interpreter that wraps collectible objects in its own values keeps
//! one holder per value and releases it from its own collector, at a time
//! the core cannot observe. Such releases are ordinary holder drops. For a
//! deterministic pass the interpreter collects first, then the core.

use crate::gc::{CollectionStats, Collector};
use crate::logging::debug;

/// An interpreter instance with its own garbage collector
pub trait HostRuntime {
    /// Run the interpreter's full collection, dropping every holder owned
    /// by values it no longer references.
    fn collect_garbage(&self);
}

impl<F: Fn()> HostRuntime for F {
    fn collect_garbage(&self) {
        self()
    }
}

/// Collect `host` first, then run a core pass
pub fn collect_with_host<H>(collector: &Collector, host: &H) -> CollectionStats
where
    H: HostRuntime + ?Sized,
{
    host.collect_garbage();
    debug!(target: "gc", "host collection done, running core pass");
    collector.cleanup()
}

/// Collect every host, then run a single core pass
pub fn collect_with_hosts(collector: &Collector, hosts: &[&dyn HostRuntime]) -> CollectionStats {
    for host in hosts {
        host.collect_garbage();
    }
    debug!(target: "gc", hosts = hosts.len(), "host collections done, running core pass");
    collector.cleanup()
}
