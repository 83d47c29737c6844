//! Collector - creation, lookup and throughput-triggered collection
//!
//! One mutex guards the registry and the collector state. Creation counts
//! towards the step threshold; once a registration would reach it, a full
//! pass runs inside the same critical section before the new object is
//! inserted, so garbage accumulated between passes stays below the step.

use super::cycles;
use super::handle::Handle;
use super::object::{Collectible, GcObject};
use super::registry::Registry;
use super::{CollectionStats, GcState, GcStats};
use crate::config::GcConfig;
use crate::logging::{debug, log_gc_complete, log_gc_start, trace, warn};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

struct Inner {
    registry: Registry,
    state: GcState,
}

pub struct Collector {
    inner: Mutex<Inner>,

    /// Creations since the last completed pass. Only written under the lock.
    pending: AtomicUsize,
    step: AtomicUsize,

    collections_run: AtomicUsize,
    objects_swept: AtomicUsize,
}

impl Collector {
    /// Default creation count between automatic passes
    pub const DEFAULT_STEP: usize = 200;

    pub fn new() -> Self {
        Self::with_step(Self::DEFAULT_STEP)
    }

    pub fn with_step(step: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                registry: Registry::new(),
                state: GcState::Idle,
            }),
            pending: AtomicUsize::new(0),
            step: AtomicUsize::new(step.max(1)),
            collections_run: AtomicUsize::new(0),
            objects_swept: AtomicUsize::new(0),
        }
    }

    pub fn with_config(config: &GcConfig) -> Self {
        let collector = Self::with_step(config.step);
        if config.start_stopped {
            collector.stop();
        }
        debug!(
            target: "gc",
            step = collector.step(),
            stopped = config.start_stopped,
            "collector configured"
        );
        collector
    }

    /// Create and register a default-constructed object
    pub fn create<T>(&self) -> T
    where
        T: Collectible + Clone + Default,
    {
        self.create_with(T::default)
    }

    /// Create an object with `init` and register it
    ///
    /// `init` runs outside the registry lock and may itself use the
    /// collector. The returned instance is the caller's holder; the
    /// registry keeps a second one.
    pub fn create_with<T, F>(&self, init: F) -> T
    where
        T: Collectible + Clone,
        F: FnOnce() -> T,
    {
        let object = init();
        let slot: Box<dyn Collectible> = Box::new(object.clone());
        let handle = slot.handle();

        let swept = {
            let mut inner = self.inner.lock();

            let due = self.pending.load(Ordering::Relaxed) + 1 >= self.step();
            let swept = if due && inner.state == GcState::Idle {
                debug!(
                    target: "gc",
                    pending = self.pending.load(Ordering::Relaxed),
                    step = self.step(),
                    "step threshold reached, starting collection"
                );
                Some(self.run_pass(&mut inner))
            } else {
                None
            };

            inner.registry.insert(slot);
            self.pending.fetch_add(1, Ordering::Relaxed);
            swept
        };

        trace!(target: "gc", event = "object_registered", %handle);

        // Released outside the lock: dropping a collectible may re-enter.
        if let Some((stats, swept)) = swept {
            self.finish_pass(stats, swept);
        }

        object
    }

    /// Typed lookup. Returns a new holder if `handle` is registered and
    /// refers to a `T`.
    pub fn get<T>(&self, handle: Handle) -> Option<T>
    where
        T: Collectible + Clone,
    {
        let inner = self.inner.lock();
        inner
            .registry
            .lookup(handle)
            .and_then(|object| object.as_any().downcast_ref::<T>())
            .cloned()
    }

    /// Untyped lookup of the shared base
    pub fn get_object(&self, handle: Handle) -> Option<GcObject> {
        let inner = self.inner.lock();
        inner
            .registry
            .lookup(handle)
            .map(|object| object.gc_object().clone())
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.inner.lock().registry.contains(handle)
    }

    /// Number of registered objects
    pub fn size(&self) -> usize {
        self.inner.lock().registry.len()
    }

    /// Run a full mark-and-sweep pass now
    ///
    /// A no-op while the collector is stopped.
    pub fn cleanup(&self) -> CollectionStats {
        let pass = {
            let mut inner = self.inner.lock();
            if inner.state == GcState::Stopped {
                debug!(target: "gc", "collector stopped, skipping cleanup");
                return CollectionStats::default();
            }
            self.run_pass(&mut inner)
        };

        let (stats, swept) = pass;
        self.finish_pass(stats, swept);
        stats
    }

    /// Suspend collection. Every pass is skipped until [`resume`](Self::resume).
    pub fn stop(&self) {
        let mut inner = self.inner.lock();
        debug_assert!(inner.state != GcState::Running);
        inner.state = GcState::Stopped;
        debug!(target: "gc", "collector stopped");
    }

    pub fn resume(&self) {
        let mut inner = self.inner.lock();
        debug_assert!(inner.state != GcState::Running);
        inner.state = GcState::Idle;
        debug!(target: "gc", "collector resumed");
    }

    pub fn state(&self) -> GcState {
        self.inner.lock().state
    }

    pub fn step(&self) -> usize {
        self.step.load(Ordering::Relaxed)
    }

    /// Change the creation count between automatic passes. Zero behaves
    /// like one.
    pub fn set_step(&self, step: usize) {
        self.step.store(step.max(1), Ordering::Relaxed);
    }

    /// Creations since the last completed pass
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> GcStats {
        GcStats {
            live_objects: self.size(),
            collections_run: self.collections_run.load(Ordering::Relaxed),
            objects_swept: self.objects_swept.load(Ordering::Relaxed),
        }
    }

    /// Mark and unregister under the lock. The caller releases the swept
    /// objects once the lock is gone.
    fn run_pass(&self, inner: &mut Inner) -> (CollectionStats, Vec<Box<dyn Collectible>>) {
        debug_assert!(inner.state == GcState::Idle);
        inner.state = GcState::Running;

        let start = Instant::now();
        log_gc_start(inner.registry.len());

        let pass = cycles::collect(&mut inner.registry);

        inner.state = GcState::Idle;
        self.pending.store(0, Ordering::Relaxed);

        let stats = CollectionStats {
            examined: pass.examined,
            reachable: pass.reachable,
            swept: pass.swept.len(),
            duration: start.elapsed(),
        };
        (stats, pass.swept)
    }

    fn finish_pass(&self, stats: CollectionStats, swept: Vec<Box<dyn Collectible>>) {
        drop(swept);

        self.collections_run.fetch_add(1, Ordering::Relaxed);
        self.objects_swept.fetch_add(stats.swept, Ordering::Relaxed);

        if stats.duration.as_millis() > 10 {
            warn!(
                target: "gc",
                duration_ms = stats.duration.as_millis() as u64,
                examined = stats.examined,
                "GC collection took significant time"
            );
        }
        log_gc_complete(
            stats.duration.as_micros() as u64,
            stats.swept,
            stats.reachable,
        );
    }
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}
