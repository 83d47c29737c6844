//! Collectible objects - shared identity, holder counting and links
//!
//! Every collectible type embeds exactly one [`GcObject`]. Cloning the type
//! clones the embedded base, which bumps the shared holder count atomically;
//! dropping a clone releases it. The registry keeps one such clone per live
//! object, so its slot is part of the count.

use super::handle::Handle;
use crate::logging::trace;
use parking_lot::RwLock;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Outgoing edges of an object, as a multiset of handles
///
/// A container may hold the same child under several keys. The edge exists
/// until every occurrence has been removed.
#[derive(Debug, Default)]
pub struct Links {
    counts: BTreeMap<Handle, usize>,
}

impl Links {
    pub fn add(&mut self, handle: Handle) {
        *self.counts.entry(handle).or_insert(0) += 1;
    }

    /// Drop one occurrence of `handle`. Returns false if it was not linked.
    pub fn remove(&mut self, handle: Handle) -> bool {
        match self.counts.get_mut(&handle) {
            Some(count) if *count > 1 => {
                *count -= 1;
                true
            }
            Some(_) => {
                self.counts.remove(&handle);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.counts.contains_key(&handle)
    }

    /// Number of distinct linked handles
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = Handle> + '_ {
        self.counts.keys().copied()
    }
}

struct GcInner {
    handle: Handle,
    links: RwLock<Links>,
}

/// Base of every collectible object
///
/// Clones share the handle and the link set. The number of live clones,
/// registry slot included, is the holder count.
#[derive(Clone)]
pub struct GcObject {
    inner: Arc<GcInner>,
}

impl GcObject {
    /// Create an unregistered object with a fresh handle and no links
    pub fn new() -> Self {
        let handle = Handle::next();
        trace!(target: "gc", event = "object_new", %handle);

        Self {
            inner: Arc::new(GcInner {
                handle,
                links: RwLock::new(Links::default()),
            }),
        }
    }

    #[inline]
    pub fn handle(&self) -> Handle {
        self.inner.handle
    }

    /// Number of live holders, registry slot included
    #[inline]
    pub fn holder_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Snapshot of the distinct handles this object links to
    pub fn links(&self) -> Vec<Handle> {
        self.inner.links.read().iter().collect()
    }

    /// Visit every distinct link without allocating
    pub fn for_each_link(&self, mut f: impl FnMut(Handle)) {
        for handle in self.inner.links.read().iter() {
            f(handle);
        }
    }

    pub fn has_link(&self, handle: Handle) -> bool {
        self.inner.links.read().contains(handle)
    }

    /// Record an edge to `handle`. Null handles are ignored.
    pub fn add_link(&self, handle: Handle) {
        if handle.is_null() {
            return;
        }
        self.inner.links.write().add(handle);
    }

    /// Drop one occurrence of the edge to `handle`
    pub fn remove_link(&self, handle: Handle) -> bool {
        self.inner.links.write().remove(handle)
    }

    pub fn clear_links(&self) {
        self.inner.links.write().clear();
    }
}

impl Default for GcObject {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GcObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GcObject")
            .field("handle", &self.handle())
            .field("holders", &self.holder_count())
            .field("links", &self.links())
            .finish()
    }
}

/// A type the collector can manage
///
/// Implementors embed exactly one [`GcObject`] and must not hold any other
/// clone of it, otherwise the holder count no longer reflects the number of
/// live instances. `links` is called while the registry lock is held and
/// must neither block on the collector nor call back into it.
pub trait Collectible: Send + Sync + 'static {
    fn gc_object(&self) -> &GcObject;

    fn as_any(&self) -> &dyn Any;

    #[inline]
    fn handle(&self) -> Handle {
        self.gc_object().handle()
    }

    #[inline]
    fn holder_count(&self) -> usize {
        self.gc_object().holder_count()
    }

    fn links(&self) -> Vec<Handle> {
        self.gc_object().links()
    }
}

impl Collectible for GcObject {
    fn gc_object(&self) -> &GcObject {
        self
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
