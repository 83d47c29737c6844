//! Registry - the single table of live collectible objects
//!
//! Not synchronized on its own; the collector owns it behind one mutex and
//! every structural operation happens under that lock.

use super::handle::Handle;
use super::object::Collectible;
use std::collections::{BTreeMap, HashSet};

pub struct Registry {
    objects: BTreeMap<Handle, Box<dyn Collectible>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            objects: BTreeMap::new(),
        }
    }

    /// Add a slot for a freshly created object
    ///
    /// # Panics
    /// If the handle is already registered. Handles are unique by
    /// construction, so this is a broken invariant rather than a
    /// recoverable condition.
    pub fn insert(&mut self, object: Box<dyn Collectible>) {
        let handle = object.handle();
        let previous = self.objects.insert(handle, object);
        assert!(previous.is_none(), "handle {} registered twice", handle);
    }

    pub fn lookup(&self, handle: Handle) -> Option<&dyn Collectible> {
        self.objects.get(&handle).map(|object| object.as_ref())
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.objects.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Remove a slot, handing the registry's hold back to the caller
    pub fn erase(&mut self, handle: Handle) -> Option<Box<dyn Collectible>> {
        self.objects.remove(&handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle, &dyn Collectible)> + '_ {
        self.objects
            .iter()
            .map(|(handle, object)| (*handle, object.as_ref()))
    }

    /// Keep only the handles in `marked`, returning every removed slot
    ///
    /// The removed slots are returned rather than dropped so the caller can
    /// release them after leaving the critical section.
    pub fn retain_marked(&mut self, marked: &HashSet<Handle>) -> Vec<Box<dyn Collectible>> {
        let objects = std::mem::take(&mut self.objects);
        let mut swept = Vec::new();

        for (handle, object) in objects {
            if marked.contains(&handle) {
                self.objects.insert(handle, object);
            } else {
                swept.push(object);
            }
        }

        swept
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
