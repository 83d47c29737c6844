//! Mark-and-sweep over the link graph
//!
//! Reachability is recomputed from scratch on every pass, so cycles whose
//! members are only linked to each other are never marked and get swept as
//! a whole. Holder counts are used for nothing but picking the roots.

use super::handle::Handle;
use super::object::Collectible;
use super::registry::Registry;
use super::roots::collect_roots;
use crate::logging::{log_gc_mark, log_gc_sweep, trace};
use std::collections::{HashMap, HashSet};

/// Tricolor marking states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White, // Not reached (yet)
    Gray,  // Reached, links not yet scanned
    Black, // Reached, links scanned
}

/// Outcome of one pass, before the swept objects are released
pub(crate) struct Pass {
    pub examined: usize,
    pub reachable: usize,
    pub swept: Vec<Box<dyn Collectible>>,
}

struct Marker<'a> {
    registry: &'a Registry,
    colors: HashMap<Handle, Color>,
    gray: Vec<Handle>,
}

impl<'a> Marker<'a> {
    fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            colors: HashMap::with_capacity(registry.len()),
            gray: Vec::new(),
        }
    }

    fn color(&self, handle: Handle) -> Color {
        self.colors.get(&handle).copied().unwrap_or(Color::White)
    }

    /// Queue a handle for scanning. Handles with no registry entry are
    /// ignored; they may belong to objects that were already unregistered.
    fn shade(&mut self, handle: Handle) {
        if self.color(handle) != Color::White {
            return;
        }
        if !self.registry.contains(handle) {
            trace!(target: "gc", %handle, "ignoring link to unregistered handle");
            return;
        }
        self.colors.insert(handle, Color::Gray);
        self.gray.push(handle);
    }

    fn propagate(&mut self) {
        while let Some(handle) = self.gray.pop() {
            self.colors.insert(handle, Color::Black);

            let links = match self.registry.lookup(handle) {
                Some(object) => object.links(),
                None => continue,
            };
            for child in links {
                self.shade(child);
            }
        }
    }

    fn into_marked(self) -> HashSet<Handle> {
        self.colors
            .into_iter()
            .filter(|(_, color)| *color == Color::Black)
            .map(|(handle, _)| handle)
            .collect()
    }
}

/// Compute every handle reachable from the externally held objects
pub(crate) fn mark(registry: &Registry) -> HashSet<Handle> {
    let mut marker = Marker::new(registry);

    for root in collect_roots(registry) {
        marker.shade(root);
    }
    marker.propagate();

    marker.into_marked()
}

/// Run a full pass: mark from the roots, then unregister everything unmarked
pub(crate) fn collect(registry: &mut Registry) -> Pass {
    let examined = registry.len();

    let marked = mark(registry);
    let reachable = marked.len();
    log_gc_mark(reachable);

    let swept = registry.retain_marked(&marked);
    log_gc_sweep(swept.len());

    Pass {
        examined,
        reachable,
        swept,
    }
}
