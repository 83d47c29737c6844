//! Root detection - objects held from outside the registry
//!
//! The registry keeps one counted slot per object, so anything with more
//! than one holder is referenced by application code, another thread or an
//! interpreter value, and is a root for the marking pass.

use super::handle::Handle;
use super::registry::Registry;

/// Holders attributable to the registry's own bookkeeping
pub(crate) const REGISTRY_HOLDS: usize = 1;

#[inline]
pub(crate) fn is_root(holder_count: usize) -> bool {
    holder_count > REGISTRY_HOLDS
}

/// Handles of every externally held object in the registry
pub(crate) fn collect_roots(registry: &Registry) -> Vec<Handle> {
    registry
        .iter()
        .filter(|(_, object)| is_root(object.holder_count()))
        .map(|(handle, _)| handle)
        .collect()
}
