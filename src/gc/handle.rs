//! Object identity
//!
//! Handles are drawn from a process-wide counter rather than derived from
//! addresses, so identity stays stable no matter how many times an object
//! is duplicated or where its storage lives.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Next identity to hand out. Zero is reserved for [`Handle::NULL`].
static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a collectible object
///
/// Two holders refer to the same object if and only if they carry the
/// same handle. Handles are totally ordered so they can key the registry
/// and double as the vocabulary for links between objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(u64);

impl Handle {
    /// Marker for "no object". Never assigned to a live object.
    pub const NULL: Handle = Handle(0);

    /// Allocate a fresh, never-before-seen handle
    #[inline]
    pub(crate) fn next() -> Self {
        let raw = NEXT_HANDLE.fetch_add(1, Ordering::Relaxed);
        debug_assert!(raw != u64::MAX, "handle space exhausted");
        Handle(raw)
    }

    #[inline]
    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Raw identity value, for bindings that need to pass handles through
    /// foreign code.
    #[inline]
    pub fn as_raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Handle(raw)
    }
}

impl Default for Handle {
    fn default() -> Self {
        Handle::NULL
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gc#{:x}", self.0)
    }
}
