//! Shared table - a collectible key/value container
//!
//! Values that refer to other collectible objects are stored as handles,
//! not holders: the table contributes links, never holder counts. Resolve
//! an object value through the collector that owns it.

use crate::gc::{Collectible, GcObject, Handle};
use dashmap::DashMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Bool(bool),
    Int(i64),
    Str(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Number(f64),
    Str(String),
    Object(Handle),
}

impl Value {
    pub fn as_object(&self) -> Option<Handle> {
        match self {
            Value::Object(handle) => Some(*handle),
            _ => None,
        }
    }
}

impl From<bool> for Key {
    fn from(v: bool) -> Self { Key::Bool(v) }
}

impl From<i64> for Key {
    fn from(v: i64) -> Self { Key::Int(v) }
}

impl From<&str> for Key {
    fn from(v: &str) -> Self { Key::Str(v.to_string()) }
}

impl From<String> for Key {
    fn from(v: String) -> Self { Key::Str(v) }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self { Value::Bool(v) }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self { Value::Int(v) }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self { Value::Number(v) }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self { Value::Str(v.to_string()) }
}

impl From<String> for Value {
    fn from(v: String) -> Self { Value::Str(v) }
}

impl From<Handle> for Value {
    fn from(v: Handle) -> Self { Value::Object(v) }
}

/// Thread-safe table shareable across threads and interpreter states
#[derive(Clone, Default)]
pub struct SharedTable {
    base: GcObject,
    entries: Arc<DashMap<Key, Value>>,
}

impl SharedTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, returning the previous value
    ///
    /// The link for a new object value is recorded before the entry
    /// becomes visible, and the link for a replaced one is dropped after.
    pub fn set(&self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        let value = value.into();
        if let Value::Object(handle) = value {
            self.base.add_link(handle);
        }

        let previous = self.entries.insert(key.into(), value);
        self.unlink(previous.as_ref());
        previous
    }

    pub fn get(&self, key: impl Into<Key>) -> Option<Value> {
        let key: Key = key.into();
        self.entries.get(&key).map(|entry| entry.value().clone())
    }

    pub fn remove(&self, key: impl Into<Key>) -> Option<Value> {
        let key: Key = key.into();
        let previous = self.entries.remove(&key).map(|(_, value)| value);
        self.unlink(previous.as_ref());
        previous
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> Vec<Key> {
        let mut keys: Vec<Key> = self.entries.iter().map(|entry| entry.key().clone()).collect();
        keys.sort();
        keys
    }

    fn unlink(&self, value: Option<&Value>) {
        if let Some(Value::Object(handle)) = value {
            self.base.remove_link(*handle);
        }
    }
}

impl Collectible for SharedTable {
    fn gc_object(&self) -> &GcObject {
        &self.base
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for SharedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedTable")
            .field("handle", &self.base.handle())
            .field("len", &self.entries.len())
            .finish()
    }
}
