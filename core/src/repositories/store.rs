//! Key-value store interface shared by the key set cache and the user registry.
//!
//! Implementations are in-process and non-persistent. They must tolerate
//! concurrent `get`/`set` from many callers; a racing `set` of the same key is
//! resolved last-write-wins.

use std::sync::Arc;

/// String-keyed, string-valued store
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` when absent
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: String);
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) {
        (**self).set(key, value)
    }
}
