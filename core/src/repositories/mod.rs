//! Repository interfaces for collaborators the core depends on.

pub mod store;

pub use store::KeyValueStore;
