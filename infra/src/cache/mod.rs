//! Cache module for in-process key-value storage

pub mod memory_store;

pub use memory_store::MemoryStore;
