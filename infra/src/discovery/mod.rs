//! Key set discovery over HTTP

pub mod remote_key_set;

#[cfg(test)]
mod tests;

pub use remote_key_set::{RefreshPolicy, RemoteKeySet};
