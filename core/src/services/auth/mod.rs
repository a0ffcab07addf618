//! Account service
//!
//! Registration, password login, token refresh and profile lookup on top of
//! the key-value store and the token services.

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use service::AuthService;
