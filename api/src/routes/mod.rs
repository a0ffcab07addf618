//! Route handlers

pub mod auth;
pub mod keys;
pub mod user;
