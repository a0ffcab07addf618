//! Account route handlers
//!
//! Registration, password login and token refresh.

pub mod login;
pub mod refresh;
pub mod register;
