//! # JWKS-RSA Core
//!
//! Key pool, token issuance, key set publishing and token verification,
//! plus the account service built on top of them. Storage and transport
//! are supplied by callers through the traits in [`repositories`] and
//! [`services::token::KeySetSource`].

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
