//! Domain entities representing core business objects.

pub mod jwk;
pub mod token;
pub mod user;

// Re-export commonly used types
pub use jwk::{KeySetDocument, PublicJwk};
pub use token::{Claims, TokenClass, TokenPair, VerifiedIdentity, SIGNING_ALGORITHM};
pub use user::{User, UserProfile};
