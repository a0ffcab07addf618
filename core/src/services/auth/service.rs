//! Main account service implementation

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::{TokenClass, TokenPair, User, UserProfile};
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::KeyValueStore;
use crate::services::token::{TokenIssuer, TokenVerifier};

use super::config::AuthServiceConfig;

/// Account operations backed by a key-value store.
///
/// Users are stored twice: the email maps to the user id, and the user id
/// maps to the serialized [`User`].
pub struct AuthService {
    /// Registry of users
    store: Arc<dyn KeyValueStore>,
    /// Signs token pairs on login and refresh
    issuer: Arc<TokenIssuer>,
    /// Checks refresh tokens
    verifier: Arc<TokenVerifier>,
    /// Serializes the email uniqueness check with the write
    registration: Mutex<()>,
    /// Service configuration
    config: AuthServiceConfig,
}

impl AuthService {
    /// Create a new account service
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        issuer: Arc<TokenIssuer>,
        verifier: Arc<TokenVerifier>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            store,
            issuer,
            verifier,
            registration: Mutex::new(()),
            config,
        }
    }

    /// Registers a new user and returns its id
    ///
    /// # Errors
    ///
    /// `AuthError::EmailTaken` when the email is already registered.
    pub async fn register(&self, email: &str, username: &str, password: &str) -> DomainResult<Uuid> {
        let password = password.to_string();
        let cost = self.config.bcrypt_cost;
        let password_hash = run_blocking(move || bcrypt::hash(password, cost))
            .await?
            .map_err(|e| DomainError::Internal {
                message: format!("Password hashing failed: {}", e),
            })?;
        let user = User::new(email.to_string(), username.to_string(), password_hash);
        let record = serde_json::to_string(&user).map_err(|e| DomainError::Internal {
            message: format!("User serialization failed: {}", e),
        })?;

        let _guard = self.registration.lock().unwrap_or_else(PoisonError::into_inner);
        if self.store.get(email).is_some() {
            warn!(email = %email, "Registration rejected: email taken");
            return Err(AuthError::EmailTaken.into());
        }
        self.store.set(email, user.id.to_string());
        self.store.set(&user.id.to_string(), record);

        info!(user_id = %user.id, "User registered");
        Ok(user.id)
    }

    /// Checks a password and issues a token pair for the user
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<TokenPair> {
        let user_id = self.store.get(email).ok_or(AuthError::UserNotFound)?;
        let user = self.load_user(&user_id)?;

        let password = password.to_string();
        let password_hash = user.password_hash.clone();
        let matches = run_blocking(move || bcrypt::verify(password, &password_hash))
            .await?
            .map_err(|e| DomainError::Internal {
                message: format!("Stored password hash unreadable: {}", e),
            })?;
        if !matches {
            warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let pair = self.issuer.issue_pair(&user.id.to_string())?;
        info!(user_id = %user.id, "User logged in");
        Ok(pair)
    }

    /// Exchanges a valid refresh token for a new token pair
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<TokenPair> {
        let identity = self.verifier.verify(TokenClass::Refresh, refresh_token).await?;
        Ok(self.issuer.issue_pair(&identity.user_id)?)
    }

    /// Profile of the user with id `user_id`
    pub async fn profile(&self, user_id: &str) -> DomainResult<UserProfile> {
        Ok(self.load_user(user_id)?.profile())
    }

    fn load_user(&self, user_id: &str) -> DomainResult<User> {
        let record = self.store.get(user_id).ok_or(AuthError::UserNotFound)?;
        serde_json::from_str(&record).map_err(|e| DomainError::Internal {
            message: format!("Stored user {} unreadable: {}", user_id, e),
        })
    }
}

/// Runs CPU-bound work such as bcrypt off the async worker threads
async fn run_blocking<T, F>(work: F) -> DomainResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("Blocking task failed: {}", e),
        })
}
