use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::AppError;

/// A bcrypt hash as kept in `users.password`. Plain passwords never leave `new`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Hashes a plain password chosen at registration.
    pub fn new(plain: &str) -> Result<Self, AppError> {
        hash(plain, DEFAULT_COST).map(Self).map_err(|e| {
            AppError::InternalServerError(format!("Failed to hash password: {}", e))
        })
    }

    /// Wraps a hash read back from the store.
    pub fn from_stored(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks a login attempt against this hash. A stored value bcrypt cannot parse is a
    /// server fault, not a wrong password.
    pub fn matches(&self, candidate: &str) -> Result<bool, AppError> {
        verify(candidate, &self.0).map_err(|e| {
            AppError::InternalServerError(format!("Stored password hash is unreadable: {}", e))
        })
    }
}
