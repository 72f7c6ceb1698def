use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered account as exposed to callers. The password hash never leaves the store layer
/// except through [`UserCredentials`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
}

/// A user row including the bcrypt hash, used only to verify a login.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl From<UserCredentials> for User {
    fn from(creds: UserCredentials) -> Self {
        Self {
            id: creds.id,
            username: creds.username,
            email: creds.email,
        }
    }
}
