use std::sync::Arc;

use validator::Validate;

use crate::auth::{AuthResponse, HashedPassword, LoginRequest, RegisterRequest, TokenService};
use crate::error::AppError;
use crate::integrity::{self, Proposal};
use crate::store::{NaturalKey, Store};

/// Registration and login. Users are never updated or deleted here.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn Store>,
    tokens: TokenService,
}

impl AccountService {
    pub fn new(store: Arc<dyn Store>, tokens: TokenService) -> Self {
        Self { store, tokens }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AppError> {
        request.validate()?;

        let proposal = Proposal::new().unique(NaturalKey::UserEmail(&request.email));
        integrity::enforce(self.store.as_ref(), &proposal)
            .await
            .map_err(|err| match err {
                AppError::Conflict(_) => {
                    AppError::Conflict("User with this email already exists".into())
                }
                other => other,
            })?;

        let password = HashedPassword::new(&request.password)?;
        let user = self
            .store
            .insert_user(&request.username, &request.email, password.as_str())
            .await?;
        log::info!("user {} registered", user.id);

        Ok(AuthResponse {
            token: self.tokens.generate(&user.email)?,
            user_id: user.id,
            username: user.username,
            email: user.email,
        })
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        request.validate()?;

        let invalid = || AppError::Unauthorized("Invalid email or password".into());
        let creds = self
            .store
            .find_user_by_email(&request.email)
            .await?
            .ok_or_else(invalid)?;
        if !HashedPassword::from_stored(creds.password.as_str()).matches(&request.password)? {
            return Err(invalid());
        }

        Ok(AuthResponse {
            token: self.tokens.generate(&creds.email)?,
            user_id: creds.id,
            username: creds.username,
            email: creds.email,
        })
    }
}
