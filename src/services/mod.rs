//! Resource services.
//!
//! Each service owns a handle to the shared [`Store`] and implements the operations of one
//! resource: run the integrity checks, perform the (possibly composite) write, compose the
//! response. Handlers in [`crate::routes`] are thin wrappers around these methods.

pub mod accounts;
pub mod boards;
pub mod columns;
pub mod members;
pub mod projects;
pub mod tasks;

pub use accounts::AccountService;
pub use boards::BoardService;
pub use columns::ColumnService;
pub use members::MemberService;
pub use projects::ProjectService;
pub use tasks::TaskService;

use std::sync::Arc;

use crate::auth::TokenService;
use crate::config::{Config, PatchSemantics};
use crate::store::Store;

/// Everything the HTTP layer needs, shared across workers through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub projects: ProjectService,
    pub boards: BoardService,
    pub columns: ColumnService,
    pub tasks: TaskService,
    pub members: MemberService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: &Config) -> Self {
        let tokens = TokenService::from_config(config);
        Self::with_parts(store, tokens, config.patch_semantics)
    }

    pub fn with_parts(store: Arc<dyn Store>, tokens: TokenService, patch: PatchSemantics) -> Self {
        Self {
            accounts: AccountService::new(store.clone(), tokens),
            projects: ProjectService::new(store.clone(), patch),
            boards: BoardService::new(store.clone()),
            columns: ColumnService::new(store.clone()),
            tasks: TaskService::new(store.clone(), patch),
            members: MemberService::new(store),
        }
    }
}
