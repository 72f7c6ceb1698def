#![doc = "The `kanban_board` library crate."]
#![doc = ""]
#![doc = "Projects own boards, boards own columns, columns own tasks. Every write goes through"]
#![doc = "the integrity checks in [`integrity`] before it reaches the [`store::Store`], and every"]
#![doc = "task mutation leaves an entry in the audit trail (see [`audit`])."]

pub mod audit;
pub mod auth;
pub mod config;
pub mod error;
pub mod integrity;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

pub use error::AppError;
pub use services::AppState;
