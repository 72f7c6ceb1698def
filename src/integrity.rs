//! Pre-write integrity checks.
//!
//! A [`Proposal`] describes a record about to be written: the required fields it carries, the
//! parents it points at and the natural key it claims. [`inspect`] runs the checks in a fixed
//! order and stops at the first failure:
//!
//! 1. required fields (no store access),
//! 2. payload rules such as length limits (no store access),
//! 3. parent existence, in declaration order,
//! 4. natural-key uniqueness.

use validator::Validate;

use crate::error::AppError;
use crate::store::{EntityKind, NaturalKey, ParentRef, Store};

/// Outcome of inspecting a proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Ok,
    MissingRequiredField(&'static str),
    InvalidPayload(String),
    ParentMissing(EntityKind),
    DuplicateName(EntityKind),
}

impl Verdict {
    /// Maps the verdict onto the outward error taxonomy.
    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            Verdict::Ok => Ok(()),
            Verdict::MissingRequiredField(field) => {
                Err(AppError::BadRequest(format!("{} is required", field)))
            }
            Verdict::InvalidPayload(msg) => Err(AppError::ValidationError(msg)),
            Verdict::ParentMissing(kind) => Err(AppError::NotFound(format!("{} not found", kind))),
            Verdict::DuplicateName(EntityKind::Membership) => Err(AppError::Conflict(
                "User is already in the project".to_string(),
            )),
            Verdict::DuplicateName(kind) => {
                Err(AppError::Conflict(format!("This {} already exists", kind)))
            }
        }
    }
}

#[derive(Clone, Default)]
pub struct Proposal<'a> {
    ids: Vec<(&'static str, i32)>,
    strings: Vec<(&'static str, &'a str)>,
    payload: Option<&'a (dyn Validate + Sync)>,
    parents: Vec<ParentRef>,
    key: Option<NaturalKey<'a>>,
}

impl<'a> Proposal<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A foreign key that must be non-zero.
    pub fn require_id(mut self, field: &'static str, id: i32) -> Self {
        self.ids.push((field, id));
        self
    }

    /// A free-form string that must be non-empty.
    pub fn require_text(mut self, field: &'static str, value: &'a str) -> Self {
        self.strings.push((field, value));
        self
    }

    /// The request body whose `validator` rules run once the required fields are present.
    pub fn payload(mut self, payload: &'a (dyn Validate + Sync)) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn parent(mut self, parent: ParentRef) -> Self {
        self.parents.push(parent);
        self
    }

    pub fn unique(mut self, key: NaturalKey<'a>) -> Self {
        self.key = Some(key);
        self
    }
}

/// Runs the checks of `proposal` against `store`. Store failures are returned as errors,
/// rule violations as a [`Verdict`].
pub async fn inspect(store: &dyn Store, proposal: &Proposal<'_>) -> Result<Verdict, AppError> {
    for (field, id) in &proposal.ids {
        if *id == 0 {
            return Ok(Verdict::MissingRequiredField(*field));
        }
    }
    for (field, value) in &proposal.strings {
        if value.is_empty() {
            return Ok(Verdict::MissingRequiredField(*field));
        }
    }

    if let Some(payload) = proposal.payload {
        if let Err(errors) = payload.validate() {
            return Ok(Verdict::InvalidPayload(errors.to_string()));
        }
    }

    for parent in &proposal.parents {
        if !store.parent_exists(*parent).await? {
            log::debug!("{} {} does not exist", parent.kind(), parent.id());
            return Ok(Verdict::ParentMissing(parent.kind()));
        }
    }

    if let Some(key) = proposal.key {
        if store.natural_key_taken(key).await? {
            log::debug!("natural key already taken: {:?}", key);
            return Ok(Verdict::DuplicateName(key.kind()));
        }
    }

    Ok(Verdict::Ok)
}

/// [`inspect`] followed by [`Verdict::into_result`].
pub async fn enforce(store: &dyn Store, proposal: &Proposal<'_>) -> Result<(), AppError> {
    inspect(store, proposal).await?.into_result()
}
