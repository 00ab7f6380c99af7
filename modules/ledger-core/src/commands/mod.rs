//! Action handlers.
//!
//! Every handler reads a projection, validates its (already trimmed) inputs
//! and returns the reply together with the records that must be persisted
//! for the action to take effect. Handlers never mutate state; the
//! [`Ledger`](crate::Ledger) persists the records first and then applies
//! them.

pub mod chat;
pub mod memo;

use crate::projection::Projection;
use crate::storage::Record;
use crate::storage::record::{is_final_field, is_inner_field};
use ledger_types::{ActionReply, ActionRequest};

/// Why an action was refused. Converted to a failure reply, never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Validation(String),
    NotFound(String),
    /// Duplicate user or memo key; surfaces as `exists: true`.
    Conflict(String),
    Denied(String),
}

impl From<Rejection> for ActionReply {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::Conflict(msg) => ActionReply::conflict(msg),
            Rejection::Validation(msg) | Rejection::NotFound(msg) | Rejection::Denied(msg) => {
                ActionReply::fail(msg)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub reply: ActionReply,
    pub records: Vec<Record>,
}

impl Outcome {
    pub fn read_only(reply: ActionReply) -> Self {
        Self {
            reply,
            records: Vec::new(),
        }
    }

    pub fn write(reply: ActionReply, records: Vec<Record>) -> Self {
        Self { reply, records }
    }
}

pub type CommandResult = Result<Outcome, Rejection>;

/// Fold a rejection into a reply-only outcome.
pub fn settle(result: CommandResult) -> Outcome {
    result.unwrap_or_else(|rejection| Outcome::read_only(rejection.into()))
}

/// Routes a raw request to the handlers a ledger variant supports.
pub trait Dispatch {
    fn dispatch(&self, request: &ActionRequest) -> Outcome;
}

// =====================================================
// Shared actions
// =====================================================

pub fn register<P: Projection>(state: &P, username: &str, password: &str) -> CommandResult {
    if username.is_empty() || password.is_empty() {
        return Err(Rejection::Validation(
            "Username and password are required.".to_string(),
        ));
    }
    if !is_inner_field(username) {
        return Err(Rejection::Validation(
            "Username must not contain spaces.".to_string(),
        ));
    }
    if !is_final_field(password) {
        return Err(Rejection::Validation(
            "Password must be a single line.".to_string(),
        ));
    }
    if state.credentials().contains(username) {
        return Err(Rejection::Conflict(format!(
            "User '{}' already exists.",
            username
        )));
    }

    Ok(Outcome::write(
        ActionReply::ok(format!("User '{}' registered successfully.", username)),
        vec![Record::user(username, password)],
    ))
}

pub fn login<P: Projection>(state: &P, username: &str, password: &str) -> CommandResult {
    match state.credentials().password(username) {
        Some(stored) if stored == password => Ok(Outcome::read_only(ActionReply::ok(format!(
            "Welcome, {}!",
            username
        )))),
        _ => Err(Rejection::Denied(
            "Incorrect username or password.".to_string(),
        )),
    }
}

pub fn unknown_action() -> CommandResult {
    Err(Rejection::Validation("Unknown action.".to_string()))
}

pub(crate) fn require_user<P: Projection>(state: &P, username: &str) -> Result<(), Rejection> {
    if state.credentials().contains(username) {
        Ok(())
    } else {
        Err(Rejection::NotFound("User not registered.".to_string()))
    }
}
