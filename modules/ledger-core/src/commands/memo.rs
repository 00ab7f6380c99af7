//! Memo ledger actions: `register`, `login`, `save`, `renew`, `give`.
//!
//! A saved key is paired with a fresh pseudo-hash token, and the pair is
//! stored in both directions so either side can be traded for the other.

use super::{CommandResult, Dispatch, Outcome, Rejection, settle};
use crate::projection::{BiMap, MemoState};
use crate::pseudo_hash::pseudo_hash;
use crate::storage::Record;
use crate::storage::record::is_inner_field;
use ledger_types::{ActionReply, ActionRequest};

pub fn save(state: &MemoState, username: &str, key: &str) -> CommandResult {
    let memos = user_memos(state, username)?;
    validate_key(key)?;
    if memos.is_taken(key) {
        return Err(Rejection::Conflict(format!("Key '{}' already exists.", key)));
    }
    Ok(pair(username, key, "Saved."))
}

pub fn renew(state: &MemoState, username: &str, key: &str) -> CommandResult {
    let memos = user_memos(state, username)?;
    validate_key(key)?;
    if !memos.is_live_key(key) {
        return Err(Rejection::NotFound(format!("Key '{}' not found.", key)));
    }
    Ok(pair(username, key, "Renewed."))
}

pub fn give(state: &MemoState, username: &str, value: &str) -> CommandResult {
    let memos = user_memos(state, username)?;
    if value.is_empty() {
        return Err(Rejection::Validation("Value is required.".to_string()));
    }
    match memos.counterpart(value) {
        Some(found) => Ok(Outcome::read_only(ActionReply::ok("Found.").with_result(found))),
        None => Err(Rejection::NotFound(
            "Nothing found for that value.".to_string(),
        )),
    }
}

fn user_memos<'a>(state: &'a MemoState, username: &str) -> Result<&'a BiMap, Rejection> {
    super::require_user(state, username)?;
    state
        .memos(username)
        .ok_or_else(|| Rejection::NotFound("User not registered.".to_string()))
}

fn validate_key(key: &str) -> Result<(), Rejection> {
    if key.is_empty() {
        return Err(Rejection::Validation("Key is required.".to_string()));
    }
    if !is_inner_field(key) {
        return Err(Rejection::Validation(
            "Key must not contain spaces.".to_string(),
        ));
    }
    Ok(())
}

/// Fresh token for `key`, persisted as a forward and a backward record.
fn pair(username: &str, key: &str, message: &str) -> Outcome {
    let token = pseudo_hash(key);
    let records = vec![
        Record::memo(username, key, &token),
        Record::memo(username, &token, key),
    ];
    Outcome::write(ActionReply::ok(message).with_result(token), records)
}

impl Dispatch for MemoState {
    fn dispatch(&self, request: &ActionRequest) -> Outcome {
        let username = request.username.trim();
        let password = request.password.trim();

        let result = match request.action.as_str() {
            "register" => super::register(self, username, password),
            "login" => super::login(self, username, password),
            "save" => save(self, username, request.key.trim()),
            "renew" => renew(self, username, request.key.trim()),
            "give" => give(self, username, request.value.trim()),
            _ => super::unknown_action(),
        };
        settle(result)
    }
}
