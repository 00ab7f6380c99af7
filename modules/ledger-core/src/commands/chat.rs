//! Chat ledger actions: `register`, `login`, `send`, `get`.

use super::{CommandResult, Dispatch, Outcome, Rejection, settle};
use crate::projection::ChatState;
use crate::storage::Record;
use crate::storage::record::is_final_field;
use ledger_types::{ActionReply, ActionRequest, MessageKind};

pub fn send(state: &ChatState, username: &str, msg_type: &str, content: &str) -> CommandResult {
    super::require_user(state, username)?;

    let kind: MessageKind = msg_type
        .parse()
        .map_err(|_| Rejection::Validation("Invalid message type.".to_string()))?;
    if content.is_empty() {
        return Err(Rejection::Validation("Empty message.".to_string()));
    }
    if !is_final_field(content) {
        return Err(Rejection::Validation(
            "Message must be a single line.".to_string(),
        ));
    }

    Ok(Outcome::write(
        ActionReply::ok("Message sent."),
        vec![Record::chat(username, kind, content)],
    ))
}

pub fn get(state: &ChatState) -> CommandResult {
    Ok(Outcome::read_only(ActionReply::with_messages(
        state.chat.to_vec(),
    )))
}

impl Dispatch for ChatState {
    fn dispatch(&self, request: &ActionRequest) -> Outcome {
        let username = request.username.trim();
        let password = request.password.trim();

        let result = match request.action.as_str() {
            "register" => super::register(self, username, password),
            "login" => super::login(self, username, password),
            "send" => send(
                self,
                username,
                request.msg_type.trim(),
                request.content.trim(),
            ),
            "get" => get(self),
            _ => super::unknown_action(),
        };
        settle(result)
    }
}
