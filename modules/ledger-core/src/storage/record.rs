//! Line grammar of the ledger file.
//!
//! ```text
//! U <username> <password>
//! C <username> <msg_type> <content>
//! M <username> <key> <value>
//! ```
//!
//! Fields are separated by a single space. A line is split into at most as
//! many parts as its tag declares, so the final field may itself contain
//! spaces. Lines that do not parse are skipped by the reader.

use crate::constants::{CHAT_TAG, FIELD_DELIMITER, MEMO_TAG, USER_TAG};
use crate::error::{LedgerError, Result};
use ledger_types::MessageKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    User {
        username: String,
        password: String,
    },
    Chat {
        username: String,
        kind: MessageKind,
        content: String,
    },
    Memo {
        username: String,
        key: String,
        value: String,
    },
}

impl Record {
    pub fn user(username: &str, password: &str) -> Self {
        Record::User {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    pub fn chat(username: &str, kind: MessageKind, content: &str) -> Self {
        Record::Chat {
            username: username.to_string(),
            kind,
            content: content.to_string(),
        }
    }

    pub fn memo(username: &str, key: &str, value: &str) -> Self {
        Record::Memo {
            username: username.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    pub fn username(&self) -> &str {
        match self {
            Record::User { username, .. }
            | Record::Chat { username, .. }
            | Record::Memo { username, .. } => username,
        }
    }

    /// Encode as a single line without the trailing newline.
    pub fn to_line(&self) -> Result<String> {
        let (tag, leading, last): (&str, Vec<&str>, &str) = match self {
            Record::User { username, password } => {
                (USER_TAG, vec![username.as_str()], password.as_str())
            }
            Record::Chat {
                username,
                kind,
                content,
            } => (
                CHAT_TAG,
                vec![username.as_str(), kind.as_str()],
                content.as_str(),
            ),
            Record::Memo {
                username,
                key,
                value,
            } => (
                MEMO_TAG,
                vec![username.as_str(), key.as_str()],
                value.as_str(),
            ),
        };

        for field in &leading {
            if !is_inner_field(field) {
                return Err(LedgerError::Encoding(format!(
                    "{} record field {:?} is empty or contains whitespace",
                    tag, field
                )));
            }
        }
        if !is_final_field(last) {
            return Err(LedgerError::Encoding(format!(
                "{} record final field is empty, padded, or spans lines",
                tag
            )));
        }

        let mut line = String::from(tag);
        for field in leading.into_iter().chain(std::iter::once(last)) {
            line.push(FIELD_DELIMITER);
            line.push_str(field);
        }
        Ok(line)
    }

    pub fn parse_line(line: &str) -> Option<Record> {
        let (tag, rest) = line.trim().split_once(FIELD_DELIMITER)?;
        match tag {
            USER_TAG => {
                let [username, password] = split_fields(rest)?;
                Some(Record::user(username, password))
            }
            CHAT_TAG => {
                let [username, kind, content] = split_fields(rest)?;
                let kind = kind.parse().ok()?;
                Some(Record::chat(username, kind, content))
            }
            MEMO_TAG => {
                let [username, key, value] = split_fields(rest)?;
                Some(Record::memo(username, key, value))
            }
            _ => None,
        }
    }
}

/// A field other than the last one: it must survive a split on the delimiter.
pub fn is_inner_field(field: &str) -> bool {
    !field.is_empty() && !field.contains(char::is_whitespace)
}

/// The last field may hold spaces but no line breaks, and must survive the
/// line trim applied by the reader.
pub fn is_final_field(field: &str) -> bool {
    !field.is_empty() && !field.contains(['\n', '\r']) && field.trim() == field
}

fn split_fields<const N: usize>(rest: &str) -> Option<[&str; N]> {
    let mut parts = rest.splitn(N, FIELD_DELIMITER);
    let mut fields = [""; N];
    for field in fields.iter_mut() {
        *field = parts.next().filter(|f| !f.is_empty())?;
    }
    Some(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_field_keeps_delimiters() {
        let record = Record::parse_line("C bob text hello there  world\n").unwrap();
        assert_eq!(
            record,
            Record::chat("bob", MessageKind::Text, "hello there  world")
        );

        let record = Record::parse_line("U alice correct horse battery").unwrap();
        assert_eq!(record, Record::user("alice", "correct horse battery"));
    }

    #[test]
    fn test_short_and_malformed_lines_rejected() {
        assert_eq!(Record::parse_line(""), None);
        assert_eq!(Record::parse_line("U"), None);
        assert_eq!(Record::parse_line("U alice"), None);
        assert_eq!(Record::parse_line("C bob text"), None);
        assert_eq!(Record::parse_line("C bob audio hi"), None);
        assert_eq!(Record::parse_line("M bob key"), None);
        assert_eq!(Record::parse_line("X bob a b"), None);
        assert_eq!(Record::parse_line("U  secret"), None);
    }

    #[test]
    fn test_encode_line() {
        let line = Record::memo("bob", "note", "12345").to_line().unwrap();
        assert_eq!(line, "M bob note 12345");

        let line = Record::chat("bob", MessageKind::Video, "clip at noon")
            .to_line()
            .unwrap();
        assert_eq!(line, "C bob video clip at noon");
    }

    #[test]
    fn test_encode_rejects_unparseable_fields() {
        assert!(Record::user("a b", "pw").to_line().is_err());
        assert!(Record::user("", "pw").to_line().is_err());
        assert!(Record::memo("bob", "two words", "1").to_line().is_err());
        assert!(
            Record::chat("bob", MessageKind::Text, "line one\nline two")
                .to_line()
                .is_err()
        );
        assert!(Record::chat("bob", MessageKind::Text, " padded").to_line().is_err());
    }
}
