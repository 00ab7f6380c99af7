use crate::commands::{Dispatch, Outcome};
use crate::error::Result;
use crate::projection::Projection;
use crate::storage::LogStore;
use ledger_types::{ActionReply, ActionRequest};
use std::path::PathBuf;

/// A projection paired with the log it was rebuilt from.
///
/// Records are written before they are applied: if the write fails the
/// projection is left exactly as it was.
#[derive(Debug)]
pub struct Ledger<P: Projection> {
    store: LogStore,
    state: P,
}

impl<P: Projection> Ledger<P> {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = LogStore::new(path);
        let scan = store.replay();

        let mut state = P::default();
        for record in &scan.records {
            state.apply(record);
        }
        log::info!(
            "Replayed {} records from {} ({} lines skipped)",
            scan.records.len(),
            store.path().display(),
            scan.skipped_lines
        );

        if scan.has_torn_tail() {
            log::warn!(
                "Truncating {} from {} to {} bytes to drop an unterminated line",
                store.path().display(),
                scan.total_bytes,
                scan.valid_bytes
            );
            store.truncate_to(scan.valid_bytes)?;
        }

        // The state is already complete; an oversized file is only a cost.
        if let Some(compacted) = state.compaction(&scan) {
            match store.rewrite(&compacted) {
                Ok(()) => log::info!(
                    "Compacted {} from {} to {} records",
                    store.path().display(),
                    scan.records.len(),
                    compacted.len()
                ),
                Err(e) => log::warn!(
                    "Could not compact {}: {}; keeping the file as is",
                    store.path().display(),
                    e
                ),
            }
        }

        Ok(Self { store, state })
    }

    pub fn state(&self) -> &P {
        &self.state
    }

    pub fn store(&self) -> &LogStore {
        &self.store
    }

    /// Persist the outcome's records, then apply them.
    pub fn commit(&mut self, outcome: Outcome) -> Result<ActionReply> {
        let Outcome { reply, records } = outcome;
        if records.is_empty() {
            return Ok(reply);
        }

        self.state.persist(&self.store, &records)?;
        for record in &records {
            self.state.apply(record);
        }
        Ok(reply)
    }
}

impl<P: Projection + Dispatch> Ledger<P> {
    pub fn execute(&mut self, request: &ActionRequest) -> Result<ActionReply> {
        let outcome = self.state.dispatch(request);
        log::debug!(
            "Action '{}' for '{}': success={} records={}",
            request.action,
            request.username.trim(),
            outcome.reply.success,
            outcome.records.len()
        );
        self.commit(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_MESSAGES;
    use crate::projection::{ChatState, MemoState};
    use crate::storage::Record;
    use ledger_types::{ChatMessage, MessageKind};
    use std::fs;

    fn register(username: &str, password: &str) -> ActionRequest {
        ActionRequest::new("register")
            .username(username)
            .password(password)
    }

    fn send(username: &str, content: &str) -> ActionRequest {
        ActionRequest::new("send")
            .username(username)
            .message("text", content)
    }

    fn memo(action: &str, key: &str) -> ActionRequest {
        ActionRequest::new(action).username("bob").key(key)
    }

    fn give(value: &str) -> ActionRequest {
        ActionRequest::new("give").username("bob").value(value)
    }

    #[test]
    fn test_chat_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = Ledger::<ChatState>::open(dir.path().join("data.txt")).unwrap();

        assert!(ledger.execute(&register("bob", "secret")).unwrap().success);

        let reply = ledger
            .execute(&ActionRequest::new("login").username("bob").password("secret"))
            .unwrap();
        assert!(reply.success);
        assert!(reply.message.unwrap().contains("bob"));

        let reply = ledger
            .execute(&ActionRequest::new("login").username("bob").password("wrong"))
            .unwrap();
        assert!(!reply.success);

        assert!(ledger.execute(&send("bob", "hi")).unwrap().success);

        let reply = ledger.execute(&ActionRequest::new("get")).unwrap();
        assert_eq!(
            reply.messages.unwrap(),
            vec![ChatMessage {
                username: "bob".to_string(),
                kind: MessageKind::Text,
                content: "hi".to_string(),
            }]
        );
    }

    #[test]
    fn test_duplicate_registration_keeps_first_password() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        let mut ledger = Ledger::<ChatState>::open(&path).unwrap();

        assert!(ledger.execute(&register("alice", "pw1")).unwrap().success);
        let reply = ledger.execute(&register("alice", "pw2")).unwrap();
        assert!(!reply.success);
        assert_eq!(reply.exists, Some(true));
        assert_eq!(ledger.state().credentials.password("alice"), Some("pw1"));

        let reopened = Ledger::<ChatState>::open(&path).unwrap();
        assert_eq!(reopened.state().credentials.password("alice"), Some("pw1"));
    }

    #[test]
    fn test_chat_bound_holds_in_memory_and_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        let mut ledger = Ledger::<ChatState>::open(&path).unwrap();
        ledger.execute(&register("bob", "secret")).unwrap();

        for n in 1..=MAX_MESSAGES + 1 {
            let reply = ledger.execute(&send("bob", &format!("msg {}", n))).unwrap();
            assert!(reply.success);
        }
        assert_eq!(ledger.state().chat.len(), MAX_MESSAGES);

        let on_disk = fs::read_to_string(&path)
            .unwrap()
            .lines()
            .filter(|l| l.starts_with("C "))
            .count();
        assert_eq!(on_disk, MAX_MESSAGES);

        let reopened = Ledger::<ChatState>::open(&path).unwrap();
        let contents: Vec<String> = reopened
            .state()
            .chat
            .iter()
            .map(|m| m.content.clone())
            .collect();
        assert_eq!(contents.len(), MAX_MESSAGES);
        assert!(!contents.contains(&"msg 1".to_string()));
        assert_eq!(contents.first().map(String::as_str), Some("msg 2"));
        assert_eq!(contents.last().map(String::as_str), Some("msg 501"));
        assert_eq!(reopened.state(), ledger.state());
    }

    #[test]
    fn test_oversized_chat_file_compacted_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        let mut lines = String::from("U bob secret\n");
        for n in 0..MAX_MESSAGES + 20 {
            lines.push_str(&format!("C bob text old {}\n", n));
        }
        fs::write(&path, lines).unwrap();

        let ledger = Ledger::<ChatState>::open(&path).unwrap();
        assert_eq!(ledger.state().chat.len(), MAX_MESSAGES);
        let persisted = ledger.store().replay().records;
        assert_eq!(persisted.len(), MAX_MESSAGES + 1);
        assert_eq!(
            persisted[1],
            Record::chat("bob", MessageKind::Text, "old 20")
        );
    }

    #[test]
    fn test_torn_tail_dropped_before_next_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        fs::write(&path, "U bob secret\nU car").unwrap();

        let mut ledger = Ledger::<ChatState>::open(&path).unwrap();
        assert!(!ledger.state().credentials.contains("car"));
        assert!(ledger.execute(&register("amy", "pw")).unwrap().success);
        assert_eq!(fs::read_to_string(&path).unwrap(), "U bob secret\nU amy pw\n");

        let reopened = Ledger::<ChatState>::open(&path).unwrap();
        let users: Vec<&str> = reopened
            .state()
            .credentials
            .iter()
            .map(|(user, _)| user)
            .collect();
        assert_eq!(users, vec!["amy", "bob"]);
        assert_eq!(reopened.state().credentials.password("amy"), Some("pw"));
    }

    #[test]
    fn test_failed_compaction_does_not_block_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        let mut lines = String::from("U bob secret\n");
        for n in 0..MAX_MESSAGES + 5 {
            lines.push_str(&format!("C bob text old {}\n", n));
        }
        fs::write(&path, &lines).unwrap();

        // A non-empty directory in the way of the rewrite's sibling file.
        let blocker = dir.path().join("data.txt.compact");
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("keep"), "x").unwrap();

        let mut ledger = Ledger::<ChatState>::open(&path).unwrap();
        assert_eq!(ledger.state().chat.len(), MAX_MESSAGES);
        assert_eq!(fs::read_to_string(&path).unwrap(), lines);
        assert!(ledger.execute(&register("amy", "pw")).unwrap().success);
    }

    #[test]
    fn test_failed_write_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        let mut ledger = Ledger::<ChatState>::open(&path).unwrap();
        ledger.execute(&register("bob", "secret")).unwrap();

        // A directory where the log file should be makes every append fail.
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        assert!(ledger.execute(&send("bob", "lost")).is_err());
        assert!(ledger.state().chat.is_empty());
        assert!(ledger.execute(&register("amy", "pw")).is_err());
        assert!(!ledger.state().credentials.contains("amy"));
    }

    #[test]
    fn test_memo_replay_matches_live_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memo.txt");
        let mut ledger = Ledger::<MemoState>::open(&path).unwrap();

        ledger.execute(&register("bob", "secret")).unwrap();
        ledger.execute(&register("amy", "pw")).unwrap();
        ledger.execute(&memo("save", "a")).unwrap();
        ledger.execute(&memo("save", "b")).unwrap();
        ledger.execute(&memo("renew", "a")).unwrap();

        let reopened = Ledger::<MemoState>::open(&path).unwrap();
        assert_eq!(reopened.state(), ledger.state());
        assert!(reopened.state().memos("amy").unwrap().is_empty());
        assert_eq!(reopened.state().pair_count(), 2);
    }

    #[test]
    fn test_memo_symmetry_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memo.txt");
        let mut ledger = Ledger::<MemoState>::open(&path).unwrap();
        ledger.execute(&register("bob", "secret")).unwrap();

        let token = ledger.execute(&memo("save", "k")).unwrap().result.unwrap();

        let mut reopened = Ledger::<MemoState>::open(&path).unwrap();
        let reply = reopened.execute(&give("k")).unwrap();
        assert_eq!(reply.result.as_deref(), Some(token.as_str()));
        let reply = reopened.execute(&give(&token)).unwrap();
        assert_eq!(reply.result.as_deref(), Some("k"));
    }

    #[test]
    fn test_renew_orphans_previous_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memo.txt");
        let mut ledger = Ledger::<MemoState>::open(&path).unwrap();
        ledger.execute(&register("bob", "secret")).unwrap();

        let h1 = ledger.execute(&memo("save", "k")).unwrap().result.unwrap();
        let h2 = ledger.execute(&memo("renew", "k")).unwrap().result.unwrap();
        assert_ne!(h1, h2);

        let mut reopened = Ledger::<MemoState>::open(&path).unwrap();
        for live in [&mut ledger, &mut reopened] {
            assert!(!live.execute(&give(&h1)).unwrap().success);
            let reply = live.execute(&give(&h2)).unwrap();
            assert_eq!(reply.result.as_deref(), Some("k"));
            let reply = live.execute(&give("k")).unwrap();
            assert_eq!(reply.result.as_deref(), Some(h2.as_str()));
        }

        let reply = reopened.execute(&memo("renew", &h2)).unwrap();
        assert!(!reply.success);

        // Both pairs stay in the file; only the newest is reachable.
        let memo_lines = ledger
            .store()
            .replay()
            .records
            .iter()
            .filter(|r| matches!(r, Record::Memo { .. }))
            .count();
        assert_eq!(memo_lines, 4);
    }
}
