//! Durable line-log ledger shared by the chat and memo services.
//!
//! State lives in an in-memory [`Projection`] that is rebuilt on startup by
//! replaying the log file. Actions are evaluated against the projection by
//! the handlers in [`commands`], which return the records to persist; the
//! [`Ledger`] writes those records and only then applies them.
//!
//! ```no_run
//! use ledger_core::{ChatState, Ledger};
//! use ledger_types::ActionRequest;
//!
//! let mut ledger = Ledger::<ChatState>::open("data.txt")?;
//! let reply = ledger.execute(
//!     &ActionRequest::new("register").username("bob").password("secret"),
//! )?;
//! assert!(reply.success);
//! # Ok::<(), ledger_core::LedgerError>(())
//! ```

pub mod commands;
pub mod constants;
pub mod error;
pub mod ledger;
pub mod projection;
pub mod pseudo_hash;
pub mod storage;

pub use commands::{Dispatch, Outcome, Rejection};
pub use constants::MAX_MESSAGES;
pub use error::{LedgerError, Result};
pub use ledger::Ledger;
pub use projection::{BiMap, ChatLog, ChatState, Credentials, MemoState, Projection};
pub use storage::{LogStore, Record};
