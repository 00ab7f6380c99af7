/// Upper bound on chat messages held in memory and persisted on disk.
pub const MAX_MESSAGES: usize = 500;

/// Field delimiter of the line format.
pub(crate) const FIELD_DELIMITER: char = ' ';

pub(crate) const USER_TAG: &str = "U";
pub(crate) const CHAT_TAG: &str = "C";
pub(crate) const MEMO_TAG: &str = "M";
