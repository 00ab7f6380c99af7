use super::record::Record;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Debug, Default)]
pub struct ReplayScan {
    pub records: Vec<Record>,
    /// Non-empty lines that could not be parsed, including a torn tail.
    pub skipped_lines: usize,
    /// Bytes up to and including the last newline.
    pub valid_bytes: u64,
    /// Bytes read in total.
    pub total_bytes: u64,
}

impl ReplayScan {
    /// True when the file ends in a line without its newline, which is what
    /// an interrupted append leaves behind.
    pub fn has_torn_tail(&self) -> bool {
        self.total_bytes > self.valid_bytes
    }
}

/// Read every parseable record from `path` in file order.
///
/// A missing or unreadable file yields an empty scan; a read error part way
/// through keeps the records seen so far. A final segment with no newline is
/// never parsed: it is counted as skipped and left outside `valid_bytes`.
pub fn read_all(path: &Path) -> ReplayScan {
    let mut scan = ReplayScan::default();

    if !path.exists() {
        return scan;
    }

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            log::warn!("Cannot open ledger {}: {}; starting empty", path.display(), e);
            return scan;
        }
    };

    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut line_no = 0usize;
    loop {
        buf.clear();
        let n = match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                log::warn!("Read error after line {} of {}: {}", line_no, path.display(), e);
                break;
            }
        };
        line_no += 1;
        scan.total_bytes += n as u64;

        if buf.last() != Some(&b'\n') {
            log::warn!(
                "Unterminated final line {} of {} ({} bytes); ignoring it",
                line_no,
                path.display(),
                n
            );
            scan.skipped_lines += 1;
            break;
        }
        scan.valid_bytes = scan.total_bytes;

        let Ok(text) = std::str::from_utf8(&buf) else {
            scan.skipped_lines += 1;
            continue;
        };
        if text.trim().is_empty() {
            continue;
        }

        match Record::parse_line(text) {
            Some(record) => scan.records.push(record),
            None => {
                log::debug!("Skipping malformed line {} of {}", line_no, path.display());
                scan.skipped_lines += 1;
            }
        }
    }

    scan
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_torn_tail_is_not_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        fs::write(&path, "U bob secret\nU car").unwrap();

        let scan = read_all(&path);
        assert_eq!(scan.records, vec![Record::user("bob", "secret")]);
        assert_eq!(scan.skipped_lines, 1);
        assert_eq!(scan.valid_bytes, 13);
        assert_eq!(scan.total_bytes, 18);
        assert!(scan.has_torn_tail());
    }

    #[test]
    fn test_terminated_file_has_no_torn_tail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        fs::write(&path, "U bob secret\nC bob text hi\n").unwrap();

        let scan = read_all(&path);
        assert_eq!(scan.records.len(), 2);
        assert_eq!(scan.valid_bytes, scan.total_bytes);
        assert!(!scan.has_torn_tail());
    }
}
