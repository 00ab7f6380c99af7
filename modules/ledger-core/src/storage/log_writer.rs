use super::record::Record;
use crate::error::Result;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Append `records` to the log at `path`, creating it if needed.
///
/// All lines are encoded before the file is touched and written as one
/// buffer followed by `sync_all`. If any part of the write fails the file is
/// cut back to its previous length, so either the whole batch reaches the
/// file or none of it does.
pub fn append(path: &Path, records: &[Record]) -> Result<()> {
    let buf = encode(records)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    append_or_rollback(&mut file, &buf)?;
    Ok(())
}

/// Replace the log at `path` with exactly `records`.
///
/// The new content is written to a sibling file and renamed over the
/// original, so a crash mid-rewrite leaves the previous log intact.
pub fn rewrite(path: &Path, records: &[Record]) -> Result<()> {
    let buf = encode(records)?;
    let tmp = compaction_path(path);

    let written = write_synced(&tmp, &buf).and_then(|_| fs::rename(&tmp, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }

    // The rename is in place; a failed directory sync only weakens its
    // durability, it does not undo it.
    let dir = parent_dir(path);
    if let Err(e) = File::open(dir).and_then(|d| d.sync_all()) {
        log::warn!("Failed to sync directory {}: {}", dir.display(), e);
    }
    Ok(())
}

/// Drop everything after byte `size`, e.g. a torn final line.
pub fn truncate_to(path: &Path, size: u64) -> Result<()> {
    let file = OpenOptions::new().write(true).open(path)?;
    file.set_len(size)?;
    file.sync_all()?;
    Ok(())
}

/// A file the log can be appended to and cut back on failure.
pub(crate) trait AppendTarget: Write {
    fn end(&mut self) -> io::Result<u64>;
    fn cut_to(&mut self, len: u64) -> io::Result<()>;
    fn sync(&mut self) -> io::Result<()>;
}

impl AppendTarget for File {
    fn end(&mut self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn cut_to(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.sync_all()
    }
}

pub(crate) fn append_or_rollback<T: AppendTarget>(target: &mut T, buf: &[u8]) -> io::Result<()> {
    let start = target.end()?;
    let written = target
        .write_all(buf)
        .and_then(|_| target.flush())
        .and_then(|_| target.sync());

    if let Err(e) = written {
        if let Err(cut) = target.cut_to(start) {
            log::error!("Failed to roll back partial append to {} bytes: {}", start, cut);
        }
        return Err(e);
    }
    Ok(())
}

fn write_synced(path: &Path, buf: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(buf)?;
    file.flush()?;
    file.sync_all()
}

fn encode(records: &[Record]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    for record in records {
        buf.extend_from_slice(record.to_line()?.as_bytes());
        buf.push(b'\n');
    }
    Ok(buf)
}

fn compaction_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".compact");
    path.with_file_name(name)
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}
