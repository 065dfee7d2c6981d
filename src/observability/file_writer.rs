//! Rotating log file writer with size-based rotation and backup retention.
//!
//! The writer plugs into `tracing-subscriber`'s fmt layer through
//! [`MakeWriter`]. Each formatted event arrives as a single buffer and is
//! appended under a mutex, so lines never interleave.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;

/// Maximum file size before rotation (10 MB).
const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of backup files to retain after rotation.
const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe rotating file writer.
///
/// # Rotation Strategy
///
/// 1. Check file size before each write
/// 2. If size > 10MB, rotate:
///    - Rename current file to `<name>.<YYYYmmddTHHMMSS>`
///    - Open a new empty file on the next write
///    - Remove the oldest backups beyond 3
pub struct FileWriter {
    file_path: PathBuf,
    max_bytes: u64,
    writer: Mutex<Option<fs::File>>,
}

impl FileWriter {
    /// Creates a writer for `file_path`. The file is opened on first write.
    #[must_use]
    pub const fn new(file_path: PathBuf) -> Self {
        Self::with_limit(file_path, MAX_FILE_SIZE_BYTES)
    }

    /// Creates a writer rotating once the file exceeds `max_bytes`.
    #[must_use]
    pub const fn with_limit(file_path: PathBuf, max_bytes: u64) -> Self {
        Self {
            file_path,
            max_bytes,
            writer: Mutex::new(None),
        }
    }

    /// Appends `buf` to the log, rotating first if the file is too large.
    ///
    /// # Errors
    ///
    /// May fail due to permissions, a full disk, or a poisoned mutex.
    pub fn append(&self, buf: &[u8]) -> io::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| io::Error::other(format!("Mutex poisoned: {e}")))?;

        self.check_and_rotate(&mut writer)?;

        if writer.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)?;
            *writer = Some(file);
        }

        let file = writer
            .as_mut()
            .ok_or_else(|| io::Error::other("No file available"))?;

        file.write_all(buf)?;
        file.flush()
    }

    fn check_and_rotate(&self, writer: &mut Option<fs::File>) -> io::Result<()> {
        if let Ok(metadata) = fs::metadata(&self.file_path) {
            if metadata.len() > self.max_bytes {
                *writer = None;
                self.rotate_files()?;
            }
        }
        Ok(())
    }

    fn rotate_files(&self) -> io::Result<()> {
        let stamp = chrono::Local::now().format("%Y%m%dT%H%M%S%3f");
        let mut backup_name = self.file_path.as_os_str().to_owned();
        backup_name.push(format!(".{stamp}"));

        if self.file_path.exists() {
            fs::rename(&self.file_path, PathBuf::from(backup_name))?;
        }

        self.cleanup_old_backups()
    }

    fn cleanup_old_backups(&self) -> io::Result<()> {
        let parent_dir = self
            .file_path
            .parent()
            .ok_or_else(|| io::Error::other("No parent directory"))?;

        let file_name = self
            .file_path
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| io::Error::other("Invalid file name"))?;
        let prefix = format!("{file_name}.");

        let mut backups: Vec<PathBuf> = fs::read_dir(parent_dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(&prefix))
            })
            .collect();

        // Timestamped names sort chronologically; newest first.
        backups.sort_by(|a, b| b.cmp(a));

        for old_backup in backups.iter().skip(MAX_BACKUP_FILES) {
            let _ = fs::remove_file(old_backup);
        }

        Ok(())
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("file_path", &self.file_path)
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}

/// Per-event handle handed out to the fmt layer.
pub struct FileWriterHandle<'a> {
    inner: &'a FileWriter,
}

impl Write for FileWriterHandle<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.append(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for FileWriter {
    type Writer = FileWriterHandle<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        FileWriterHandle { inner: self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shelfmark.log");
        let writer = FileWriter::new(path.clone());

        writer.append(b"first\n").unwrap();
        writer.make_writer().write_all(b"second\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn rotates_and_keeps_limited_backups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shelfmark.log");
        let writer = FileWriter::with_limit(path.clone(), 4);

        for _ in 0..6 {
            writer.append(b"0123456789\n").unwrap();
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        let backups = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with("shelfmark.log."))
            .count();
        assert!(backups <= MAX_BACKUP_FILES);
        assert!(backups >= 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "0123456789\n");
    }
}
