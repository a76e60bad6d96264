// SPDX-License-Identifier: MIT OR Apache-2.0

//! Size-limited log file for one logger identity.
//!
//! A [`FilePublisher`] appends formatted records to one file. The handle is opened on
//! the first write, and reopened transparently if the file was deleted underneath
//! it. Bytes are counted starting from the file's length at open time, so a process
//! restart does not reset the size budget.
//!
//! When a write pushes the count past the limit, the file is closed and deleted.
//! There are no numbered backups: the next record starts a fresh, empty file.
//!
//! Failures never reach the caller. A failed write drops the handle and the record;
//! the next publish tries to open the file again.

use crate::diagnostics::Diagnostics;
use crate::error::LogError;
use crate::formatter::{DefaultFormatter, Formatter};
use crate::log_record::LogRecord;
use crate::publisher::Publisher;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A writer that counts the bytes passed through it, starting from an initial length.
#[derive(Debug)]
struct CountingWriter<W> {
    inner: W,
    written: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W, initial: u64) -> Self {
        Self {
            inner,
            written: initial,
        }
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

type Output = CountingWriter<BufWriter<File>>;

#[derive(Debug)]
struct FileState {
    /// 0 means unlimited
    limit: u64,
    output: Option<Output>,
    /// set when the registry hands this identity's file to another publisher
    revoked: bool,
}

impl FileState {
    fn close_output(&mut self) -> io::Result<()> {
        match self.output.take() {
            Some(mut output) => output.flush(),
            None => Ok(()),
        }
    }
}

#[derive(Debug)]
pub struct FilePublisher {
    path: PathBuf,
    formatter: Arc<dyn Formatter>,
    diagnostics: Arc<Diagnostics>,
    state: Mutex<FileState>,
}

impl FilePublisher {
    /**
    Creates a publisher for `path` that rotates once more than `limit` bytes are in the file.

    A limit of 0 disables rotation. Nothing touches the disk until the first publish.
    */
    pub fn new(path: impl Into<PathBuf>, limit: u64) -> Self {
        Self::with_formatter(path, limit, Arc::new(DefaultFormatter))
    }

    pub fn with_formatter(path: impl Into<PathBuf>, limit: u64, formatter: Arc<dyn Formatter>) -> Self {
        Self::with_parts(path.into(), limit, formatter, Arc::new(Diagnostics::new()))
    }

    pub(crate) fn with_parts(
        path: PathBuf,
        limit: u64,
        formatter: Arc<dyn Formatter>,
        diagnostics: Arc<Diagnostics>,
    ) -> Self {
        Self {
            path,
            formatter,
            diagnostics,
            state: Mutex::new(FileState {
                limit,
                output: None,
                revoked: false,
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn limit(&self) -> u64 {
        self.lock().limit
    }

    /// Changes the size limit. Takes effect at the next write.
    pub fn set_limit(&self, limit: u64) {
        self.lock().limit = limit;
    }

    /// Whether a file handle is currently held.
    pub fn is_open(&self) -> bool {
        self.lock().output.is_some()
    }

    /// Bytes counted against the limit, if a handle is held.
    pub fn bytes_written(&self) -> Option<u64> {
        self.lock().output.as_ref().map(|output| output.written)
    }

    /**
    Closes the file for good.

    Used when the registry is about to give this publisher's file to a new one;
    a revoked publisher ignores every later publish.
    */
    pub(crate) fn revoke(&self) {
        let mut state = self.lock();
        state.revoked = true;
        if let Err(e) = state.close_output() {
            self.diagnostics
                .emit(|| format!("{}: flush on revoke failed: {e}", self.path.display()));
        }
    }

    /// Whether the registry has retired this publisher. A revoked publisher writes nothing.
    pub fn is_revoked(&self) -> bool {
        self.lock().revoked
    }

    fn lock(&self) -> MutexGuard<'_, FileState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn open(&self) -> Result<Output, LogError> {
        let file = ensure_file(&self.path).map_err(|source| LogError::CreateFile {
            path: self.path.clone(),
            source,
        })?;
        let length = file.metadata().map(|m| m.len()).unwrap_or(0);
        self.diagnostics
            .emit(|| format!("{} opened at {length} bytes", self.path.display()));
        Ok(CountingWriter::new(BufWriter::new(file), length))
    }

    /// Writes `bytes`, returning the byte count afterwards.
    fn write_locked(&self, state: &mut FileState, bytes: &[u8]) -> Result<u64, LogError> {
        if state.output.is_some() && !self.path.is_file() {
            // writing on would go into an unlinked inode
            let _ = state.close_output();
            self.diagnostics
                .emit(|| format!("{} disappeared, reopening", self.path.display()));
        }
        let mut output = match state.output.take() {
            Some(output) => output,
            None => self.open()?,
        };
        output.write_all(bytes)?;
        output.flush()?;
        let written = output.written;
        state.output = Some(output);
        Ok(written)
    }

    fn rotate_locked(&self, state: &mut FileState) {
        let _ = state.close_output();
        match remove_path(&self.path) {
            Ok(()) => self
                .diagnostics
                .emit(|| format!("{} exceeded {} bytes, deleted", self.path.display(), state.limit)),
            Err(e) => self
                .diagnostics
                .emit(|| format!("{} rotation failed: {e}", self.path.display())),
        }
    }
}

impl Publisher for FilePublisher {
    fn publish(&self, record: &LogRecord) {
        let line = self.formatter.format(record);
        let mut state = self.lock();
        if state.revoked {
            return;
        }
        match self.write_locked(&mut state, line.as_bytes()) {
            Ok(written) => {
                if state.limit > 0 && written > state.limit {
                    self.rotate_locked(&mut state);
                }
            }
            Err(e) => {
                let _ = state.close_output();
                self.diagnostics
                    .emit(|| format!("{}: record dropped: {e}", self.path.display()));
            }
        }
    }

    fn close(&self) {
        let mut state = self.lock();
        if let Err(e) = state.close_output() {
            self.diagnostics
                .emit(|| format!("{}: flush on close failed: {e}", self.path.display()));
        }
    }
}

/// Opens `path` for appending, clearing a directory in the way and creating parents.
fn ensure_file(path: &Path) -> io::Result<File> {
    if path.is_dir() {
        fs::remove_dir_all(path)?;
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Deletes a file or directory tree. A missing path is not an error.
pub(crate) fn remove_path(path: &Path) -> io::Result<()> {
    let result = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    match result {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
