//! JSON flat-file store.
//!
//! # Responsibility
//! - Keep the ledger document in one UTF-8 JSON file.
//! - Serialize mutations through an advisory lock file.
//!
//! # Invariants
//! - Writes go to a temp file in the target directory and are renamed over
//!   the target, so readers never observe a truncated document.
//! - Non-ASCII text is written literally, not escaped.
//! - `ensure_initialized` never modifies an existing file; it creates the
//!   empty document under the store lock.

use super::{Document, RecordStore, StoreError, StoreResult};
use fs2::FileExt;
use log::{debug, error, info};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

/// Backing file name used when the caller does not pick one.
pub const DEFAULT_DATA_FILE: &str = "data.json";

const LOCK_SUFFIX: &str = ".lock";

/// File-backed ledger store.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store handle without touching the file system.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store handle and makes sure the backing file exists.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let store = Self::new(path);
        store.ensure_initialized()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(LOCK_SUFFIX);
        PathBuf::from(name)
    }

    fn unavailable(&self, source: std::io::Error) -> StoreError {
        StoreError::Unavailable {
            path: self.path.clone(),
            source,
        }
    }

    fn replace_file(&self, bytes: &[u8]) -> std::io::Result<()> {
        let mut staged = NamedTempFile::new_in(self.directory())?;
        staged.write_all(bytes)?;
        staged.as_file().sync_all()?;
        staged.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    type Lock = StoreLock;

    fn ensure_initialized(&self) -> StoreResult<()> {
        let exists = self
            .path
            .try_exists()
            .map_err(|err| self.unavailable(err))?;
        if exists {
            return Ok(());
        }

        fs::create_dir_all(self.directory()).map_err(|err| self.unavailable(err))?;
        let _lock = self.lock()?;
        // Another process may have created the file while we waited.
        if self
            .path
            .try_exists()
            .map_err(|err| self.unavailable(err))?
        {
            return Ok(());
        }
        self.write(&Document::default())?;
        info!(
            "event=store_init module=store status=ok path={}",
            self.path.display()
        );
        Ok(())
    }

    fn read(&self) -> StoreResult<Document> {
        let started_at = Instant::now();
        let bytes = fs::read(&self.path).map_err(|err| {
            error!(
                "event=store_read module=store status=error error_code=read_failed error={}",
                err
            );
            self.unavailable(err)
        })?;

        let document: Document = serde_json::from_slice(&bytes).map_err(|err| {
            error!(
                "event=store_read module=store status=error error_code=corrupt_document line={} column={}",
                err.line(),
                err.column()
            );
            StoreError::Corrupt {
                path: self.path.clone(),
                source: err,
            }
        })?;

        debug!(
            "event=store_read module=store status=ok records={} duration_ms={}",
            document.list.len(),
            started_at.elapsed().as_millis()
        );
        Ok(document)
    }

    fn write(&self, document: &Document) -> StoreResult<()> {
        let started_at = Instant::now();
        let bytes = serde_json::to_vec(document)?;

        if let Err(err) = self.replace_file(&bytes) {
            error!(
                "event=store_write module=store status=error error_code=write_failed error={}",
                err
            );
            return Err(self.unavailable(err));
        }

        debug!(
            "event=store_write module=store status=ok records={} bytes={} duration_ms={}",
            document.list.len(),
            bytes.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    fn lock(&self) -> StoreResult<StoreLock> {
        let path = self.lock_path();
        let lock_error = |source| StoreError::Lock {
            path: path.clone(),
            source,
        };

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(lock_error)?;
        file.lock_exclusive().map_err(lock_error)?;

        debug!("event=store_lock module=store status=ok");
        Ok(StoreLock { file })
    }
}

/// Exclusive advisory lock on `<data file>.lock`, released on drop.
#[derive(Debug)]
pub struct StoreLock {
    file: File,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(err) = FileExt::unlock(&self.file) {
            error!(
                "event=store_unlock module=store status=error error={}",
                err
            );
        }
    }
}
