// SPDX-FileCopyrightText: 2026 Ignition Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named, cross-process resource mutex.
//!
//! Backed by an advisory file lock (`flock` on Unix, `LockFileEx` on
//! Windows) on a lock file derived from the identifier, in the system temp
//! directory. Acquisition is non-blocking and never errors on contention:
//! the loser gets a handle with `is_locked() == false` and decides for
//! itself whether to exit.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use fs2::FileExt;
use ignition_core::IgnitionError;
use tracing::{debug, warn};

/// An attempt to acquire a named, systemwide exclusive lock.
///
/// Owns the underlying OS-level lock only while `is_locked()` is true.
/// [`release`](ResourceMutex::release) is the one call that gives the lock
/// up; `Drop` invokes it as a backstop, never as the primary path.
#[derive(Debug)]
pub struct ResourceMutex {
    identifier: String,
    owner_label: String,
    path: PathBuf,
    /// Present exactly while this handle holds the lock. The advisory lock
    /// is tied to this file handle; closing it releases the lock.
    file: Option<File>,
}

impl ResourceMutex {
    /// Attempts to acquire the named lock. Never errors for contention --
    /// check [`is_locked`](ResourceMutex::is_locked) on the returned handle.
    ///
    /// Only an empty identifier is an error (programmer error). Unexpected
    /// I/O failures are logged and reported as an unlocked handle, matching
    /// the contention path.
    pub fn acquire(identifier: &str, owner_label: &str) -> Result<Self, IgnitionError> {
        if identifier.trim().is_empty() {
            return Err(IgnitionError::InvalidArgument(
                "mutex identifier must not be empty".into(),
            ));
        }

        let path = lock_path(identifier);
        let mut handle = Self {
            identifier: identifier.to_string(),
            owner_label: owner_label.to_string(),
            path: path.clone(),
            file: None,
        };

        // Open create-but-not-truncate: truncating a file another process
        // holds locked would clobber its owner label.
        let file = match OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
        {
            Ok(f) => f,
            Err(e) => {
                warn!(
                    identifier,
                    path = %path.display(),
                    error = %e,
                    "could not open lock file; reporting unlocked"
                );
                return Ok(handle);
            }
        };

        match file.try_lock_exclusive() {
            Ok(()) => {
                write_owner_label(&file, owner_label);
                debug!(identifier, owner = owner_label, "resource mutex acquired");
                handle.file = Some(file);
            }
            Err(_) => {
                // Contention. The handle stays unlocked; dropping `file`
                // closes the descriptor without touching the winner's lock.
                debug!(identifier, "resource mutex contended, another holder is active");
            }
        }

        Ok(handle)
    }

    /// Whether this handle holds exclusive ownership of the identifier.
    pub fn is_locked(&self) -> bool {
        self.file.is_some()
    }

    /// The identifier this handle was created for.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Human-readable owner label recorded in the lock file while locked.
    pub fn owner_label(&self) -> &str {
        &self.owner_label
    }

    /// Path of the underlying lock file.
    ///
    /// The file is intentionally never unlinked: removing a locked path
    /// races with concurrent acquirers that already opened it.
    pub fn lock_file(&self) -> &std::path::Path {
        &self.path
    }

    /// Releases the lock if held. Idempotent; a no-op on an unlocked handle.
    pub fn release(&mut self) {
        if let Some(file) = self.file.take() {
            if let Err(e) = fs2::FileExt::unlock(&file) {
                warn!(
                    identifier = self.identifier.as_str(),
                    error = %e,
                    "failed to unlock lock file; descriptor close will release it"
                );
            }
            debug!(
                identifier = self.identifier.as_str(),
                "resource mutex released"
            );
            // `file` drops here, closing the descriptor.
        }
    }
}

impl Drop for ResourceMutex {
    fn drop(&mut self) {
        self.release();
    }
}

/// Maps an identifier to its lock file path in the system temp directory.
///
/// Characters outside `[A-Za-z0-9._-]` are replaced so identifiers like
/// `com.example/app` cannot escape the directory.
fn lock_path(identifier: &str) -> PathBuf {
    let sanitized: String = identifier
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    std::env::temp_dir().join(format!("{sanitized}.lock"))
}

/// Best-effort: record who holds the lock, for humans inspecting the file.
fn write_owner_label(mut file: &File, owner_label: &str) {
    let result = file
        .set_len(0)
        .and_then(|()| file.write_all(owner_label.as_bytes()))
        .and_then(|()| file.flush());
    if let Err(e) = result {
        debug!(error = %e, "could not write owner label to lock file");
    }
}
