//! Modification-time watcher.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use bitflags::bitflags;
use tracing::error;

bitflags! {
    /// Watcher behavior switches.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct WatchFlags: u8 {
        /// Keep watching when the file cannot be stat'ed (editors often
        /// delete and recreate a file on save).
        const IGNORE_ERRORS = 1 << 0;
        /// Don't report a change while the file is empty (editors often
        /// truncate a file before writing the new contents).
        const IGNORE_CHANGE_IF_EMPTY = 1 << 1;
    }
}

/// Reports modifications of a single file.
#[derive(Debug)]
pub struct FileWatcher {
    path: PathBuf,
    flags: WatchFlags,
    /// Last observed modification time, `None` before the first
    /// successful stat.
    modified: Option<SystemTime>,
    valid: bool,
}

impl FileWatcher {
    /// Start watching `path`.
    ///
    /// The current modification time is recorded right away, so the first
    /// [`has_changed()`](Self::has_changed) only reports edits made after
    /// construction.
    pub fn new(path: impl Into<PathBuf>, flags: WatchFlags) -> Self {
        let mut watcher = Self {
            path: path.into(),
            flags,
            modified: None,
            valid: true,
        };
        watcher.has_changed();
        watcher
    }

    /// The watched path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn flags(&self) -> WatchFlags {
        self.flags
    }

    /// Whether the watch is still going.
    ///
    /// Turns `false` when the file can't be stat'ed and
    /// [`WatchFlags::IGNORE_ERRORS`] is not set. A later poll that finds the
    /// file again makes the watcher valid again.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Poll for a modification since the previous poll.
    ///
    /// Returns `true` at most once per observed change of the modification
    /// time.
    pub fn has_changed(&mut self) -> bool {
        let metadata = match fs::metadata(&self.path) {
            Ok(metadata) => metadata,
            Err(err) => {
                if !self.flags.contains(WatchFlags::IGNORE_ERRORS) && self.valid {
                    error!("can't stat {}: {err}, aborting watch", self.path.display());
                    self.valid = false;
                }
                return false;
            }
        };
        self.valid = true;

        if metadata.len() == 0 && self.flags.contains(WatchFlags::IGNORE_CHANGE_IF_EMPTY) {
            return false;
        }

        let Ok(modified) = metadata.modified() else {
            return false;
        };
        match self.modified.replace(modified) {
            None => false,
            Some(previous) => previous != modified,
        }
    }
}
