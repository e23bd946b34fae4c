//! Polling file watcher.
//!
//! [`FileWatcher`] compares a file's modification time between polls. It
//! never blocks and never spawns anything: callers poll it from their own
//! loop, typically once per frame.

mod watcher;

pub use watcher::{FileWatcher, WatchFlags};
