//! Registered slots, keyed by file name and per-file counter.

use tracing::info;
use tweak_literal::{Parser, Tweak, Value};
use tweak_watch::FileWatcher;

use super::{EngineData, ScopeId, Tweakable};
use crate::TweakableConfig;

/// One annotated call-site as seen at runtime.
#[derive(Clone, Copy, Debug, Default)]
pub(super) struct Slot {
    /// Line the call-site was first executed from.
    pub(super) line: u32,
    /// `None` until the call-site executes for the first time.
    pub(super) parser: Option<Parser>,
    pub(super) storage: Value,
    /// Innermost scope active at first execution.
    pub(super) scope: Option<ScopeId>,
}

/// Everything known about one source file.
#[derive(Debug)]
pub(super) struct FileRecord {
    /// File name as reported by the compiler. Used in log lines.
    pub(super) name: String,
    /// Relocated path the watcher and reads use.
    pub(super) watch_path: String,
    pub(super) watcher: FileWatcher,
    /// Indexed by the per-file counter.
    pub(super) slots: Vec<Slot>,
    /// Set when this file parsed new values in a pass that did not commit.
    /// The next pass rescans it even without a fresh change notification.
    pub(super) pending: bool,
}

impl FileRecord {
    fn new(name: &str, config: &TweakableConfig) -> Self {
        let watch_path = config.watch_path(name);
        info!("watching for changes in {watch_path}");
        Self {
            name: name.to_owned(),
            watcher: FileWatcher::new(&watch_path, config.watch_flags()),
            watch_path,
            slots: Vec::new(),
            pending: false,
        }
    }
}

impl EngineData {
    fn record_index(&mut self, file: &str) -> usize {
        if let Some(&index) = self.index.get(file) {
            return index;
        }
        let index = self.files.len();
        self.files.push(FileRecord::new(file, &self.config));
        self.index.insert(file.to_owned(), index);
        index
    }

    fn slot(&self, file: &str, counter: usize) -> Option<&Slot> {
        let &index = self.index.get(file)?;
        self.files[index]
            .slots
            .get(counter)
            .filter(|slot| slot.parser.is_some())
    }
}

impl Tweakable {
    /// Register the call-site `counter` of `file`, first executed from
    /// `line` with a literal read back by `parser`.
    ///
    /// Returns whether the slot was already initialized, and its storage.
    /// A fresh slot holds a placeholder the caller must overwrite with the
    /// initial value; an initialized slot must not be overwritten. Returns
    /// `None` while the engine is disabled.
    pub fn register(
        &mut self,
        file: &str,
        line: u32,
        counter: usize,
        parser: impl Into<Parser>,
    ) -> Option<(bool, &mut Value)> {
        let data = self.data.as_mut()?;
        let current = data.scope_stack.last().copied();
        let index = data.record_index(file);

        let slots = &mut data.files[index].slots;
        if slots.len() <= counter {
            slots.resize_with(counter + 1, Slot::default);
        }
        let slot = &mut slots[counter];
        if slot.parser.is_some() {
            return Some((true, &mut slot.storage));
        }

        *slot = Slot {
            line,
            parser: Some(parser.into()),
            storage: Value::default(),
            scope: current,
        };
        if let Some(id) = current {
            data.captured.insert(id);
        }
        Some((false, &mut slot.storage))
    }

    /// Evaluate an annotated literal.
    ///
    /// The first execution of a call-site records `value` as its initial
    /// value. Every execution returns the live value, which differs from
    /// `value` once [`update()`](Self::update) swapped in an edit. A
    /// disabled engine returns `value` unchanged.
    pub fn annotate<T: Tweak>(&mut self, file: &str, line: u32, counter: usize, value: T) -> T {
        match self.register(file, line, counter, Parser::of::<T>()) {
            None => value,
            Some((false, storage)) => {
                *storage = value.into_value();
                value
            }
            Some((true, storage)) => T::from_value(*storage).unwrap_or(value),
        }
    }

    /// Live value of call-site `counter` in `file`, if it is registered
    /// with the type `T`.
    pub fn value<T: Tweak>(&self, file: &str, counter: usize) -> Option<T> {
        let slot = self.data.as_ref()?.slot(file, counter)?;
        T::from_value(slot.storage)
    }

    /// Length of the slot list of `file`, including counters not executed
    /// yet.
    pub fn slot_count(&self, file: &str) -> usize {
        self.data
            .as_ref()
            .and_then(|data| data.index.get(file).map(|&index| data.files[index].slots.len()))
            .unwrap_or(0)
    }

    /// Path watched for `file`, once one of its call-sites registered.
    pub fn watch_path(&self, file: &str) -> Option<&str> {
        let data = self.data.as_ref()?;
        let &index = data.index.get(file)?;
        Some(&data.files[index].watch_path)
    }

    /// Whether the watch on `file` is still going. See
    /// [`FileWatcher::is_valid`].
    pub fn is_watch_valid(&self, file: &str) -> Option<bool> {
        let data = self.data.as_ref()?;
        let &index = data.index.get(file)?;
        Some(data.files[index].watcher.is_valid())
    }
}
