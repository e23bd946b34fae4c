//! The engine handle.
//!
//! # Architecture
//!
//! - `registry`: file records and their slots, the annotation entry points
//! - `scope`: scope capture and the scope stack
//! - `driver`: `update()`, rescanning changed files and committing values
//!
//! All state lives in [`EngineData`], which only exists while the engine is
//! enabled. A disabled engine passes annotated values through untouched.

mod driver;
mod registry;
mod scope;

use std::any::TypeId;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{EngineError, TweakableConfig};
use registry::FileRecord;

/// Set while a [`Tweakable`] handle is alive.
static ACTIVE: AtomicBool = AtomicBool::new(false);

/// Identity of a scope: its closure type, plus the key given to
/// [`Tweakable::scope_keyed`].
///
/// Ids are never reused within a process, so pending scopes deduplicate by
/// id alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(u64);

impl ScopeId {
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// A retained scope closure.
type ScopeFn = Rc<RefCell<dyn FnMut(&mut Tweakable)>>;

/// State of an enabled engine.
struct EngineData {
    config: TweakableConfig,
    /// File records in registration order, which is also the order
    /// `update()` visits them in.
    files: Vec<FileRecord>,
    /// Compiler-reported file name to index into `files`.
    index: FxHashMap<String, usize>,
    /// Closures of scopes some slot captured.
    scopes: FxHashMap<ScopeId, ScopeFn>,
    /// Scopes captured by at least one slot.
    captured: FxHashSet<ScopeId>,
    /// Closure type and key hash to the id of every scope entered so far.
    scope_keys: FxHashMap<(TypeId, u64), ScopeId>,
    /// Innermost scope last.
    scope_stack: Vec<ScopeId>,
}

impl EngineData {
    fn new(config: TweakableConfig) -> Self {
        Self {
            config,
            files: Vec::new(),
            index: FxHashMap::default(),
            scopes: FxHashMap::default(),
            captured: FxHashSet::default(),
            scope_keys: FxHashMap::default(),
            scope_stack: Vec::new(),
        }
    }
}

/// Live-reload engine for annotated literals.
///
/// At most one handle exists per process. The handle is not `Send`: all
/// annotations, scopes and updates run on the thread that owns it.
pub struct Tweakable {
    data: Option<EngineData>,
    next_scope: u64,
}

impl Tweakable {
    /// Create the process-wide engine, initially disabled.
    ///
    /// # Errors
    ///
    /// [`EngineError::AlreadyActive`] if another handle is alive.
    pub fn new() -> Result<Self, EngineError> {
        ACTIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| EngineError::AlreadyActive)?;
        Ok(Self {
            data: None,
            next_scope: 0,
        })
    }

    /// Enable with the default configuration.
    pub fn enable(&mut self) {
        self.enable_with_config(TweakableConfig::default());
    }

    /// Enable, mapping compiler-reported file names through
    /// [`relocate`](crate::relocate) with `prefix` and `replace`.
    pub fn enable_with(&mut self, prefix: impl Into<String>, replace: impl Into<String>) {
        self.enable_with_config(
            TweakableConfig::default()
                .with_prefix(prefix)
                .with_replace(replace),
        );
    }

    /// Enable with `config`. Re-enabling drops every registered slot, file
    /// watch and scope.
    pub fn enable_with_config(&mut self, config: TweakableConfig) {
        self.data = Some(EngineData::new(config));
    }

    /// Disable and drop all state.
    pub fn disable(&mut self) {
        self.data = None;
    }

    pub fn is_enabled(&self) -> bool {
        self.data.is_some()
    }

    /// Configuration of the enabled engine.
    pub fn config(&self) -> Option<&TweakableConfig> {
        self.data.as_ref().map(|data| &data.config)
    }
}

impl Drop for Tweakable {
    fn drop(&mut self) {
        ACTIVE.store(false, Ordering::Release);
    }
}

impl std::fmt::Debug for Tweakable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("Tweakable");
        match &self.data {
            Some(data) => s
                .field("config", &data.config)
                .field("files", &data.files.len())
                .field("scopes", &data.scopes.len()),
            None => s.field("enabled", &false),
        };
        s.finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests panic on I/O failures")]
mod tests;
