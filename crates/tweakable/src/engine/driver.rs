//! The update pass.
//!
//! Every changed file is rescanned in full. Call-sites are matched to slots
//! by their position in the file (the n-th call-site is counter n), so the
//! scan only ever needs the call-site order and lines, never the code
//! around them. Parsed values are staged and committed once every file went
//! through, which keeps a Recompile or Error from leaving half the values
//! of a save applied. Files whose staged values were dropped that way stay
//! pending and are rescanned by the next pass.

use std::collections::BTreeSet;
use std::fs;

use tracing::{debug, error, info, warn};
use tweak_literal::{Rejection, Value};
use tweak_scan::{find_alias, CallSiteScanner, SourceBuffer};
use tweak_watch::WatchFlags;

use super::registry::FileRecord;
use super::{ScopeFn, ScopeId, Tweakable};
use crate::{TweakableConfig, TweakableState};

/// Values and scopes collected during one pass, applied on success.
#[derive(Debug, Default)]
struct Changes {
    /// `(file index, counter, new value)`.
    values: Vec<(usize, usize, Value)>,
    /// Ascending id order is the order scopes re-run in.
    scopes: BTreeSet<ScopeId>,
}

impl Tweakable {
    /// Rescan the watched files that changed since the last call and swap
    /// in the edited values.
    ///
    /// Files are visited in the order their first call-site registered.
    /// The first file that asks for a recompile or fails to scan or parse
    /// ends the pass: its result is returned and no value is changed.
    /// Otherwise all new values are applied and each scope that captured
    /// one of them runs once.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn update(&mut self) -> TweakableState {
        let Some(data) = self.data.as_mut() else {
            return TweakableState::NoChange;
        };

        let mut changes = Changes::default();
        let mut state = TweakableState::NoChange;
        for (index, record) in data.files.iter_mut().enumerate() {
            let file_state = rescan(index, record, &data.config, &mut changes);
            if file_state.is_terminal() {
                // Re-read once the file is saved again.
                record.pending = false;
                return file_state;
            }
            if file_state == TweakableState::Success {
                record.pending = true;
                state = TweakableState::Success;
            }
        }

        for record in &mut data.files {
            record.pending = false;
        }
        for (file, counter, value) in changes.values {
            data.files[file].slots[counter].storage = value;
        }

        if !changes.scopes.is_empty() {
            debug!("{} scopes affected", changes.scopes.len());
            let callbacks: Vec<ScopeFn> = changes
                .scopes
                .iter()
                .filter_map(|id| data.scopes.get(id).cloned())
                .collect();
            for callback in callbacks {
                // A scope calling update() does not re-enter itself.
                if let Ok(mut f) = callback.try_borrow_mut() {
                    (&mut *f)(self);
                }
            }
        }

        state
    }
}

/// Rescan one file if its watcher saw a change or it is still pending.
fn rescan(
    index: usize,
    record: &mut FileRecord,
    config: &TweakableConfig,
    changes: &mut Changes,
) -> TweakableState {
    // Always poll, so a pending file does not see this change again later.
    let changed = record.watcher.has_changed();
    if !changed && !record.pending {
        return TweakableState::NoChange;
    }

    let source = match fs::read(&record.watch_path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(err) => {
            if record.watcher.flags().contains(WatchFlags::IGNORE_ERRORS) {
                debug!("can't read {}: {err}, ignoring", record.watch_path);
                return TweakableState::NoChange;
            }
            error!("can't read {}: {err}", record.watch_path);
            return TweakableState::Error;
        }
    };

    let sentinel = config.sentinel();
    let name = if let Some(alias) = find_alias(&source, sentinel) {
        info!("looking for updated {alias}() macros in {}", record.name);
        alias
    } else {
        info!(
            "no alias found in {}, fallback to looking for {sentinel}()",
            record.name
        );
        sentinel
    };

    let buffer = SourceBuffer::new(&source);
    let file = record.name.as_str();
    let mut state = TweakableState::NoChange;
    for (counter, site) in CallSiteScanner::new(&buffer, name, file).enumerate() {
        let site = match site {
            Ok(site) => site,
            Err(err) => {
                error!("{err}");
                return TweakableState::Error;
            }
        };
        let (text, line) = (site.text, site.line);

        let Some((slot, parser)) = record
            .slots
            .get(counter)
            .and_then(|slot| slot.parser.map(|parser| (slot, parser)))
        else {
            warn!("ignoring unknown new value {text} in {file}:{line}");
            continue;
        };

        if slot.line != line {
            warn!("code changed around {text} in {file}:{line}, requesting a recompile");
            return TweakableState::Recompile;
        }

        match parser.parse(site.literal) {
            Err(Rejection::Recompile) => {
                warn!("change of {text} in {file}:{line} requested a recompile");
                return TweakableState::Recompile;
            }
            Err(Rejection::Error) => {
                error!("error parsing {text} in {file}:{line}");
                return TweakableState::Error;
            }
            Ok(value) if value.is_identical(&slot.storage) => {}
            Ok(value) => {
                debug!("updating {text} in {file}:{line}");
                changes.values.push((index, counter, value));
                if let Some(id) = slot.scope {
                    changes.scopes.insert(id);
                }
                state = TweakableState::Success;
            }
        }
    }
    state
}
