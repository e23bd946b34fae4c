//! Outcome of an update pass.

use std::fmt;

/// Result of [`Tweakable::update()`](crate::Tweakable::update).
///
/// Not a `Result`: every variant is a legitimate outcome of polling, and
/// the caller decides what Recompile or Error mean for the application.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TweakableState {
    /// No watched file changed, or nothing in the changed files differed.
    #[default]
    NoChange,
    /// At least one value was swapped in and affected scopes were re-run.
    Success,
    /// A change cannot be applied without rebuilding the program. Nothing
    /// was updated.
    Recompile,
    /// A change is malformed. Nothing was updated.
    Error,
}

impl TweakableState {
    /// Name of the variant without the type prefix.
    pub const fn name(self) -> &'static str {
        match self {
            TweakableState::NoChange => "NoChange",
            TweakableState::Success => "Success",
            TweakableState::Recompile => "Recompile",
            TweakableState::Error => "Error",
        }
    }

    /// Whether no further files should be processed in this pass.
    pub(crate) const fn is_terminal(self) -> bool {
        matches!(self, TweakableState::Recompile | TweakableState::Error)
    }
}

impl fmt::Display for TweakableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TweakableState::{}", self.name())
    }
}

#[cfg(test)]
mod tests;
