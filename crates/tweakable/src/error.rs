//! Engine construction errors.

/// Failure to create a [`Tweakable`](crate::Tweakable) handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Another handle is alive in this process. Drop it first.
    #[error("another tweakable engine is already active")]
    AlreadyActive,
}
