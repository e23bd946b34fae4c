//! Live-reload engine for annotated literals.
//!
//! A running program wraps selected literals in an annotation (by default
//! the `TWEAKABLE(...)` macro in the source the program was built from) and
//! routes their evaluation through [`Tweakable::annotate`]. The engine then
//! watches the source files those literals came from. When a file changes,
//! [`Tweakable::update`] rescans it, re-parses every annotated literal with
//! the type it was first evaluated with, and swaps the new values in. Code
//! that depends on the values can be wrapped in [`Tweakable::scope`] to be
//! re-run after a change.
//!
//! ```no_run
//! use tweakable::{Tweakable, TweakableState};
//!
//! let mut engine = Tweakable::new()?;
//! engine.enable();
//! loop {
//!     let speed: f32 = engine.annotate(file!(), line!(), 0, 2.5f32);
//!     # let _ = speed;
//!     if engine.update() == TweakableState::Recompile {
//!         break;
//!     }
//! }
//! # Ok::<(), tweakable::EngineError>(())
//! ```
//!
//! Values that cannot be swapped in place (a literal moved to another line,
//! its suffix changed) make `update()` report [`TweakableState::Recompile`]
//! and leave every value untouched.

mod config;
mod engine;
mod error;
mod relocate;
mod state;

use std::sync::Once;

pub use config::TweakableConfig;
pub use engine::{ScopeId, Tweakable};
pub use error::EngineError;
pub use relocate::relocate;
pub use state::TweakableState;

pub use tweak_literal::{
    LiteralKind, Long, LongDouble, Parser, Rejection, Tweak, ULong, Value, STORAGE_SIZE,
};
pub use tweak_watch::WatchFlags;

/// Ensures tracing is only initialized once.
static TRACING_INIT: Once = Once::new();

/// Initialize tracing for log output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=tweakable=debug`; set `TWEAKABLE_LOG_TREE` to get
/// indented span trees instead of flat lines.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let tree = std::env::var_os("TWEAKABLE_LOG_TREE").is_some();
            tracing_subscriber::registry()
                .with(tree.then(|| {
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_bracketed_fields(true)
                }))
                .with((!tree).then(|| fmt::layer().with_target(true).with_level(true)))
                .with(filter)
                .init();
        }
    });
}
