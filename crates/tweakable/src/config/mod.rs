//! Engine configuration.

use tweak_watch::WatchFlags;

/// Macro name looked for when a file defines no alias.
pub const DEFAULT_SENTINEL: &str = "TWEAKABLE";

/// Environment variable holding the path prefix to strip.
pub const PREFIX_VAR: &str = "TWEAKABLE_PREFIX";
/// Environment variable holding the directory to prepend.
pub const REPLACE_VAR: &str = "TWEAKABLE_REPLACE";
/// Environment variable overriding the sentinel macro name.
pub const SENTINEL_VAR: &str = "TWEAKABLE_SENTINEL";

/// How the engine maps and watches source files.
///
/// ```
/// use tweakable::TweakableConfig;
///
/// let config = TweakableConfig::default()
///     .with_prefix("/build")
///     .with_replace("/home/me/project")
///     .with_sentinel("TW");
/// assert_eq!(config.sentinel(), "TW");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TweakableConfig {
    prefix: String,
    replace: String,
    sentinel: String,
    watch_flags: WatchFlags,
}

impl Default for TweakableConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            replace: String::new(),
            sentinel: DEFAULT_SENTINEL.to_owned(),
            watch_flags: WatchFlags::IGNORE_ERRORS | WatchFlags::IGNORE_CHANGE_IF_EMPTY,
        }
    }
}

impl TweakableConfig {
    /// Defaults overridden by `TWEAKABLE_PREFIX`, `TWEAKABLE_REPLACE` and
    /// `TWEAKABLE_SENTINEL` where set. An empty `TWEAKABLE_SENTINEL` is
    /// ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(prefix) = std::env::var(PREFIX_VAR) {
            config.prefix = prefix;
        }
        if let Ok(replace) = std::env::var(REPLACE_VAR) {
            config.replace = replace;
        }
        match std::env::var(SENTINEL_VAR) {
            Ok(sentinel) if !sentinel.is_empty() => config.sentinel = sentinel,
            _ => {}
        }
        config
    }

    /// Path prefix stripped from compiler-reported file names.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Directory the stripped file names are joined onto.
    pub fn with_replace(mut self, replace: impl Into<String>) -> Self {
        self.replace = replace.into();
        self
    }

    /// Macro name searched for in `#define ALIAS SENTINEL` lines, and used
    /// directly when a file has no alias.
    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }

    pub fn with_watch_flags(mut self, flags: WatchFlags) -> Self {
        self.watch_flags = flags;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn replace(&self) -> &str {
        &self.replace
    }

    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    pub fn watch_flags(&self) -> WatchFlags {
        self.watch_flags
    }

    /// Watch path for a compiler-reported file name.
    pub fn watch_path(&self, file: &str) -> String {
        crate::relocate(file, &self.prefix, &self.replace)
    }
}

#[cfg(test)]
mod tests;
