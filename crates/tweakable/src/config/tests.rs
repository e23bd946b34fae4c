use pretty_assertions::assert_eq;
use serial_test::serial;
use temp_env::with_vars;

use super::*;

#[test]
fn defaults() {
    let config = TweakableConfig::default();
    assert_eq!(config.prefix(), "");
    assert_eq!(config.replace(), "");
    assert_eq!(config.sentinel(), "TWEAKABLE");
    assert_eq!(
        config.watch_flags(),
        WatchFlags::IGNORE_ERRORS | WatchFlags::IGNORE_CHANGE_IF_EMPTY
    );
}

#[test]
fn builder_overrides() {
    let config = TweakableConfig::default()
        .with_prefix("/build")
        .with_replace("/src")
        .with_sentinel("TW")
        .with_watch_flags(WatchFlags::empty());
    assert_eq!(config.prefix(), "/build");
    assert_eq!(config.replace(), "/src");
    assert_eq!(config.sentinel(), "TW");
    assert_eq!(config.watch_flags(), WatchFlags::empty());
}

#[test]
fn watch_path_uses_relocation() {
    let config = TweakableConfig::default().with_prefix("/build").with_replace("/src");
    assert_eq!(config.watch_path("/build/a/b.cpp"), "/src/a/b.cpp");
    assert_eq!(TweakableConfig::default().watch_path("a.cpp"), "a.cpp");
}

#[test]
#[serial]
fn from_env_without_variables_is_default() {
    with_vars(
        [
            (PREFIX_VAR, None::<&str>),
            (REPLACE_VAR, None),
            (SENTINEL_VAR, None),
        ],
        || {
            assert_eq!(TweakableConfig::from_env(), TweakableConfig::default());
        },
    );
}

#[test]
#[serial]
fn from_env_reads_variables() {
    with_vars(
        [
            (PREFIX_VAR, Some("/ci/build")),
            (REPLACE_VAR, Some("/home/me")),
            (SENTINEL_VAR, Some("TW")),
        ],
        || {
            let config = TweakableConfig::from_env();
            assert_eq!(config.prefix(), "/ci/build");
            assert_eq!(config.replace(), "/home/me");
            assert_eq!(config.sentinel(), "TW");
        },
    );
}

#[test]
#[serial]
fn from_env_ignores_empty_sentinel() {
    with_vars([(SENTINEL_VAR, Some(""))], || {
        assert_eq!(TweakableConfig::from_env().sentinel(), DEFAULT_SENTINEL);
    });
}
