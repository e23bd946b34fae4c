use pretty_assertions::assert_eq;

use super::TweakableState;

#[test]
fn display_is_qualified() {
    assert_eq!(TweakableState::NoChange.to_string(), "TweakableState::NoChange");
    assert_eq!(TweakableState::Success.to_string(), "TweakableState::Success");
    assert_eq!(TweakableState::Recompile.to_string(), "TweakableState::Recompile");
    assert_eq!(TweakableState::Error.to_string(), "TweakableState::Error");
}

#[test]
fn default_is_no_change() {
    assert_eq!(TweakableState::default(), TweakableState::NoChange);
}

#[test]
fn only_failures_are_terminal() {
    assert!(!TweakableState::NoChange.is_terminal());
    assert!(!TweakableState::Success.is_terminal());
    assert!(TweakableState::Recompile.is_terminal());
    assert!(TweakableState::Error.is_terminal());
}
