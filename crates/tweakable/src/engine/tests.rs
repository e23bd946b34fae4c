use std::cell::Cell;
use std::fs::{self, File};
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, SystemTime};

use pretty_assertions::assert_eq;
use serial_test::serial;
use tracing_test::traced_test;
use tweak_literal::{LiteralKind, Parser, Rejection, Tweak, Value};
use tweak_watch::WatchFlags;

use super::*;
use crate::TweakableState;

fn write(path: &Path, contents: &str, generation: u64) {
    fs::write(path, contents).unwrap();
    let time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000 + generation);
    File::options().write(true).open(path).unwrap().set_modified(time).unwrap();
}

/// A colour written as a `0xRRGGBB` literal.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Rgb([u8; 3]);

impl Tweak for Rgb {
    fn parse(text: &str) -> Result<Self, Rejection> {
        let digits = text.strip_prefix("0x").ok_or(Rejection::Recompile)?;
        if digits.len() != 6 {
            return Err(Rejection::Recompile);
        }
        let packed = u32::from_str_radix(digits, 16).map_err(|_| Rejection::Error)?;
        let [_, r, g, b] = packed.to_be_bytes();
        Ok(Rgb([r, g, b]))
    }

    fn into_value(self) -> Value {
        Value::custom(&self.0).unwrap()
    }

    fn from_value(value: Value) -> Option<Self> {
        let bytes = value.custom_bytes()?;
        Some(Rgb([bytes[0], bytes[1], bytes[2]]))
    }
}

fn enabled() -> Tweakable {
    let mut engine = Tweakable::new().unwrap();
    engine.enable_with_config(TweakableConfig::default().with_sentinel("T_"));
    engine
}

// === Construction ===

#[test]
#[serial]
fn only_one_engine_at_a_time() {
    let engine = Tweakable::new().unwrap();
    assert_eq!(Tweakable::new().unwrap_err(), EngineError::AlreadyActive);
    drop(engine);
    assert!(Tweakable::new().is_ok());
}

#[test]
#[serial]
fn disabled_by_default() {
    let mut engine = Tweakable::new().unwrap();
    assert!(!engine.is_enabled());
    assert!(engine.config().is_none());
    assert!(engine.register("a.cpp", 1, 0, LiteralKind::Int).is_none());
    assert_eq!(engine.annotate("a.cpp", 1, 0, 42), 42);
    assert_eq!(engine.slot_count("a.cpp"), 0);
    assert_eq!(engine.update(), TweakableState::NoChange);
}

#[test]
#[serial]
fn enable_with_sets_relocation() {
    let mut engine = Tweakable::new().unwrap();
    engine.enable_with("/build", "/src");
    let config = engine.config().unwrap();
    assert_eq!(config.prefix(), "/build");
    assert_eq!(config.replace(), "/src");
    assert_eq!(config.sentinel(), "TWEAKABLE");

    engine.annotate("/build/a.cpp", 1, 0, 1);
    assert_eq!(engine.watch_path("/build/a.cpp"), Some("/src/a.cpp"));
    assert_eq!(engine.is_watch_valid("/build/a.cpp"), Some(true));
}

#[test]
#[serial]
fn reenabling_resets_state() {
    let mut engine = enabled();
    engine.annotate("a.cpp", 1, 0, 42);
    assert_eq!(engine.slot_count("a.cpp"), 1);

    engine.enable();
    assert_eq!(engine.slot_count("a.cpp"), 0);
    assert_eq!(engine.value::<i32>("a.cpp", 0), None);

    engine.annotate("a.cpp", 1, 0, 7);
    engine.disable();
    assert!(!engine.is_enabled());
    assert_eq!(engine.value::<i32>("a.cpp", 0), None);
}

// === Registry ===

#[test]
#[serial]
fn register_extends_slot_list() {
    let mut engine = enabled();
    let (initialized, storage) = engine.register("a.cpp", 10, 3, LiteralKind::Float).unwrap();
    assert!(!initialized);
    assert_eq!(*storage, Value::default());
    *storage = Value::Float(2.5);

    assert_eq!(engine.slot_count("a.cpp"), 4);
    for counter in 0..3 {
        assert_eq!(engine.value::<i32>("a.cpp", counter), None);
    }
    assert_eq!(engine.value::<f32>("a.cpp", 3), Some(2.5));

    let (initialized, storage) = engine.register("a.cpp", 10, 3, LiteralKind::Float).unwrap();
    assert!(initialized);
    assert_eq!(*storage, Value::Float(2.5));
}

#[test]
#[serial]
fn first_registration_wins() {
    let mut engine = enabled();
    for value in [42, 43, 44] {
        assert_eq!(engine.annotate("a.cpp", 1, 0, value), 42);
    }
    assert_eq!(engine.slot_count("a.cpp"), 1);

    let data = engine.data.as_ref().unwrap();
    assert_eq!(data.files.len(), 1);
    assert_eq!(data.files[0].slots[0].line, 1);
    assert_eq!(data.files[0].slots[0].parser.map(Parser::type_name), Some("i32"));
}

#[test]
#[serial]
fn registration_returns_same_storage() {
    let mut engine = enabled();
    let first: *const Value = engine.register("a.cpp", 1, 0, LiteralKind::Int).unwrap().1;
    let second: *const Value = engine.register("a.cpp", 1, 0, LiteralKind::Int).unwrap().1;
    assert_eq!(first, second);
}

#[test]
#[serial]
fn value_checks_kind() {
    let mut engine = enabled();
    engine.annotate("a.cpp", 1, 0, 'x');
    assert_eq!(engine.value::<char>("a.cpp", 0), Some('x'));
    assert_eq!(engine.value::<i32>("a.cpp", 0), None);
    assert_eq!(engine.value::<char>("b.cpp", 0), None);
    assert_eq!(engine.value::<char>("a.cpp", 1), None);
}

#[test]
#[serial]
#[traced_test]
fn new_file_logs_watch_path() {
    let mut engine = Tweakable::new().unwrap();
    engine.enable_with("/build", "/home/me/src");
    engine.annotate("/build/game/main.cpp", 4, 0, 1.5f64);
    engine.annotate("/build/game/main.cpp", 5, 1, true);
    assert!(logs_contain(
        "watching for changes in /home/me/src/game/main.cpp"
    ));
}

// === Scopes ===

#[test]
#[serial]
fn scope_runs_once_and_captures_innermost() {
    let mut engine = enabled();
    let runs = Rc::new(Cell::new(0));
    let counter = Rc::clone(&runs);
    engine.scope(move |engine| {
        counter.set(counter.get() + 1);
        engine.annotate("a.cpp", 1, 0, 1);
        engine.scope(|engine| {
            engine.annotate("a.cpp", 2, 1, 2);
        });
        engine.annotate("a.cpp", 3, 2, 3);
    });
    assert_eq!(runs.get(), 1);
    assert_eq!(engine.current_scope(), None);

    let data = engine.data.as_ref().unwrap();
    let scopes: Vec<_> = data.files[0].slots.iter().map(|slot| slot.scope).collect();
    assert_eq!(
        scopes,
        vec![Some(ScopeId(0)), Some(ScopeId(1)), Some(ScopeId(0))]
    );
    assert_eq!(data.scopes.len(), 2);
    assert!(data.scope_stack.is_empty());
}

#[test]
#[serial]
fn scope_without_captures_is_not_retained() {
    let mut engine = enabled();
    engine.annotate("a.cpp", 1, 0, 1);
    engine.scope(|engine| {
        // Already registered outside the scope.
        engine.annotate("a.cpp", 1, 0, 1);
    });
    let data = engine.data.as_ref().unwrap();
    assert!(data.scopes.is_empty());
    assert_eq!(data.files[0].slots[0].scope, None);
}

#[test]
#[serial]
fn current_scope_inside_scope() {
    let mut engine = enabled();
    let seen = Rc::new(Cell::new(None));
    let inner = Rc::clone(&seen);
    engine.scope(move |engine| inner.set(engine.current_scope()));
    assert_eq!(seen.get().map(ScopeId::raw), Some(0));
}

#[test]
#[serial]
fn disabled_scope_runs_closure() {
    let mut engine = Tweakable::new().unwrap();
    let runs = Rc::new(Cell::new(0));
    let counter = Rc::clone(&runs);
    engine.scope(move |_| counter.set(counter.get() + 1));
    assert_eq!(runs.get(), 1);
}

#[test]
#[serial]
fn scope_ids_survive_reenable() {
    let mut engine = enabled();
    engine.scope(|engine| {
        engine.annotate("a.cpp", 1, 0, 1);
    });
    engine.enable();
    engine.scope(|engine| {
        engine.annotate("a.cpp", 1, 0, 1);
    });
    let data = engine.data.as_ref().unwrap();
    assert_eq!(data.files[0].slots[0].scope, Some(ScopeId(1)));
}

// === Update ===

#[test]
#[serial]
fn update_commits_staged_values_only_on_success() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.cpp");
    let file = path.to_str().unwrap();
    write(&path, "int a = T_(1);\nint b = T_(2);\n", 0);

    let mut engine = enabled();
    engine.annotate(file, 1, 0, 1);
    engine.annotate(file, 2, 1, 2);

    // First value edited, second one broken: nothing applies.
    write(&path, "int a = T_(10);\nint b = T_(2.0f);\n", 1);
    assert_eq!(engine.update(), TweakableState::Recompile);
    assert_eq!(engine.value::<i32>(file, 0), Some(1));
    assert_eq!(engine.value::<i32>(file, 1), Some(2));

    write(&path, "int a = T_(10);\nint b = T_(2);\n", 2);
    assert_eq!(engine.update(), TweakableState::Success);
    assert_eq!(engine.value::<i32>(file, 0), Some(10));
    assert_eq!(engine.value::<i32>(file, 1), Some(2));
}

#[test]
#[serial]
fn terminal_file_stops_the_pass() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.cpp");
    let b = dir.path().join("b.cpp");
    write(&a, "T_(1)\n", 0);
    write(&b, "T_(1)\n", 0);

    let mut engine = enabled();
    engine.annotate(a.to_str().unwrap(), 1, 0, 1);
    engine.annotate(b.to_str().unwrap(), 1, 0, 1);

    write(&a, "T_(1\n", 1);
    write(&b, "T_(2)\n", 1);
    assert_eq!(engine.update(), TweakableState::Error);
    assert_eq!(engine.value::<i32>(b.to_str().unwrap(), 0), Some(1));

    // `b` was never polled, so its change is still pending.
    write(&a, "T_(1)\n", 2);
    assert_eq!(engine.update(), TweakableState::Success);
    assert_eq!(engine.value::<i32>(b.to_str().unwrap(), 0), Some(2));
}

#[test]
#[serial]
fn values_dropped_by_a_later_file_apply_once_it_is_fixed() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.cpp");
    let b = dir.path().join("b.cpp");
    let (file_a, file_b) = (a.to_str().unwrap(), b.to_str().unwrap());
    write(&a, "T_(1)\n", 0);
    write(&b, "T_(1)\n", 0);

    let mut engine = enabled();
    engine.annotate(file_a, 1, 0, 1);
    engine.annotate(file_b, 1, 0, 1);

    write(&a, "T_(2)\n", 1);
    write(&b, "T_(2.0f)\n", 1);
    assert_eq!(engine.update(), TweakableState::Recompile);
    assert_eq!(engine.value::<i32>(file_a, 0), Some(1));

    // Only `b` is saved again; the edit to `a` must not be lost.
    write(&b, "T_(1)\n", 2);
    assert_eq!(engine.update(), TweakableState::Success);
    assert_eq!(engine.value::<i32>(file_a, 0), Some(2));
    assert_eq!(engine.value::<i32>(file_b, 0), Some(1));

    assert_eq!(engine.update(), TweakableState::NoChange);
}

#[test]
#[serial]
fn broken_file_is_reported_once_per_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.cpp");
    let file = path.to_str().unwrap();
    write(&path, "T_(1)\n", 0);

    let mut engine = enabled();
    engine.annotate(file, 1, 0, 1);

    write(&path, "T_(1u)\n", 1);
    assert_eq!(engine.update(), TweakableState::Recompile);
    assert_eq!(engine.update(), TweakableState::NoChange);
    assert_eq!(engine.value::<i32>(file, 0), Some(1));
}

#[test]
#[serial]
fn user_type_reloads_through_its_own_parser() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.cpp");
    let file = path.to_str().unwrap();
    write(&path, "T_(0x336699)\n", 0);

    let mut engine = enabled();
    let initial = Rgb([0x33, 0x66, 0x99]);
    assert_eq!(engine.annotate(file, 1, 0, initial), initial);
    let parser = engine.data.as_ref().unwrap().files[0].slots[0].parser.unwrap();
    assert!(parser.type_name().ends_with("Rgb"));

    write(&path, "T_(0x0000ff)\n", 1);
    assert_eq!(engine.update(), TweakableState::Success);
    assert_eq!(engine.annotate(file, 1, 0, initial), Rgb([0, 0, 0xff]));
    assert_eq!(engine.value::<i32>(file, 0), None);

    write(&path, "T_(0x00ff)\n", 2);
    assert_eq!(engine.update(), TweakableState::Recompile);
    assert_eq!(engine.value::<Rgb>(file, 0), Some(Rgb([0, 0, 0xff])));
}

#[test]
#[serial]
fn scope_runs_once_per_update() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.cpp");
    let file = path.to_str().unwrap().to_owned();
    write(&path, "T_(1) T_(2) T_(3)\n", 0);

    let mut engine = enabled();
    let runs = Rc::new(Cell::new(0));
    let sum = Rc::new(Cell::new(0));
    {
        let (runs, sum, file) = (Rc::clone(&runs), Rc::clone(&sum), file.clone());
        engine.scope(move |engine| {
            runs.set(runs.get() + 1);
            let total: i32 = (0..3)
                .map(|counter| engine.annotate(&file, 1, counter, i32::try_from(counter).unwrap() + 1))
                .sum();
            sum.set(total);
        });
    }
    assert_eq!((runs.get(), sum.get()), (1, 6));

    write(&path, "T_(10) T_(20) T_(30)\n", 1);
    assert_eq!(engine.update(), TweakableState::Success);
    assert_eq!((runs.get(), sum.get()), (2, 60));

    assert_eq!(engine.update(), TweakableState::NoChange);
    assert_eq!(runs.get(), 2);
}

/// Enter the same scope closure for `counter`, optionally keyed.
fn enter_shared(
    engine: &mut Tweakable,
    file: &str,
    counter: usize,
    key: Option<usize>,
    runs: &Rc<Cell<u32>>,
) {
    let (runs, file) = (Rc::clone(runs), file.to_owned());
    let body = move |engine: &mut Tweakable| {
        runs.set(runs.get() + 1);
        engine.annotate(&file, 1, counter, 1);
    };
    match key {
        Some(key) => engine.scope_keyed(key, body),
        None => engine.scope(body),
    }
}

#[test]
#[serial]
fn reentered_scope_runs_once_per_update() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.cpp");
    let file = path.to_str().unwrap();
    write(&path, "T_(1) T_(1)\n", 0);

    let mut engine = enabled();
    let runs = Rc::new(Cell::new(0));
    enter_shared(&mut engine, file, 0, None, &runs);
    enter_shared(&mut engine, file, 1, None, &runs);
    assert_eq!(runs.get(), 2);

    let data = engine.data.as_ref().unwrap();
    let scopes: Vec<_> = data.files[0].slots.iter().map(|slot| slot.scope).collect();
    assert_eq!(scopes, vec![Some(ScopeId(0)), Some(ScopeId(0))]);
    assert_eq!(data.scopes.len(), 1);

    write(&path, "T_(2) T_(3)\n", 1);
    assert_eq!(engine.update(), TweakableState::Success);
    assert_eq!(runs.get(), 3);
}

#[test]
#[serial]
fn keyed_scopes_stay_apart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.cpp");
    let file = path.to_str().unwrap();
    write(&path, "T_(1) T_(1)\n", 0);

    let mut engine = enabled();
    let runs = Rc::new(Cell::new(0));
    enter_shared(&mut engine, file, 0, Some(0), &runs);
    enter_shared(&mut engine, file, 1, Some(1), &runs);

    let data = engine.data.as_ref().unwrap();
    let scopes: Vec<_> = data.files[0].slots.iter().map(|slot| slot.scope).collect();
    assert_eq!(scopes, vec![Some(ScopeId(0)), Some(ScopeId(1))]);

    write(&path, "T_(2) T_(3)\n", 1);
    assert_eq!(engine.update(), TweakableState::Success);
    assert_eq!(runs.get(), 4);

    // Same key, same scope.
    enter_shared(&mut engine, file, 0, Some(1), &runs);
    assert_eq!(engine.data.as_ref().unwrap().scopes.len(), 2);
}

#[test]
#[serial]
fn scope_may_update_recursively() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.cpp");
    let file = path.to_str().unwrap().to_owned();
    write(&path, "T_(1)\n", 0);

    let mut engine = enabled();
    let runs = Rc::new(Cell::new(0));
    {
        let (runs, file) = (Rc::clone(&runs), file.clone());
        engine.scope(move |engine| {
            runs.set(runs.get() + 1);
            engine.annotate(&file, 1, 0, 1);
            assert_eq!(engine.update(), TweakableState::NoChange);
        });
    }

    write(&path, "T_(2)\n", 1);
    assert_eq!(engine.update(), TweakableState::Success);
    assert_eq!(runs.get(), 2);
}

#[test]
#[serial]
#[traced_test]
fn unreadable_file_is_ignored_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.cpp");
    write(&path, "T_(1)\n", 0);

    let mut engine = enabled();
    engine.annotate(path.to_str().unwrap(), 1, 0, 1);
    fs::remove_file(&path).unwrap();
    assert_eq!(engine.update(), TweakableState::NoChange);
    assert_eq!(engine.is_watch_valid(path.to_str().unwrap()), Some(true));
    assert!(!logs_contain("aborting watch"));
}

#[test]
#[serial]
#[traced_test]
fn strict_watch_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.cpp");
    write(&path, "T_(1)\n", 0);

    let mut engine = Tweakable::new().unwrap();
    engine.enable_with_config(
        TweakableConfig::default()
            .with_sentinel("T_")
            .with_watch_flags(WatchFlags::empty()),
    );
    engine.annotate(path.to_str().unwrap(), 1, 0, 1);
    fs::remove_file(&path).unwrap();
    assert_eq!(engine.update(), TweakableState::NoChange);
    assert_eq!(engine.is_watch_valid(path.to_str().unwrap()), Some(false));
    assert!(logs_contain("aborting watch"));
}
