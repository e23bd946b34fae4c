use pretty_assertions::assert_eq;

use super::relocate;

#[test]
fn empty_mapping_is_identity() {
    assert_eq!(relocate("/abs/a.cpp", "", ""), "/abs/a.cpp");
    assert_eq!(relocate("rel/a.cpp", "", ""), "rel/a.cpp");
    assert_eq!(relocate("", "", ""), "");
}

#[test]
fn strips_prefix_and_leading_separator() {
    assert_eq!(relocate("/build/src/a.cpp", "/build", ""), "src/a.cpp");
    assert_eq!(relocate("/build/src/a.cpp", "/build/", ""), "src/a.cpp");
}

#[test]
fn strips_only_one_separator() {
    assert_eq!(relocate("/build//a.cpp", "/build", ""), "/a.cpp");
}

#[test]
fn joins_onto_replace() {
    assert_eq!(relocate("/build/src/a.cpp", "/build", "/home/me"), "/home/me/src/a.cpp");
    assert_eq!(relocate("/build/src/a.cpp", "/build", "/home/me/"), "/home/me/src/a.cpp");
}

#[test]
fn prefix_that_does_not_match_still_drops_leading_separator() {
    assert_eq!(relocate("/other/a.cpp", "/build", ""), "other/a.cpp");
    assert_eq!(relocate("/other/a.cpp", "/build", "/home"), "/home/other/a.cpp");
}

#[test]
fn replace_without_prefix() {
    assert_eq!(relocate("src/a.cpp", "", "/home/me"), "/home/me/src/a.cpp");
    assert_eq!(relocate("/src/a.cpp", "", "/home/me"), "/home/me/src/a.cpp");
    assert_eq!(relocate("/src/a.cpp", "", "/home/me/"), "/home/me/src/a.cpp");
}

#[test]
fn prefix_is_matched_textually() {
    // No separator boundary is required after the prefix.
    assert_eq!(relocate("/buildx/a.cpp", "/build", "/home"), "/home/x/a.cpp");
}
