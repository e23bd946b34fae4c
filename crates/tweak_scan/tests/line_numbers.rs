//! The line reported for every call-site is the line of its `(`, however
//! the surrounding code is laid out.

#![allow(clippy::unwrap_used, reason = "tests panic on failure")]

use proptest::prelude::*;
use tweak_scan::{CallSiteScanner, SourceBuffer};

/// One generated source line and whether it holds a live call-site.
fn line() -> impl Strategy<Value = (String, bool)> {
    prop_oneof![
        Just(("int x = 1;".to_owned(), false)),
        Just(("".to_owned(), false)),
        Just(("// T_(0)".to_owned(), false)),
        Just(("/* T_(0) */ int y;".to_owned(), false)),
        Just(("const char* s = \"T_(0)\";".to_owned(), false)),
        Just(("auto r = R\"q(T_(0))q\";".to_owned(), false)),
        Just(("long big = 1'000'000;\r".to_owned(), false)),
        (any::<i32>()).prop_map(|v| (format!("int v = T_({v});"), true)),
        (0u32..1000).prop_map(|v| (format!("\tf(T_ ( {v}u ));"), true)),
    ]
}

proptest! {
    #[test]
    fn lines_match_layout(lines in prop::collection::vec(line(), 0..40)) {
        let source = lines.iter().map(|(text, _)| text.as_str()).collect::<Vec<_>>().join("\n");
        let expected: Vec<u32> = lines
            .iter()
            .zip(1u32..)
            .filter(|((_, live), _)| *live)
            .map(|(_, number)| number)
            .collect();

        let buf = SourceBuffer::new(&source);
        let found: Vec<u32> = CallSiteScanner::new(&buf, "T_", "gen.cpp")
            .map(|site| site.unwrap().line)
            .collect();
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn scanning_twice_gives_same_result(lines in prop::collection::vec(line(), 0..20)) {
        let source = lines.iter().map(|(text, _)| text.as_str()).collect::<Vec<_>>().join("\n");
        let buf = SourceBuffer::new(&source);
        let first: Vec<_> = CallSiteScanner::new(&buf, "T_", "gen.cpp").collect();
        let second: Vec<_> = CallSiteScanner::new(&buf, "T_", "gen.cpp").collect();
        prop_assert_eq!(first, second);
    }
}
