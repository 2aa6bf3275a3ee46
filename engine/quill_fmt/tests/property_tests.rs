#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Property tests over generated sources and settings permutations.

use proptest::prelude::*;
use quill_fmt::{apply_edits, format, format_range, EditRange};
use quill_style::{BraceStyle, StyleSettings, WrapMode};
use quill_tree::{LineIndex, Span};

/// A small pool of statements to assemble method bodies from.
fn statement() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("a();".to_string()),
        Just("x = a + b * c;".to_string()),
        Just("int v = compute(aaa, bbb);".to_string()),
        Just("if (flag) {a();}".to_string()),
        Just("for (c) {d();}".to_string()),
        Just("result = obj.alpha(one).beta(two).gamma(three);".to_string()),
        Just("// note".to_string()),
    ]
}

/// A class with generated methods, statements, and blank runs.
fn source() -> impl Strategy<Value = String> {
    prop::collection::vec(
        (prop::collection::vec(statement(), 0..4), 0usize..4),
        1..4,
    )
    .prop_map(|methods| {
        let mut out = String::from("class Gen{\n");
        for (index, (body, blanks)) in methods.iter().enumerate() {
            out.push_str(&format!("void m{index}(){{\n"));
            for stmt in body {
                out.push_str(stmt);
                out.push('\n');
            }
            out.push_str("}\n");
            for _ in 0..*blanks {
                out.push('\n');
            }
        }
        out.push('}');
        out
    })
}

fn settings() -> impl Strategy<Value = StyleSettings> {
    (
        prop_oneof![Just(2usize), Just(4), Just(8)],
        40usize..=120,
        any::<bool>(),
        0usize..=2,
        prop_oneof![
            Just(BraceStyle::EndOfLine),
            Just(BraceStyle::NextLine),
            Just(BraceStyle::NextLineShifted),
            Just(BraceStyle::NextLineIfWrapped),
        ],
        prop_oneof![
            Just(WrapMode::AsNeeded),
            Just(WrapMode::Always),
            Just(WrapMode::Never),
            Just(WrapMode::ChopDownIfLong),
        ],
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(indent, margin, keep, blanks, brace, wrap, align, tabs)| {
                let mut s = StyleSettings::default();
                s.indent_size = indent;
                s.continuation_indent_size = indent * 2;
                s.right_margin = margin;
                s.keep_line_breaks = keep;
                s.keep_blank_lines_in_code = blanks;
                s.method_brace_style = brace;
                s.call_arguments_wrap = wrap;
                s.align_multiline_parameters_in_calls = align;
                s.align_multiline_binary_operation = align;
                s.use_tab_character = tabs;
                s
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn format_is_deterministic(src in source(), cfg in settings()) {
        let tree = quill_fixture::parse(&src).unwrap();
        let a = format(&tree, &cfg).unwrap();
        let b = format(&tree, &cfg).unwrap();
        prop_assert_eq!(a.edits, b.edits);
    }

    #[test]
    fn format_is_idempotent(src in source(), cfg in settings()) {
        let tree = quill_fixture::parse(&src).unwrap();
        let first = format(&tree, &cfg).unwrap();
        let formatted = apply_edits(&src, &first.edits);

        let retree = quill_fixture::parse(&formatted).unwrap();
        let second = format(&retree, &cfg).unwrap();
        prop_assert!(
            second.edits.is_empty(),
            "second pass changed {:?} -> {:?}",
            formatted,
            second.edits
        );
    }

    #[test]
    fn edits_only_touch_whitespace(src in source(), cfg in settings()) {
        let tree = quill_fixture::parse(&src).unwrap();
        let outcome = format(&tree, &cfg).unwrap();
        for edit in &outcome.edits {
            let original = &src[edit.span.range()];
            prop_assert!(
                original.chars().all(char::is_whitespace),
                "edit target {:?} is not whitespace",
                original
            );
            prop_assert!(edit.replacement.chars().all(char::is_whitespace));
        }
    }

    #[test]
    fn range_edits_stay_in_expanded_range(
        src in source(),
        cfg in settings(),
        (lo, len) in (0u32..64, 1u32..32),
    ) {
        let start = lo.min(src.len() as u32 - 1);
        let end = (start + len).min(src.len() as u32);
        let tree = quill_fixture::parse(&src).unwrap();
        let outcome = format_range(&tree, &cfg, EditRange::Bytes(Span::new(start, end))).unwrap();

        let index = LineIndex::new(&src);
        let bound = index.expand_to_lines(Span::new(start, end));
        for edit in &outcome.edits {
            prop_assert!(
                bound.contains_span(edit.span),
                "edit {:?} outside {:?}",
                edit,
                bound
            );
        }
    }

    #[test]
    fn range_formatting_never_grows_past_full_formatting(
        src in source(),
        cfg in settings(),
    ) {
        let tree = quill_fixture::parse(&src).unwrap();
        let full = format(&tree, &cfg).unwrap();
        let ranged = format_range(
            &tree,
            &cfg,
            EditRange::Bytes(Span::new(0, src.len() as u32)),
        )
        .unwrap();
        // A whole-document range yields a subset of (here: exactly) the
        // full-format edits.
        prop_assert_eq!(full.edits, ranged.edits);
    }
}
