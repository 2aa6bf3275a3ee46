#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Golden before/after tests for whole-document formatting.
//!
//! Each test parses a fixture source, formats it, applies the edits, and
//! compares the full result text.

use pretty_assertions::assert_eq;
use quill_fmt::{apply_edits, format};
use quill_style::{BraceStyle, StyleSettings};

fn reformat_with(source: &str, settings: &StyleSettings) -> String {
    let tree = quill_fixture::parse(source).unwrap_or_else(|e| panic!("fixture: {e}"));
    let outcome = format(&tree, settings).unwrap_or_else(|e| panic!("format: {e}"));
    apply_edits(source, &outcome.edits)
}

fn reformat(source: &str) -> String {
    reformat_with(source, &StyleSettings::default())
}

#[test]
fn default_layout_for_nested_statements() {
    assert_eq!(
        reformat("class A{void b(){for(c){d();}}}"),
        "class A {\n\
         \x20   void b() {\n\
         \x20       for (c) {\n\
         \x20           d();\n\
         \x20       }\n\
         \x20   }\n\
         }"
    );
}

#[test]
fn do_while_stays_on_one_line() {
    assert_eq!(
        reformat("class A{\nvoid a(){\ndo x++ while (b);\n}\n}"),
        "class A {\n\
         \x20   void a() {\n\
         \x20       do x++ while (b);\n\
         \x20   }\n\
         }"
    );
}

#[test]
fn operator_spacing_follows_flags() {
    let source = "class A{void f(){x=a+b;}}";
    assert_eq!(
        reformat(source),
        "class A {\n\
         \x20   void f() {\n\
         \x20       x = a + b;\n\
         \x20   }\n\
         }"
    );

    let mut settings = StyleSettings::default();
    settings.space_around_assignment_ops = false;
    settings.space_around_additive_ops = false;
    assert_eq!(
        reformat_with(source, &settings),
        "class A {\n\
         \x20   void f() {\n\
         \x20       x=a+b;\n\
         \x20   }\n\
         }"
    );
}

// ---------------------------------------------------------------------
// Brace placement: each enum value maps to a literal expected layout.
// ---------------------------------------------------------------------

fn method_braces(style: BraceStyle) -> String {
    let mut settings = StyleSettings::default();
    settings.method_brace_style = style;
    reformat_with("class A{void foo(){a();}}", &settings)
}

#[test]
fn brace_style_end_of_line() {
    assert_eq!(
        method_braces(BraceStyle::EndOfLine),
        "class A {\n\
         \x20   void foo() {\n\
         \x20       a();\n\
         \x20   }\n\
         }"
    );
}

#[test]
fn brace_style_next_line() {
    assert_eq!(
        method_braces(BraceStyle::NextLine),
        "class A {\n\
         \x20   void foo()\n\
         \x20   {\n\
         \x20       a();\n\
         \x20   }\n\
         }"
    );
}

#[test]
fn brace_style_next_line_shifted() {
    assert_eq!(
        method_braces(BraceStyle::NextLineShifted),
        "class A {\n\
         \x20   void foo()\n\
         \x20       {\n\
         \x20       a();\n\
         \x20       }\n\
         }"
    );
}

#[test]
fn brace_style_next_line_shifted_twice() {
    assert_eq!(
        method_braces(BraceStyle::NextLineShiftedTwice),
        "class A {\n\
         \x20   void foo()\n\
         \x20       {\n\
         \x20           a();\n\
         \x20       }\n\
         }"
    );
}

#[test]
fn brace_style_next_line_if_wrapped_short_declarator() {
    // Nothing wrapped: behaves as end-of-line.
    assert_eq!(
        method_braces(BraceStyle::NextLineIfWrapped),
        "class A {\n\
         \x20   void foo() {\n\
         \x20       a();\n\
         \x20   }\n\
         }"
    );
}

#[test]
fn brace_style_next_line_if_wrapped_with_wrapped_parameters() {
    let mut settings = StyleSettings::default();
    settings.method_brace_style = BraceStyle::NextLineIfWrapped;
    settings.method_parameters_wrap = quill_style::WrapMode::Always;
    assert_eq!(
        reformat_with("class A{void f(int a, int b){c();}}", &settings),
        "class A {\n\
         \x20   void f(int a,\n\
         \x20           int b)\n\
         \x20   {\n\
         \x20       c();\n\
         \x20   }\n\
         }"
    );
}

#[test]
fn class_brace_on_next_line() {
    let mut settings = StyleSettings::default();
    settings.class_brace_style = BraceStyle::NextLine;
    assert_eq!(
        reformat_with("class A{void foo(){a();}}", &settings),
        "class A\n\
         {\n\
         \x20   void foo() {\n\
         \x20       a();\n\
         \x20   }\n\
         }"
    );
}

// ---------------------------------------------------------------------
// Blank line budgets
// ---------------------------------------------------------------------

#[test]
fn blank_lines_clamped_to_configured_maximum() {
    let source = "class A{void f(){a();\n\n\n\nb();}}";
    for (keep, expected_blanks) in [(0usize, 0usize), (1, 1), (2, 2)] {
        let mut settings = StyleSettings::default();
        settings.keep_blank_lines_in_code = keep;
        let blank_lines = "\n".repeat(expected_blanks);
        assert_eq!(
            reformat_with(source, &settings),
            format!(
                "class A {{\n\
                 \x20   void f() {{\n\
                 \x20       a();\n{blank_lines}\
                 \x20       b();\n\
                 \x20   }}\n\
                 }}"
            ),
            "keep_blank_lines_in_code = {keep}"
        );
    }
}

#[test]
fn methods_get_a_blank_line_between_them() {
    assert_eq!(
        reformat("class A{void f(){}\nvoid g(){}}"),
        "class A {\n\
         \x20   void f() {\n\
         \x20   }\n\
         \n\
         \x20   void g() {\n\
         \x20   }\n\
         }"
    );
}

#[test]
fn excess_blank_lines_between_methods_collapse() {
    let mut settings = StyleSettings::default();
    settings.keep_blank_lines_in_declarations = 1;
    assert_eq!(
        reformat_with("class A{void f(){}\n\n\n\n\nvoid g(){}}", &settings),
        "class A {\n\
         \x20   void f() {\n\
         \x20   }\n\
         \n\
         \x20   void g() {\n\
         \x20   }\n\
         }"
    );
}

// ---------------------------------------------------------------------
// Keep line breaks
// ---------------------------------------------------------------------

#[test]
fn keep_line_breaks_preserves_existing_brace_break() {
    let source = "class A {\n\
                  \x20   void f()\n\
                  \x20   {\n\
                  \x20       a();\n\
                  \x20   }\n\
                  }";
    // End-of-line style, but the existing break survives.
    assert_eq!(reformat(source), source);
}

#[test]
fn disabling_keep_line_breaks_rejoins_braces() {
    let source = "class A {\n\
                  \x20   void f()\n\
                  \x20   {\n\
                  \x20       a();\n\
                  \x20   }\n\
                  }";
    let mut settings = StyleSettings::default();
    settings.keep_line_breaks = false;
    assert_eq!(
        reformat_with(source, &settings),
        "class A {\n\
         \x20   void f() {\n\
         \x20       a();\n\
         \x20   }\n\
         }"
    );
}

#[test]
fn annotation_break_is_kept_and_signature_reindented() {
    let source = "public class Test<Param> {\n\
                  \x20   @SuppressWarnings(\"unchecked\")\n\
                  \x20       void executeParallel(Param... params) {\n\
                  \x20   }\n\
                  }";
    assert_eq!(
        reformat(source),
        "public class Test<Param> {\n\
         \x20   @SuppressWarnings(\"unchecked\")\n\
         \x20   void executeParallel(Param... params) {\n\
         \x20   }\n\
         }"
    );
}

// ---------------------------------------------------------------------
// Binary operations: alignment versus continuation indent
// ---------------------------------------------------------------------

fn binary_source(op: &str) -> String {
    format!(
        "class Foo {{\n\
         \x20   void foo () {{\n\
         \x20       xxx = aaa + bbb \n\
         \x20       {op} ccc + eee + ddd;\n\
         \x20   }}\n\
         }}"
    )
}

fn binary_expected(indent: usize, op: &str) -> String {
    format!(
        "class Foo {{\n\
         \x20   void foo() {{\n\
         \x20       xxx = aaa + bbb\n\
         {}{op} ccc + eee + ddd;\n\
         \x20   }}\n\
         }}",
        " ".repeat(indent)
    )
}

#[test]
fn aligned_binary_operation_continues_under_first_operand() {
    let mut settings = StyleSettings::default();
    settings.align_multiline_binary_operation = true;
    assert_eq!(
        reformat_with(&binary_source("+"), &settings),
        binary_expected(14, "+")
    );
}

#[test]
fn aligned_binary_operation_with_minus() {
    let mut settings = StyleSettings::default();
    settings.align_multiline_binary_operation = true;
    assert_eq!(
        reformat_with(&binary_source("-"), &settings),
        binary_expected(14, "-")
    );
}

#[test]
fn aligned_multiplication_continues_under_its_own_operand() {
    // `bbb * ccc` binds tighter, so the continuation aligns under `bbb`.
    let mut settings = StyleSettings::default();
    settings.align_multiline_binary_operation = true;
    assert_eq!(
        reformat_with(&binary_source("*"), &settings),
        binary_expected(20, "*")
    );
}

#[test]
fn unaligned_binary_operation_takes_continuation_indent() {
    for align_assignment in [false, true] {
        let mut settings = StyleSettings::default();
        settings.align_multiline_binary_operation = false;
        settings.align_multiline_assignment = align_assignment;
        assert_eq!(
            reformat_with(&binary_source("+"), &settings),
            binary_expected(16, "+"),
            "align_multiline_assignment = {align_assignment}"
        );
    }
}

#[test]
fn wrapped_string_concatenation_keeps_operator_at_line_end() {
    let source = "class Foo {\n\
                  \x20   void foo () {\n\
                  String s = \"abc\" +\n\
                  \"def\";\n\
                  \x20   }\n\
                  }";
    assert_eq!(
        reformat(source),
        "class Foo {\n\
         \x20   void foo() {\n\
         \x20       String s = \"abc\" +\n\
         \x20               \"def\";\n\
         \x20   }\n\
         }"
    );
}

// ---------------------------------------------------------------------
// Control flow clauses
// ---------------------------------------------------------------------

#[test]
fn else_stays_on_closing_brace_line_by_default() {
    assert_eq!(
        reformat("class A{void f(){if (a) {b();} else {c();}}}"),
        "class A {\n\
         \x20   void f() {\n\
         \x20       if (a) {\n\
         \x20           b();\n\
         \x20       } else {\n\
         \x20           c();\n\
         \x20       }\n\
         \x20   }\n\
         }"
    );
}

#[test]
fn else_moves_to_its_own_line_when_configured() {
    let mut settings = StyleSettings::default();
    settings.else_on_new_line = true;
    assert_eq!(
        reformat_with("class A{void f(){if (a) {b();} else {c();}}}", &settings),
        "class A {\n\
         \x20   void f() {\n\
         \x20       if (a) {\n\
         \x20           b();\n\
         \x20       }\n\
         \x20       else {\n\
         \x20           c();\n\
         \x20       }\n\
         \x20   }\n\
         }"
    );
}

#[test]
fn try_catch_finally_clauses() {
    assert_eq!(
        reformat("class A{void f(){try {a();} catch (E e) {b();} finally {c();}}}"),
        "class A {\n\
         \x20   void f() {\n\
         \x20       try {\n\
         \x20           a();\n\
         \x20       } catch (E e) {\n\
         \x20           b();\n\
         \x20       } finally {\n\
         \x20           c();\n\
         \x20       }\n\
         \x20   }\n\
         }"
    );
}

#[test]
fn synchronized_spacing_flags() {
    let mut settings = StyleSettings::default();
    settings.space_before_synchronized_parens = false;
    settings.space_within_synchronized_parens = false;
    settings.space_before_synchronized_lbrace = false;
    assert_eq!(
        reformat_with("class A{void f(){synchronized(lock){a();}}}", &settings),
        "class A {\n\
         \x20   void f() {\n\
         \x20       synchronized(lock){\n\
         \x20           a();\n\
         \x20       }\n\
         \x20   }\n\
         }"
    );
}

#[test]
fn braceless_if_body_stays_inline_by_default() {
    assert_eq!(
        reformat("class A{void f(){if (a) b();}}"),
        "class A {\n\
         \x20   void f() {\n\
         \x20       if (a) b();\n\
         \x20   }\n\
         }"
    );
}

#[test]
fn braceless_if_body_hangs_when_already_broken() {
    let source = "class A {\n\
                  \x20   void f() {\n\
                  \x20       if (a)\n\
                  \x20           b();\n\
                  \x20   }\n\
                  }";
    assert_eq!(reformat(source), source);
}

// ---------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------

#[test]
fn doc_comment_interior_is_not_rewritten() {
    assert_eq!(
        reformat("/**\n* @author smbd\n* @since 1.9\n*/\nclass Test<T>{}"),
        "/**\n* @author smbd\n* @since 1.9\n*/\nclass Test<T> {\n}"
    );
}

#[test]
fn comment_moves_with_its_declaration() {
    let mut settings = StyleSettings::default();
    settings.blank_lines_around_method = 1;
    assert_eq!(
        reformat_with(
            "class A{void f(){}\n\n\n\n// does things\nvoid g(){}}",
            &settings
        ),
        "class A {\n\
         \x20   void f() {\n\
         \x20   }\n\
         \n\
         \n\
         \x20   // does things\n\
         \x20   void g() {\n\
         \x20   }\n\
         }"
    );
}

#[test]
fn trailing_comment_keeps_its_statement_line() {
    assert_eq!(
        reformat("class A{void f(){a(); // note\nb();}}"),
        "class A {\n\
         \x20   void f() {\n\
         \x20       a(); // note\n\
         \x20       b();\n\
         \x20   }\n\
         }"
    );
}

// ---------------------------------------------------------------------
// Labels and simple-block keeps
// ---------------------------------------------------------------------

#[test]
fn label_uses_relative_indent_by_default() {
    assert_eq!(
        reformat("class A{void f(){outer: for(c){break;}}}"),
        "class A {\n\
         \x20   void f() {\n\
         \x20       outer: for (c) {\n\
         \x20           break;\n\
         \x20       }\n\
         \x20   }\n\
         }"
    );
}

#[test]
fn absolute_label_indent() {
    let source = "class A {\n\
                  \x20   void f() {\n\
                  \x20       outer:\n\
                  \x20       for (c) {\n\
                  \x20           break;\n\
                  \x20       }\n\
                  \x20   }\n\
                  }";
    let mut settings = StyleSettings::default();
    settings.label_indent_absolute = true;
    settings.label_indent = 0;
    let formatted = reformat_with(source, &settings);
    assert!(
        formatted.contains("\nouter:\n"),
        "label must sit at column zero:\n{formatted}"
    );
}

#[test]
fn simple_blocks_keep_one_line_when_configured() {
    let mut settings = StyleSettings::default();
    settings.keep_simple_blocks_in_one_line = true;
    assert_eq!(
        reformat_with("class A{void f(){if (a) {b();}}}", &settings),
        "class A {\n\
         \x20   void f() {\n\
         \x20       if (a) { b(); }\n\
         \x20   }\n\
         }"
    );
}

#[test]
fn empty_body_breaks_by_default() {
    assert_eq!(
        reformat("class A{void f(){}}"),
        "class A {\n\
         \x20   void f() {\n\
         \x20   }\n\
         }"
    );
}

#[test]
fn tabs_used_for_indentation_when_configured() {
    let mut settings = StyleSettings::default();
    settings.use_tab_character = true;
    assert_eq!(
        reformat_with("class A{void b(){d();}}", &settings),
        "class A {\n\tvoid b() {\n\t\td();\n\t}\n}"
    );
}
