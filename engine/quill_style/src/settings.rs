//! The style settings value object.
//!
//! One immutable-per-run bag of options drives a whole formatting
//! invocation. Every consuming pass takes the settings as an explicit
//! parameter; nothing reads ambient state. Mutating a settings object
//! while a format is in flight is the caller's bug — clone a snapshot.

/// Brace placement for a construct family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum BraceStyle {
    /// `{` ends the declarator line.
    #[default]
    EndOfLine,
    /// `{` alone on the next line, at the declarator's indent.
    NextLine,
    /// `{` alone on the next line, one indent unit further.
    NextLineShifted,
    /// `{` one indent unit further, body one more beyond the brace.
    NextLineShiftedTwice,
    /// As `EndOfLine` unless the declarator itself wrapped, then `NextLine`.
    NextLineIfWrapped,
}

impl BraceStyle {
    /// Option-schema spelling of each variant.
    pub const VALUES: &'static [&'static str] = &[
        "end_of_line",
        "next_line",
        "next_line_shifted",
        "next_line_shifted_twice",
        "next_line_if_wrapped",
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "end_of_line" => Some(BraceStyle::EndOfLine),
            "next_line" => Some(BraceStyle::NextLine),
            "next_line_shifted" => Some(BraceStyle::NextLineShifted),
            "next_line_shifted_twice" => Some(BraceStyle::NextLineShiftedTwice),
            "next_line_if_wrapped" => Some(BraceStyle::NextLineIfWrapped),
            _ => None,
        }
    }

    /// Extra indent units applied to the brace itself when it starts a line.
    #[inline]
    pub fn brace_shift(self) -> usize {
        match self {
            BraceStyle::EndOfLine | BraceStyle::NextLine | BraceStyle::NextLineIfWrapped => 0,
            BraceStyle::NextLineShifted | BraceStyle::NextLineShiftedTwice => 1,
        }
    }

    /// Indent units applied to the body relative to the construct line.
    #[inline]
    pub fn body_shift(self) -> usize {
        match self {
            BraceStyle::EndOfLine
            | BraceStyle::NextLine
            | BraceStyle::NextLineIfWrapped
            | BraceStyle::NextLineShifted => 1,
            BraceStyle::NextLineShiftedTwice => 2,
        }
    }
}

/// Per-construct line wrapping policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum WrapMode {
    /// Leave as-is even if overlong.
    Never,
    /// Break at designated points only when the line exceeds the margin.
    #[default]
    AsNeeded,
    /// Break at every designated point regardless of width.
    Always,
    /// If the construct does not fit, break at every designated point.
    ChopDownIfLong,
}

impl WrapMode {
    pub const VALUES: &'static [&'static str] =
        &["never", "as_needed", "always", "chop_down_if_long"];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "never" => Some(WrapMode::Never),
            "as_needed" => Some(WrapMode::AsNeeded),
            "always" => Some(WrapMode::Always),
            "chop_down_if_long" => Some(WrapMode::ChopDownIfLong),
            _ => None,
        }
    }

    /// Whether this mode forces breaks before any width check.
    #[inline]
    pub fn forces_breaks(self) -> bool {
        matches!(self, WrapMode::Always)
    }

    /// Whether any wrapping is permitted at all.
    #[inline]
    pub fn allows_breaks(self) -> bool {
        !matches!(self, WrapMode::Never)
    }
}

/// Formatting options for one run.
///
/// Field groups follow the option schema in [`crate::schema`]; unknown
/// options never reach this struct — they are rejected when the
/// configuration is built.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct StyleSettings {
    // Indentation
    pub indent_size: usize,
    pub continuation_indent_size: usize,
    pub label_indent: usize,
    pub label_indent_absolute: bool,
    pub tab_size: usize,
    pub use_tab_character: bool,
    pub right_margin: usize,

    // Brace placement
    pub class_brace_style: BraceStyle,
    pub method_brace_style: BraceStyle,
    pub block_brace_style: BraceStyle,

    // Spaces before construct parentheses
    pub space_before_method_parens: bool,
    pub space_before_call_parens: bool,
    pub space_before_if_parens: bool,
    pub space_before_for_parens: bool,
    pub space_before_while_parens: bool,
    pub space_before_catch_parens: bool,
    pub space_before_synchronized_parens: bool,

    // Spaces within parentheses
    pub space_within_parens: bool,
    pub space_within_call_parens: bool,
    pub space_within_if_parens: bool,
    pub space_within_for_parens: bool,
    pub space_within_while_parens: bool,
    pub space_within_catch_parens: bool,
    pub space_within_synchronized_parens: bool,

    // Spaces around operator families
    pub space_around_assignment_ops: bool,
    pub space_around_logical_ops: bool,
    pub space_around_equality_ops: bool,
    pub space_around_relational_ops: bool,
    pub space_around_additive_ops: bool,
    pub space_around_multiplicative_ops: bool,
    pub space_around_shift_ops: bool,
    pub space_around_bitwise_ops: bool,

    // Punctuation spacing
    pub space_before_comma: bool,
    pub space_after_comma: bool,
    pub space_before_semicolon: bool,
    pub space_after_semicolon: bool,

    // Spaces before construct left braces
    pub space_before_class_lbrace: bool,
    pub space_before_method_lbrace: bool,
    pub space_before_if_lbrace: bool,
    pub space_before_else_lbrace: bool,
    pub space_before_for_lbrace: bool,
    pub space_before_while_lbrace: bool,
    pub space_before_do_lbrace: bool,
    pub space_before_try_lbrace: bool,
    pub space_before_catch_lbrace: bool,
    pub space_before_finally_lbrace: bool,
    pub space_before_synchronized_lbrace: bool,
    pub space_before_array_initializer_lbrace: bool,

    // Keywords continuing a construct (`else`, `catch`, ...)
    pub else_on_new_line: bool,
    pub while_on_new_line: bool,
    pub catch_on_new_line: bool,
    pub finally_on_new_line: bool,

    // Wrapping
    pub call_arguments_wrap: WrapMode,
    pub method_parameters_wrap: WrapMode,
    pub binary_operation_wrap: WrapMode,
    pub chained_call_wrap: WrapMode,
    pub extends_list_wrap: WrapMode,
    pub throws_list_wrap: WrapMode,
    pub array_initializer_wrap: WrapMode,
    pub prefer_parameters_wrap: bool,
    pub binary_operation_sign_on_next_line: bool,

    // Alignment
    pub align_multiline_parameters: bool,
    pub align_multiline_parameters_in_calls: bool,
    pub align_multiline_binary_operation: bool,
    pub align_multiline_assignment: bool,
    pub align_multiline_parenthesized_expression: bool,
    pub align_multiline_array_initializer: bool,

    // Blank line minima
    pub blank_lines_around_class: usize,
    pub blank_lines_around_method: usize,
    pub blank_lines_around_field: usize,
    pub blank_lines_after_package: usize,
    pub blank_lines_after_imports: usize,
    pub blank_lines_after_class_header: usize,

    // Blank line maxima (clamps on preserved blanks)
    pub keep_blank_lines_in_declarations: usize,
    pub keep_blank_lines_in_code: usize,
    pub keep_blank_lines_before_rbrace: usize,

    // Keep flags
    pub keep_line_breaks: bool,
    pub keep_simple_blocks_in_one_line: bool,
    pub keep_simple_methods_in_one_line: bool,
    pub keep_simple_classes_in_one_line: bool,
    pub keep_control_statement_in_one_line: bool,
}

impl Default for StyleSettings {
    fn default() -> Self {
        StyleSettings {
            indent_size: 4,
            continuation_indent_size: 8,
            label_indent: 0,
            label_indent_absolute: false,
            tab_size: 4,
            use_tab_character: false,
            right_margin: 120,

            class_brace_style: BraceStyle::EndOfLine,
            method_brace_style: BraceStyle::EndOfLine,
            block_brace_style: BraceStyle::EndOfLine,

            space_before_method_parens: false,
            space_before_call_parens: false,
            space_before_if_parens: true,
            space_before_for_parens: true,
            space_before_while_parens: true,
            space_before_catch_parens: true,
            space_before_synchronized_parens: true,

            space_within_parens: false,
            space_within_call_parens: false,
            space_within_if_parens: false,
            space_within_for_parens: false,
            space_within_while_parens: false,
            space_within_catch_parens: false,
            space_within_synchronized_parens: false,

            space_around_assignment_ops: true,
            space_around_logical_ops: true,
            space_around_equality_ops: true,
            space_around_relational_ops: true,
            space_around_additive_ops: true,
            space_around_multiplicative_ops: true,
            space_around_shift_ops: true,
            space_around_bitwise_ops: true,

            space_before_comma: false,
            space_after_comma: true,
            space_before_semicolon: false,
            space_after_semicolon: true,

            space_before_class_lbrace: true,
            space_before_method_lbrace: true,
            space_before_if_lbrace: true,
            space_before_else_lbrace: true,
            space_before_for_lbrace: true,
            space_before_while_lbrace: true,
            space_before_do_lbrace: true,
            space_before_try_lbrace: true,
            space_before_catch_lbrace: true,
            space_before_finally_lbrace: true,
            space_before_synchronized_lbrace: true,
            space_before_array_initializer_lbrace: true,

            else_on_new_line: false,
            while_on_new_line: false,
            catch_on_new_line: false,
            finally_on_new_line: false,

            call_arguments_wrap: WrapMode::AsNeeded,
            method_parameters_wrap: WrapMode::AsNeeded,
            binary_operation_wrap: WrapMode::AsNeeded,
            chained_call_wrap: WrapMode::AsNeeded,
            extends_list_wrap: WrapMode::AsNeeded,
            throws_list_wrap: WrapMode::AsNeeded,
            array_initializer_wrap: WrapMode::AsNeeded,
            prefer_parameters_wrap: false,
            binary_operation_sign_on_next_line: false,

            align_multiline_parameters: false,
            align_multiline_parameters_in_calls: false,
            align_multiline_binary_operation: false,
            align_multiline_assignment: false,
            align_multiline_parenthesized_expression: false,
            align_multiline_array_initializer: false,

            blank_lines_around_class: 1,
            blank_lines_around_method: 1,
            blank_lines_around_field: 0,
            blank_lines_after_package: 1,
            blank_lines_after_imports: 1,
            blank_lines_after_class_header: 0,

            keep_blank_lines_in_declarations: 2,
            keep_blank_lines_in_code: 2,
            keep_blank_lines_before_rbrace: 2,

            keep_line_breaks: true,
            keep_simple_blocks_in_one_line: false,
            keep_simple_methods_in_one_line: false,
            keep_simple_classes_in_one_line: false,
            keep_control_statement_in_one_line: true,
        }
    }
}

impl StyleSettings {
    /// Settings with a specific right margin, otherwise defaults.
    pub fn with_right_margin(right_margin: usize) -> Self {
        StyleSettings {
            right_margin,
            ..StyleSettings::default()
        }
    }

    /// Settings with a specific indent size, otherwise defaults.
    pub fn with_indent_size(indent_size: usize) -> Self {
        StyleSettings {
            indent_size,
            ..StyleSettings::default()
        }
    }

    /// One indent unit rendered in columns.
    #[inline]
    pub fn indent_unit(&self) -> usize {
        self.indent_size
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_layout_options() {
        let s = StyleSettings::default();
        assert_eq!(s.indent_size, 4);
        assert_eq!(s.continuation_indent_size, 8);
        assert_eq!(s.right_margin, 120);
        assert_eq!(s.class_brace_style, BraceStyle::EndOfLine);
        assert!(s.keep_line_breaks);
    }

    #[test]
    fn brace_style_parse_round_trip() {
        for &name in BraceStyle::VALUES {
            assert!(BraceStyle::parse(name).is_some(), "{name} must parse");
        }
        assert_eq!(BraceStyle::parse("end_of_line"), Some(BraceStyle::EndOfLine));
        assert_eq!(BraceStyle::parse("banana"), None);
    }

    #[test]
    fn brace_style_shifts() {
        assert_eq!(BraceStyle::EndOfLine.brace_shift(), 0);
        assert_eq!(BraceStyle::NextLine.brace_shift(), 0);
        assert_eq!(BraceStyle::NextLineShifted.brace_shift(), 1);
        assert_eq!(BraceStyle::NextLineShiftedTwice.brace_shift(), 1);
        assert_eq!(BraceStyle::NextLineShifted.body_shift(), 1);
        assert_eq!(BraceStyle::NextLineShiftedTwice.body_shift(), 2);
    }

    #[test]
    fn wrap_mode_parse() {
        assert_eq!(WrapMode::parse("never"), Some(WrapMode::Never));
        assert_eq!(WrapMode::parse("as_needed"), Some(WrapMode::AsNeeded));
        assert_eq!(WrapMode::parse("always"), Some(WrapMode::Always));
        assert_eq!(
            WrapMode::parse("chop_down_if_long"),
            Some(WrapMode::ChopDownIfLong)
        );
        assert_eq!(WrapMode::parse(""), None);
    }

    #[test]
    fn wrap_mode_predicates() {
        assert!(WrapMode::Always.forces_breaks());
        assert!(!WrapMode::AsNeeded.forces_breaks());
        assert!(!WrapMode::Never.allows_breaks());
        assert!(WrapMode::ChopDownIfLong.allows_breaks());
    }
}
