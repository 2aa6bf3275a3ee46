//! The closed option schema.
//!
//! Every option the engine understands is declared once in the
//! [`options!`] table below: its external name, its value domain, and the
//! settings field it maps to. [`StyleSettings::set`] validates against
//! this table, so unknown names and out-of-domain values are rejected when
//! a configuration is built — a format invocation never sees them.
//!
//! The schema is versioned: [`SCHEMA_VERSION`] changes whenever an option
//! is added, removed, or changes domain.

use crate::settings::{BraceStyle, StyleSettings, WrapMode};

/// Version of the option set. Bump on any schema change.
pub const SCHEMA_VERSION: u32 = 3;

/// A value supplied for an option.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionValue {
    Bool(bool),
    Int(u64),
    Enum(String),
}

impl OptionValue {
    fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn as_int(&self) -> Option<u64> {
        match self {
            OptionValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    fn as_enum(&self) -> Option<&str> {
        match self {
            OptionValue::Enum(s) => Some(s),
            _ => None,
        }
    }
}

/// Value domain of an option.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionKind {
    Bool,
    Int { min: u64, max: u64 },
    Enum(&'static [&'static str]),
}

/// Schema entry for one option.
#[derive(Clone, Copy, Debug)]
pub struct OptionDef {
    pub name: &'static str,
    pub kind: OptionKind,
}

/// Configuration-build failure.
///
/// All variants are raised at configuration-build time; format
/// invocations only ever receive validated settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StyleError {
    #[error("unknown option '{0}' (schema version {SCHEMA_VERSION})")]
    UnknownOption(String),
    #[error("option '{name}' expects a {expected} value")]
    TypeMismatch {
        name: String,
        expected: &'static str,
    },
    #[error("option '{name}' value {got} is outside {min}..={max}")]
    OutOfRange {
        name: String,
        min: u64,
        max: u64,
        got: u64,
    },
    #[error("option '{name}' has no value '{value}'")]
    UnknownEnumValue { name: String, value: String },
}

macro_rules! options {
    ($( $name:literal => $field:ident : $spec:tt; )+) => {
        /// All options, in schema order.
        pub static OPTIONS: &[OptionDef] = &[
            $( OptionDef { name: $name, kind: options!(@kind $spec) }, )+
        ];

        impl StyleSettings {
            /// Set one option by schema name.
            ///
            /// Rejects unknown names and out-of-domain values; on error the
            /// settings are unchanged.
            pub fn set(&mut self, name: &str, value: &OptionValue) -> Result<(), StyleError> {
                match name {
                    $( $name => options!(@apply self, $name, $field, $spec, value), )+
                    _ => Err(StyleError::UnknownOption(name.to_string())),
                }
            }
        }
    };

    (@kind bool) => { OptionKind::Bool };
    (@kind (int $min:literal $max:literal)) => { OptionKind::Int { min: $min, max: $max } };
    (@kind brace) => { OptionKind::Enum(BraceStyle::VALUES) };
    (@kind wrap) => { OptionKind::Enum(WrapMode::VALUES) };

    (@apply $s:ident, $name:expr, $field:ident, bool, $v:ident) => {{
        let b = $v.as_bool().ok_or_else(|| StyleError::TypeMismatch {
            name: $name.to_string(),
            expected: "boolean",
        })?;
        $s.$field = b;
        Ok(())
    }};
    (@apply $s:ident, $name:expr, $field:ident, (int $min:literal $max:literal), $v:ident) => {{
        let got = $v.as_int().ok_or_else(|| StyleError::TypeMismatch {
            name: $name.to_string(),
            expected: "integer",
        })?;
        if got < $min || got > $max {
            return Err(StyleError::OutOfRange {
                name: $name.to_string(),
                min: $min,
                max: $max,
                got,
            });
        }
        $s.$field = got as usize;
        Ok(())
    }};
    (@apply $s:ident, $name:expr, $field:ident, brace, $v:ident) => {{
        let raw = $v.as_enum().ok_or_else(|| StyleError::TypeMismatch {
            name: $name.to_string(),
            expected: "enum",
        })?;
        let parsed = BraceStyle::parse(raw).ok_or_else(|| StyleError::UnknownEnumValue {
            name: $name.to_string(),
            value: raw.to_string(),
        })?;
        $s.$field = parsed;
        Ok(())
    }};
    (@apply $s:ident, $name:expr, $field:ident, wrap, $v:ident) => {{
        let raw = $v.as_enum().ok_or_else(|| StyleError::TypeMismatch {
            name: $name.to_string(),
            expected: "enum",
        })?;
        let parsed = WrapMode::parse(raw).ok_or_else(|| StyleError::UnknownEnumValue {
            name: $name.to_string(),
            value: raw.to_string(),
        })?;
        $s.$field = parsed;
        Ok(())
    }};
}

options! {
    // Indentation
    "indent_size" => indent_size: (int 0 64);
    "continuation_indent_size" => continuation_indent_size: (int 0 64);
    "label_indent" => label_indent: (int 0 64);
    "label_indent_absolute" => label_indent_absolute: bool;
    "tab_size" => tab_size: (int 1 64);
    "use_tab_character" => use_tab_character: bool;
    "right_margin" => right_margin: (int 1 1000);

    // Brace placement
    "class_brace_style" => class_brace_style: brace;
    "method_brace_style" => method_brace_style: brace;
    "block_brace_style" => block_brace_style: brace;

    // Spaces before construct parentheses
    "space_before_method_parens" => space_before_method_parens: bool;
    "space_before_call_parens" => space_before_call_parens: bool;
    "space_before_if_parens" => space_before_if_parens: bool;
    "space_before_for_parens" => space_before_for_parens: bool;
    "space_before_while_parens" => space_before_while_parens: bool;
    "space_before_catch_parens" => space_before_catch_parens: bool;
    "space_before_synchronized_parens" => space_before_synchronized_parens: bool;

    // Spaces within parentheses
    "space_within_parens" => space_within_parens: bool;
    "space_within_call_parens" => space_within_call_parens: bool;
    "space_within_if_parens" => space_within_if_parens: bool;
    "space_within_for_parens" => space_within_for_parens: bool;
    "space_within_while_parens" => space_within_while_parens: bool;
    "space_within_catch_parens" => space_within_catch_parens: bool;
    "space_within_synchronized_parens" => space_within_synchronized_parens: bool;

    // Spaces around operator families
    "space_around_assignment_ops" => space_around_assignment_ops: bool;
    "space_around_logical_ops" => space_around_logical_ops: bool;
    "space_around_equality_ops" => space_around_equality_ops: bool;
    "space_around_relational_ops" => space_around_relational_ops: bool;
    "space_around_additive_ops" => space_around_additive_ops: bool;
    "space_around_multiplicative_ops" => space_around_multiplicative_ops: bool;
    "space_around_shift_ops" => space_around_shift_ops: bool;
    "space_around_bitwise_ops" => space_around_bitwise_ops: bool;

    // Punctuation spacing
    "space_before_comma" => space_before_comma: bool;
    "space_after_comma" => space_after_comma: bool;
    "space_before_semicolon" => space_before_semicolon: bool;
    "space_after_semicolon" => space_after_semicolon: bool;

    // Spaces before construct left braces
    "space_before_class_lbrace" => space_before_class_lbrace: bool;
    "space_before_method_lbrace" => space_before_method_lbrace: bool;
    "space_before_if_lbrace" => space_before_if_lbrace: bool;
    "space_before_else_lbrace" => space_before_else_lbrace: bool;
    "space_before_for_lbrace" => space_before_for_lbrace: bool;
    "space_before_while_lbrace" => space_before_while_lbrace: bool;
    "space_before_do_lbrace" => space_before_do_lbrace: bool;
    "space_before_try_lbrace" => space_before_try_lbrace: bool;
    "space_before_catch_lbrace" => space_before_catch_lbrace: bool;
    "space_before_finally_lbrace" => space_before_finally_lbrace: bool;
    "space_before_synchronized_lbrace" => space_before_synchronized_lbrace: bool;
    "space_before_array_initializer_lbrace" => space_before_array_initializer_lbrace: bool;

    // Continuation keywords on their own line
    "else_on_new_line" => else_on_new_line: bool;
    "while_on_new_line" => while_on_new_line: bool;
    "catch_on_new_line" => catch_on_new_line: bool;
    "finally_on_new_line" => finally_on_new_line: bool;

    // Wrapping
    "call_arguments_wrap" => call_arguments_wrap: wrap;
    "method_parameters_wrap" => method_parameters_wrap: wrap;
    "binary_operation_wrap" => binary_operation_wrap: wrap;
    "chained_call_wrap" => chained_call_wrap: wrap;
    "extends_list_wrap" => extends_list_wrap: wrap;
    "throws_list_wrap" => throws_list_wrap: wrap;
    "array_initializer_wrap" => array_initializer_wrap: wrap;
    "prefer_parameters_wrap" => prefer_parameters_wrap: bool;
    "binary_operation_sign_on_next_line" => binary_operation_sign_on_next_line: bool;

    // Alignment
    "align_multiline_parameters" => align_multiline_parameters: bool;
    "align_multiline_parameters_in_calls" => align_multiline_parameters_in_calls: bool;
    "align_multiline_binary_operation" => align_multiline_binary_operation: bool;
    "align_multiline_assignment" => align_multiline_assignment: bool;
    "align_multiline_parenthesized_expression" => align_multiline_parenthesized_expression: bool;
    "align_multiline_array_initializer" => align_multiline_array_initializer: bool;

    // Blank line minima
    "blank_lines_around_class" => blank_lines_around_class: (int 0 10);
    "blank_lines_around_method" => blank_lines_around_method: (int 0 10);
    "blank_lines_around_field" => blank_lines_around_field: (int 0 10);
    "blank_lines_after_package" => blank_lines_after_package: (int 0 10);
    "blank_lines_after_imports" => blank_lines_after_imports: (int 0 10);
    "blank_lines_after_class_header" => blank_lines_after_class_header: (int 0 10);

    // Blank line maxima
    "keep_blank_lines_in_declarations" => keep_blank_lines_in_declarations: (int 0 10);
    "keep_blank_lines_in_code" => keep_blank_lines_in_code: (int 0 10);
    "keep_blank_lines_before_rbrace" => keep_blank_lines_before_rbrace: (int 0 10);

    // Keep flags
    "keep_line_breaks" => keep_line_breaks: bool;
    "keep_simple_blocks_in_one_line" => keep_simple_blocks_in_one_line: bool;
    "keep_simple_methods_in_one_line" => keep_simple_methods_in_one_line: bool;
    "keep_simple_classes_in_one_line" => keep_simple_classes_in_one_line: bool;
    "keep_control_statement_in_one_line" => keep_control_statement_in_one_line: bool;
}

/// Look up the schema entry for an option name.
pub fn lookup(name: &str) -> Option<&'static OptionDef> {
    OPTIONS.iter().find(|def| def.name == name)
}

impl StyleSettings {
    /// Build settings from `(name, value)` pairs over the defaults.
    ///
    /// The first invalid pair aborts the build.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, StyleError>
    where
        I: IntoIterator<Item = (&'a str, OptionValue)>,
    {
        let mut settings = StyleSettings::default();
        for (name, value) in pairs {
            settings.set(name, &value)?;
        }
        Ok(settings)
    }
}
