//! Tab-aware column accounting.
//!
//! All width decisions (margin checks, alignment anchors) run on visual
//! columns, not byte offsets: a tab advances to the next tab stop, and a
//! newline inside a token (multi-line block comment) resets the column.

/// Advance a column over a piece of token text.
pub fn advance(column: usize, text: &str, tab_size: usize) -> usize {
    let mut col = column;
    for ch in text.chars() {
        match ch {
            '\t' => {
                let stop = tab_size.max(1);
                col = (col / stop + 1) * stop;
            }
            '\n' => col = 0,
            '\r' => {}
            _ => col += 1,
        }
    }
    col
}

/// Render an indentation prefix reaching the given column.
///
/// With `use_tabs`, whole tab stops are emitted as tabs and the remainder
/// as spaces; otherwise the prefix is all spaces.
pub fn indent_text(column: usize, use_tabs: bool, tab_size: usize) -> String {
    if use_tabs && tab_size > 0 {
        let tabs = column / tab_size;
        let spaces = column % tab_size;
        let mut out = String::with_capacity(tabs + spaces);
        for _ in 0..tabs {
            out.push('\t');
        }
        for _ in 0..spaces {
            out.push(' ');
        }
        out
    } else {
        " ".repeat(column)
    }
}

/// Visual width of an indentation string already in a document.
pub fn indent_width(text: &str, tab_size: usize) -> usize {
    advance(0, text, tab_size)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn advance_plain_text() {
        assert_eq!(advance(0, "hello", 4), 5);
        assert_eq!(advance(10, "ab", 4), 12);
    }

    #[test]
    fn advance_tab_to_next_stop() {
        assert_eq!(advance(0, "\t", 4), 4);
        assert_eq!(advance(2, "\t", 4), 4);
        assert_eq!(advance(4, "\t", 4), 8);
        assert_eq!(advance(0, "ab\tc", 4), 5);
    }

    #[test]
    fn advance_newline_resets() {
        assert_eq!(advance(10, "a\nbc", 4), 2);
    }

    #[test]
    fn indent_text_spaces() {
        assert_eq!(indent_text(6, false, 4), "      ");
    }

    #[test]
    fn indent_text_tabs_and_remainder() {
        assert_eq!(indent_text(6, true, 4), "\t  ");
        assert_eq!(indent_text(8, true, 4), "\t\t");
        assert_eq!(indent_text(3, true, 4), "   ");
    }

    #[test]
    fn indent_width_round_trips() {
        assert_eq!(indent_width("\t  ", 4), 6);
        assert_eq!(indent_width("    ", 4), 4);
    }
}
