use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Display width of a string in terminal columns.
///
/// ```
/// use tapmenu::util::display_width;
///
/// assert_eq!(display_width("Weekly Builds"), 13);
/// ```
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncates `s` to at most `max_width` columns, appending "..." when cut.
///
/// Widths of 3 or fewer columns get as many characters as fit, no ellipsis.
/// Returns `Cow::Borrowed` when the string already fits.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let budget = if max_width <= ELLIPSIS_WIDTH {
        max_width
    } else {
        max_width - ELLIPSIS_WIDTH
    };

    let mut used = 0;
    let mut cut = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        cut = idx + c.len_utf8();
    }

    if max_width <= ELLIPSIS_WIDTH {
        Cow::Owned(s[..cut].to_string())
    } else {
        Cow::Owned(format!("{}{}", &s[..cut], ELLIPSIS))
    }
}

/// Collapses a multi-line value (tooltips, snippets) onto one line.
///
/// Line breaks and other control characters become single spaces; runs of
/// them collapse. Returns `Cow::Borrowed` when nothing needs replacing.
pub fn single_line(s: &str) -> Cow<'_, str> {
    if !s.chars().any(char::is_control) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut pending_space = false;
    for c in s.chars() {
        if c.is_control() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            if !out.ends_with(' ') && c != ' ' {
                out.push(' ');
            }
            pending_space = false;
        }
        out.push(c);
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncation() {
        assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
        assert_eq!(truncate_to_width("Short", 10), "Short");
        assert_eq!(truncate_to_width("12345", 5), "12345");
    }

    #[test]
    fn test_narrow_widths() {
        assert_eq!(truncate_to_width("Test", 0), "");
        assert_eq!(truncate_to_width("Testing", 3), "Tes");
        assert_eq!(truncate_to_width("Testing", 4), "T...");
    }

    #[test]
    fn test_wide_characters() {
        // Each CJK character occupies two columns
        assert_eq!(truncate_to_width("\u{4f60}\u{597d}\u{4e16}\u{754c}", 7), "\u{4f60}\u{597d}...");
    }

    #[test]
    fn test_single_line_borrows_clean_text() {
        let result = single_line("Install ATK Client");
        assert!(matches!(result, Cow::Borrowed(_)));
    }

    #[test]
    fn test_single_line_collapses_breaks() {
        assert_eq!(
            single_line("#This will install\n!pip install trustedanalytics==0.1"),
            "#This will install !pip install trustedanalytics==0.1"
        );
        assert_eq!(single_line("instance. \n\n!pip"), "instance. !pip");
        assert_eq!(single_line("\n\nlead"), "lead");
    }
}
