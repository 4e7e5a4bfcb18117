//! Display width calculation for Unicode text
//!
//! Cursor positioning and line wrapping need the visual width of
//! characters on a terminal: CJK and other fullwidth code points occupy
//! two columns, most everything else one.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Calculate the display width of a single character.
///
/// Returns 0 for control characters and zero-width characters,
/// 2 for CJK/fullwidth characters and emoji, 1 for most others.
#[inline]
pub fn char_width(c: char) -> usize {
    // unicode_width returns None for control characters
    c.width().unwrap_or(0)
}

/// Calculate the display width of a string.
///
/// Use this instead of `.chars().count()` when computing visual layout.
#[inline]
pub fn str_width(s: &str) -> usize {
    s.width()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_width() {
        assert_eq!(str_width("Hello"), 5);
        assert_eq!(str_width(""), 0);
        assert_eq!(str_width(" "), 1);
    }

    #[test]
    fn test_cjk_width() {
        assert_eq!(str_width("你好"), 4);
        assert_eq!(str_width("日本"), 4);
        assert_eq!(str_width("한글"), 4);
    }

    #[test]
    fn test_mixed_width() {
        assert_eq!(str_width("Hello你好"), 5 + 4);
        assert_eq!(str_width("a你b"), 1 + 2 + 1);
    }

    #[test]
    fn test_char_width() {
        assert_eq!(char_width('a'), 1);
        assert_eq!(char_width('你'), 2);
        assert_eq!(char_width('\0'), 0);
    }
}
