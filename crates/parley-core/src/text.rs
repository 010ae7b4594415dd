//! Log preview helpers.

/// Preview length for cache log lines.
pub const CACHE_PREVIEW_CHARS: usize = 30;

/// Preview length for backend and orchestrator log lines, and for the
/// diagnostic body excerpt carried by backend status errors.
pub const EXCERPT_CHARS: usize = 60;

/// Shorten `text` to at most `max_chars` characters, ending in `...` when cut.
///
/// Counts `char`s rather than bytes so multi-byte text is never split.
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_unchanged() {
        assert_eq!(preview("hello", 30), "hello");
        assert_eq!(preview("", 30), "");
    }

    #[test]
    fn test_text_at_limit_is_unchanged() {
        let text = "a".repeat(60);
        assert_eq!(preview(&text, EXCERPT_CHARS), text);
    }

    #[test]
    fn test_long_text_is_cut_with_ellipsis() {
        let text = "b".repeat(61);
        let out = preview(&text, EXCERPT_CHARS);
        assert_eq!(out.chars().count(), 60);
        assert!(out.ends_with("..."));
        assert_eq!(&out[..57], &text[..57]);
    }

    #[test]
    fn test_multibyte_text_is_cut_on_char_boundary() {
        let text = "é".repeat(40);
        let out = preview(&text, CACHE_PREVIEW_CHARS);
        assert_eq!(out.chars().count(), 30);
        assert!(out.starts_with("ééé"));
    }
}
