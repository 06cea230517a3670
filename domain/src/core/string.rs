//! String helpers for rendering summaries.

/// Truncate a string to at most `max_len` bytes, appending `...` when cut.
///
/// The cut always lands on a UTF-8 character boundary.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len.saturating_sub(3).min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

/// Collapse all whitespace runs (including newlines) into single spaces.
pub fn one_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Render a value as a single bounded line, for event summaries and logs.
pub fn summarize(s: &str, max_len: usize) -> String {
    truncate(&one_line(s), max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_multibyte() {
        // 'é' is 2 bytes; a cut at byte 3 would split the second one
        assert_eq!(truncate("éééé", 6), "é...");
        assert_eq!(truncate("ééé", 6), "ééé");
    }

    #[test]
    fn test_one_line() {
        assert_eq!(one_line("a\n  b\tc  "), "a b c");
        assert_eq!(one_line(""), "");
    }

    #[test]
    fn test_summarize_bounds_length() {
        let long = "word ".repeat(100);
        let summary = summarize(&long, 20);
        assert!(summary.len() <= 20);
        assert!(summary.ends_with("..."));
        assert!(!summary.contains('\n'));
    }
}
