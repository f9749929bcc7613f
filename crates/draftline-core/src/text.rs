/// First `max` characters of `s`, cut on a char boundary.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Shorten `s` to at most `max` characters, marking the cut with "...".
pub fn ellipsize(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let head = truncate_chars(s, max.saturating_sub(3));
    format!("{}...", head.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("°C°C", 2), "°C");
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[test]
    fn test_ellipsize() {
        assert_eq!(ellipsize("abc", 5), "abc");
        assert_eq!(ellipsize("abcdefgh", 6), "abc...");
        assert_eq!(ellipsize("ab  defgh", 6), "ab...");
    }
}
