//! Character-counted slicing helpers.
//!
//! Everything in this crate measures text in `char`s. These helpers keep
//! that arithmetic in one place and always cut on char boundaries.

/// Number of chars in `s`.
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Number of chars in `s` after trimming surrounding whitespace.
pub(crate) fn trimmed_len(s: &str) -> usize {
    char_len(s.trim())
}

/// The first `n` chars of `s` (all of `s` if shorter).
pub(crate) fn head(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// The last `n` chars of `s` (all of `s` if shorter).
pub(crate) fn tail(s: &str, n: usize) -> &str {
    if n == 0 {
        return &s[s.len()..];
    }
    match s.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_tail_ascii() {
        assert_eq!(head("abcdef", 3), "abc");
        assert_eq!(tail("abcdef", 3), "def");
        assert_eq!(head("ab", 5), "ab");
        assert_eq!(tail("ab", 5), "ab");
        assert_eq!(tail("ab", 0), "");
        assert_eq!(head("ab", 0), "");
    }

    #[test]
    fn test_head_tail_multibyte() {
        let s = "a日本語b";
        assert_eq!(head(s, 2), "a日");
        assert_eq!(tail(s, 2), "語b");
        assert_eq!(char_len(s), 5);
    }

    #[test]
    fn test_trimmed_len() {
        assert_eq!(trimmed_len("  hi \n\n"), 2);
        assert_eq!(trimmed_len(" \t "), 0);
    }
}
