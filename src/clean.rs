//! Text cleaning before chunking, embedding or display.
//!
//! Extractors hand over text with the scars of its source format: CRLF line
//! ends, runs of spaces from column layout, stray control bytes, curly
//! quotes, decomposed accents. [`TextCleaner`] normalizes these while
//! keeping paragraph breaks (`\n\n`) intact, since the chunker relies on
//! them.
//!
//! ## Pipelines
//!
//! | Method | Adds on top of [`TextCleaner::clean`] |
//! |--------|----------------------------------------|
//! | `clean` | NFC, whitespace, control chars (+ URLs and e-mails when aggressive) |
//! | `clean_for_embedding` | collapsed `!!!`/`...`, ASCII quotes, noise lines dropped |
//! | `clean_for_display` | punctuation spacing fixed |

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

static SPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());
static NEWLINE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());
static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"{}|\\^`\[\]]+"#).unwrap());
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap()
});
static REPEATED_TERMINAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.{2,}|!{2,}|\?{2,}").unwrap());
static SPACE_BEFORE_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([.,;:!?])").unwrap());
static MISSING_SPACE_AFTER_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.,;:!?])([A-Za-z])").unwrap());
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Lines this short (after trimming) are dropped as noise before embedding.
const NOISE_LINE_CHARS: usize = 3;

/// Configurable text cleaner.
///
/// ```rust
/// use strata::TextCleaner;
///
/// let cleaner = TextCleaner::new();
/// assert_eq!(cleaner.clean("Hello\t\tworld\r\n\r\n\r\n\r\nBye  "), "Hello world\n\nBye");
///
/// let aggressive = TextCleaner::aggressive();
/// assert_eq!(aggressive.clean("See https://example.com now"), "See now");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCleaner {
    aggressive: bool,
}

impl TextCleaner {
    /// A cleaner that only normalizes.
    #[must_use]
    pub const fn new() -> Self {
        Self { aggressive: false }
    }

    /// A cleaner that also strips URLs and e-mail addresses.
    #[must_use]
    pub const fn aggressive() -> Self {
        Self { aggressive: true }
    }

    /// Standard pipeline: NFC, whitespace, control characters, and in
    /// aggressive mode URLs and e-mail addresses. Result is trimmed.
    #[must_use]
    pub fn clean(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let text = normalize_unicode(text);
        let text = normalize_whitespace(&text);
        let mut text = remove_control_chars(&text);

        if self.aggressive {
            text = remove_urls(&text);
            text = remove_email_addresses(&text);
            text = SPACE_RUN.replace_all(&text, " ").into_owned();
        }

        text.trim().to_string()
    }

    /// Clean for embedding: collapses repeated terminal punctuation,
    /// normalizes quotes and drops near-empty lines.
    #[must_use]
    pub fn clean_for_embedding(&self, text: &str) -> String {
        let text = self.clean(text);
        let text = REPEATED_TERMINAL.replace_all(&text, |caps: &regex::Captures<'_>| {
            caps[0][..1].to_string()
        });
        let text = normalize_quotes(&text);

        text.split('\n')
            .filter(|line| line.trim().chars().count() > NOISE_LINE_CHARS)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }

    /// Clean for human reading: no space before punctuation, one after it.
    #[must_use]
    pub fn clean_for_display(&self, text: &str) -> String {
        let text = self.clean(text);
        let text = SPACE_BEFORE_PUNCT.replace_all(&text, "$1");
        let text = MISSING_SPACE_AFTER_PUNCT.replace_all(&text, "$1 $2");
        text.trim().to_string()
    }
}

/// Canonical composition (NFC).
#[must_use]
pub fn normalize_unicode(text: &str) -> String {
    text.nfc().collect()
}

/// Normalize whitespace while keeping paragraph breaks.
///
/// Tabs become spaces, space runs collapse, CRLF and CR become LF, three
/// or more newlines become two, and trailing spaces are cut per line.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    let text = text.replace('\t', " ");
    let text = SPACE_RUN.replace_all(&text, " ");
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = NEWLINE_RUN.replace_all(&text, "\n\n");
    text.split('\n')
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Drop control characters except newline and tab.
#[must_use]
pub fn remove_control_chars(text: &str) -> String {
    text.chars()
        .filter(|&c| !c.is_control() || c == '\n' || c == '\t')
        .collect()
}

/// Remove `http(s)://` URLs.
#[must_use]
pub fn remove_urls(text: &str) -> String {
    URL.replace_all(text, "").into_owned()
}

/// Remove e-mail addresses.
#[must_use]
pub fn remove_email_addresses(text: &str) -> String {
    EMAIL.replace_all(text, "").into_owned()
}

/// Map typographic quotes to ASCII `'` and `"`.
#[must_use]
pub fn normalize_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' => '\'',
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' => '"',
            other => other,
        })
        .collect()
}

/// Replace HTML tags with spaces and decode the common entities.
#[must_use]
pub fn strip_html(text: &str) -> String {
    HTML_TAG
        .replace_all(text, " ")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Shorten `text` to at most `max_chars` chars, suffix included, breaking
/// after the last whole word that fits.
///
/// ```rust
/// use strata::clean::truncate;
///
/// assert_eq!(truncate("The quick brown fox", 14, "..."), "The quick...");
/// assert_eq!(truncate("short", 10, "..."), "short");
/// ```
#[must_use]
pub fn truncate(text: &str, max_chars: usize, suffix: &str) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let budget = max_chars.saturating_sub(suffix.chars().count());
    let mut used = 0;
    let mut cut = 0;
    for (idx, word) in text.split_word_bound_indices() {
        let len = word.chars().count();
        if used + len > budget {
            break;
        }
        used += len;
        if !word.trim().is_empty() {
            cut = idx + word.len();
        }
    }

    if cut == 0 {
        // No whole word fits: hard cut.
        let hard = text
            .char_indices()
            .nth(budget)
            .map_or(text.len(), |(idx, _)| idx);
        return format!("{}{suffix}", &text[..hard]);
    }
    format!("{}{suffix}", text[..cut].trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_normalization() {
        let text = "a\t b   c  \r\nnext\r\rlast\n\n\n\n\nend";
        assert_eq!(normalize_whitespace(text), "a b c\nnext\n\nlast\n\nend");
    }

    #[test]
    fn test_control_chars_removed() {
        assert_eq!(remove_control_chars("a\u{0}b\u{7}c\nd\te"), "abc\nd\te");
    }

    #[test]
    fn test_unicode_nfc() {
        let decomposed = "e\u{301}";
        assert_eq!(normalize_unicode(decomposed), "\u{e9}");
    }

    #[test]
    fn test_clean_empty() {
        assert_eq!(TextCleaner::new().clean(""), "");
    }

    #[test]
    fn test_aggressive_removes_email() {
        let cleaner = TextCleaner::aggressive();
        assert_eq!(cleaner.clean("Mail jane.doe@example.org today"), "Mail today");
        assert_eq!(
            TextCleaner::new().clean("Mail jane.doe@example.org today"),
            "Mail jane.doe@example.org today"
        );
    }

    #[test]
    fn test_clean_for_embedding() {
        let cleaner = TextCleaner::new();
        let text = "Wow!!! Really??\n--\n\u{201C}Quoted\u{201D} and \u{2018}single\u{2019}...";
        assert_eq!(
            cleaner.clean_for_embedding(text),
            "Wow! Really?\n\"Quoted\" and 'single'."
        );
    }

    #[test]
    fn test_clean_for_display() {
        let cleaner = TextCleaner::new();
        assert_eq!(
            cleaner.clean_for_display("Hello , world .Next line"),
            "Hello, world. Next line"
        );
    }

    #[test]
    fn test_strip_html() {
        let html = "<p>Fish &amp; chips &lt;3</p>";
        assert_eq!(strip_html(html).trim(), "Fish & chips <3");
    }

    #[test]
    fn test_truncate_word_boundary() {
        assert_eq!(truncate("Hello wonderful world", 12, "..."), "Hello...");
        assert_eq!(truncate("Supercalifragilistic", 8, "..."), "Super...");
        assert_eq!(truncate("日本語のテキスト", 5, "…"), "日本語の…");
    }
}
