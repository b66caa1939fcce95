//! Heuristic sentence splitting.
//!
//! ## The Rule
//!
//! A boundary sits after `.`, `!` or `?` when what follows is a run of
//! whitespace and then an uppercase letter. The whitespace run stays with
//! the sentence before the boundary:
//!
//! ```text
//! "It rained. Then it stopped!  Why? no idea."
//!  |__________||______________||__________________|
//!  "It rained. " "Then it stopped!  " "Why? no idea."
//!                                        ^ lowercase: no boundary
//! ```
//!
//! Concatenating the spans gives back the input exactly, so offsets can be
//! computed by summing span lengths.
//!
//! ## Known Limitation
//!
//! This is punctuation-and-case, not grammar. "Dr. Smith" and
//! "U.S. Army" both split, while "3.14" does not only because no
//! whitespace follows the period. Spurious boundaries just mean an extra
//! candidate split point when an accumulation has to be windowed, so no
//! abbreviation list is kept.

use std::iter::FusedIterator;

/// Iterator over sentence-like spans of a text.
///
/// Lazy, finite and cheap to clone: cloning restarts from the clone's
/// current position. Never yields an empty span.
///
/// ## Example
///
/// ```rust
/// use strata::split_sentences;
///
/// let text = "First sentence. Second one! third stays attached.";
/// let spans: Vec<&str> = split_sentences(text).collect();
///
/// assert_eq!(spans, ["First sentence. ", "Second one! third stays attached."]);
/// assert_eq!(spans.concat(), text);
/// ```
#[derive(Debug, Clone)]
pub struct Sentences<'a> {
    rest: &'a str,
}

/// Split `text` into sentence-like spans.
#[must_use]
pub fn split_sentences(text: &str) -> Sentences<'_> {
    Sentences { rest: text }
}

const fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Byte length of the first span of `text`.
fn boundary(text: &str) -> usize {
    for (idx, c) in text.char_indices() {
        if !is_terminal(c) {
            continue;
        }
        let after = idx + c.len_utf8();
        let ws: usize = text[after..]
            .chars()
            .take_while(|c| c.is_whitespace())
            .map(char::len_utf8)
            .sum();
        if ws == 0 {
            continue;
        }
        let end = after + ws;
        if text[end..].chars().next().is_some_and(char::is_uppercase) {
            return end;
        }
    }
    text.len()
}

impl<'a> Iterator for Sentences<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let end = boundary(self.rest);
        let (span, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(span)
    }
}

impl FusedIterator for Sentences<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(text: &str) -> Vec<&str> {
        split_sentences(text).collect()
    }

    #[test]
    fn test_basic_sentences() {
        let text = "Hello world. How are you? I am fine.";
        assert_eq!(spans(text), ["Hello world. ", "How are you? ", "I am fine."]);
    }

    #[test]
    fn test_requires_uppercase_after_whitespace() {
        assert_eq!(spans("one. two. Three."), ["one. two. ", "Three."]);
    }

    #[test]
    fn test_requires_whitespace() {
        assert_eq!(spans("Pi is 3.14 roughly.Next"), ["Pi is 3.14 roughly.Next"]);
    }

    #[test]
    fn test_abbreviations_split() {
        // Documented limitation: abbreviations followed by a capital split.
        let text = "Dr. Smith went to Washington D.C. on Tuesday.";
        assert_eq!(spans(text), ["Dr. ", "Smith went to Washington D.C. on Tuesday."]);
    }

    #[test]
    fn test_whitespace_run_kept() {
        let text = "Done!\n\n  Next part?\tYes.";
        assert_eq!(spans(text), ["Done!\n\n  ", "Next part?\t", "Yes."]);
    }

    #[test]
    fn test_unicode_uppercase() {
        assert_eq!(spans("Fin. Élan vital."), ["Fin. ", "Élan vital."]);
    }

    #[test]
    fn test_concatenation_reconstructs() {
        let text = "  Leading space. Trailing space!   \n";
        assert_eq!(spans(text).concat(), text);
    }

    #[test]
    fn test_empty_text() {
        assert!(spans("").is_empty());
    }

    #[test]
    fn test_whitespace_only() {
        assert_eq!(spans("   \n"), ["   \n"]);
    }

    #[test]
    fn test_restartable() {
        let mut it = split_sentences("A. B. C.");
        assert_eq!(it.next(), Some("A. "));
        let restarted = it.clone();
        assert_eq!(it.collect::<Vec<_>>(), ["B. ", "C."]);
        assert_eq!(restarted.collect::<Vec<_>>(), ["B. ", "C."]);
    }
}
