//! Trailing context carried across a split.
//!
//! When an accumulation is cut into sentence windows, each new window is
//! seeded with the tail of the one just emitted:
//!
//! ```text
//! overlap = 40
//!
//! emitted: "... long middle part. Short one. Final remark here. "
//!                                 |________________________|
//!                                  whole sentences from the end
//!                                  that fit in 40 chars
//! ```
//!
//! Whole sentences are preferred. Only the last `2 * overlap` chars are
//! examined, so the first span found there is usually a sentence fragment
//! and rarely fits. If not even the final sentence fits, the tail is
//! hard-cut to `overlap` chars, possibly mid-word.

use crate::sentence::split_sentences;
use crate::text::{char_len, tail};

/// Compute the overlap seed for the next window from `text`.
///
/// Returns a suffix of `text` of at most `overlap` chars, or the whole of
/// `text` when it is no longer than `overlap`.
///
/// ```rust
/// use strata::overlap_suffix;
///
/// let text = "A fairly long opening sentence goes first. Then a short one. ";
/// assert_eq!(overlap_suffix(text, 20), "Then a short one. ");
///
/// // Nothing sentence-shaped fits: hard cut
/// assert_eq!(overlap_suffix("abcdefghij", 4), "ghij");
///
/// // Short input comes back whole
/// assert_eq!(overlap_suffix("tiny", 10), "tiny");
/// ```
#[must_use]
pub fn overlap_suffix(text: &str, overlap: usize) -> &str {
    if char_len(text) <= overlap {
        return text;
    }

    let region = tail(text, overlap.saturating_mul(2));
    let sentences: Vec<&str> = split_sentences(region).collect();

    let mut kept_len = 0;
    let mut kept_bytes = 0;
    for sentence in sentences.iter().rev() {
        let len = char_len(sentence);
        if kept_len + len > overlap {
            break;
        }
        kept_len += len;
        kept_bytes += sentence.len();
    }

    if kept_bytes == 0 {
        tail(text, overlap)
    } else {
        &text[text.len() - kept_bytes..]
    }
}
