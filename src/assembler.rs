//! Block accumulation: the chunking state machine.
//!
//! ## One Pass, One Accumulator
//!
//! Blocks are folded left to right into an [`Accumulator`] that owns
//! everything the pass carries: the pending text, the blocks tracked for
//! attribution, the running character offset and the chunks emitted so
//! far.
//!
//! ```text
//!  heading ──► close pending (flush if >= min, else merge forward)
//!              pending = "<heading>\n\n"
//!
//!  empty block ──► skipped
//!
//!  block ──► pending + "<text>\n\n" fits max?
//!              yes ─► append
//!              no  ─► close pending
//!                     text > max? ─► split the block on its own
//!                     otherwise   ─► pending = "<text>\n\n"
//!
//!  end ──► close pending
//! ```
//!
//! Closing a pending accumulation below `min_size` drops its text. Before
//! a heading this is the intended "merge forward": a heading that follows
//! only a line or two starts a fresh accumulation instead of producing a
//! tiny chunk.
//!
//! ## Flushing
//!
//! A flushed accumulation no longer than `target_size` becomes one chunk
//! attributed to every tracked block. Longer ones are cut into sentence
//! windows of about `target_size`, each seeded with the overlap of the
//! previous window and attributed to the blocks whose edges it contains.
//!
//! No window exceeds `max_size`. A sentence longer than that is cut to
//! `max_size` chars, and a seed that would push its window past the limit
//! is shortened to fit.

use tracing::{debug, warn};

use crate::attribution::attribute;
use crate::block::{ContentBlock, DocumentMetadata};
use crate::chunk::Chunk;
use crate::config::ChunkConfig;
use crate::overlap::overlap_suffix;
use crate::sentence::split_sentences;
use crate::text::{char_len, head, tail, trimmed_len};

/// Separator appended after every accumulated block.
const BLOCK_SEPARATOR: &str = "\n\n";
/// ASCII, so bytes and chars agree.
const SEPARATOR_LEN: usize = BLOCK_SEPARATOR.len();

/// State threaded through the block fold.
#[derive(Debug, Default)]
struct Accumulator<'b> {
    text: String,
    /// Char length of `text`.
    len: usize,
    blocks: Vec<&'b ContentBlock>,
    /// Document offset where `text` starts.
    offset: usize,
    chunks: Vec<Chunk>,
}

impl<'b> Accumulator<'b> {
    /// Replace the pending text with `text` plus separator.
    fn restart(&mut self, text: &str, block: &'b ContentBlock) {
        self.text.clear();
        self.text.push_str(text);
        self.text.push_str(BLOCK_SEPARATOR);
        self.len = char_len(text) + SEPARATOR_LEN;
        self.blocks.clear();
        self.blocks.push(block);
    }

    fn append(&mut self, text: &str, len: usize, block: &'b ContentBlock) {
        self.text.push_str(text);
        self.text.push_str(BLOCK_SEPARATOR);
        self.len += len + SEPARATOR_LEN;
        self.blocks.push(block);
    }

    fn clear(&mut self) {
        self.text.clear();
        self.len = 0;
        self.blocks.clear();
    }
}

/// One sentence window cut from an oversized span.
#[derive(Debug)]
struct Window {
    /// Untrimmed window text, overlap seed included.
    text: String,
    /// Char offset of the window relative to the span start.
    start: usize,
}

/// Folds a document's blocks into unnumbered chunks.
pub(crate) struct Assembler<'a> {
    config: &'a ChunkConfig,
    document: &'a DocumentMetadata,
}

impl<'a> Assembler<'a> {
    pub(crate) fn new(config: &'a ChunkConfig, document: &'a DocumentMetadata) -> Self {
        Self { config, document }
    }

    /// Produce chunks in document order. Numbering is left at zero.
    pub(crate) fn assemble(&self, blocks: &[ContentBlock]) -> Vec<Chunk> {
        let acc = blocks
            .iter()
            .fold(Accumulator::default(), |acc, block| self.push(acc, block));
        self.finish(acc)
    }

    fn push<'b>(&self, mut acc: Accumulator<'b>, block: &'b ContentBlock) -> Accumulator<'b> {
        if block.is_heading() {
            self.close(&mut acc);
            acc.restart(&block.text, block);
            return acc;
        }

        let text = block.text.trim();
        if text.is_empty() {
            return acc;
        }

        let len = char_len(text);
        if acc.len + len + SEPARATOR_LEN > self.config.max_size() {
            self.close(&mut acc);
            if len > self.config.max_size() {
                self.split_block(&mut acc, text, block);
                acc.offset += len;
                acc.clear();
            } else {
                acc.restart(text, block);
            }
        } else {
            acc.append(text, len, block);
        }
        acc
    }

    fn finish(&self, mut acc: Accumulator<'_>) -> Vec<Chunk> {
        self.close(&mut acc);
        acc.chunks
    }

    /// Flush the pending accumulation if it reaches `min_size`, else drop it.
    fn close(&self, acc: &mut Accumulator<'_>) {
        let kept = trimmed_len(&acc.text);
        if kept >= self.config.min_size() {
            self.flush(acc);
            acc.offset += acc.len;
        } else if kept > 0 {
            debug!(
                document_id = %self.document.document_id,
                chars = kept,
                min_size = self.config.min_size(),
                "merging short accumulation forward"
            );
        }
        acc.clear();
    }

    /// Emit the pending accumulation as one or more chunks.
    fn flush(&self, acc: &mut Accumulator<'_>) {
        let text = acc.text.trim();
        if text.is_empty() {
            return;
        }

        if char_len(text) <= self.config.target_size() {
            acc.chunks
                .push(Chunk::new(text.to_string(), &acc.blocks, self.document, acc.offset));
            return;
        }

        let windows = self.windows(text);
        debug!(
            document_id = %self.document.document_id,
            chars = acc.len,
            windows = windows.len(),
            "splitting accumulation"
        );
        for window in windows {
            let window_text = window.text.trim();
            if window_text.is_empty() {
                continue;
            }
            let contributing = attribute(window_text, &acc.blocks);
            acc.chunks.push(Chunk::new(
                window_text.to_string(),
                &contributing,
                self.document,
                acc.offset + window.start,
            ));
        }
    }

    /// Split a single block larger than `max_size` on its own.
    fn split_block<'b>(&self, acc: &mut Accumulator<'b>, text: &str, block: &'b ContentBlock) {
        let windows = self.windows(text);
        debug!(
            document_id = %self.document.document_id,
            position = block.position,
            windows = windows.len(),
            "splitting oversized block"
        );
        for window in windows {
            let window_text = window.text.trim();
            if window_text.is_empty() {
                continue;
            }
            acc.chunks.push(Chunk::new(
                window_text.to_string(),
                &[block],
                self.document,
                acc.offset + window.start,
            ));
        }
    }

    /// Cut `text` into overlapping sentence windows of about `target_size`.
    ///
    /// A window starts when adding the next sentence would pass the target.
    /// Each new window begins with the overlap of the previous one, and its
    /// start advances by the previous window's length minus that overlap.
    /// Sentences and seeds are shortened so no window passes `max_size`.
    fn windows(&self, text: &str) -> Vec<Window> {
        let target = self.config.target_size();
        let cap = self.config.max_size();
        let mut windows = Vec::new();
        let mut buf = String::new();
        let mut buf_len = 0;
        let mut start = 0;

        for sentence in split_sentences(text) {
            let len = char_len(sentence);
            if buf_len + len <= target {
                buf.push_str(sentence);
                buf_len += len;
                continue;
            }

            let sentence = self.cap_sentence(sentence, len, cap);
            let len = char_len(sentence);
            if buf.is_empty() {
                buf.push_str(sentence);
                buf_len = len;
                continue;
            }

            let seed = overlap_suffix(&buf, self.config.overlap());
            let seed = tail(seed, cap - len).to_string();
            let seed_len = char_len(&seed);
            windows.push(Window {
                text: std::mem::replace(&mut buf, seed),
                start,
            });
            start += buf_len - seed_len;
            buf.push_str(sentence);
            buf_len = seed_len + len;
        }

        if !buf.trim().is_empty() {
            windows.push(Window { text: buf, start });
        }
        windows
    }

    /// The first `cap` chars of `sentence`, which is `len` chars long.
    fn cap_sentence<'s>(&self, sentence: &'s str, len: usize, cap: usize) -> &'s str {
        if len <= cap {
            return sentence;
        }
        warn!(
            document_id = %self.document.document_id,
            chars = len,
            kept = cap,
            "truncating oversized sentence"
        );
        head(sentence, cap)
    }
}
