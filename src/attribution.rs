//! Mapping a finished chunk back to the blocks it came from.
//!
//! When an accumulation is split into several windows, each window only
//! contains some of the blocks tracked during accumulation. A block counts
//! as contributing when its first or last [`PROBE_CHARS`] characters occur
//! verbatim in the chunk text.
//!
//! This is approximate by construction. Blocks shorter than the probe are
//! matched on their whole text, and a block whose middle alone lands in a
//! window is missed. Callers only rely on the first contributing block for
//! page, section and type metadata, so exact recall is not needed.

use crate::block::ContentBlock;
use crate::text::{head, tail};

/// Characters taken from each end of a block when probing a chunk.
pub const PROBE_CHARS: usize = 50;

/// Blocks among `tracked` that contributed to `chunk_text`, in tracked order.
///
/// Falls back to the earliest tracked block when nothing matches (overlap
/// seeding can shift a window so that no block edge is inside it). Returns
/// an empty list only when `tracked` is empty.
pub fn attribute<'b>(chunk_text: &str, tracked: &[&'b ContentBlock]) -> Vec<&'b ContentBlock> {
    let contributing: Vec<&ContentBlock> = tracked
        .iter()
        .copied()
        .filter(|block| {
            chunk_text.contains(head(&block.text, PROBE_CHARS))
                || chunk_text.contains(tail(&block.text, PROBE_CHARS))
        })
        .collect();

    if contributing.is_empty() {
        tracked.iter().copied().take(1).collect()
    } else {
        contributing
    }
}
