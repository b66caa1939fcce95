//! Final numbering pass.

use crate::chunk::Chunk;

/// Number chunks in output order.
///
/// Sets `chunk_index` to each chunk's position and `total_chunks` to the
/// list length. This is the only step that needs the complete list.
#[must_use]
pub fn stamp(chunks: Vec<Chunk>) -> Vec<Chunk> {
    let total_chunks = chunks.len();
    chunks
        .into_iter()
        .enumerate()
        .map(|(chunk_index, chunk)| Chunk {
            chunk_index,
            total_chunks,
            ..chunk
        })
        .collect()
}
