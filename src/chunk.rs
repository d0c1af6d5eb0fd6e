//! Batching of block appends.
//!
//! Pages with long bodies need several append calls; each batch stays under
//! [`MAX_CHILDREN_PER_APPEND`].

use crate::notion::{Block, NotionApi, NotionError, MAX_CHILDREN_PER_APPEND};

/// Batch size used for page bodies, leaving headroom under the hard limit.
pub const DEFAULT_CHUNK_SIZE: usize = 90;

/// Split blocks into ordered batches of at most `size` (clamped to the API limit).
pub fn chunk(blocks: Vec<Block>, size: usize) -> Vec<Vec<Block>> {
    let size = size.clamp(1, MAX_CHILDREN_PER_APPEND);
    let mut batches = Vec::with_capacity(blocks.len().div_ceil(size));
    let mut current = Vec::with_capacity(size.min(blocks.len()));

    for block in blocks {
        current.push(block);
        if current.len() >= size {
            batches.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        batches.push(current);
    }

    batches
}

/// Append `blocks` to `page_id` batch by batch, stopping at the first failure.
///
/// Returns the number of append calls made.
pub fn append_in_chunks(
    api: &dyn NotionApi,
    page_id: &str,
    blocks: Vec<Block>,
    size: usize,
) -> Result<usize, NotionError> {
    let batches = chunk(blocks, size);
    let total = batches.len();

    for (index, batch) in batches.iter().enumerate() {
        tracing::debug!(page_id, batch = index + 1, total, blocks = batch.len(), "appending batch");
        api.append_children(page_id, batch)?;
    }

    Ok(total)
}
