//! Hierarchical content chunking.
//!
//! Splits a content body into an ordered sequence of chunks that each stay
//! within the token budget, falling back from paragraph to sentence to word
//! granularity when a unit is too large on its own. Output order follows
//! document order with no overlap and no content loss. The one documented
//! exception to the budget bound is a single word larger than the whole
//! budget, which is emitted oversized rather than truncated.

mod accumulator;
mod splitter;


use crate::tokens::TokenCount;
use crate::types::{Chunk, ContentBody};

use accumulator::ChunkAccumulator;
use splitter::explode;

/// Pure function to split content into budget-bounded chunks.
pub fn chunk_content(body: &ContentBody, budget: usize, counter: &dyn TokenCount) -> Vec<Chunk> {
    let pieces = explode(body, budget, counter);
    let mut accumulator = ChunkAccumulator::new(counter.count("\n\n"));
    for piece in pieces {
        accumulator.handle_piece(piece, budget);
    }
    accumulator.finish_chunk();
    accumulator.into_chunks()
}
