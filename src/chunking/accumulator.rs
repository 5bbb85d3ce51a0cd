use crate::types::Chunk;

use super::splitter::Piece;

/// Greedy accumulator that packs pieces into budget-bounded chunks.
pub(super) struct ChunkAccumulator {
    chunks: Vec<Chunk>,
    current: Vec<String>,
    current_tokens: usize,
    /// Token cost of the blank-line separator between pieces, charged at
    /// every joint so the rendered chunk stays within budget.
    joint_cost: usize,
}

impl ChunkAccumulator {
    pub(super) fn new(joint_cost: usize) -> Self {
        Self {
            chunks: Vec::new(),
            current: Vec::new(),
            current_tokens: 0,
            joint_cost,
        }
    }

    pub(super) fn handle_piece(&mut self, piece: Piece, budget: usize) {
        let mut cost = if self.current.is_empty() {
            piece.tokens
        } else {
            piece.tokens + self.joint_cost
        };

        if !self.current.is_empty() && self.current_tokens + cost > budget {
            self.finish_chunk();
            cost = piece.tokens;
        }

        self.current.push(piece.text);
        self.current_tokens += cost;
    }

    pub(super) fn finish_chunk(&mut self) {
        if self.current.is_empty() {
            return;
        }
        self.chunks.push(Chunk {
            pieces: std::mem::take(&mut self.current),
            token_count: self.current_tokens,
        });
        self.current_tokens = 0;
    }

    pub(super) fn into_chunks(self) -> Vec<Chunk> {
        self.chunks
    }
}
