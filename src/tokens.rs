//! Canonical token counting.
//!
//! Every component that measures size (budgeting, chunking, batch
//! preparation, usage fallback counting) goes through one shared counter so
//! all of them agree on what a token is.

use anyhow::{Context, Result};

/// Deterministic token counting for a model family.
pub trait TokenCount {
    fn count(&self, text: &str) -> usize;
}

/// Token counter backed by the model's tiktoken BPE encoding.
/// Falls back to cl100k_base when the model isn't recognized.
pub struct TokenCounter {
    bpe: tiktoken_rs::CoreBPE,
}

impl TokenCounter {
    pub fn for_model(model: &str) -> Result<Self> {
        let bpe = match tiktoken_rs::get_bpe_from_model(model) {
            Ok(bpe) => bpe,
            Err(_) => tiktoken_rs::cl100k_base()
                .context("failed to load fallback cl100k_base encoding")?,
        };
        Ok(Self { bpe })
    }
}

impl TokenCount for TokenCounter {
    fn count(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }
}
