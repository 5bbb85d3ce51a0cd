//! Token usage ledger.
//!
//! Process-wide, append-only record of token counts and cost for every
//! dispatched request. Created once at startup and passed by reference to
//! the dispatch loop; `report()` is a pure read over the full history, so
//! costs accumulate across jobs until the process exits.

mod pricing;

pub use pricing::{pricing_for, ModelPricing};

use std::sync::Mutex;

use tracing::debug;

/// Token counts and computed cost for one dispatched request.
#[derive(Debug, Clone, Copy)]
pub struct UsageRecord {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
    pub cost: f64,
}

/// Aggregate view over the full request history.
#[derive(Debug, Clone)]
pub struct UsageReport {
    pub model: String,
    pub requests: usize,
    pub total_prompt_tokens: usize,
    pub total_completion_tokens: usize,
    pub total_tokens: usize,
    pub total_cost: f64,
    pub average_tokens_per_request: f64,
}

/// Append-only usage history. Appends are atomic with respect to concurrent
/// callers; nothing else in the crate is shared across threads.
pub struct UsageLedger {
    model: String,
    pricing: ModelPricing,
    records: Mutex<Vec<UsageRecord>>,
}

impl UsageLedger {
    pub fn new(model: impl Into<String>) -> Self {
        let model = model.into();
        let pricing = pricing_for(&model);
        Self {
            model,
            pricing,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Append one request's usage. Cost comes from the model's price tier.
    pub fn record(&self, prompt_tokens: usize, completion_tokens: usize) -> UsageRecord {
        let record = UsageRecord {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
            cost: self.pricing.cost(prompt_tokens, completion_tokens),
        };
        self.records.lock().unwrap().push(record);
        debug!(
            prompt_tokens,
            completion_tokens,
            cost = record.cost,
            "recorded request usage"
        );
        record
    }

    /// Aggregate the full history at call time.
    pub fn report(&self) -> UsageReport {
        let records = self.records.lock().unwrap();
        let requests = records.len();
        let total_prompt_tokens: usize = records.iter().map(|r| r.prompt_tokens).sum();
        let total_completion_tokens: usize = records.iter().map(|r| r.completion_tokens).sum();
        let total_tokens = total_prompt_tokens + total_completion_tokens;
        let total_cost: f64 = records.iter().map(|r| r.cost).sum();
        let average_tokens_per_request = if requests == 0 {
            0.0
        } else {
            total_tokens as f64 / requests as f64
        };

        UsageReport {
            model: self.model.clone(),
            requests,
            total_prompt_tokens,
            total_completion_tokens,
            total_tokens,
            total_cost,
            average_tokens_per_request,
        }
    }
}
