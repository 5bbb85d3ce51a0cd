//! Budget calculation for request content.
//!
//! Works out how many tokens of document content fit in one request after
//! the instruction payload, the response reserve, and a safety margin have
//! claimed their share of the context window. Checked once per job, before
//! any chunking happens.

use crate::error::PipelineError;
use crate::tokens::TokenCount;

/// Tokens held back for the model's response.
pub const DEFAULT_RESPONSE_RESERVE: usize = 4_000;

/// Fraction of the remaining window withheld against estimation drift.
pub const DEFAULT_SAFETY_MARGIN: f64 = 0.1;

/// Sizing inputs for one job.
#[derive(Debug, Clone, Copy)]
pub struct BudgetParams {
    pub context_window: usize,
    pub response_reserve: usize,
    pub safety_margin: f64,
}

impl BudgetParams {
    pub fn new(context_window: usize) -> Self {
        Self {
            context_window,
            response_reserve: DEFAULT_RESPONSE_RESERVE,
            safety_margin: DEFAULT_SAFETY_MARGIN,
        }
    }
}

/// Compute the per-request content budget in tokens.
///
/// Fails with `BudgetExhausted` when the instruction payload and response
/// reserve leave nothing for content.
pub fn compute_budget(
    instruction: &str,
    params: &BudgetParams,
    counter: &dyn TokenCount,
) -> Result<usize, PipelineError> {
    let instruction_tokens = counter.count(instruction);
    let reserved = instruction_tokens + params.response_reserve;
    if reserved >= params.context_window {
        return Err(PipelineError::BudgetExhausted {
            instruction_tokens,
            response_reserve: params.response_reserve,
            context_window: params.context_window,
        });
    }

    let available = params.context_window - reserved;
    Ok((available as f64 * (1.0 - params.safety_margin)).floor() as usize)
}
