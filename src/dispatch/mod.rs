//! Request preparation and sequential dispatch.
//!
//! `prepare_units` pairs each chunk with the instruction payload and
//! re-verifies the unit's exact size against the context window, independent
//! of the budget calculator's estimate. `dispatch_units` then sends the
//! surviving units one at a time, in order; reconciliation precedence
//! depends on that ordering, so there is no parallel dispatch.

mod client;
mod retry;

pub use client::{CompletionClient, CompletionResponse, CompletionUsage, OpenAiClient};
pub use retry::RetryPolicy;

use tracing::{debug, warn};

use crate::error::PipelineError;
use crate::tokens::TokenCount;
use crate::types::{Chunk, RequestUnit};
use crate::usage::UsageLedger;

/// Default fraction of the context window a prepared unit may occupy.
/// Stricter than the budget calculator's estimate; the second line of
/// defense against drift between the two size checks.
pub const HARD_SAFETY_FRACTION: f64 = 0.95;

/// Fixed chat-format overhead: four tokens per message for the role framing,
/// two for the reply primer.
const MESSAGE_OVERHEAD_TOKENS: usize = 4 * 2 + 2;

/// Build one verified request unit per chunk, dropping any whose exact size
/// exceeds `context_window * hard_safety_fraction`. Fails when nothing
/// survives.
pub fn prepare_units(
    chunks: &[Chunk],
    instruction: &str,
    context_window: usize,
    hard_safety_fraction: f64,
    counter: &dyn TokenCount,
) -> Result<Vec<RequestUnit>, PipelineError> {
    let limit = (context_window as f64 * hard_safety_fraction).floor() as usize;
    let instruction_tokens = counter.count(instruction);

    let mut units = Vec::with_capacity(chunks.len());
    for (index, chunk) in chunks.iter().enumerate() {
        let content = chunk.text();
        let prompt_tokens =
            instruction_tokens + counter.count(&content) + MESSAGE_OVERHEAD_TOKENS;
        if prompt_tokens > limit {
            warn!(
                unit = index + 1,
                prompt_tokens, limit, "dropping request unit over the context window limit"
            );
            continue;
        }
        units.push(RequestUnit {
            instruction: instruction.to_string(),
            content,
            prompt_tokens,
        });
    }

    if units.is_empty() {
        return Err(PipelineError::NoValidUnits);
    }
    Ok(units)
}

/// Dispatch every unit in order, recording usage after each completion.
///
/// A unit whose retries are exhausted is dropped with a warning; the job
/// continues with the responses that did arrive. Returns the raw response
/// texts in dispatch order.
pub fn dispatch_units(
    units: &[RequestUnit],
    client: &dyn CompletionClient,
    retry: &RetryPolicy,
    ledger: &UsageLedger,
    counter: &dyn TokenCount,
) -> Vec<String> {
    let mut responses = Vec::with_capacity(units.len());

    for (index, unit) in units.iter().enumerate() {
        debug!(
            unit = index + 1,
            total = units.len(),
            prompt_tokens = unit.prompt_tokens,
            "dispatching request unit"
        );
        match retry.run(|| client.complete(&unit.instruction, &unit.content)) {
            Ok(response) => {
                // Prefer the service's own accounting; fall back to the
                // prepared prompt count and a canonical count of the reply.
                let (prompt_tokens, completion_tokens) = match response.usage {
                    Some(usage) => (usage.prompt_tokens, usage.completion_tokens),
                    None => (unit.prompt_tokens, counter.count(&response.content)),
                };
                ledger.record(prompt_tokens, completion_tokens);
                responses.push(response.content);
            }
            Err(err) => {
                warn!(
                    unit = index + 1,
                    error = %err,
                    "dropping request unit after failed dispatch"
                );
            }
        }
    }

    responses
}
