//! Error types for the analysis pipeline.
//!
//! Fatal conditions carry the inputs that caused them so the job caller can
//! report the originating condition by name. Transient completion failures
//! are classified here and retried by the dispatch layer.

use thiserror::Error;

/// Fatal pipeline failures. Each aborts the job that raised it.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(
        "instruction payload ({instruction_tokens} tokens) and response reserve \
         ({response_reserve} tokens) leave no room for content in a \
         {context_window}-token window"
    )]
    BudgetExhausted {
        instruction_tokens: usize,
        response_reserve: usize,
        context_window: usize,
    },

    #[error("no request unit passed the context-window size check")]
    NoValidUnits,

    #[error("none of the {responses} analysis responses could be parsed")]
    NoReconcilableData { responses: usize },
}

/// Failures from the completion service. Transient ones are retried.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("rate limited by the completion service")]
    RateLimited,

    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("malformed completion response: {0}")]
    MalformedResponse(String),
}

impl CompletionError {
    /// Whether a retry has a chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            CompletionError::RateLimited
            | CompletionError::Timeout
            | CompletionError::Network(_) => true,
            CompletionError::Api { status, .. } => *status >= 500,
            CompletionError::MalformedResponse(_) => false,
        }
    }
}
