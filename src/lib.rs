//! docpod - bounded-budget content segmentation and multi-part response
//! reconciliation for turning documents into podcast analysis plans.
//!
//! The pipeline: a document body is split into token-budgeted chunks, each
//! chunk is dispatched to a completion service as one structured-analysis
//! request, and the partial responses are reconciled into a single merged
//! analysis while a ledger tracks token usage and cost.

pub mod budget;
pub mod chunking;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod prompts;
pub mod reconcile;
pub mod tokens;
pub mod types;
pub mod usage;
