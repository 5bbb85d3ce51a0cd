//! Response reconciliation.
//!
//! Merges the per-chunk analysis responses of one job into a single result.
//! The merge order is fixed, one strategy per field: scalar fields come from
//! the first partial that parsed, list fields are concatenated in partial
//! order and deduplicated keeping the first occurrence. A response that
//! fails to parse is skipped, not fatal; only zero parseable responses
//! aborts the job.

use std::collections::HashSet;

use tracing::warn;

use crate::error::PipelineError;
use crate::types::{PartialAnalysis, ReconciledAnalysis, TermEntry};

/// Merge raw response texts into one reconciled analysis.
pub fn reconcile(raw_responses: &[String]) -> Result<ReconciledAnalysis, PipelineError> {
    let partials: Vec<PartialAnalysis> = raw_responses
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| match serde_json::from_str(raw) {
            Ok(partial) => Some(partial),
            Err(err) => {
                warn!(
                    response = index + 1,
                    error = %err,
                    "skipping unparseable analysis response"
                );
                None
            }
        })
        .collect();

    let Some(first) = partials.first() else {
        return Err(PipelineError::NoReconcilableData {
            responses: raw_responses.len(),
        });
    };

    // Scalars: first parsed partial wins, later values are ignored.
    let format = first.format.clone();
    let reasoning = first.reasoning.clone().unwrap_or_default();

    let mut segments = Vec::new();
    let mut technical_terms = Vec::new();
    let mut discussion_points = Vec::new();
    for partial in &partials {
        segments.extend(partial.segments.iter().cloned());
        technical_terms.extend(partial.technical_terms.iter().cloned());
        discussion_points.extend(partial.discussion_points.iter().cloned());
    }

    Ok(ReconciledAnalysis {
        format,
        reasoning,
        segments: dedup_keeping_order(segments),
        technical_terms: dedup_terms_by_name(technical_terms),
        discussion_points: dedup_keeping_order(discussion_points),
    })
}

fn dedup_keeping_order(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

/// Entries sharing a term name collapse to the first occurrence, keeping its
/// definition even when later definitions differ.
fn dedup_terms_by_name(entries: Vec<TermEntry>) -> Vec<TermEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.term.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn first_parsed_partial_wins_scalars() {
        let responses = raw(&[
            r#"{"format": "host_expert", "reasoning": "one voice suits it"}"#,
            r#"{"format": "panel", "reasoning": "many voices"}"#,
        ]);
        let merged = reconcile(&responses).unwrap();
        assert_eq!(merged.format.as_deref(), Some("host_expert"));
        assert_eq!(merged.reasoning, "one voice suits it");
    }

    #[test]
    fn unparseable_partials_are_skipped_not_fatal() {
        let responses = raw(&[
            "not json at all",
            r#"{"format": "panel", "segments": ["a"]}"#,
        ]);
        let merged = reconcile(&responses).unwrap();
        assert_eq!(merged.format.as_deref(), Some("panel"));
        assert_eq!(merged.segments, vec!["a"]);
    }

    #[test]
    fn all_unparseable_fails_with_no_reconcilable_data() {
        let responses = raw(&["{", "also broken"]);
        let err = reconcile(&responses).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::NoReconcilableData { responses: 2 }
        ));
    }

    #[test]
    fn single_partial_reconciles_to_itself() {
        let responses = raw(&[r#"{
            "format": "two_experts",
            "reasoning": "contrasting views",
            "segments": ["intro", "core", "intro"],
            "discussion_points": ["why now?"]
        }"#]);
        let merged = reconcile(&responses).unwrap();
        assert_eq!(merged.format.as_deref(), Some("two_experts"));
        assert_eq!(merged.segments, vec!["intro", "core"]);
        assert_eq!(merged.discussion_points, vec!["why now?"]);
    }

    #[test]
    fn term_entries_dedupe_by_name_keeping_first_definition() {
        let responses = raw(&[
            r#"{"technical_terms": [{"term": "RAG", "definition": "retrieval augmented generation"}]}"#,
            r#"{"technical_terms": [{"term": "RAG", "definition": "a different definition"},
                                     {"term": "BPE", "definition": "byte pair encoding"}]}"#,
        ]);
        let merged = reconcile(&responses).unwrap();
        assert_eq!(merged.technical_terms.len(), 2);
        assert_eq!(merged.technical_terms[0].term, "RAG");
        assert_eq!(
            merged.technical_terms[0].definition,
            "retrieval augmented generation"
        );
        assert_eq!(merged.technical_terms[1].term, "BPE");
    }

    #[test]
    fn alternate_segment_key_merges_into_the_same_list() {
        let responses = raw(&[
            r#"{"segments": ["overview"]}"#,
            r#"{"suggested_segments": ["overview", "details"]}"#,
        ]);
        let merged = reconcile(&responses).unwrap();
        assert_eq!(merged.segments, vec!["overview", "details"]);
    }

    #[test]
    fn list_order_follows_partial_order() {
        let responses = raw(&[
            r#"{"discussion_points": ["b", "a"]}"#,
            r#"{"discussion_points": ["c", "a"]}"#,
        ]);
        let merged = reconcile(&responses).unwrap();
        assert_eq!(merged.discussion_points, vec!["b", "a", "c"]);
    }

    #[test]
    fn missing_scalars_in_the_first_partial_stay_empty() {
        let responses = raw(&[
            r#"{"segments": ["x"]}"#,
            r#"{"format": "panel", "reasoning": "late arrival"}"#,
        ]);
        let merged = reconcile(&responses).unwrap();
        // The first parsed partial had no scalars; later ones don't fill in.
        assert!(merged.format.is_none());
        assert_eq!(merged.reasoning, "");
    }
}
