//! Core types for the docpod content-analysis pipeline

use serde::{Deserialize, Serialize};

/// Document text as an ordered sequence of paragraphs.
///
/// A paragraph is a maximal run of text between blank-line separators.
#[derive(Debug, Clone)]
pub struct ContentBody {
    pub paragraphs: Vec<String>,
}

impl ContentBody {
    /// Split raw text into paragraphs at blank-line separators.
    pub fn from_text(text: &str) -> Self {
        let paragraphs = text
            .split("\n\n")
            .map(str::trim)
            .filter(|paragraph| !paragraph.is_empty())
            .map(str::to_string)
            .collect();
        Self { paragraphs }
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }
}

/// A budget-bounded slice of the content, dispatched as one request.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Text pieces in document order. A piece is a whole paragraph, or a
    /// sentence/word run when the paragraph had to be split to fit.
    pub pieces: Vec<String>,
    /// Upper bound on the token count of the rendered chunk text.
    pub token_count: usize,
}

impl Chunk {
    /// Render the chunk the way it is dispatched: pieces separated by blank lines.
    pub fn text(&self) -> String {
        self.pieces.join("\n\n")
    }
}

/// One dispatchable request: the fixed instruction plus a rendered chunk.
#[derive(Debug, Clone)]
pub struct RequestUnit {
    pub instruction: String,
    pub content: String,
    /// Exact prompt size including chat-format overhead, recomputed at
    /// preparation time.
    pub prompt_tokens: usize,
}

/// Structured output of a single analysis request, before reconciliation.
#[derive(Debug, Clone, Deserialize)]
pub struct PartialAnalysis {
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
    /// Some responses name this list `suggested_segments`; both spellings
    /// feed the same logical field.
    #[serde(default, alias = "suggested_segments")]
    pub segments: Vec<String>,
    #[serde(default)]
    pub technical_terms: Vec<TermEntry>,
    #[serde(default)]
    pub discussion_points: Vec<String>,
}

/// A technical term with its explanation. Deduplicated by `term` during
/// reconciliation; the first occurrence keeps its definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermEntry {
    pub term: String,
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// The merged analysis for one job, combined from every partial that parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciledAnalysis {
    pub format: Option<String>,
    pub reasoning: String,
    pub segments: Vec<String>,
    pub technical_terms: Vec<TermEntry>,
    pub discussion_points: Vec<String>,
}
