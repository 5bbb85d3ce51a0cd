//! End-to-end chunking properties using the real BPE counter.

use docpod::budget::{compute_budget, BudgetParams};
use docpod::chunking::chunk_content;
use docpod::tokens::{TokenCount, TokenCounter};
use docpod::types::ContentBody;

fn counter() -> TokenCounter {
    TokenCounter::for_model("gpt-4o-mini").expect("counter should initialize")
}

fn sample_document() -> String {
    let mut text = String::new();
    for i in 0..12 {
        text.push_str(&format!(
            "Paragraph number {i} talks about audio pipelines. It has several \
             sentences in it. Each sentence mentions chunking, budgets, or \
             reconciliation so the text stays varied.\n\n"
        ));
    }
    text
}

fn normalized_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

#[test]
fn chunks_cover_the_document_in_order() {
    let counter = counter();
    let body = ContentBody::from_text(&sample_document());

    let chunks = chunk_content(&body, 60, &counter);
    assert!(chunks.len() > 1);

    let rejoined: Vec<String> = chunks
        .iter()
        .flat_map(|chunk| normalized_words(&chunk.text()))
        .collect();
    let original: Vec<String> = body
        .paragraphs
        .iter()
        .flat_map(|p| normalized_words(p))
        .collect();
    assert_eq!(rejoined, original);
}

#[test]
fn every_chunk_stays_within_budget() {
    let counter = counter();
    let body = ContentBody::from_text(&sample_document());
    let budget = 60;

    for chunk in chunk_content(&body, budget, &counter) {
        let actual = counter.count(&chunk.text());
        assert!(
            actual <= budget,
            "chunk of {actual} tokens exceeds budget {budget}"
        );
        assert!(actual <= chunk.token_count);
    }
}

#[test]
fn budget_and_chunker_compose() {
    let counter = counter();
    let instruction = "Analyze the following content and answer as JSON.";
    let params = BudgetParams {
        context_window: 300,
        response_reserve: 100,
        safety_margin: 0.1,
    };
    let budget = compute_budget(instruction, &params, &counter).unwrap();
    assert!(budget < params.context_window - counter.count(instruction));

    let body = ContentBody::from_text(&sample_document());
    for chunk in chunk_content(&body, budget, &counter) {
        assert!(counter.count(&chunk.text()) <= budget);
    }
}

#[test]
fn document_without_paragraph_breaks_still_chunks() {
    let counter = counter();
    // One giant paragraph made of many sentences.
    let text = "The service reads documents. It splits them into parts. "
        .repeat(40)
        .trim_end()
        .to_string();
    let body = ContentBody::from_text(&text);
    assert_eq!(body.len(), 1);

    let budget = 40;
    let chunks = chunk_content(&body, budget, &counter);
    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(counter.count(&chunk.text()) <= budget);
    }
}

#[test]
fn single_unbreakable_word_is_emitted_oversized() {
    let counter = counter();
    let giant = "x".repeat(400);
    let body = ContentBody::from_text(&giant);

    let budget = 10;
    assert!(counter.count(&giant) > budget);

    let chunks = chunk_content(&body, budget, &counter);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text(), giant);
    assert!(chunks[0].token_count > budget);
}

#[test]
fn small_document_fits_one_chunk() {
    let counter = counter();
    let body = ContentBody::from_text("A short note.\n\nWith two paragraphs.");

    let chunks = chunk_content(&body, 1000, &counter);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].pieces.len(), 2);
}
