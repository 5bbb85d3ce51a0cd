use tracing::warn;

use crate::tokens::TokenCount;
use crate::types::ContentBody;

/// A budget-sized unit of text ready for accumulation.
#[derive(Debug, Clone)]
pub(super) struct Piece {
    pub(super) text: String,
    pub(super) tokens: usize,
}

/// Explode paragraphs into pieces that each fit the budget.
///
/// Fallback cascade: a paragraph that fits is kept whole; one that doesn't
/// is split into sentences; a sentence that still doesn't fit is split into
/// word runs. A single word larger than the whole budget is emitted as its
/// own oversized piece so the cascade always makes forward progress.
pub(super) fn explode(
    body: &ContentBody,
    budget: usize,
    counter: &dyn TokenCount,
) -> Vec<Piece> {
    let mut pieces = Vec::new();

    for paragraph in &body.paragraphs {
        let tokens = counter.count(paragraph);
        if tokens <= budget {
            pieces.push(Piece {
                text: paragraph.clone(),
                tokens,
            });
            continue;
        }

        for sentence in split_sentences(paragraph) {
            let tokens = counter.count(&sentence);
            if tokens <= budget {
                pieces.push(Piece {
                    text: sentence,
                    tokens,
                });
            } else {
                split_word_runs(&sentence, budget, counter, &mut pieces);
            }
        }
    }

    pieces
}

/// Split a paragraph at sentence terminators, keeping the terminator with
/// its sentence. Runs of terminators ("...", "?!") stay together.
pub(super) fn split_sentences(paragraph: &str) -> Vec<String> {
    let bytes = paragraph.as_bytes();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if matches!(bytes[i], b'.' | b'!' | b'?') {
            while i + 1 < bytes.len() && matches!(bytes[i + 1], b'.' | b'!' | b'?') {
                i += 1;
            }
            let at_break = bytes
                .get(i + 1)
                .map_or(true, |next| next.is_ascii_whitespace());
            if at_break {
                let sentence = paragraph[start..=i].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence.to_string());
                }
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                start = i;
                continue;
            }
        }
        i += 1;
    }

    if start < paragraph.len() {
        let tail = paragraph[start..].trim();
        if !tail.is_empty() {
            sentences.push(tail.to_string());
        }
    }

    sentences
}

/// Greedily pack a sentence's words into budget-sized pieces.
fn split_word_runs(
    sentence: &str,
    budget: usize,
    counter: &dyn TokenCount,
    pieces: &mut Vec<Piece>,
) {
    let mut run = String::new();
    let mut run_tokens = 0usize;

    for word in sentence.split_whitespace() {
        let word_alone = counter.count(word);
        if word_alone > budget {
            // Pathological case: a single word that can never fit. It goes
            // out as its own oversized piece; callers must expect it.
            flush_run(&mut run, &mut run_tokens, counter, pieces);
            warn!(
                tokens = word_alone,
                budget, "single word exceeds the chunk budget, emitting oversized"
            );
            pieces.push(Piece {
                text: word.to_string(),
                tokens: word_alone,
            });
            continue;
        }

        let cost = if run.is_empty() {
            word_alone
        } else {
            counter.count(&format!(" {word}"))
        };
        if !run.is_empty() && run_tokens + cost > budget {
            flush_run(&mut run, &mut run_tokens, counter, pieces);
            run.push_str(word);
            run_tokens = word_alone;
        } else {
            if !run.is_empty() {
                run.push(' ');
            }
            run.push_str(word);
            run_tokens += cost;
        }
    }

    flush_run(&mut run, &mut run_tokens, counter, pieces);
}

fn flush_run(
    run: &mut String,
    run_tokens: &mut usize,
    counter: &dyn TokenCount,
    pieces: &mut Vec<Piece>,
) {
    if run.is_empty() {
        return;
    }
    // Recount the joined run so the piece carries an exact size.
    let tokens = counter.count(run);
    pieces.push(Piece {
        text: std::mem::take(run),
        tokens,
    });
    *run_tokens = 0;
}
