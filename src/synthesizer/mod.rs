// Answer synthesizer module
// Composes the final answer from retrieved context, with generation when
// available and rule-based composition otherwise


use chrono::Utc;
use itertools::Itertools;
use tracing::{debug, warn};

use crate::fallback::{self, InfoHints};
use crate::generation::GenerationClient;
use crate::index::RetrievedChunk;

/// At most this many retrieved contexts are passed to the generation prompt,
/// even when top-K retrieval returned more.
const PROMPT_CONTEXT_LIMIT: usize = 5;

/// Supporting sentences appended after the opening sentence of a rule-based
/// answer are drawn from the next this-many candidates.
const SUPPORTING_CANDIDATES: usize = 5;

const CLOSING_SENTENCE: &str =
    " If you need more specific information, feel free to ask or contact the admissions office.";

/// Final result of a query: answer text, contributing source tags, and a
/// generation timestamp.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Answer {
    pub answer: String,
    pub sources: Vec<String>,
    pub timestamp: String,
}

/// Produces a natural-language answer from a question and retrieved chunks.
/// Never fails: generation errors degrade to rule-based composition, and a
/// composition with no matching sentences degrades to the fallback table.
pub struct AnswerSynthesizer {
    generation: GenerationClient,
}

impl AnswerSynthesizer {
    #[inline]
    pub fn new(generation: GenerationClient) -> Self {
        Self { generation }
    }

    /// Compose an answer for the question from the retrieved contexts.
    #[inline]
    pub fn synthesize(&self, question: &str, contexts: &[RetrievedChunk]) -> Answer {
        let sources = contributing_sources(contexts);
        let answer = self.answer_text(question, contexts);

        Answer {
            answer,
            sources,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    fn answer_text(&self, question: &str, contexts: &[RetrievedChunk]) -> String {
        if contexts.is_empty() {
            debug!("No contexts retrieved, delegating to fallback");
            return fallback::respond(question, &InfoHints::new());
        }

        if self.generation.is_configured() {
            let prompt = build_prompt(question, contexts);
            match self.generation.generate(&prompt) {
                Ok(text) => return text,
                Err(e) => {
                    warn!("Generation failed, composing locally: {:#}", e);
                }
            }
        } else {
            debug!("Generation service unconfigured, composing locally");
        }

        match compose_from_contexts(question, contexts) {
            Some(text) => text,
            None => {
                debug!("No context sentence matched the question, delegating to fallback");
                fallback::respond(question, &extract_hints(contexts))
            }
        }
    }
}

/// Structured prompt: persona block, top contexts, verbatim question.
fn build_prompt(question: &str, contexts: &[RetrievedChunk]) -> String {
    let context_text = contexts
        .iter()
        .take(PROMPT_CONTEXT_LIMIT)
        .map(|c| c.text.as_str())
        .join("\n\n");

    format!(
        "You are a friendly and knowledgeable AI assistant for Manipal Institute \
of Technology (MIT), Manipal.\n\
You provide detailed, accurate, and helpful answers about the college.\n\
\n\
CONTEXT INFORMATION:\n\
{context_text}\n\
\n\
USER QUESTION: {question}\n\
\n\
INSTRUCTIONS:\n\
1. Answer the question naturally and conversationally\n\
2. Use the context information provided above to give accurate, detailed answers\n\
3. Structure your answer clearly with proper paragraphs\n\
4. If the context doesn't fully answer the question, provide the best answer \
you can and mention that they can contact the college for more details\n\
5. Format numbers, fees, and important details clearly\n\
6. If asked about something not in the context, politely say you don't have \
that specific information but offer to help with related topics\n\
\n\
ANSWER:"
    )
}

/// Keep every context sentence sharing a word with the question, deduplicate,
/// and join the first survivor with up to five supporting sentences. `None`
/// when no sentence matches.
fn compose_from_contexts(question: &str, contexts: &[RetrievedChunk]) -> Option<String> {
    let question_words = fallback::word_set(question);

    let relevant: Vec<String> = contexts
        .iter()
        .flat_map(|ctx| ctx.text.split(". "))
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .filter(|sentence| {
            let sentence_words = fallback::word_set(sentence);
            question_words.iter().any(|qw| sentence_words.contains(qw))
        })
        .map(str::to_string)
        .unique()
        .collect();

    let opening = relevant.first()?;

    let mut parts = vec![opening.clone()];
    for sentence in relevant.iter().skip(1).take(SUPPORTING_CANDIDATES) {
        if sentence != opening && sentence.len() > 20 {
            parts.push(sentence.clone());
        }
    }

    let used_supporting = parts.len() > 1;
    let mut answer = parts.join(". ");

    if !answer.ends_with(['.', '!', '?']) {
        answer.push('.');
    }

    if used_supporting {
        answer.push_str(CLOSING_SENTENCE);
    }

    Some(answer)
}

/// Best-effort extraction of `key: value` pairs from ":"-containing
/// sentences. Lossy by construction; consumers treat it as a hint only.
fn extract_hints(contexts: &[RetrievedChunk]) -> InfoHints {
    let mut hints = InfoHints::new();

    for ctx in contexts {
        for sentence in ctx.text.split(". ") {
            let sentence = sentence.trim();
            if sentence.is_empty() {
                continue;
            }

            if let Some((key, value)) = sentence.split_once(':') {
                let key = key.trim().to_lowercase();
                let value = value.trim();
                if !key.is_empty() && !value.is_empty() {
                    hints.entry(key).or_default().push(value.to_string());
                }
            }
        }
    }

    hints
}

/// Source tags of the contributing chunks, deduplicated in encounter order.
/// Chunks without a source tag report as "unknown".
fn contributing_sources(contexts: &[RetrievedChunk]) -> Vec<String> {
    contexts
        .iter()
        .map(|ctx| {
            if ctx.metadata.source.is_empty() {
                "unknown".to_string()
            } else {
                ctx.metadata.source.clone()
            }
        })
        .unique()
        .collect()
}
