// Chunker module
// Flattens nested topic records into retrieval-sized text chunks

#[cfg(test)]
mod tests;

use serde_json::Value;
use tracing::debug;

/// Metadata tag applied to every chunk derived from a structured record.
pub const STRUCTURED_DATA_TYPE: &str = "structured_data";

/// A bounded unit of text plus provenance metadata, the unit of retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Unique id within a build: `"<source>_<ordinal>"`.
    pub id: String,
    /// The chunk text, sentence groups joined with ". " and re-terminated.
    pub text: String,
    pub metadata: ChunkMetadata,
}

/// Provenance carried alongside each chunk into the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkMetadata {
    /// Topic name the chunk was derived from (e.g. "fees").
    pub source: String,
    /// Record kind, currently always [`STRUCTURED_DATA_TYPE`].
    pub doc_type: String,
}

/// Flatten a nested record into chunks of at most `max_chars` characters.
///
/// Mappings emit one `"<prefix> <Humanized Key>: <value>"` line per scalar
/// entry and recurse into nested values with an extended prefix; sequences
/// recurse per element under the same prefix. The flattened line stream is
/// split on `". "` and greedily packed into chunks. A single sentence longer
/// than the budget becomes its own chunk untruncated.
///
/// Pure and deterministic; an empty or scalar-free record yields no chunks.
#[inline]
pub fn flatten_record(record: &Value, source: &str, max_chars: usize) -> Vec<Chunk> {
    let mut lines = Vec::new();
    extract_lines(record, "", &mut lines);

    if lines.is_empty() {
        debug!("Record '{}' produced no text lines", source);
        return Vec::new();
    }

    let full_text = lines.join(" ");
    let chunks = pack_sentences(&full_text, source, max_chars);

    debug!(
        "Flattened record '{}' into {} chunks from {} lines",
        source,
        chunks.len(),
        lines.len()
    );

    chunks
}

/// Recursively walk the record, emitting one line per scalar leaf.
fn extract_lines(value: &Value, prefix: &str, lines: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let key_text = humanize_key(key);
                let child_prefix = if prefix.is_empty() {
                    key_text
                } else {
                    format!("{} {}", prefix, key_text)
                };

                if child.is_object() || child.is_array() {
                    extract_lines(child, &child_prefix, lines);
                } else {
                    lines.push(format!("{}: {}", child_prefix, scalar_text(child)));
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                if item.is_object() || item.is_array() {
                    extract_lines(item, prefix, lines);
                } else {
                    lines.push(format!("{}: {}", prefix, scalar_text(item)));
                }
            }
        }
        scalar => {
            lines.push(format!("{}: {}", prefix, scalar_text(scalar)));
        }
    }
}

/// Render a scalar leaf as display text.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Replace underscores with spaces and title-case each word.
fn humanize_key(key: &str) -> String {
    key.replace('_', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Greedily pack sentence groups into chunks within the character budget.
fn pack_sentences(full_text: &str, source: &str, max_chars: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_chars = 0;

    for sentence in full_text.split(". ") {
        // Projected length of the closed chunk if this sentence joins it:
        // current sentences + ". " separators + trailing period.
        let projected = current_chars + sentence.len() + 2 * current.len() + 1;

        if !current.is_empty() && projected > max_chars {
            chunks.push(close_chunk(&current, source, chunks.len()));
            current.clear();
            current_chars = 0;
        }

        current_chars += sentence.len();
        current.push(sentence);
    }

    if !current.is_empty() {
        chunks.push(close_chunk(&current, source, chunks.len()));
    }

    chunks
}

fn close_chunk(sentences: &[&str], source: &str, ordinal: usize) -> Chunk {
    Chunk {
        id: format!("{}_{}", source, ordinal),
        text: format!("{}.", sentences.join(". ")),
        metadata: ChunkMetadata {
            source: source.to_string(),
            doc_type: STRUCTURED_DATA_TYPE.to_string(),
        },
    }
}
