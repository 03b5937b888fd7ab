// Embeddings module
// Availability-tagged provider over the Ollama embedding client

#[cfg(test)]
mod tests;

pub mod ollama;

pub use ollama::OllamaClient;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::OllamaConfig;

/// Vector dimensionality of the reference model (all-minilm).
pub const DEFAULT_EMBEDDING_DIMENSION: u32 = 384;

/// Maps text to fixed-dimension vectors, or reports itself unavailable.
///
/// Availability is decided once at construction; callers branch on
/// [`is_available`](Self::is_available) before building or querying the index
/// instead of treating per-call failures as control flow. An unavailable
/// provider routes the whole system to the fallback responder.
#[derive(Debug, Clone)]
pub enum EmbeddingProvider {
    Available(OllamaClient),
    Unavailable,
}

impl EmbeddingProvider {
    /// Connect to the embedding backend. A failed health check yields
    /// `Unavailable` rather than an error.
    #[inline]
    pub fn connect(config: &OllamaConfig) -> Self {
        let client = match OllamaClient::new(config) {
            Ok(client) => client,
            Err(e) => {
                warn!("Embedding backend misconfigured: {:#}", e);
                return Self::Unavailable;
            }
        };

        match client.health_check() {
            Ok(()) => {
                info!(
                    "Embedding backend available with model {}",
                    client.model()
                );
                Self::Available(client)
            }
            Err(e) => {
                warn!("Embedding backend unavailable: {:#}", e);
                Self::Unavailable
            }
        }
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// Encode a batch of texts. Callers must check availability first;
    /// calling on an unavailable provider is an error, not a panic.
    #[inline]
    pub fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        match self {
            Self::Available(client) => client.embed_batch(texts),
            Self::Unavailable => Err(anyhow::anyhow!("Embedding backend is unavailable")),
        }
    }

    /// Encode a single text.
    #[inline]
    pub fn encode_one(&self, text: &str) -> Result<Vec<f32>> {
        match self {
            Self::Available(client) => client.embed(text),
            Self::Unavailable => Err(anyhow::anyhow!("Embedding backend is unavailable")),
        }
    }
}
