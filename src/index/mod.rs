// Vector index module
// Durable chunk + embedding storage with nearest-neighbor search

pub mod vector_store;

pub use vector_store::{RetrievedChunk, VectorStore};

use crate::chunker::ChunkMetadata;

/// One row of the vector collection: a chunk, its embedding, and provenance.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    /// Unique identifier within a build (`"<source>_<ordinal>"`).
    pub id: String,
    /// The chunk embedding, regenerated whenever the chunk is rebuilt.
    pub vector: Vec<f32>,
    /// The chunk text.
    pub text: String,
    /// Provenance carried from the chunker.
    pub metadata: ChunkMetadata,
}
