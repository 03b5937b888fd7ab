// Engine module
// Wires the chunker, embedding provider, vector store, and synthesizer into
// the build/query lifecycle

#[cfg(test)]
mod tests;

use anyhow::Result;
use chrono::Utc;
use indicatif::ProgressBar;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::chunker::{Chunk, flatten_record};
use crate::config::Config;
use crate::data::DataProvider;
use crate::embeddings::EmbeddingProvider;
use crate::fallback::{self, FALLBACK_SOURCE, InfoHints};
use crate::generation::GenerationClient;
use crate::index::{IndexEntry, VectorStore};
use crate::synthesizer::{Answer, AnswerSynthesizer};

/// Default number of nearest chunks retrieved per query.
pub const DEFAULT_TOP_K: usize = 8;

/// Retrieval-augmented question answering over the curated knowledge base.
///
/// The query path never fails: an unavailable embedding backend, an unbuilt
/// index, or a storage error all degrade to the fallback responder. Only
/// [`initialize`](Self::initialize) reports a hard failure, and rebuilds are
/// serialized against each other.
pub struct RagEngine {
    config: Config,
    provider: EmbeddingProvider,
    store: VectorStore,
    synthesizer: AnswerSynthesizer,
    data: DataProvider,
    initialized: AtomicBool,
    rebuild_lock: Mutex<()>,
}

impl RagEngine {
    /// Connect to the embedding backend and open the durable store. An
    /// already-populated collection marks the engine initialized without
    /// recomputing anything.
    #[inline]
    pub async fn new(config: Config) -> Result<Self> {
        let provider = EmbeddingProvider::connect(&config.ollama);
        Self::with_provider(config, provider).await
    }

    /// Like [`new`](Self::new) but with an explicit embedding provider, which
    /// also lets callers force the degraded path.
    #[inline]
    pub async fn with_provider(config: Config, provider: EmbeddingProvider) -> Result<Self> {
        let store =
            VectorStore::open(&config.vector_db_path(), config.ollama.embedding_dimension).await?;
        let synthesizer = AnswerSynthesizer::new(GenerationClient::new(&config.generation));
        let data = DataProvider::new(config.data_dir_path());

        let built = match store.is_built().await {
            Ok(built) => built,
            Err(e) => {
                warn!("Could not inspect existing collection: {:#}", e);
                false
            }
        };

        if built {
            info!("Opened existing knowledge base collection");
        }

        Ok(Self {
            config,
            provider,
            store,
            synthesizer,
            data,
            initialized: AtomicBool::new(built),
            rebuild_lock: Mutex::new(()),
        })
    }

    /// True iff queries can use retrieval: the index holds entries and the
    /// embedding backend is available.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.initialized.load(Ordering::Acquire) && self.provider.is_available()
    }

    /// True iff a durable collection exists and holds at least one entry.
    /// Safe to call on a fresh process before deciding whether to build.
    #[inline]
    pub async fn is_built(&self) -> bool {
        match self.store.is_built().await {
            Ok(built) => built,
            Err(e) => {
                warn!("is_built check failed: {:#}", e);
                false
            }
        }
    }

    /// Number of entries in the collection, zero when unbuilt or unreadable.
    #[inline]
    pub async fn entry_count(&self) -> u64 {
        self.store.count_entries().await.unwrap_or_else(|e| {
            warn!("Entry count failed: {:#}", e);
            0
        })
    }

    /// Rebuild the knowledge base from the topic records. Returns whether a
    /// usable index now exists; all failures are reported as `false`, leaving
    /// the engine in degraded mode. At most one rebuild runs at a time.
    #[inline]
    pub async fn initialize(&self) -> bool {
        let _guard = self.rebuild_lock.lock().await;

        if !self.provider.is_available() {
            warn!("Embedding backend unavailable, cannot build knowledge base");
            self.initialized.store(false, Ordering::Release);
            return false;
        }

        info!("Building knowledge base");

        match self.build_index().await {
            Ok(count) if count > 0 => {
                info!("Knowledge base built with {} chunks", count);
                self.initialized.store(true, Ordering::Release);
                true
            }
            Ok(_) => {
                warn!("No chunks produced from topic records, knowledge base not built");
                self.initialized.store(false, Ordering::Release);
                false
            }
            Err(e) => {
                error!("Failed to build knowledge base: {:#}", e);
                self.initialized.store(false, Ordering::Release);
                false
            }
        }
    }

    async fn build_index(&self) -> Result<usize> {
        if let Err(e) = self.data.seed() {
            warn!("Could not seed topic files: {:#}", e);
        }

        let records = self.data.load_all();
        let mut chunks: Vec<Chunk> = Vec::new();
        for (topic, record) in &records {
            chunks.extend(flatten_record(
                record,
                topic,
                self.config.chunking.max_chunk_chars,
            ));
        }

        if chunks.is_empty() {
            return Ok(0);
        }

        info!("Generating embeddings for {} chunks", chunks.len());
        let progress = ProgressBar::new(chunks.len() as u64);

        let batch_size = self.config.ollama.batch_size as usize;
        let mut entries: Vec<IndexEntry> = Vec::with_capacity(chunks.len());

        for batch in chunks.chunks(batch_size) {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let vectors = self.provider.encode(&texts)?;

            for (chunk, vector) in batch.iter().zip(vectors) {
                entries.push(IndexEntry {
                    id: chunk.id.clone(),
                    vector,
                    text: chunk.text.clone(),
                    metadata: chunk.metadata.clone(),
                });
            }

            progress.inc(batch.len() as u64);
        }

        progress.finish_and_clear();

        self.store.rebuild(&entries).await?;

        Ok(entries.len())
    }

    /// Answer a question. Always produces textual output; every failure mode
    /// along the retrieval path degrades to the fallback responder.
    #[inline]
    pub async fn query(&self, question: &str, top_k: usize) -> Answer {
        if !self.is_ready() {
            debug!("Engine not ready, answering from fallback table");
            return fallback_answer(question);
        }

        let query_vector = match self.provider.encode_one(question) {
            Ok(vector) => vector,
            Err(e) => {
                warn!("Failed to embed question: {:#}", e);
                return fallback_answer(question);
            }
        };

        let contexts = match self.store.search(&query_vector, top_k).await {
            Ok(contexts) => contexts,
            Err(e) => {
                warn!("Index query failed: {:#}", e);
                return fallback_answer(question);
            }
        };

        self.synthesizer.synthesize(question, &contexts)
    }
}

/// Terminal fallback used when retrieval is unavailable entirely.
fn fallback_answer(question: &str) -> Answer {
    Answer {
        answer: fallback::respond(question, &InfoHints::new()),
        sources: vec![FALLBACK_SOURCE.to_string()],
        timestamp: Utc::now().to_rfc3339(),
    }
}
