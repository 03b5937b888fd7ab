
use super::IndexEntry;
use crate::CampusError;
use crate::chunker::ChunkMetadata;
use arrow::array::{Array, FixedSizeListArray, Float32Array, RecordBatchIterator, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use futures::TryStreamExt;
use lancedb::{
    Connection,
    query::{ExecutableQuery, QueryBase},
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Name of the durable collection holding the knowledge base.
const TABLE_NAME: &str = "campus_knowledge";

/// Rows per bulk-insert batch during a rebuild, bounding peak memory.
const INSERT_BATCH_SIZE: usize = 100;

/// Vector database store using LanceDB for similarity search.
///
/// The collection survives process restarts; a fresh process should call
/// [`is_built`](Self::is_built) and reuse the existing collection rather
/// than rebuilding. [`rebuild`](Self::rebuild) is the only writer and is
/// all-or-nothing from the caller's perspective.
pub struct VectorStore {
    connection: Connection,
    vector_dimension: usize,
}

/// One nearest-neighbor hit, ordered by ascending distance.
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    pub text: String,
    pub metadata: ChunkMetadata,
    pub distance: f32,
}

impl VectorStore {
    /// Open (or create) the database directory and connect. Does not create
    /// the collection; that happens on the first `rebuild`.
    #[inline]
    pub async fn open(db_path: &Path, vector_dimension: u32) -> Result<Self, CampusError> {
        debug!("Opening LanceDB at path: {}", db_path.display());

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CampusError::Index(format!("Failed to create vector database directory: {}", e))
            })?;
        }

        let uri = format!("file://{}", db_path.display());
        let connection = lancedb::connect(&uri)
            .execute()
            .await
            .map_err(|e| CampusError::Index(format!("Failed to connect to LanceDB: {}", e)))?;

        Ok(Self {
            connection,
            vector_dimension: vector_dimension as usize,
        })
    }

    /// True iff the collection exists and holds at least one entry.
    #[inline]
    pub async fn is_built(&self) -> Result<bool, CampusError> {
        if !self.table_exists().await? {
            return Ok(false);
        }

        Ok(self.count_entries().await? > 0)
    }

    /// Number of entries in the collection, zero if it does not exist.
    #[inline]
    pub async fn count_entries(&self) -> Result<u64, CampusError> {
        if !self.table_exists().await? {
            return Ok(0);
        }

        let table = self.open_table().await?;
        let count = table
            .count_rows(None)
            .await
            .map_err(|e| CampusError::Index(format!("Failed to count rows: {}", e)))?;

        Ok(count as u64)
    }

    /// Atomically replace the whole collection: drop the existing one, create
    /// fresh, bulk-insert in bounded batches. A failure mid-insert is fatal to
    /// the rebuild; callers retry from scratch.
    #[inline]
    pub async fn rebuild(&self, entries: &[IndexEntry]) -> Result<(), CampusError> {
        info!("Rebuilding collection with {} entries", entries.len());

        self.drop_table_if_exists().await?;

        let schema = self.create_schema();
        self.connection
            .create_empty_table(TABLE_NAME, schema)
            .execute()
            .await
            .map_err(|e| CampusError::Index(format!("Failed to create collection: {}", e)))?;

        let table = self.open_table().await?;

        for batch in entries.chunks(INSERT_BATCH_SIZE) {
            let record_batch = self.create_record_batch(batch)?;
            let schema = record_batch.schema();
            let reader = RecordBatchIterator::new(std::iter::once(Ok(record_batch)), schema);
            table
                .add(reader)
                .execute()
                .await
                .map_err(|e| CampusError::Index(format!("Failed to insert entries: {}", e)))?;
        }

        info!("Collection rebuilt with {} entries", entries.len());
        Ok(())
    }

    /// Nearest-neighbor search by embedding distance. Returns fewer than
    /// `limit` results if fewer entries exist, and an empty result (not an
    /// error) when the collection is empty or missing.
    #[inline]
    pub async fn search(
        &self,
        query_vector: &[f32],
        limit: usize,
    ) -> Result<Vec<RetrievedChunk>, CampusError> {
        if !self.table_exists().await? {
            debug!("Collection does not exist, returning empty result");
            return Ok(Vec::new());
        }

        let table = self.open_table().await?;

        let query = table
            .vector_search(query_vector)
            .map_err(|e| CampusError::Index(format!("Failed to create vector search: {}", e)))?
            .column("vector")
            .limit(limit);

        let mut results = query
            .execute()
            .await
            .map_err(|e| CampusError::Index(format!("Failed to execute search: {}", e)))?;

        let mut retrieved = Vec::new();
        while let Some(batch) = results
            .try_next()
            .await
            .map_err(|e| CampusError::Index(format!("Failed to read result stream: {}", e)))?
        {
            retrieved.extend(parse_search_batch(&batch)?);
        }

        debug!("Search returned {} chunks", retrieved.len());
        Ok(retrieved)
    }

    async fn table_exists(&self) -> Result<bool, CampusError> {
        let table_names = self
            .connection
            .table_names()
            .execute()
            .await
            .map_err(|e| CampusError::Index(format!("Failed to list collections: {}", e)))?;

        Ok(table_names.iter().any(|name| name == TABLE_NAME))
    }

    async fn open_table(&self) -> Result<lancedb::Table, CampusError> {
        self.connection
            .open_table(TABLE_NAME)
            .execute()
            .await
            .map_err(|e| CampusError::Index(format!("Failed to open collection: {}", e)))
    }

    async fn drop_table_if_exists(&self) -> Result<(), CampusError> {
        if self.table_exists().await? {
            info!("Dropping existing collection");
            self.connection
                .drop_table(TABLE_NAME)
                .await
                .map_err(|e| CampusError::Index(format!("Failed to drop collection: {}", e)))?;
        }

        Ok(())
    }

    fn create_schema(&self) -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new(
                "vector",
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, false)),
                    self.vector_dimension as i32,
                ),
                false,
            ),
            Field::new("source", DataType::Utf8, false),
            Field::new("doc_type", DataType::Utf8, false),
            Field::new("text", DataType::Utf8, false),
        ]))
    }

    fn create_record_batch(&self, entries: &[IndexEntry]) -> Result<RecordBatch, CampusError> {
        let len = entries.len();

        let mut ids = Vec::with_capacity(len);
        let mut sources = Vec::with_capacity(len);
        let mut doc_types = Vec::with_capacity(len);
        let mut texts = Vec::with_capacity(len);
        let mut flat_values = Vec::with_capacity(len * self.vector_dimension);

        for entry in entries {
            if entry.vector.len() != self.vector_dimension {
                return Err(CampusError::Index(format!(
                    "Entry '{}' has vector dimension {}, expected {}",
                    entry.id,
                    entry.vector.len(),
                    self.vector_dimension
                )));
            }

            ids.push(entry.id.as_str());
            sources.push(entry.metadata.source.as_str());
            doc_types.push(entry.metadata.doc_type.as_str());
            texts.push(entry.text.as_str());
            flat_values.extend_from_slice(&entry.vector);
        }

        let values_array = Float32Array::from(flat_values);
        let field = Arc::new(Field::new("item", DataType::Float32, false));
        let vector_array = FixedSizeListArray::try_new(
            field,
            self.vector_dimension as i32,
            Arc::new(values_array),
            None,
        )
        .map_err(|e| CampusError::Index(format!("Failed to create vector array: {}", e)))?;

        let schema = self.create_schema();
        let arrays: Vec<Arc<dyn arrow::array::Array>> = vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(vector_array),
            Arc::new(StringArray::from(sources)),
            Arc::new(StringArray::from(doc_types)),
            Arc::new(StringArray::from(texts)),
        ];

        RecordBatch::try_new(schema, arrays)
            .map_err(|e| CampusError::Index(format!("Failed to create record batch: {}", e)))
    }
}

/// Parse a single record batch from search results.
fn parse_search_batch(batch: &RecordBatch) -> Result<Vec<RetrievedChunk>, CampusError> {
    let num_rows = batch.num_rows();
    let mut retrieved = Vec::with_capacity(num_rows);

    let sources = string_column(batch, "source")?;
    let doc_types = string_column(batch, "doc_type")?;
    let texts = string_column(batch, "text")?;

    let distances = batch
        .column_by_name("_distance")
        .map(|col| col.as_any().downcast_ref::<Float32Array>());

    for row in 0..num_rows {
        let distance = distances
            .flatten()
            .map_or(0.0, |d| if d.is_null(row) { 0.0 } else { d.value(row) });

        retrieved.push(RetrievedChunk {
            text: texts.value(row).to_string(),
            metadata: ChunkMetadata {
                source: sources.value(row).to_string(),
                doc_type: doc_types.value(row).to_string(),
            },
            distance,
        });
    }

    Ok(retrieved)
}

fn string_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a StringArray, CampusError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| CampusError::Index(format!("Missing {} column", name)))?
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| CampusError::Index(format!("Invalid {} column type", name)))
}
