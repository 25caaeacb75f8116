use chrono::Utc;
use docqa_core::error::{DocqaError, Result};
use docqa_core::models::{ChunkId, IndexEntry, IndexState, ScoredResult, TextChunk};
use docqa_llm::ports::Embedder;
use docqa_store::ports::{validate_index_name, IndexStore, PersistedIndex};
use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Number of chunks sent to the embedder per request batch
pub const DEFAULT_BATCH_SIZE: usize = 16;

/// Progress information for index building
#[derive(Debug, Clone)]
pub struct IndexProgress {
    pub phase: IndexPhase,
    pub current: usize,
    pub total: usize,
    pub message: String,
}

/// Current phase of index building
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexPhase {
    Initializing,
    GeneratingEmbeddings,
    StoringData,
    Finalizing,
}

/// Builds, persists and loads vector indexes
pub struct IndexManager {
    store: Arc<dyn IndexStore>,
    embedder: Arc<dyn Embedder>,
    batch_size: usize,
}

impl IndexManager {
    /// Create a new index manager
    pub fn new(store: Arc<dyn IndexStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self { store, embedder, batch_size: DEFAULT_BATCH_SIZE }
    }

    /// Set the batch size for embedding generation
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    /// Embed `chunks` and persist them as index `name`
    pub async fn build(&self, chunks: &[TextChunk], name: &str) -> Result<IndexBuildResult> {
        self.build_with_progress(chunks, name, |_| {}).await
    }

    /// Build the index with progress reporting
    ///
    /// Nothing is written until every chunk has been embedded, so a failed
    /// build leaves any previous index of the same name untouched.
    pub async fn build_with_progress<F>(
        &self,
        chunks: &[TextChunk],
        name: &str,
        mut progress: F,
    ) -> Result<IndexBuildResult>
    where
        F: FnMut(IndexProgress),
    {
        validate_index_name(name)?;

        progress(IndexProgress {
            phase: IndexPhase::Initializing,
            current: 0,
            total: chunks.len(),
            message: format!("Building index '{}' with {}", name, self.embedder.model_name()),
        });
        tracing::info!(index = name, chunks = chunks.len(), embedder = self.embedder.model_name(), "building index");

        let entries = self.generate_embeddings_with_progress(chunks, &mut progress).await?;

        let embedding_dim =
            entries.first().map(|e| e.vector.len()).unwrap_or_else(|| self.embedder.dimensions());

        let hash = self.generate_index_hash(&entries);
        let state = IndexState {
            name: name.to_string(),
            hash: hash.clone(),
            built_at: Utc::now(),
            embedder: self.embedder.model_name().to_string(),
            chunk_count: entries.len(),
            embedding_dim,
        };

        progress(IndexProgress {
            phase: IndexPhase::StoringData,
            current: 0,
            total: 1,
            message: format!("Writing index '{}'", name),
        });

        self.store.save(name, &PersistedIndex::new(state.clone(), entries)).await?;

        progress(IndexProgress {
            phase: IndexPhase::Finalizing,
            current: 1,
            total: 1,
            message: format!("Index '{}' written ({})", name, hash),
        });
        tracing::info!(index = name, hash = %hash, "index written");

        Ok(IndexBuildResult { chunk_count: state.chunk_count, embedding_dim, index_hash: hash, state })
    }

    /// Load a persisted index
    pub async fn load(&self, name: &str) -> Result<VectorIndex> {
        let persisted = self.store.load(name).await?;
        tracing::debug!(index = name, chunks = persisted.entries.len(), "loaded index");
        Ok(VectorIndex::new(persisted.state, persisted.entries))
    }

    /// Check whether an index of this name has been built
    pub async fn exists(&self, name: &str) -> Result<bool> {
        self.store.exists(name).await
    }

    /// Generate embeddings with progress reporting
    async fn generate_embeddings_with_progress<F>(
        &self,
        chunks: &[TextChunk],
        progress: &mut F,
    ) -> Result<Vec<IndexEntry>>
    where
        F: FnMut(IndexProgress),
    {
        let total = chunks.len();
        let mut entries: Vec<IndexEntry> = Vec::with_capacity(total);

        for (batch_idx, chunk_batch) in chunks.chunks(self.batch_size).enumerate() {
            let texts: Vec<&str> = chunk_batch.iter().map(|c| c.content.as_str()).collect();

            let vectors = self.embedder.embed(&texts).await?;
            if vectors.len() != chunk_batch.len() {
                return Err(DocqaError::EmbeddingService {
                    reason: format!(
                        "embedder returned {} vectors for {} texts",
                        vectors.len(),
                        chunk_batch.len()
                    ),
                    remediation: format!("Check the '{}' embedding model", self.embedder.model_name()),
                });
            }

            for (chunk, vector) in chunk_batch.iter().zip(vectors) {
                let expected = entries.first().map(|e| e.vector.len()).unwrap_or(vector.len());
                if vector.len() != expected || vector.is_empty() {
                    return Err(DocqaError::EmbeddingService {
                        reason: format!(
                            "chunk {} has a {}-dimensional embedding, expected {}",
                            chunk.id.0,
                            vector.len(),
                            expected
                        ),
                        remediation: "Use a single embedding model for the whole index".to_string(),
                    });
                }

                entries.push(IndexEntry { chunk: chunk.clone(), vector });
            }

            let processed = ((batch_idx + 1) * self.batch_size).min(total);
            tracing::debug!(processed, total, "embedded batch");
            progress(IndexProgress {
                phase: IndexPhase::GeneratingEmbeddings,
                current: processed,
                total,
                message: format!("Generated {}/{} embeddings", processed, total),
            });
        }

        Ok(entries)
    }

    /// Generate deterministic index hash
    fn generate_index_hash(&self, entries: &[IndexEntry]) -> String {
        let mut hasher = DefaultHasher::new();

        let mut sorted: Vec<&IndexEntry> = entries.iter().collect();
        sorted.sort_by_key(|e| e.chunk.id);

        for entry in sorted {
            entry.chunk.id.0.hash(&mut hasher);
            entry.chunk.content.hash(&mut hasher);
            entry.chunk.source.document_path.hash(&mut hasher);
            entry.chunk.source.page.hash(&mut hasher);
            entry.chunk.source.offset.hash(&mut hasher);
            for &val in &entry.vector {
                val.to_bits().hash(&mut hasher);
            }
        }

        self.embedder.model_name().hash(&mut hasher);

        format!("{:016x}", hasher.finish())
    }
}

/// Result of an index build operation
#[derive(Debug, Clone)]
pub struct IndexBuildResult {
    /// Total number of chunks indexed
    pub chunk_count: usize,

    /// Embedding dimension
    pub embedding_dim: usize,

    /// Deterministic index hash
    pub index_hash: String,

    /// Manifest written with the index
    pub state: IndexState,
}

/// A chunk returned by search, with its similarity to the query
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub chunk: TextChunk,
    pub score: f32,
}

/// Loaded, immutable vector index
#[derive(Debug, Clone)]
pub struct VectorIndex {
    state: IndexState,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    pub fn new(state: IndexState, entries: Vec<IndexEntry>) -> Self {
        Self { state, entries }
    }

    pub fn state(&self) -> &IndexState {
        &self.state
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embed `query_text` and return the `k` most similar chunks
    pub async fn search(&self, embedder: &dyn Embedder, query_text: &str, k: usize) -> Result<Vec<SearchHit>> {
        self.check_searchable(k)?;

        if embedder.model_name() != self.state.embedder {
            tracing::warn!(
                index = %self.state.name,
                index_embedder = %self.state.embedder,
                query_embedder = embedder.model_name(),
                "query embedder differs from the one used to build the index"
            );
        }

        let query = embedder.embed(&[query_text]).await?.into_iter().next().ok_or_else(|| {
            DocqaError::EmbeddingService {
                reason: "embedder returned no vector for the query".to_string(),
                remediation: format!("Check the '{}' embedding model", embedder.model_name()),
            }
        })?;

        if query.len() != self.state.embedding_dim {
            return Err(DocqaError::EmbeddingService {
                reason: format!(
                    "query embedding has {} dimensions but index '{}' has {}",
                    query.len(),
                    self.state.name,
                    self.state.embedding_dim
                ),
                remediation: format!(
                    "Query with '{}' or rebuild the index with 'docqa build'",
                    self.state.embedder
                ),
            });
        }

        let hits = self
            .rank(&query, k)
            .into_iter()
            .map(|(entry, score)| SearchHit { chunk: entry.chunk.clone(), score })
            .collect();

        Ok(hits)
    }

    /// Rank every entry against an already embedded query
    ///
    /// Ordered by decreasing cosine similarity, ties broken by chunk id.
    pub fn search_vector(&self, query: &[f32], k: usize) -> Result<Vec<ScoredResult>> {
        self.check_searchable(k)?;

        Ok(self
            .rank(query, k)
            .into_iter()
            .map(|(entry, score)| ScoredResult { chunk_id: entry.chunk.id, score })
            .collect())
    }

    /// Look up the first chunk with this id
    pub fn chunk(&self, id: ChunkId) -> Option<&TextChunk> {
        self.entries.iter().map(|e| &e.chunk).find(|c| c.id == id)
    }

    /// Top `k` entries with their scores; entries are ranked by position, so
    /// chunks from separate splits that share an id are still returned once each
    fn rank(&self, query: &[f32], k: usize) -> Vec<(&IndexEntry, f32)> {
        let mut ranked: Vec<(&IndexEntry, f32)> =
            self.entries.iter().map(|entry| (entry, cosine_similarity(query, &entry.vector))).collect();

        // Stable sort keeps insertion order among equal (score, id) pairs
        ranked.sort_by(|(a, a_score), (b, b_score)| {
            b_score.partial_cmp(a_score).unwrap_or(Ordering::Equal).then_with(|| a.chunk.id.cmp(&b.chunk.id))
        });
        ranked.truncate(k);
        ranked
    }

    fn check_searchable(&self, k: usize) -> Result<()> {
        if k == 0 {
            return Err(DocqaError::invalid_config("k", "k must be at least 1"));
        }
        if self.entries.is_empty() {
            return Err(DocqaError::EmptyIndex { name: self.state.name.clone() });
        }
        Ok(())
    }
}

/// Cosine similarity; 0.0 for mismatched lengths or zero vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
