//! In-memory retrieval over embedded documents.
//!
//! Documents live for the process lifetime in an append-only list with a
//! parallel vector store; similarity is plain L2 distance over the embedding
//! vectors. No persistence, no deletion, no deduplication.

use tracing::debug;

use crate::api::{ApiResult, Embedder};

/// Append-only vector store. Text `i` corresponds to vector `i`.
#[derive(Default)]
pub struct VectorIndex {
    texts: Vec<String>,
    vectors: Vec<Vec<f32>>,
}

impl VectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Appends documents and their vectors, order-preserving.
    pub fn add(&mut self, texts: &[String], vectors: Vec<Vec<f32>>) {
        debug_assert_eq!(texts.len(), vectors.len());
        self.texts.extend_from_slice(texts);
        self.vectors.extend(vectors);
    }

    /// Returns up to `k` stored texts nearest to `query` by L2 distance,
    /// closest first. Fewer than `k` results when the index is small; ties
    /// resolve by insertion order.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<&str> {
        let mut scored: Vec<(f32, usize)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (l2_distance(query, v), i))
            .collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));
        scored
            .into_iter()
            .take(k)
            .map(|(_, i)| self.texts[i].as_str())
            .collect()
    }
}

fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum()
}

/// Retriever: embeds documents on the way in and queries on the way out.
pub struct Retriever {
    embedder: Box<dyn Embedder>,
    index: VectorIndex,
}

impl Retriever {
    pub fn new(embedder: Box<dyn Embedder>) -> Self {
        Self {
            embedder,
            index: VectorIndex::new(),
        }
    }

    /// Embeds and appends `documents` to the index, order-preserving, no
    /// deduplication.
    pub async fn add_documents(&mut self, documents: &[String]) -> ApiResult<()> {
        if documents.is_empty() {
            return Ok(());
        }
        let vectors = self.embedder.embed(documents).await?;
        self.index.add(documents, vectors);
        debug!("index now holds {} documents", self.index.len());
        Ok(())
    }

    /// Returns up to `k` nearest documents to `text`.
    pub async fn query(&self, text: &str, k: usize) -> ApiResult<Vec<String>> {
        let query = vec![text.to_string()];
        let mut vectors = self.embedder.embed(&query).await?;
        let Some(vector) = vectors.pop() else {
            return Ok(Vec::new());
        };
        Ok(self
            .index
            .search(&vector, k)
            .into_iter()
            .map(str::to_string)
            .collect())
    }
}

/// Splits `text` into overlapping character chunks for indexing. The last
/// chunk may be shorter; `overlap` must be smaller than `chunk_size`.
pub fn split_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    if text.is_empty() || chunk_size == 0 {
        return Vec::new();
    }
    let step = chunk_size.saturating_sub(overlap).max(1);
    let chars: Vec<char> = text.chars().collect();

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }
    chunks
}
