//! In-memory embedding store.
//!
//! An [`EmbeddingStore`] owns an [`EmbeddingMatrix`] and a payload list kept
//! in lockstep with it: `payloads[i]` belongs to row `i`. The store only
//! grows, through [`append`](EmbeddingStore::append), or is replaced
//! wholesale, through [`load`](EmbeddingStore::load).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::codec::{Codec, MessagePack};
use crate::config::StoreConfig;
use crate::element::{Element, ElementKind};
use crate::error::{Error, Result};
use crate::matrix::EmbeddingMatrix;
use crate::search::{self, SearchOptions, SearchResult};
use crate::vector::Embedding;

/// Borrowed view written by `dump`.
#[derive(Serialize)]
#[serde(bound = "T: Element, P: Serialize")]
struct SnapshotRef<'a, T, P> {
    embeddings: &'a EmbeddingMatrix<T>,
    data: &'a [P],
}

/// Owned shape read by `load`.
#[derive(Deserialize)]
#[serde(bound = "T: Element, P: DeserializeOwned")]
struct Snapshot<T, P> {
    embeddings: Vec<Vec<T>>,
    data: Vec<P>,
}

/// A decoded and validated snapshot, ready to be installed.
///
/// Produced without touching the live store so that installation is a
/// single infallible swap.
#[derive(Debug)]
pub(crate) struct StagedLoad<T, P> {
    matrix: Option<EmbeddingMatrix<T>>,
    payloads: Vec<P>,
}

impl<T, P> StagedLoad<T, P> {
    pub(crate) fn rows(&self) -> usize {
        self.payloads.len()
    }
}

/// An in-memory store of embeddings and their payloads, searchable by
/// cosine similarity.
///
/// `T` is the numeric kind of every embedding component, `P` the payload
/// type and `C` the [`Codec`] used by [`dump`](Self::dump) and
/// [`load`](Self::load).
///
/// This type is not synchronized; use [`SharedStore`](crate::SharedStore)
/// to share a store between threads.
///
/// # Example
///
/// ```
/// use simstore_core::{EmbeddingStore, SearchOptions};
///
/// let mut store: EmbeddingStore<f32, String> = EmbeddingStore::new();
/// store.append(vec![
///     (vec![1.0, 0.0], "a".to_string()),
///     (vec![0.0, 1.0], "b".to_string()),
///     (vec![1.0, 1.0], "c".to_string()),
/// ]).unwrap();
///
/// let results = store.search(&[1.0, 0.0], &SearchOptions::new().with_minimum_score(0.5)).unwrap();
/// let payloads: Vec<&str> = results.iter().map(|r| r.payload.as_str()).collect();
/// assert_eq!(payloads, ["a", "c"]);
///
/// let bytes = store.dump().unwrap();
/// let mut restored: EmbeddingStore<f32, String> = EmbeddingStore::new();
/// restored.load(&bytes).unwrap();
/// assert_eq!(restored.payloads(), store.payloads());
/// ```
#[derive(Debug, Clone)]
pub struct EmbeddingStore<T, P, C = MessagePack> {
    config: StoreConfig,
    codec: C,
    /// Absent until the first successful append or non-empty load.
    matrix: Option<EmbeddingMatrix<T>>,
    payloads: Vec<P>,
}

impl<T: Element, P> EmbeddingStore<T, P, MessagePack> {
    /// Creates an empty store with the default config and MessagePack codec.
    pub fn new() -> Self {
        Self {
            config: StoreConfig::default(),
            codec: MessagePack,
            matrix: None,
            payloads: Vec::new(),
        }
    }

    /// Creates an empty store with the given config and MessagePack codec.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the config fails validation.
    pub fn with_config(config: StoreConfig) -> Result<Self> {
        Self::with_codec(config, MessagePack)
    }

    /// Builds a store from an initial batch.
    pub fn from_items<I, E>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = (E, P)>,
        E: Into<Embedding<T>>,
    {
        let mut store = Self::new();
        store.append(items)?;
        Ok(store)
    }
}

impl<T: Element, P> Default for EmbeddingStore<T, P, MessagePack> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element, P, C: Codec> EmbeddingStore<T, P, C> {
    /// Creates an empty store with the given config and codec.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the config fails validation.
    pub fn with_codec(config: StoreConfig, codec: C) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            codec,
            matrix: None,
            payloads: Vec::new(),
        })
    }

    /// Returns the number of stored items.
    #[inline]
    pub fn size(&self) -> usize {
        self.payloads.len()
    }

    /// Returns the number of stored items.
    #[inline]
    pub fn len(&self) -> usize {
        self.size()
    }

    /// Returns true if nothing has been stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    /// Returns the established dimensionality.
    ///
    /// This is the width of the stored rows, or the pinned dimension from
    /// the config while the store is empty, or `0` if neither exists.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.established_dimension().unwrap_or(0)
    }

    fn established_dimension(&self) -> Option<usize> {
        self.matrix
            .as_ref()
            .map(EmbeddingMatrix::dimension)
            .or(self.config.dimension)
    }

    /// Returns the numeric kind of stored components.
    #[inline]
    pub fn element_kind(&self) -> ElementKind {
        T::KIND
    }

    /// Returns the store's config.
    #[inline]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns the codec used by `dump` and `load`.
    #[inline]
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Returns the backing matrix, if any rows exist.
    #[inline]
    pub fn matrix(&self) -> Option<&EmbeddingMatrix<T>> {
        self.matrix.as_ref()
    }

    /// Returns all payloads in insertion order.
    #[inline]
    pub fn payloads(&self) -> &[P] {
        &self.payloads
    }

    /// Returns the embedding and payload at `index`.
    pub fn get(&self, index: usize) -> Option<(&[T], &P)> {
        let row = self.matrix.as_ref()?.row(index)?;
        Some((row, self.payloads.get(index)?))
    }

    /// Iterates `(embedding, payload)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&[T], &P)> + '_ {
        self.matrix
            .iter()
            .flat_map(EmbeddingMatrix::iter_rows)
            .zip(self.payloads.iter())
    }

    /// Appends a batch of embeddings with their payloads.
    ///
    /// The first batch ever appended establishes the dimensionality unless
    /// the config pins one. The whole batch is validated before anything is
    /// stored, so on error the store is unchanged.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyBatch`] if `items` is empty.
    /// - [`Error::EmptyEmbedding`] if an embedding has no components.
    /// - [`Error::DimensionMismatch`] if an embedding's length differs from
    ///   the established dimensionality (or from the batch's first item).
    pub fn append<I, E>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = (E, P)>,
        E: Into<Embedding<T>>,
    {
        let (embeddings, payloads): (Vec<Embedding<T>>, Vec<P>) = items
            .into_iter()
            .map(|(embedding, payload)| (embedding.into(), payload))
            .unzip();

        let Some(first) = embeddings.first() else {
            return Err(Error::EmptyBatch);
        };
        let expected = self.established_dimension().unwrap_or(first.dimension());

        for embedding in &embeddings {
            if embedding.is_empty() {
                return Err(Error::EmptyEmbedding);
            }
            if embedding.dimension() != expected {
                return Err(Error::DimensionMismatch {
                    expected,
                    got: embedding.dimension(),
                });
            }
        }

        let block = EmbeddingMatrix::stack(embeddings.iter().map(Embedding::as_slice))?;
        let added = block.rows();

        // Widths were checked against `expected` above, so concat cannot fail
        // after the old matrix has been taken.
        let matrix = match self.matrix.take() {
            Some(existing) => existing.concat(block)?,
            None => block,
        };
        self.matrix = Some(matrix);
        self.payloads.extend(payloads);

        tracing::debug!(
            added,
            rows = self.size(),
            dimension = expected,
            kind = %T::KIND,
            "appended embeddings"
        );
        Ok(())
    }

    /// Appends a single embedding with its payload.
    pub fn append_one<E: Into<Embedding<T>>>(&mut self, embedding: E, payload: P) -> Result<()> {
        self.append(std::iter::once((embedding, payload)))
    }

    /// Removes every item. A pinned dimension survives; a learned one does not.
    pub fn clear(&mut self) {
        let dropped = self.size();
        self.matrix = None;
        self.payloads = Vec::new();
        tracing::debug!(dropped, "cleared store");
    }

    /// Searches for the stored items most similar to `query`.
    ///
    /// Results are ordered best first; equal scores keep insertion order.
    /// An empty store yields no results rather than an error.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidOptions`] if `options` fail validation.
    /// - [`Error::DimensionMismatch`] if `query` has the wrong length.
    pub fn search<Q: AsRef<[T]>>(
        &self,
        query: Q,
        options: &SearchOptions,
    ) -> Result<Vec<SearchResult<P>>>
    where
        P: Clone,
    {
        options.validate()?;

        let Some(matrix) = self.matrix.as_ref() else {
            return Ok(Vec::new());
        };

        let ranked = search::rank(matrix, query.as_ref(), options)?;
        Ok(ranked
            .into_iter()
            .map(|row| SearchResult {
                index: row.index,
                score: row.score,
                payload: self.payloads[row.index].clone(),
            })
            .collect())
    }

    /// Searches with the default options from the store's config.
    pub fn search_default<Q: AsRef<[T]>>(&self, query: Q) -> Result<Vec<SearchResult<P>>>
    where
        P: Clone,
    {
        let options = self.config.search;
        self.search(query, &options)
    }

    /// Encodes the store as `{embeddings, data}` with the store's codec.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyStore`] if nothing has been stored.
    /// - [`Error::Encode`] if the codec fails.
    pub fn dump(&self) -> Result<Vec<u8>>
    where
        P: Serialize,
    {
        let matrix = self.matrix.as_ref().ok_or(Error::EmptyStore)?;

        let snapshot = SnapshotRef {
            embeddings: matrix,
            data: &self.payloads,
        };
        let bytes = self
            .codec
            .encode(&snapshot)
            .map_err(|e| Error::Encode(e.to_string()))?;

        tracing::debug!(
            rows = matrix.rows(),
            dimension = matrix.dimension(),
            codec = self.codec.name(),
            bytes = bytes.len(),
            "dumped store"
        );
        Ok(bytes)
    }

    /// Replaces the whole store with the contents of `bytes`.
    ///
    /// On error the store is unchanged.
    ///
    /// # Errors
    ///
    /// - [`Error::CorruptData`] if the bytes cannot be decoded at all.
    /// - [`Error::InvalidFormat`] if the decoded value lacks array-shaped
    ///   `embeddings` and `data` fields, if rows are ragged or empty, if
    ///   numbers do not fit `T`, or if the two lengths differ.
    /// - [`Error::DimensionMismatch`] if the config pins a different dimension.
    pub fn load(&mut self, bytes: &[u8]) -> Result<()>
    where
        P: DeserializeOwned,
    {
        let staged = self.stage_load(bytes)?;
        self.install(staged);
        Ok(())
    }

    /// Decodes and validates `bytes` without touching the store.
    pub(crate) fn stage_load(&self, bytes: &[u8]) -> Result<StagedLoad<T, P>>
    where
        P: DeserializeOwned,
    {
        if let Err(e) = self.codec.check(bytes) {
            tracing::warn!(codec = self.codec.name(), bytes = bytes.len(), error = %e, "rejected undecodable snapshot");
            return Err(Error::CorruptData(e.to_string()));
        }

        let snapshot: Snapshot<T, P> = self.codec.decode(bytes).map_err(|e| {
            tracing::warn!(codec = self.codec.name(), error = %e, "rejected malformed snapshot");
            Error::InvalidFormat(e.message)
        })?;

        if snapshot.embeddings.len() != snapshot.data.len() {
            return Err(Error::InvalidFormat(format!(
                "embeddings has {} rows but data has {} entries",
                snapshot.embeddings.len(),
                snapshot.data.len()
            )));
        }

        if snapshot.embeddings.is_empty() {
            return Ok(StagedLoad {
                matrix: None,
                payloads: snapshot.data,
            });
        }

        let matrix = EmbeddingMatrix::from_rows(snapshot.embeddings).map_err(|e| match e {
            Error::DimensionMismatch { expected, got } => Error::InvalidFormat(format!(
                "embeddings rows are ragged: expected width {}, found {}",
                expected, got
            )),
            Error::EmptyEmbedding => Error::InvalidFormat("embeddings rows are empty".into()),
            other => other,
        })?;

        if let Some(pinned) = self.config.dimension {
            if matrix.dimension() != pinned {
                return Err(Error::DimensionMismatch {
                    expected: pinned,
                    got: matrix.dimension(),
                });
            }
        }

        Ok(StagedLoad {
            matrix: Some(matrix),
            payloads: snapshot.data,
        })
    }

    /// Swaps a staged snapshot in. The previous matrix is dropped here.
    pub(crate) fn install(&mut self, staged: StagedLoad<T, P>) {
        let rows = staged.rows();
        self.matrix = staged.matrix;
        self.payloads = staged.payloads;
        tracing::debug!(
            rows,
            dimension = self.dimension(),
            kind = %T::KIND,
            codec = self.codec.name(),
            "loaded store"
        );
    }
}
