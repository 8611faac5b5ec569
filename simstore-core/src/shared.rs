//! Thread-safe store handle.
//!
//! A `SharedStore` wraps one [`EmbeddingStore`] behind a single `RwLock`:
//! - Writers (`append`, `load`, `clear`) hold the write lock for the whole
//!   mutation, so readers never see a matrix and payload list out of step
//! - Readers (`search`, `dump`, accessors) share the read lock
//! - `load` decodes outside the lock and only swaps under it

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::{Codec, MessagePack};
use crate::config::StoreConfig;
use crate::element::Element;
use crate::error::Result;
use crate::search::{SearchOptions, SearchResult};
use crate::store::EmbeddingStore;
use crate::vector::Embedding;

/// A store that can be shared between threads, e.g. inside an `Arc`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use simstore_core::{SearchOptions, SharedStore};
///
/// let store: Arc<SharedStore<f32, u64>> = Arc::new(SharedStore::new());
///
/// let writer = {
///     let store = Arc::clone(&store);
///     std::thread::spawn(move || {
///         for i in 0..10u64 {
///             store.append(vec![(vec![1.0, i as f32], i)]).unwrap();
///         }
///     })
/// };
/// writer.join().unwrap();
///
/// let results = store.search(&[1.0, 0.0], &SearchOptions::default()).unwrap();
/// assert_eq!(results[0].payload, 0);
/// assert_eq!(store.len(), 10);
/// ```
#[derive(Debug)]
pub struct SharedStore<T, P, C = MessagePack> {
    inner: RwLock<EmbeddingStore<T, P, C>>,
}

impl<T: Element, P> SharedStore<T, P, MessagePack> {
    /// Creates an empty shared store with the default config.
    pub fn new() -> Self {
        Self::from_store(EmbeddingStore::new())
    }

    /// Creates an empty shared store with the given config.
    pub fn with_config(config: StoreConfig) -> Result<Self> {
        Ok(Self::from_store(EmbeddingStore::with_config(config)?))
    }
}

impl<T: Element, P> Default for SharedStore<T, P, MessagePack> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element, P, C: Codec> SharedStore<T, P, C> {
    /// Wraps an existing store.
    pub fn from_store(store: EmbeddingStore<T, P, C>) -> Self {
        Self {
            inner: RwLock::new(store),
        }
    }

    /// Unwraps the inner store.
    pub fn into_inner(self) -> EmbeddingStore<T, P, C> {
        self.inner.into_inner()
    }

    /// Appends a batch atomically. See [`EmbeddingStore::append`].
    pub fn append<I, E>(&self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = (E, P)>,
        E: Into<Embedding<T>>,
    {
        // Convert outside the lock; only validation and the swap need it.
        let items: Vec<(Embedding<T>, P)> = items
            .into_iter()
            .map(|(embedding, payload)| (embedding.into(), payload))
            .collect();
        self.inner.write().append(items)
    }

    /// Replaces the store's contents atomically. See [`EmbeddingStore::load`].
    pub fn load(&self, bytes: &[u8]) -> Result<()>
    where
        P: DeserializeOwned,
    {
        let staged = self.inner.read().stage_load(bytes)?;
        self.inner.write().install(staged);
        Ok(())
    }

    /// Encodes a consistent snapshot. See [`EmbeddingStore::dump`].
    pub fn dump(&self) -> Result<Vec<u8>>
    where
        P: Serialize,
    {
        self.inner.read().dump()
    }

    /// Searches a consistent snapshot. See [`EmbeddingStore::search`].
    pub fn search(&self, query: &[T], options: &SearchOptions) -> Result<Vec<SearchResult<P>>>
    where
        P: Clone,
    {
        self.inner.read().search(query, options)
    }

    /// Searches with the config's default options.
    pub fn search_default(&self, query: &[T]) -> Result<Vec<SearchResult<P>>>
    where
        P: Clone,
    {
        self.inner.read().search_default(query)
    }

    /// Gets a copy of the embedding and payload at `index`.
    pub fn get(&self, index: usize) -> Option<(Vec<T>, P)>
    where
        P: Clone,
    {
        let store = self.inner.read();
        store.get(index).map(|(row, p)| (row.to_vec(), p.clone()))
    }

    /// Removes every item.
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns true if empty.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Returns the established dimensionality, or `0`.
    pub fn dimension(&self) -> usize {
        self.inner.read().dimension()
    }

    /// Runs `f` against the store under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&EmbeddingStore<T, P, C>) -> R) -> R {
        f(&self.inner.read())
    }
}

// Async API when tokio feature is enabled
#[cfg(feature = "async")]
mod async_api {
    use super::*;
    use crate::error::Error;
    use std::sync::Arc;

    fn join_error(e: tokio::task::JoinError) -> Error {
        Error::TaskFailed(format!("spawn_blocking failed: {}", e))
    }

    /// Async wrapper for [`SharedStore`].
    ///
    /// Runs every operation on tokio's blocking pool via `spawn_blocking`,
    /// since scoring and codec work are CPU bound.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use simstore_core::{AsyncStore, SearchOptions};
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let store: AsyncStore<f32, String> = AsyncStore::new();
    ///     store.append(vec![(vec![0.1; 384], "doc".to_string())]).await.unwrap();
    ///     let results = store.search(vec![0.1; 384], SearchOptions::default()).await.unwrap();
    /// }
    /// ```
    pub struct AsyncStore<T, P, C = MessagePack> {
        inner: Arc<SharedStore<T, P, C>>,
    }

    impl<T, P, C> Clone for AsyncStore<T, P, C> {
        fn clone(&self) -> Self {
            Self {
                inner: Arc::clone(&self.inner),
            }
        }
    }

    impl<T: Element, P: Send + Sync + 'static> AsyncStore<T, P, MessagePack> {
        /// Creates an empty async store with the default config.
        pub fn new() -> Self {
            Self::from_sync(SharedStore::new())
        }
    }

    impl<T: Element, P: Send + Sync + 'static> Default for AsyncStore<T, P, MessagePack> {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<T, P, C> AsyncStore<T, P, C>
    where
        T: Element,
        P: Send + Sync + 'static,
        C: Codec + 'static,
    {
        /// Wraps an existing shared store.
        pub fn from_sync(store: SharedStore<T, P, C>) -> Self {
            Self {
                inner: Arc::new(store),
            }
        }

        /// Appends a batch asynchronously.
        pub async fn append(&self, items: Vec<(Vec<T>, P)>) -> Result<()> {
            let inner = Arc::clone(&self.inner);
            tokio::task::spawn_blocking(move || inner.append(items))
                .await
                .map_err(join_error)?
        }

        /// Loads a snapshot asynchronously.
        pub async fn load(&self, bytes: Vec<u8>) -> Result<()>
        where
            P: DeserializeOwned,
        {
            let inner = Arc::clone(&self.inner);
            tokio::task::spawn_blocking(move || inner.load(&bytes))
                .await
                .map_err(join_error)?
        }

        /// Dumps a snapshot asynchronously.
        pub async fn dump(&self) -> Result<Vec<u8>>
        where
            P: Serialize,
        {
            let inner = Arc::clone(&self.inner);
            tokio::task::spawn_blocking(move || inner.dump())
                .await
                .map_err(join_error)?
        }

        /// Searches asynchronously.
        pub async fn search(
            &self,
            query: Vec<T>,
            options: SearchOptions,
        ) -> Result<Vec<SearchResult<P>>>
        where
            P: Clone,
        {
            let inner = Arc::clone(&self.inner);
            tokio::task::spawn_blocking(move || inner.search(&query, &options))
                .await
                .map_err(join_error)?
        }

        /// Returns the number of items.
        pub fn len(&self) -> usize {
            self.inner.len()
        }

        /// Returns true if empty.
        pub fn is_empty(&self) -> bool {
            self.inner.is_empty()
        }

        /// Returns the established dimensionality, or `0`.
        pub fn dimension(&self) -> usize {
            self.inner.dimension()
        }

        /// Gets a copy of the embedding and payload at `index`.
        pub fn get(&self, index: usize) -> Option<(Vec<T>, P)>
        where
            P: Clone,
        {
            self.inner.get(index)
        }

        /// Removes every item.
        pub fn clear(&self) {
            self.inner.clear();
        }

        /// Returns reference to inner sync store.
        pub fn inner(&self) -> &SharedStore<T, P, C> {
            &self.inner
        }
    }
}

#[cfg(feature = "async")]
pub use async_api::AsyncStore;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_shared_append_and_search() {
        let store: SharedStore<f32, &str> = SharedStore::new();
        store
            .append(vec![(vec![1.0, 0.0], "a"), (vec![0.0, 1.0], "b")])
            .unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.dimension(), 2);

        let results = store.search(&[0.0, 1.0], &SearchOptions::default()).unwrap();
        assert_eq!(results[0].payload, "b");
        assert_eq!(store.get(0), Some((vec![1.0, 0.0], "a")));
        assert_eq!(store.get(usize::MAX), None);
    }

    #[test]
    fn test_shared_failed_append_is_invisible() {
        let store: SharedStore<f32, u32> = SharedStore::new();
        store.append(vec![(vec![1.0, 0.0], 0)]).unwrap();
        let result = store.append(vec![(vec![1.0, 0.0], 1), (vec![1.0], 2)]);
        assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_shared_load_and_dump() {
        let source: SharedStore<f32, String> = SharedStore::new();
        source
            .append(vec![(vec![0.5, 0.5], "x".to_string())])
            .unwrap();
        let bytes = source.dump().unwrap();

        let target: SharedStore<f32, String> = SharedStore::new();
        target.load(&bytes).unwrap();
        assert_eq!(target.get(0), Some((vec![0.5, 0.5], "x".to_string())));

        target.clear();
        assert!(target.is_empty());
        assert!(matches!(target.dump(), Err(Error::EmptyStore)));
    }

    #[test]
    fn test_concurrent_readers_see_consistent_snapshots() {
        let store: Arc<SharedStore<f32, usize>> = Arc::new(SharedStore::new());
        store.append(vec![(vec![1.0, 0.0, 0.0], 0usize)]).unwrap();

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 1..200usize {
                    let batch: Vec<(Vec<f32>, usize)> = (0..3)
                        .map(|j| (vec![1.0, i as f32, j as f32], i * 3 + j))
                        .collect();
                    store.append(batch).unwrap();
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..200 {
                        store.read(|s| {
                            let rows = s.matrix().map(|m| m.rows()).unwrap_or(0);
                            assert_eq!(rows, s.payloads().len());
                        });
                        let options = SearchOptions::new()
                            .with_minimum_score(-1.0)
                            .with_maximum_results(usize::MAX);
                        let results = store.search(&[1.0, 0.0, 0.0], &options).unwrap();
                        assert!(!results.is_empty());
                        assert_eq!((results.len() - 1) % 3, 0);
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(store.len(), 1 + 199 * 3);
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_async_store() {
        let store: AsyncStore<f32, String> = AsyncStore::new();
        store
            .append(vec![
                (vec![1.0, 0.0], "a".to_string()),
                (vec![0.0, 1.0], "b".to_string()),
            ])
            .await
            .unwrap();
        assert_eq!(store.len(), 2);

        let results = store
            .search(vec![1.0, 0.0], SearchOptions::default())
            .await
            .unwrap();
        assert_eq!(results[0].payload, "a");

        let bytes = store.dump().await.unwrap();
        let copy: AsyncStore<f32, String> = AsyncStore::new();
        copy.load(bytes).await.unwrap();
        assert_eq!(copy.inner().get(1), Some((vec![0.0, 1.0], "b".to_string())));
        assert_eq!(copy.get(0), Some((vec![1.0, 0.0], "a".to_string())));
        assert_eq!(copy.get(usize::MAX), None);
        assert_eq!(copy.dimension(), 2);

        copy.clear();
        assert!(copy.is_empty());
        assert_eq!(copy.dimension(), 0);
        assert_eq!(store.len(), 2);
    }
}
