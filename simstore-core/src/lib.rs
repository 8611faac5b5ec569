//! # simstore Core
//!
//! Core library for simstore — an in-memory store of embeddings and their
//! payloads, searched by exact cosine similarity.
//!
//! ## Crate Features
//!
//! - `async` - Enables [`AsyncStore`] for tokio-compatible async operations
//!
//! ## Core Types
//!
//! ### Stores
//!
//! - [`EmbeddingStore`] - Single-owner store: append, search, dump, load
//! - [`SharedStore`] - `RwLock`-guarded store for use across threads
//! - [`AsyncStore`] - Async wrapper for tokio compatibility (requires `async` feature)
//!
//! ### Search
//!
//! - [`SearchOptions`] - Minimum score and result cap
//! - [`SearchResult`] - Ranked hit with score and payload
//!
//! ### Serialization
//!
//! - [`Codec`] - Encode/decode capability used by dump and load
//! - [`MessagePack`] - Default compact, self-describing codec
//! - [`Json`] - Human-readable codec
//!
//! ### Types
//!
//! - [`Embedding`] - Owned, typed embedding vector
//! - [`Element`] - Numeric component kinds (`f32`, `i64`, ...)
//! - [`EmbeddingMatrix`] - Row-major storage for all embeddings
//! - [`StoreConfig`] - Pinned dimension and default search options

pub mod codec;
pub mod config;
pub mod element;
pub mod error;
pub mod matrix;
pub mod search;
pub mod shared;
pub mod similarity;
pub mod store;
pub mod vector;

// Re-exports for convenient access
pub use codec::{Codec, CodecError, Json, MessagePack};
pub use config::StoreConfig;
pub use element::{Element, ElementKind};
pub use error::{Error, Result};
pub use matrix::EmbeddingMatrix;
pub use search::{SearchOptions, SearchResult};
#[cfg(feature = "async")]
pub use shared::AsyncStore;
pub use shared::SharedStore;
pub use similarity::cosine_similarity;
pub use store::EmbeddingStore;
pub use vector::Embedding;

/// Re-export commonly used types for convenience.
///
/// # Example
///
/// ```rust
/// use simstore_core::prelude::*;
///
/// let mut store: EmbeddingStore<f32, &str> = EmbeddingStore::new();
/// store.append(vec![(vec![1.0, 2.0, 3.0], "doc")]).unwrap();
/// let results = store.search(&[1.0, 2.0, 3.0], &SearchOptions::default()).unwrap();
/// assert_eq!(results[0].payload, "doc");
/// ```
pub mod prelude {
    pub use crate::{
        Codec, Element, Embedding, EmbeddingStore, Error, Json, MessagePack, Result,
        SearchOptions, SearchResult, SharedStore, StoreConfig,
    };
}
