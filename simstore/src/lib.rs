//! # simstore
//!
//! **An in-memory store of embeddings and their payloads, searched by exact
//! cosine similarity.**
//!
//! simstore keeps a growable matrix of fixed-dimension embeddings next to an
//! ordered list of arbitrary payloads and answers nearest-neighbour queries
//! by brute force. It is built for:
//!
//! - **RAG prototypes** — Retrieve context snippets for an LLM prompt
//! - **Semantic search** — Rank documents against an embedded query
//! - **Small to mid-sized corpora** — Up to low millions of vectors in memory
//!
//! ## Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | **Exact search** | Cosine similarity over every row, 100% recall |
//! | **Deterministic ranking** | Score descending, insertion order on ties |
//! | **Typed embeddings** | One numeric kind per store: `f32`, `f64`, `i8` ... `u32` |
//! | **Any payload** | Strings, numbers, structs, `serde_json::Value` |
//! | **Snapshots** | `dump`/`load` through MessagePack or JSON |
//! | **Async API** | Tokio-compatible async operations (feature flag) |
//!
//! ## Quick Start
//!
//! ```rust
//! use simstore::prelude::*;
//!
//! let mut store: EmbeddingStore<f32, String> = EmbeddingStore::new();
//!
//! store.append(vec![
//!     (vec![1.0, 0.0], "a".to_string()),
//!     (vec![0.0, 1.0], "b".to_string()),
//!     (vec![1.0, 1.0], "c".to_string()),
//! ])?;
//!
//! // Best match first
//! let results = store.search(&[1.0, 0.0], &SearchOptions::default())?;
//! let ranked: Vec<&str> = results.iter().map(|r| r.payload.as_str()).collect();
//! assert_eq!(ranked, ["a", "c", "b"]);
//!
//! // Drop weak matches
//! let options = SearchOptions::new().with_minimum_score(0.5);
//! assert_eq!(store.search(&[1.0, 0.0], &options)?.len(), 2);
//! # Ok::<(), simstore::Error>(())
//! ```
//!
//! ### Snapshots
//!
//! A snapshot is one self-describing buffer with two fields, `embeddings`
//! (rows × dimension) and `data` (one payload per row):
//!
//! ```rust
//! use simstore::prelude::*;
//!
//! let store: EmbeddingStore<f32, u32> =
//!     EmbeddingStore::from_items((0..100u32).map(|i| (vec![1.0, i as f32], i)))?;
//!
//! let bytes = store.dump()?;
//!
//! let mut restored: EmbeddingStore<f32, u32> = EmbeddingStore::new();
//! restored.load(&bytes)?;
//! assert_eq!(restored.payloads(), store.payloads());
//! # Ok::<(), simstore::Error>(())
//! ```
//!
//! ### Structured Payloads
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use simstore::prelude::*;
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct Chunk {
//!     source: String,
//!     text: String,
//! }
//!
//! let config = StoreConfig::new()
//!     .with_dimension(3)
//!     .with_search(SearchOptions::new().with_maximum_results(1));
//! let mut store: EmbeddingStore<f32, Chunk> = EmbeddingStore::with_config(config)?;
//!
//! store.append_one(vec![0.9, 0.1, 0.0], Chunk { source: "a.md".into(), text: "ownership".into() })?;
//! store.append_one(vec![0.0, 0.3, 0.7], Chunk { source: "b.md".into(), text: "borrowing".into() })?;
//!
//! let best = store.search_default(&[0.0, 0.2, 0.8])?;
//! assert_eq!(best[0].payload.source, "b.md");
//! # Ok::<(), simstore::Error>(())
//! ```
//!
//! ## Crate Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `async` | Enables `AsyncStore` for tokio compatibility |
//!
//! ## Architecture
//!
//! simstore is organized into two crates:
//!
//! - **`simstore-core`** — Core library with no async runtime dependency
//! - **`simstore`** — Main crate that re-exports everything
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T>`](crate::Result), which uses
//! the [`Error`] enum. A failed `append` or `load` leaves the store
//! unchanged.
//!
//! ## Thread Safety
//!
//! - [`EmbeddingStore`] is not synchronized; use external synchronization
//! - [`SharedStore`] guards the whole store with one `RwLock`
//! - `AsyncStore` is `Clone` and safe to share across tasks

// Re-export everything from core
pub use simstore_core::*;
