#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
#![deny(missing_docs, unused_must_use)]

//! N-gram training data pipeline: lazy one-hot batches for a next-token
//! model, and the generation loop that decodes its output.
//!
//! raw text -> `tokenize` -> vocabulary -> frequency filter ->
//! `sequence::index_samples` -> `batch::BatchGenerator` (one-hot per batch).
//!
//! Layout (important files):
//! - `context.rs` — `PipelineContext`, owns one run's derived state
//! - `batch.rs` — `BatchGenerator` / `Epoch`, the pull-based batch producer
//! - `codec.rs` — token <-> index <-> one-hot, arg-max / temperature decode
//! - `store.rs` — vocabulary persistence (JSON)
//! - `generate.rs` — `NextTokenModel` seam and the generation loop
//! - `bin/ngram.rs` — CLI driver

/// Tiny bigram model used when no trained network is at hand.
pub mod baseline;
/// Lazy batch generation.
pub mod batch;
/// Token, index and one-hot conversions.
pub mod codec;
/// Run configuration.
pub mod config;
/// Per-run pipeline state.
pub mod context;
/// Corpus loading.
pub mod corpus;
/// Error type.
pub mod error;
/// Generation loop.
pub mod generate;
/// Context-window indexing.
pub mod sequence;
/// Vocabulary persistence.
pub mod store;

pub use baseline::CountingModel;
pub use batch::{Batch, BatchGenerator, Epoch};
pub use codec::{index_to_one_hot, Codec};
pub use config::{resolve_window_len, PipelineConfig, SaveFailurePolicy};
pub use context::PipelineContext;
pub use corpus::load_corpus;
pub use error::PipelineError;
pub use generate::{Generator, NextTokenModel};
pub use sampler::Strategy;
pub use sequence::{index_samples, Sample};
pub use store::VocabularyStore;
pub use tokenize::{detokenize, tokenize, FrequencyTable, Vocabulary};
