#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
#![deny(missing_docs, unused_must_use)]

//! Corpus normalization and vocabulary building for n-gram training data.
//!
//! Contract: identical input text -> identical token stream -> identical
//! vocabulary (first-seen order). Nothing here holds global state; every
//! value is owned by the caller.
//!
//! Layout:
//! - `tokenizer.rs` — normalize + split text, and rebuild text from tokens
//! - `vocab.rs` — `Vocabulary` with stable token <-> index lookups
//! - `frequency.rs` — `FrequencyTable` and the minimum-frequency filter

/// Error type shared by the tokenize modules.
pub mod error;
/// Token counting and minimum-frequency filtering.
pub mod frequency;
/// Text normalization, splitting and reconstruction.
pub mod tokenizer;
/// Indexed, de-duplicated token set.
pub mod vocab;

pub use error::TokenizeError;
pub use frequency::{filter_by_frequency, filter_with_table, FilterOutcome, FrequencyTable};
pub use tokenizer::{detokenize, is_sentence_terminal, is_trailing_separator, tokenize};
pub use vocab::Vocabulary;
