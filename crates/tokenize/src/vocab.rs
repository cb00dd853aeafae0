#![forbid(unsafe_code)]

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::TokenizeError;

/// Ordered set of unique tokens. A token's position is its index.
///
/// The vocabulary has no mutating API: a new corpus or a new frequency
/// threshold builds a new value. It serializes as a plain JSON array of
/// strings and rejects duplicates when read back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    tokens: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Collect the unique tokens of `tokens` in first-seen order.
    pub fn build<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut vocab = Self::default();
        for t in tokens {
            let t = t.as_ref();
            if !vocab.index.contains_key(t) {
                vocab.index.insert(t.to_string(), vocab.tokens.len());
                vocab.tokens.push(t.to_string());
            }
        }
        vocab
    }

    /// Wrap an already de-duplicated token list, keeping its order.
    pub fn from_tokens(tokens: Vec<String>) -> Result<Self, TokenizeError> {
        let mut index = HashMap::with_capacity(tokens.len());
        for (i, t) in tokens.iter().enumerate() {
            if index.insert(t.clone(), i).is_some() {
                return Err(TokenizeError::DuplicateToken(t.clone()));
            }
        }
        Ok(Self { tokens, index })
    }

    /// Index of `token`, or `None` when the token is not in the vocabulary.
    pub fn token_to_index(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    /// Token stored at `index`.
    pub fn index_to_token(&self, index: usize) -> Result<&str, TokenizeError> {
        self.tokens
            .get(index)
            .map(String::as_str)
            .ok_or(TokenizeError::IndexOutOfRange {
                index,
                len: self.tokens.len(),
            })
    }

    /// Whether `token` has an index.
    pub fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True for the empty vocabulary.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens in index order.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Iterate `(index, token)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.tokens.iter().map(String::as_str).enumerate()
    }
}

impl TryFrom<Vec<String>> for Vocabulary {
    type Error = TokenizeError;

    fn try_from(tokens: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_tokens(tokens)
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocab: Vocabulary) -> Self {
        vocab.tokens
    }
}
