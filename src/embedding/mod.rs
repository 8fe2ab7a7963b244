use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config;
pub mod doc2vec;
pub mod index;
pub mod persist;
pub mod vocab;

pub use config::{LearningRate, TrainingConfig};
pub use doc2vec::Doc2Vec;
pub use index::{cosine_similarity, DocIndex, Neighbor};
pub use vocab::{NoiseTable, Vocabulary};

/**
 * Paragraph-vector embeddings for short chat messages.
 *
 * Trains document vectors over tagged token sequences, infers vectors for
 * unseen messages and answers nearest-neighbour queries against the trained
 * set. The model persists to a single checksummed file.
 */

#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("No tagged examples to train on")]
    EmptyCorpus,
    #[error("Vocabulary is empty: no example contains a usable token")]
    EmptyVocabulary,
    #[error("Vocabulary has not been built")]
    VocabularyNotBuilt,
    #[error("Training buffers were discarded, the model only supports inference")]
    TrainingBuffersDiscarded,
    #[error("Example tag {tag} is outside the {count} known documents")]
    UnknownTag { tag: usize, count: usize },
    #[error("Invalid training configuration: {details}")]
    InvalidConfig { details: String },
    #[error("Invalid input: {details}")]
    InvalidInput { details: String },
    #[error("Vector has dimension {found}, model expects {expected}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("Model file not found: {path}")]
    ModelNotFound { path: String },
    #[error("Failed to persist model at {path}: {reason}")]
    Persistence { path: String, reason: String },
    #[error("Model file {path} is corrupt: {reason}")]
    Corrupt { path: String, reason: String },
}

pub type Result<T> = std::result::Result<T, EmbeddingError>;

/// A token sequence and the position of the example it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedExample {
    pub tokens: Vec<String>,
    pub tag: usize,
}

impl TaggedExample {
    pub fn new(tokens: Vec<String>, tag: usize) -> Self {
        Self { tokens, tag }
    }
}
