use crate::embedding::EmbeddingError;
use crate::transcript::TranscriptError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Malformed transcript line {line}: {content:?}")]
    MalformedLine { line: usize, content: String },
    #[error("Failed to read transcript: {0}")]
    Transcript(#[source] TranscriptError),
    #[error("Model has not been trained")]
    NotTrained,
    #[error("Model persistence failed: {0}")]
    PersistenceFailure(#[source] EmbeddingError),
    #[error("Could not answer message: {0}")]
    InferenceFailure(String),
}

pub type Result<T> = std::result::Result<T, BotError>;

impl From<TranscriptError> for BotError {
    fn from(err: TranscriptError) -> Self {
        match err {
            TranscriptError::MalformedLine { line, content, .. } => {
                BotError::MalformedLine { line, content }
            }
            other => BotError::Transcript(other),
        }
    }
}

impl From<EmbeddingError> for BotError {
    fn from(err: EmbeddingError) -> Self {
        match err {
            EmbeddingError::ModelNotFound { .. }
            | EmbeddingError::Persistence { .. }
            | EmbeddingError::Corrupt { .. } => BotError::PersistenceFailure(err),
            EmbeddingError::VocabularyNotBuilt => BotError::NotTrained,
            EmbeddingError::InvalidInput { .. } | EmbeddingError::DimensionMismatch { .. } => {
                BotError::InferenceFailure(err.to_string())
            }
            EmbeddingError::EmptyCorpus
            | EmbeddingError::EmptyVocabulary
            | EmbeddingError::TrainingBuffersDiscarded
            | EmbeddingError::UnknownTag { .. }
            | EmbeddingError::InvalidConfig { .. } => BotError::InvalidArgument(err.to_string()),
        }
    }
}
