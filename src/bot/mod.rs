//! A bot that answers like one particular chat partner.
//!
//! Built from an exported two-person chat: every (my message, their reply)
//! pair becomes a training example. Incoming messages are embedded and
//! matched against my historical messages; the reply that followed the
//! closest one is returned.

pub mod error;

pub use error::{BotError, Result};

use crate::embedding::{Doc2Vec, TaggedExample, TrainingConfig};
use crate::preprocessing::Preprocessor;
use crate::transcript::{ExamplePairs, TranscriptExtractor};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

const MODEL_SUFFIX: &str = "_doc2vec.model";

pub struct ResponseModel {
    my_name: String,
    friend_name: String,
    pairs: ExamplePairs,
    tagged_examples: Vec<TaggedExample>,
    preprocessor: Preprocessor,
    model_dir: PathBuf,
    model: Option<Doc2Vec>,
}

impl ResponseModel {
    /// Load a chat export from `transcript` and prepare training examples.
    pub fn new<P: AsRef<Path>>(
        my_name: impl Into<String>,
        friend_name: impl Into<String>,
        transcript: P,
        remove_stop_words: bool,
    ) -> Result<Self> {
        let (my_name, friend_name) = Self::check_names(my_name.into(), friend_name.into())?;
        let pairs = TranscriptExtractor::extract_file(transcript, &my_name)?;
        Ok(Self::from_pairs(my_name, friend_name, pairs, remove_stop_words))
    }

    /// Same as [`ResponseModel::new`] for a transcript already in memory.
    pub fn from_lines<I, S>(
        my_name: impl Into<String>,
        friend_name: impl Into<String>,
        lines: I,
        remove_stop_words: bool,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (my_name, friend_name) = Self::check_names(my_name.into(), friend_name.into())?;
        let pairs = TranscriptExtractor::extract(lines, &my_name)?;
        Ok(Self::from_pairs(my_name, friend_name, pairs, remove_stop_words))
    }

    /// Directory the model artifact is written to and read from.
    pub fn with_model_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.model_dir = dir.into();
        self
    }

    fn check_names(my_name: String, friend_name: String) -> Result<(String, String)> {
        if my_name.trim().is_empty() {
            return Err(BotError::InvalidArgument(
                "my_name must be a non-empty string".to_string(),
            ));
        }
        if friend_name.trim().is_empty() {
            return Err(BotError::InvalidArgument(
                "friend_name must be a non-empty string".to_string(),
            ));
        }
        Ok((my_name, friend_name))
    }

    fn from_pairs(
        my_name: String,
        friend_name: String,
        pairs: ExamplePairs,
        remove_stop_words: bool,
    ) -> Self {
        let preprocessor = Preprocessor::new(remove_stop_words);
        let tagged_examples: Vec<TaggedExample> = pairs
            .prompts()
            .iter()
            .enumerate()
            .map(|(tag, prompt)| TaggedExample::new(preprocessor.process(prompt), tag))
            .collect();

        debug!(pairs = pairs.len(), friend = %friend_name, "examples tagged");

        Self {
            my_name,
            friend_name,
            pairs,
            tagged_examples,
            preprocessor,
            model_dir: PathBuf::from("."),
            model: None,
        }
    }

    /// Train with the three main knobs, everything else at its default.
    pub fn train(&mut self, max_epochs: usize, vec_size: usize, alpha: f32) -> Result<()> {
        self.train_with(&TrainingConfig::new(max_epochs, vec_size, alpha))
    }

    /// Train, persist to [`ResponseModel::model_path`], then serve from the
    /// reloaded artifact.
    #[instrument(skip(self, config), fields(friend = %self.friend_name))]
    pub fn train_with(&mut self, config: &TrainingConfig) -> Result<()> {
        if self.tagged_examples.is_empty() {
            return Err(BotError::InvalidArgument(
                "transcript produced no (prompt, reply) pairs to train on".to_string(),
            ));
        }

        let mut model = Doc2Vec::new(config.clone())?;
        model.build_vocab(&self.tagged_examples)?;

        let every = config.progress_every.max(1);
        for (epoch, rate) in config.schedule().enumerate() {
            if epoch % every == 0 {
                info!("Iteration: {} / {}", epoch, config.max_epochs);
            }
            model.train(&self.tagged_examples, rate, config.passes_per_epoch)?;
        }

        model.set_preprocessor(self.preprocessor);
        let path = self.model_path();
        model.save(&path)?;
        let mut model = Doc2Vec::load(&path)?;
        model.discard_training_buffers();

        info!("Iteration: {} / {}", config.max_epochs, config.max_epochs);
        info!(path = %path.display(), "Model saved");

        self.model = Some(model);
        Ok(())
    }

    /// Reuse an artifact written by an earlier [`ResponseModel::train`].
    pub fn load_trained(&mut self) -> Result<()> {
        let path = self.model_path();
        let mut model = Doc2Vec::load(&path)?;
        if model.doc_count() != self.pairs.len() {
            return Err(BotError::InvalidArgument(format!(
                "{} holds {} documents but the transcript has {} pairs",
                path.display(),
                model.doc_count(),
                self.pairs.len()
            )));
        }
        if model.preprocessor() != self.preprocessor {
            return Err(BotError::InvalidArgument(format!(
                "{} was trained with remove_stop_words = {}, this bot uses {}",
                path.display(),
                model.preprocessor().remove_stop_words,
                self.preprocessor.remove_stop_words
            )));
        }
        model.discard_training_buffers();
        info!(path = %path.display(), "Model loaded");
        self.model = Some(model);
        Ok(())
    }

    /// The reply that followed the most similar message I sent,
    /// as `"<friend_name>: <reply>"`.
    pub fn message(&self, text: &str) -> Result<String> {
        let model = self.model.as_ref().ok_or(BotError::NotTrained)?;

        let tokens = self.preprocessor.process(text);
        if tokens.is_empty() {
            return Err(BotError::InferenceFailure(
                "message has no tokens left after preprocessing".to_string(),
            ));
        }

        let vector = model.infer_vector(&tokens, model.config().infer_epochs)?;
        let nearest = model.most_similar(&vector)?;
        let reply = self.pairs.replies().get(nearest.tag).ok_or_else(|| {
            BotError::InferenceFailure(format!("nearest document {} has no reply", nearest.tag))
        })?;

        debug!(tag = nearest.tag, similarity = nearest.similarity, "nearest prompt");
        Ok(format!("{}: {}", self.friend_name, reply))
    }

    /// `<model_dir>/<friend_name>_doc2vec.model`
    pub fn model_path(&self) -> PathBuf {
        self.model_dir.join(format!("{}{}", self.friend_name, MODEL_SUFFIX))
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    pub fn my_name(&self) -> &str {
        &self.my_name
    }

    pub fn friend_name(&self) -> &str {
        &self.friend_name
    }

    pub fn remove_stop_words(&self) -> bool {
        self.preprocessor.remove_stop_words
    }

    pub fn pairs(&self) -> &ExamplePairs {
        &self.pairs
    }

    pub fn prompts(&self) -> &[String] {
        self.pairs.prompts()
    }

    pub fn replies(&self) -> &[String] {
        self.pairs.replies()
    }

    pub fn tagged_examples(&self) -> &[TaggedExample] {
        &self.tagged_examples
    }
}

#[cfg(test)]
mod tests;
