pub mod stopwords;
pub mod tokenizer;

pub use tokenizer::Tokenizer;

use serde::{Deserialize, Serialize};

/// Turns raw message text into the token sequence the embedding model sees.
/// The same instance must be used for training prompts and incoming messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preprocessor {
    pub remove_stop_words: bool,
}

impl Preprocessor {
    pub fn new(remove_stop_words: bool) -> Self {
        Self { remove_stop_words }
    }

    /// Lowercase, tokenize, then optionally drop English stopwords.
    pub fn process(&self, text: &str) -> Vec<String> {
        let tokens = Tokenizer::tokenize(&text.to_lowercase());
        if !self.remove_stop_words {
            return tokens;
        }
        tokens
            .into_iter()
            .filter(|token| !stopwords::is_stopword(token))
            .collect()
    }
}
