//! Bot configuration file.
//!
//! ```toml
//! my_name = "Alice"
//! friend_name = "Bob"
//! transcript = "chats/bob.txt"
//! remove_stop_words = false
//! model_dir = "models"
//!
//! [training]
//! max_epochs = 100
//! vector_size = 100
//! alpha = 0.025
//! ```

use crate::bot::{ResponseModel, Result as BotResult};
use crate::embedding::TrainingConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    pub my_name: String,
    pub friend_name: String,
    pub transcript: PathBuf,
    #[serde(default)]
    pub remove_stop_words: bool,
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,
    #[serde(default)]
    pub training: TrainingConfig,
}

fn default_model_dir() -> PathBuf {
    PathBuf::from(".")
}

impl BotConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Build the bot this config describes. Relative transcript and model
    /// paths resolve against `base`, usually the config file's directory.
    pub fn build(&self, base: &Path) -> BotResult<ResponseModel> {
        let bot = ResponseModel::new(
            self.my_name.as_str(),
            self.friend_name.as_str(),
            base.join(&self.transcript),
            self.remove_stop_words,
        )?;
        Ok(bot.with_model_dir(base.join(&self.model_dir)))
    }
}
