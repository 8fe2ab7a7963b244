//! Answer like your friend would.
//!
//! Pairs every message you sent in an exported chat with the reply that came
//! back, learns paragraph vectors for your messages and, given a new message,
//! returns the reply that followed the most similar one.
//!
//! ```no_run
//! use mimicbot::ResponseModel;
//!
//! let mut bot = ResponseModel::new("Alice", "Bob", "chat.txt", false)?;
//! bot.train(100, 100, 0.025)?;
//! println!("{}", bot.message("are you free tonight?")?);
//! # Ok::<(), mimicbot::BotError>(())
//! ```

pub mod bot;
pub mod config;
pub mod embedding;
pub mod preprocessing;
pub mod transcript;

pub use bot::{BotError, ResponseModel};
pub use config::BotConfig;
pub use embedding::TrainingConfig;
pub use transcript::{ExamplePairs, TranscriptExtractor};
