//! Chat-log parsing: raw export lines in, paired examples out.

pub mod extractor;
pub mod line;

pub use extractor::{ExamplePairs, TranscriptExtractor};
pub use line::{parse_line, LineError, ParsedLine, TranscriptLine};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("Malformed line {line}: {reason} in {content:?}")]
    MalformedLine {
        line: usize,
        content: String,
        reason: LineError,
    },
    #[error("Failed to read transcript {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, TranscriptError>;

#[cfg(test)]
mod tests;
