//! Turns a chat log into (prompt, reply) pairs.
//! One forward pass, one slot of state: the previous well-formed line.

use super::line::{parse_line, ParsedLine, TranscriptLine};
use super::{Result, TranscriptError};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Prompts from `my_name` and the reply that followed each one.
/// `prompts[i]` was answered by `replies[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExamplePairs {
    prompts: Vec<String>,
    replies: Vec<String>,
}

impl ExamplePairs {
    fn push(&mut self, prompt: &str, reply: &str) {
        self.prompts.push(prompt.to_string());
        self.replies.push(reply.to_string());
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn replies(&self) -> &[String] {
        &self.replies
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prompts
            .iter()
            .zip(self.replies.iter())
            .map(|(p, r)| (p.as_str(), r.as_str()))
    }
}

pub struct TranscriptExtractor;

impl TranscriptExtractor {
    /// Pair the last message of every run from `my_name` with the first
    /// message that follows it from anyone else.
    pub fn extract<I, S>(lines: I, my_name: &str) -> Result<ExamplePairs>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut pairs = ExamplePairs::default();
        let mut previous: Option<(String, String)> = None;
        let mut ignored = 0usize;

        for (idx, raw) in lines.into_iter().enumerate() {
            let raw = raw.as_ref();
            let current = match parse_line(raw) {
                Ok(ParsedLine::Message(line)) => line,
                Ok(ParsedLine::Ignored) => {
                    ignored += 1;
                    continue;
                }
                Ok(ParsedLine::Blank) => continue,
                Err(reason) => {
                    return Err(TranscriptError::MalformedLine {
                        line: idx + 1,
                        content: raw.to_string(),
                        reason,
                    })
                }
            };

            if let Some((sender, message)) = &previous {
                if sender == my_name && current.sender != my_name {
                    pairs.push(message, current.message);
                }
            }
            previous = Some(Self::owned(&current));
        }

        debug!(pairs = pairs.len(), ignored, "transcript extracted");
        Ok(pairs)
    }

    /// Read a UTF-8 chat export from disk and extract it.
    pub fn extract_file<P: AsRef<Path>>(path: P, my_name: &str) -> Result<ExamplePairs> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| TranscriptError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::extract(text.lines(), my_name)
    }

    fn owned(line: &TranscriptLine<'_>) -> (String, String) {
        (line.sender.to_string(), line.message.to_string())
    }
}
