//! Single-line parsing for exported chat logs.
//!
//! Line shape: `[<timestamp>] <sender>: <message>`. Only the bracket and the
//! two delimiters matter, the timestamp grammar is never inspected.

use thiserror::Error;

const TIMESTAMP_END: &str = "] ";
const SENDER_END: &str = ": ";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    #[error("missing \"] \" after the timestamp")]
    MissingTimestampEnd,
    #[error("missing \": \" between sender and message")]
    MissingSenderDelimiter,
}

/// What a raw line turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine<'a> {
    /// Empty line, skipped without touching scan state.
    Blank,
    /// Not `[`-prefixed: system notices, media placeholders, continuations.
    Ignored,
    Message(TranscriptLine<'a>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine<'a> {
    pub sender: &'a str,
    pub message: &'a str,
}

/// Classify and split one raw line.
///
/// The body is cut at the next delimiter occurrence, so a message that itself
/// contains `"] "` or `": "` is truncated there. Exported logs from the same
/// client behave the same way, and downstream pairs rely on it.
pub fn parse_line(raw: &str) -> Result<ParsedLine<'_>, LineError> {
    if raw.is_empty() {
        return Ok(ParsedLine::Blank);
    }
    if !raw.starts_with('[') {
        return Ok(ParsedLine::Ignored);
    }

    let (_, rest) = raw
        .split_once(TIMESTAMP_END)
        .ok_or(LineError::MissingTimestampEnd)?;
    let rest = rest.split(TIMESTAMP_END).next().unwrap_or(rest);

    let (sender, body) = rest
        .split_once(SENDER_END)
        .ok_or(LineError::MissingSenderDelimiter)?;
    let message = body.split(SENDER_END).next().unwrap_or(body);

    Ok(ParsedLine::Message(TranscriptLine { sender, message }))
}
