//! Extraction behaviour over whole transcripts.

use super::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn pairs_of(lines: &[&str], me: &str) -> Vec<(String, String)> {
    TranscriptExtractor::extract(lines, me)
        .unwrap()
        .iter()
        .map(|(p, r)| (p.to_string(), r.to_string()))
        .collect()
}

fn pair(p: &str, r: &str) -> (String, String) {
    (p.to_string(), r.to_string())
}

#[test]
fn alice_and_bob_scenario() {
    let lines = [
        "[10:00] Alice: hi",
        "[10:01] Bob: hello there",
        "[10:02] Alice: how are you",
        "[10:03] Alice: anyway",
        "[10:04] Bob: good thanks",
    ];
    assert_eq!(
        pairs_of(&lines, "Alice"),
        vec![pair("hi", "hello there"), pair("anyway", "good thanks")]
    );
}

#[test]
fn consecutive_prompts_collapse_to_the_last() {
    let lines = ["[1] me: a", "[2] me: b", "[3] friend: c"];
    assert_eq!(pairs_of(&lines, "me"), vec![pair("b", "c")]);
}

#[test]
fn only_the_first_reply_is_captured() {
    let lines = ["[1] friend: x", "[2] me: p", "[3] friend: q", "[4] friend: r"];
    assert_eq!(pairs_of(&lines, "me"), vec![pair("p", "q")]);
}

#[test]
fn unbracketed_lines_do_not_break_pairing() {
    let lines = [
        "[1] me: are you coming",
        "Messages and calls are end-to-end encrypted.",
        "",
        "second line of a long message",
        "[2] friend: yes",
    ];
    assert_eq!(pairs_of(&lines, "me"), vec![pair("are you coming", "yes")]);
}

#[test]
fn any_other_sender_counts_as_the_friend() {
    let lines = ["[1] me: lunch?", "[2] carol: sure", "[3] me: 1pm", "[4] dave: ok"];
    assert_eq!(
        pairs_of(&lines, "me"),
        vec![pair("lunch?", "sure"), pair("1pm", "ok")]
    );
}

#[test]
fn no_pairs_without_my_messages() {
    let lines = ["[1] friend: x", "[2] friend: y"];
    let pairs = TranscriptExtractor::extract(lines, "me").unwrap();
    assert!(pairs.is_empty());
    assert_eq!(pairs.prompts().len(), pairs.replies().len());
}

#[test]
fn trailing_prompt_has_no_pair() {
    let lines = ["[1] me: hello", "[2] friend: hey", "[3] me: bye"];
    assert_eq!(pairs_of(&lines, "me"), vec![pair("hello", "hey")]);
}

#[test]
fn empty_reply_is_kept() {
    let lines = ["[1] me: you there?", "[2] friend: "];
    assert_eq!(pairs_of(&lines, "me"), vec![pair("you there?", "")]);
}

#[test]
fn malformed_bracket_line_reports_position() {
    let lines = ["[1] me: hi", "[2] friend changed the group icon"];
    match TranscriptExtractor::extract(lines, "me") {
        Err(TranscriptError::MalformedLine { line, content, reason }) => {
            assert_eq!(line, 2);
            assert_eq!(content, "[2] friend changed the group icon");
            assert_eq!(reason, LineError::MissingSenderDelimiter);
        }
        other => panic!("expected MalformedLine, got {:?}", other),
    }
}

#[test]
fn lengths_always_match() {
    let lines = [
        "[1] a: 1", "[2] me: 2", "[3] me: 3", "[4] b: 4", "[5] b: 5", "[6] me: 6",
        "noise", "[7] a: 7", "[8] me: 8",
    ];
    let pairs = TranscriptExtractor::extract(lines, "me").unwrap();
    assert_eq!(pairs.prompts().len(), pairs.replies().len());
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs.prompts(), ["3", "6"]);
    assert_eq!(pairs.replies(), ["4", "7"]);
}

#[test]
fn reads_crlf_files() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[1] me: ping\r\n[2] friend: pong\r\n").unwrap();

    let pairs = TranscriptExtractor::extract_file(file.path(), "me").unwrap();
    assert_eq!(pairs.prompts(), ["ping"]);
    assert_eq!(pairs.replies(), ["pong"]);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = TranscriptExtractor::extract_file(dir.path().join("nope.txt"), "me").unwrap_err();
    assert!(matches!(err, TranscriptError::Io { .. }));
}
