//! ResponseModel construction, training round trip and replies.

use super::*;
use std::fs;
use tempfile::{tempdir, TempDir};

const SCENARIO: [&str; 5] = [
    "[10:00] Alice: hi",
    "[10:01] Bob: hello there",
    "[10:02] Alice: how are you",
    "[10:03] Alice: anyway",
    "[10:04] Bob: good thanks",
];

const CHAT: [&str; 12] = [
    "[1] me: are we still on for pizza tonight",
    "[2] sam: yes! 8pm at luigi's",
    "[3] me: did you finish the rust homework",
    "[4] sam: almost, the borrow checker hates me",
    "[5] me: my cat knocked the coffee over again",
    "[6] sam: that cat is a menace",
    "[7] me: what time does the train leave tomorrow",
    "[8] sam: 7:15 from platform 2",
    "[9] me: want to go climbing on saturday",
    "[10] sam: only if we get breakfast after",
    "[11] me: the wifi at the office is down again",
    "[12] sam: classic. working from home then",
];

fn quick_config() -> TrainingConfig {
    TrainingConfig {
        max_epochs: 30,
        vector_size: 24,
        sample: 0.0,
        passes_per_epoch: 5,
        ..TrainingConfig::default()
    }
}

fn trained_bot(dir: &TempDir) -> ResponseModel {
    let mut bot = ResponseModel::from_lines("me", "sam", CHAT, false)
        .unwrap()
        .with_model_dir(dir.path());
    bot.train_with(&quick_config()).unwrap();
    bot
}

#[test]
fn scenario_pairs_and_tags() {
    let bot = ResponseModel::from_lines("Alice", "Bob", SCENARIO, false).unwrap();
    assert_eq!(bot.prompts(), ["hi", "anyway"]);
    assert_eq!(bot.replies(), ["hello there", "good thanks"]);

    let tagged = bot.tagged_examples();
    assert_eq!(tagged.len(), 2);
    assert_eq!(tagged[0], TaggedExample::new(vec!["hi".to_string()], 0));
    assert_eq!(tagged[1].tag, 1);
    assert!(!bot.is_trained());
}

#[test]
fn prompts_are_lowercased_and_filtered() {
    let lines = ["[1] me: Is THE Plan on?", "[2] you: yes"];
    let keep = ResponseModel::from_lines("me", "you", lines, false).unwrap();
    let drop = ResponseModel::from_lines("me", "you", lines, true).unwrap();
    assert_eq!(keep.tagged_examples()[0].tokens, ["is", "the", "plan", "on", "?"]);
    assert_eq!(drop.tagged_examples()[0].tokens, ["plan", "?"]);
    assert!(drop.remove_stop_words());
}

#[test]
fn names_must_be_non_empty() {
    assert!(matches!(
        ResponseModel::from_lines("", "Bob", SCENARIO, false),
        Err(BotError::InvalidArgument(_))
    ));
    assert!(matches!(
        ResponseModel::from_lines("Alice", "  ", SCENARIO, false),
        Err(BotError::InvalidArgument(_))
    ));
}

#[test]
fn malformed_line_surfaces() {
    let lines = ["[1] me: hi", "[2] you left"];
    match ResponseModel::from_lines("me", "you", lines, false) {
        Err(BotError::MalformedLine { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected MalformedLine, got {:?}", other.err()),
    }
}

#[test]
fn missing_transcript_file() {
    let dir = tempdir().unwrap();
    let err = ResponseModel::new("me", "you", dir.path().join("chat.txt"), false).err();
    assert!(matches!(err, Some(BotError::Transcript(_))));
}

#[test]
fn reads_transcript_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chat.txt");
    fs::write(&path, SCENARIO.join("\n")).unwrap();

    let bot = ResponseModel::new("Alice", "Bob", &path, false).unwrap();
    assert_eq!(bot.pairs().len(), 2);
    assert_eq!(bot.my_name(), "Alice");
    assert_eq!(bot.friend_name(), "Bob");
}

#[test]
fn message_before_training() {
    let bot = ResponseModel::from_lines("Alice", "Bob", SCENARIO, false).unwrap();
    assert!(matches!(bot.message("hello"), Err(BotError::NotTrained)));
}

#[test]
fn training_without_pairs_fails_cleanly() {
    let dir = tempdir().unwrap();
    let mut bot = ResponseModel::from_lines("me", "you", ["[1] you: hello?"], false)
        .unwrap()
        .with_model_dir(dir.path());
    assert!(bot.tagged_examples().is_empty());
    assert!(matches!(bot.train(10, 8, 0.025), Err(BotError::InvalidArgument(_))));
    assert!(!bot.model_path().exists());
}

#[test]
fn bad_training_values_are_rejected() {
    let dir = tempdir().unwrap();
    let mut bot = ResponseModel::from_lines("Alice", "Bob", SCENARIO, false)
        .unwrap()
        .with_model_dir(dir.path());
    assert!(matches!(bot.train(0, 8, 0.025), Err(BotError::InvalidArgument(_))));
    assert!(matches!(bot.train(5, 0, 0.025), Err(BotError::InvalidArgument(_))));
    assert!(matches!(bot.train(5, 8, -1.0), Err(BotError::InvalidArgument(_))));
}

#[test]
fn train_persists_under_friend_name() {
    let dir = tempdir().unwrap();
    let bot = trained_bot(&dir);
    assert!(bot.is_trained());
    assert_eq!(bot.model_path(), dir.path().join("sam_doc2vec.model"));
    assert!(bot.model_path().exists());
}

#[test]
fn replies_come_from_the_friend() {
    let dir = tempdir().unwrap();
    let bot = trained_bot(&dir);
    let answer = bot.message("pizza later?").unwrap();
    let reply = answer.strip_prefix("sam: ").expect("reply is prefixed with the friend's name");
    assert!(bot.replies().iter().any(|r| r == reply));
}

#[test]
fn replies_are_repeatable() {
    let dir = tempdir().unwrap();
    let bot = trained_bot(&dir);
    for prompt in bot.prompts().to_vec() {
        assert_eq!(bot.message(&prompt).unwrap(), bot.message(&prompt).unwrap());
    }
}

#[test]
fn training_prompts_mostly_get_their_own_reply() {
    let dir = tempdir().unwrap();
    let bot = trained_bot(&dir);
    let hits = bot
        .prompts()
        .iter()
        .zip(bot.replies())
        .filter(|(prompt, reply)| bot.message(prompt).unwrap() == format!("sam: {}", reply))
        .count();
    assert!(hits * 2 >= bot.prompts().len(), "only {} of {} matched", hits, bot.prompts().len());
}

#[test]
fn reloaded_artifact_answers_the_same() {
    let dir = tempdir().unwrap();
    let bot = trained_bot(&dir);

    let mut fresh = ResponseModel::from_lines("me", "sam", CHAT, false)
        .unwrap()
        .with_model_dir(dir.path());
    fresh.load_trained().unwrap();
    for prompt in ["pizza tonight", "homework", "wifi down"] {
        assert_eq!(bot.message(prompt).unwrap(), fresh.message(prompt).unwrap());
    }
}

#[test]
fn load_rejects_mismatched_transcript() {
    let dir = tempdir().unwrap();
    trained_bot(&dir);

    let mut other = ResponseModel::from_lines("me", "sam", &CHAT[..4], false)
        .unwrap()
        .with_model_dir(dir.path());
    assert!(matches!(other.load_trained(), Err(BotError::InvalidArgument(_))));
}

#[test]
fn load_rejects_other_stopword_policy() {
    let dir = tempdir().unwrap();
    trained_bot(&dir);

    let mut filtered = ResponseModel::from_lines("me", "sam", CHAT, true)
        .unwrap()
        .with_model_dir(dir.path());
    assert!(matches!(filtered.load_trained(), Err(BotError::InvalidArgument(_))));
    assert!(!filtered.is_trained());

    let mut same = ResponseModel::from_lines("me", "sam", CHAT, false)
        .unwrap()
        .with_model_dir(dir.path());
    same.load_trained().unwrap();
    assert!(same.is_trained());
}

#[test]
fn tiny_learning_rate_still_trains() {
    let dir = tempdir().unwrap();
    let mut bot = ResponseModel::from_lines("me", "sam", CHAT, false)
        .unwrap()
        .with_model_dir(dir.path());
    bot.train(5, 8, 0.0002).unwrap();
    assert!(bot.message("pizza tonight?").unwrap().starts_with("sam: "));
}

#[test]
fn corrupt_or_missing_artifact() {
    let dir = tempdir().unwrap();
    let mut bot = ResponseModel::from_lines("me", "sam", CHAT, false)
        .unwrap()
        .with_model_dir(dir.path());
    assert!(matches!(bot.load_trained(), Err(BotError::PersistenceFailure(_))));

    fs::write(bot.model_path(), b"not a model").unwrap();
    assert!(matches!(bot.load_trained(), Err(BotError::PersistenceFailure(_))));
    assert!(!bot.is_trained());
}

#[test]
fn unwritable_model_dir_is_fatal() {
    let dir = tempdir().unwrap();
    let mut bot = ResponseModel::from_lines("me", "sam", CHAT, false)
        .unwrap()
        .with_model_dir(dir.path().join("missing"));
    let err = bot.train_with(&quick_config()).unwrap_err();
    assert!(matches!(err, BotError::PersistenceFailure(_)));
    assert!(!bot.is_trained());
}

#[test]
fn stopword_only_message_cannot_be_answered() {
    let dir = tempdir().unwrap();
    let mut bot = ResponseModel::from_lines("me", "sam", CHAT, true)
        .unwrap()
        .with_model_dir(dir.path());
    bot.train_with(&quick_config()).unwrap();

    assert!(matches!(bot.message("are you there"), Err(BotError::InferenceFailure(_))));
    assert!(matches!(bot.message("   "), Err(BotError::InferenceFailure(_))));
    assert!(bot.message("pizza").unwrap().starts_with("sam: "));
}
