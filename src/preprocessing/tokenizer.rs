use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// English clitics split off the word they are attached to: `don't` -> `do n't`.
static CLITIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(.+?)(n['’]t|['’](?:s|re|ve|ll|d|m))$").expect("invalid clitic regex")
});

pub struct Tokenizer;

impl Tokenizer {
    /// Word-level tokens following Unicode word boundaries.
    /// Punctuation stays as separate tokens, whitespace is dropped.
    pub fn tokenize(input: &str) -> Vec<String> {
        let mut tokens = Vec::new();

        for segment in input.split_word_bounds() {
            if segment.trim().is_empty() {
                continue;
            }
            match CLITIC.captures(segment) {
                Some(caps) => {
                    tokens.push(caps[1].to_string());
                    tokens.push(caps[2].to_string());
                }
                None => tokens.push(segment.to_string()),
            }
        }

        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_words_and_punctuation() {
        assert_eq!(
            Tokenizer::tokenize("hello there, how are you?"),
            vec!["hello", "there", ",", "how", "are", "you", "?"]
        );
    }

    #[test]
    fn splits_clitics() {
        assert_eq!(Tokenizer::tokenize("don't"), vec!["do", "n't"]);
        assert_eq!(Tokenizer::tokenize("it's fine"), vec!["it", "'s", "fine"]);
        assert_eq!(Tokenizer::tokenize("we’ll see"), vec!["we", "’ll", "see"]);
    }

    #[test]
    fn keeps_numbers_whole() {
        assert_eq!(Tokenizer::tokenize("at 3.30 ok"), vec!["at", "3.30", "ok"]);
    }

    #[test]
    fn whitespace_only_yields_nothing() {
        assert!(Tokenizer::tokenize("  \t ").is_empty());
        assert!(Tokenizer::tokenize("").is_empty());
    }
}
