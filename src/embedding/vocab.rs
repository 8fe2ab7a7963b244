//! Vocabulary, noise distribution and downsampling thresholds.

use super::TaggedExample;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const NOISE_EXPONENT: f64 = 0.75;
const NOISE_DOMAIN: f64 = 2_147_483_647.0;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vocabulary {
    words: Vec<String>,
    index: HashMap<String, u32>,
    counts: Vec<u64>,
}

impl Vocabulary {
    /// Count every token, drop those under `min_count`, most frequent first.
    /// Equal counts keep first-seen order.
    pub fn build(examples: &[TaggedExample], min_count: u64) -> Self {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mut order: Vec<(&str, u64)> = Vec::new();

        for token in examples.iter().flat_map(|e| e.tokens.iter()) {
            match seen.get(token.as_str()) {
                Some(&slot) => order[slot].1 += 1,
                None => {
                    seen.insert(token.as_str(), order.len());
                    order.push((token.as_str(), 1));
                }
            }
        }

        order.retain(|&(_, count)| count >= min_count);
        order.sort_by(|a, b| b.1.cmp(&a.1));

        let mut vocab = Self::default();
        for (word, count) in order {
            vocab.index.insert(word.to_string(), vocab.words.len() as u32);
            vocab.words.push(word.to_string());
            vocab.counts.push(count);
        }
        vocab
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn id(&self, word: &str) -> Option<u32> {
        self.index.get(word).copied()
    }

    pub fn word(&self, id: u32) -> Option<&str> {
        self.words.get(id as usize).map(String::as_str)
    }

    pub fn count(&self, id: u32) -> u64 {
        self.counts.get(id as usize).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Known ids of `tokens`, unknown tokens dropped.
    pub fn encode<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<u32> {
        tokens.iter().filter_map(|t| self.id(t.as_ref())).collect()
    }

    /// Probability of keeping each word when downsampling frequent ones.
    pub fn keep_probabilities(&self, sample: f64) -> Vec<f32> {
        let total = self.total() as f64;
        if sample <= 0.0 || total == 0.0 {
            return vec![1.0; self.len()];
        }
        let threshold = sample * total;
        self.counts
            .iter()
            .map(|&c| {
                let c = c as f64;
                (((c / threshold).sqrt() + 1.0) * (threshold / c)).min(1.0) as f32
            })
            .collect()
    }
}

/// Cumulative unigram^0.75 table used to draw negative samples.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoiseTable {
    cumulative: Vec<u32>,
}

impl NoiseTable {
    pub fn new(vocab: &Vocabulary) -> Self {
        let weights: Vec<f64> = (0..vocab.len() as u32)
            .map(|id| (vocab.count(id) as f64).powf(NOISE_EXPONENT))
            .collect();
        let total: f64 = weights.iter().sum();
        if total == 0.0 {
            return Self::default();
        }

        let mut running = 0.0f64;
        let cumulative = weights
            .iter()
            .map(|&w| {
                running += w;
                (running / total * NOISE_DOMAIN).round() as u32
            })
            .collect();
        Self { cumulative }
    }

    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// Draw a word id proportionally to its noise weight.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Option<u32> {
        let last = *self.cumulative.last()?;
        if last == 0 {
            return None;
        }
        let target = rng.gen_range(0..last);
        let idx = self.cumulative.partition_point(|&edge| edge <= target);
        Some(idx.min(self.cumulative.len() - 1) as u32)
    }
}
