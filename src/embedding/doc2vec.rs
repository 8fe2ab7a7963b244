//! Paragraph vectors, distributed-memory variant (PV-DM).
//!
//! Each document owns a vector that is averaged with the vectors of the words
//! around a position to predict the word at that position. Prediction uses
//! negative sampling against a unigram^0.75 noise table. Once trained, a new
//! document gets its vector by running the same objective with every weight
//! frozen except its own vector.

use super::config::{LearningRate, TrainingConfig};
use super::index::{DocIndex, Neighbor};
use super::vocab::{NoiseTable, Vocabulary};
use super::{EmbeddingError, Result, TaggedExample};
use crate::preprocessing::Preprocessor;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Sigmoid saturates past this magnitude.
const MAX_EXP: f32 = 6.0;
const SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// State that only training needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TrainingBuffers {
    keep_probs: Vec<f32>,
    corpus_count: usize,
    passes_run: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doc2Vec {
    config: TrainingConfig,
    vocab: Vocabulary,
    noise: NoiseTable,
    /// vocab.len() x vector_size
    word_vectors: Vec<f32>,
    /// vocab.len() x vector_size, negative-sampling output layer
    output_weights: Vec<f32>,
    /// doc_count x vector_size, row i belongs to tag i
    doc_vectors: Vec<f32>,
    inference_rate: LearningRate,
    /// How the training documents were tokenized; queries must match it.
    preprocessor: Preprocessor,
    training: Option<TrainingBuffers>,
}

/// Per-position work buffers, reused across a whole pass.
struct Scratch {
    l1: Vec<f32>,
    neu1e: Vec<f32>,
    context: Vec<u32>,
    output_grads: Vec<(u32, f32)>,
}

impl Scratch {
    fn new(dim: usize) -> Self {
        Self {
            l1: vec![0.0; dim],
            neu1e: vec![0.0; dim],
            context: Vec::new(),
            output_grads: Vec::new(),
        }
    }
}

impl Doc2Vec {
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        let inference_rate = config.inference_rate();
        Ok(Self {
            config,
            vocab: Vocabulary::default(),
            noise: NoiseTable::default(),
            word_vectors: Vec::new(),
            output_weights: Vec::new(),
            doc_vectors: Vec::new(),
            inference_rate,
            preprocessor: Preprocessor::default(),
            training: None,
        })
    }

    /// Scan the corpus once: vocabulary, noise table, initial weights.
    pub fn build_vocab(&mut self, examples: &[TaggedExample]) -> Result<()> {
        if examples.is_empty() {
            return Err(EmbeddingError::EmptyCorpus);
        }

        let vocab = Vocabulary::build(examples, self.config.min_count);
        if vocab.is_empty() {
            return Err(EmbeddingError::EmptyVocabulary);
        }

        let dim = self.config.vector_size;
        let doc_count = examples.iter().map(|e| e.tag).max().map_or(0, |t| t + 1);
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);

        self.word_vectors = random_rows(vocab.len(), dim, &mut rng);
        self.doc_vectors = random_rows(doc_count, dim, &mut rng);
        self.output_weights = vec![0.0; vocab.len() * dim];
        self.noise = NoiseTable::new(&vocab);
        self.training = Some(TrainingBuffers {
            keep_probs: vocab.keep_probabilities(self.config.sample),
            corpus_count: examples.len(),
            passes_run: 0,
        });
        self.vocab = vocab;
        Ok(())
    }

    /// Run `passes` iterations over `examples`, decaying linearly across `rate`.
    pub fn train(
        &mut self,
        examples: &[TaggedExample],
        rate: LearningRate,
        passes: usize,
    ) -> Result<()> {
        let doc_count = self.doc_count();
        let (keep_probs, passes_run) = match &self.training {
            Some(buffers) => (buffers.keep_probs.clone(), buffers.passes_run),
            None if self.vocab.is_empty() => return Err(EmbeddingError::VocabularyNotBuilt),
            None => return Err(EmbeddingError::TrainingBuffersDiscarded),
        };
        if let Some(bad) = examples.iter().find(|e| e.tag >= doc_count) {
            return Err(EmbeddingError::UnknownTag {
                tag: bad.tag,
                count: doc_count,
            });
        }

        let dim = self.config.vector_size;
        let seed = self.config.seed ^ (passes_run + 1).wrapping_mul(SEED_MIX);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut scratch = Scratch::new(dim);
        let mut words = Vec::new();

        for pass in 0..passes {
            let alpha = rate.at(pass, passes);
            for example in examples {
                words.clear();
                words.extend(
                    example
                        .tokens
                        .iter()
                        .filter_map(|t| self.vocab.id(t))
                        .filter(|&id| keep_probs[id as usize] >= rng.gen::<f32>()),
                );

                let row = example.tag * dim..(example.tag + 1) * dim;
                for pos in 0..words.len() {
                    let doc = &self.doc_vectors[row.clone()];
                    self.position_gradient(doc, &words, pos, alpha, &mut rng, &mut scratch);
                    self.apply(&scratch, example.tag);
                }
            }
        }

        if let Some(buffers) = self.training.as_mut() {
            buffers.passes_run += passes as u64;
        }
        Ok(())
    }

    /// Vector for an unseen token sequence. Only the new vector moves.
    ///
    /// Randomness is seeded from the tokens, so the same input against the
    /// same model always yields the same vector.
    pub fn infer_vector<S: AsRef<str>>(&self, tokens: &[S], epochs: usize) -> Result<Vec<f32>> {
        if tokens.is_empty() {
            return Err(EmbeddingError::InvalidInput {
                details: "Empty token sequence".to_string(),
            });
        }
        if self.vocab.is_empty() {
            return Err(EmbeddingError::VocabularyNotBuilt);
        }

        let dim = self.config.vector_size;
        let mut rng = ChaCha8Rng::seed_from_u64(self.token_seed(tokens));
        let mut doc = random_rows(1, dim, &mut rng);
        let words = self.vocab.encode(tokens);
        let mut scratch = Scratch::new(dim);

        for epoch in 0..epochs {
            let alpha = self.inference_rate.at(epoch, epochs);
            for pos in 0..words.len() {
                self.position_gradient(&doc, &words, pos, alpha, &mut rng, &mut scratch);
                axpy(1.0, &scratch.neu1e, &mut doc);
            }
        }
        Ok(doc)
    }

    /// Nearest trained document to `vector` by cosine similarity.
    pub fn most_similar(&self, vector: &[f32]) -> Result<Neighbor> {
        if vector.len() != self.config.vector_size {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.config.vector_size,
                found: vector.len(),
            });
        }
        DocIndex::new(&self.doc_vectors, self.config.vector_size)
            .nearest(vector)
            .ok_or(EmbeddingError::VocabularyNotBuilt)
    }

    /// Drop what only training needs. Inference keeps working.
    pub fn discard_training_buffers(&mut self) {
        self.training = None;
    }

    pub fn has_training_buffers(&self) -> bool {
        self.training.is_some()
    }

    /// Record the tokenization the training documents went through.
    pub fn set_preprocessor(&mut self, preprocessor: Preprocessor) {
        self.preprocessor = preprocessor;
    }

    pub fn preprocessor(&self) -> Preprocessor {
        self.preprocessor
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn vector_size(&self) -> usize {
        self.config.vector_size
    }

    pub fn doc_count(&self) -> usize {
        self.doc_vectors.len() / self.config.vector_size.max(1)
    }

    pub fn corpus_count(&self) -> Option<usize> {
        self.training.as_ref().map(|t| t.corpus_count)
    }

    pub fn inference_rate(&self) -> LearningRate {
        self.inference_rate
    }

    pub fn doc_vector(&self, tag: usize) -> Option<&[f32]> {
        let dim = self.config.vector_size;
        self.doc_vectors.get(tag * dim..(tag + 1) * dim)
    }

    /// Internal consistency of the weight matrices, checked after loading.
    pub(crate) fn check_shapes(&self) -> std::result::Result<(), String> {
        let dim = self.config.vector_size;
        let words = self.vocab.len() * dim;
        if dim == 0 {
            return Err("vector size is zero".to_string());
        }
        if self.word_vectors.len() != words || self.output_weights.len() != words {
            return Err(format!(
                "weight matrices hold {} and {} values, vocabulary needs {}",
                self.word_vectors.len(),
                self.output_weights.len(),
                words
            ));
        }
        if self.doc_vectors.len() % dim != 0 {
            return Err(format!(
                "{} document values do not split into rows of {}",
                self.doc_vectors.len(),
                dim
            ));
        }
        if self.noise.len() != self.vocab.len() {
            return Err("noise table does not match vocabulary".to_string());
        }
        if let Some(t) = &self.training {
            if t.keep_probs.len() != self.vocab.len() {
                return Err("downsampling table does not match vocabulary".to_string());
            }
        }
        Ok(())
    }

    /// Mean of the doc vector and the window around `pos`, then one positive
    /// and `negative` noise predictions. Leaves the input-side error in
    /// `scratch.neu1e` and the output-layer gradients in `scratch.output_grads`.
    fn position_gradient<R: Rng>(
        &self,
        doc: &[f32],
        words: &[u32],
        pos: usize,
        alpha: f32,
        rng: &mut R,
        scratch: &mut Scratch,
    ) {
        let dim = self.config.vector_size;
        let span = self.config.window - rng.gen_range(0..self.config.window);
        let start = pos.saturating_sub(span);
        let end = (pos + span + 1).min(words.len());

        scratch.l1.copy_from_slice(doc);
        scratch.context.clear();
        for (j, &word) in words.iter().enumerate().take(end).skip(start) {
            if j == pos {
                continue;
            }
            scratch.context.push(word);
            axpy(1.0, self.word_row(word), &mut scratch.l1);
        }
        let inv_count = 1.0 / (scratch.context.len() + 1) as f32;
        scratch.l1.iter_mut().for_each(|v| *v *= inv_count);

        scratch.neu1e.iter_mut().for_each(|v| *v = 0.0);
        scratch.output_grads.clear();

        let target = words[pos];
        for k in 0..=self.config.negative {
            let (word, label) = if k == 0 {
                (target, 1.0)
            } else {
                match self.noise.sample(rng) {
                    Some(w) if w != target => (w, 0.0),
                    _ => continue,
                }
            };
            let row = &self.output_weights[word as usize * dim..(word as usize + 1) * dim];
            let g = (label - sigmoid(dot(&scratch.l1, row))) * alpha;
            axpy(g, row, &mut scratch.neu1e);
            scratch.output_grads.push((word, g));
        }
    }

    fn apply(&mut self, scratch: &Scratch, tag: usize) {
        let dim = self.config.vector_size;
        for &(word, g) in &scratch.output_grads {
            let w = word as usize;
            axpy(g, &scratch.l1, &mut self.output_weights[w * dim..(w + 1) * dim]);
        }
        axpy(1.0, &scratch.neu1e, &mut self.doc_vectors[tag * dim..(tag + 1) * dim]);
        for &word in &scratch.context {
            let w = word as usize;
            axpy(1.0, &scratch.neu1e, &mut self.word_vectors[w * dim..(w + 1) * dim]);
        }
    }

    fn word_row(&self, word: u32) -> &[f32] {
        let dim = self.config.vector_size;
        let w = word as usize;
        &self.word_vectors[w * dim..(w + 1) * dim]
    }

    fn token_seed<S: AsRef<str>>(&self, tokens: &[S]) -> u64 {
        let mut hasher = crc32fast::Hasher::new();
        for token in tokens {
            hasher.update(token.as_ref().as_bytes());
            hasher.update(&[0x1f]);
        }
        self.config.seed.wrapping_mul(SEED_MIX) ^ u64::from(hasher.finalize())
    }
}

fn random_rows<R: Rng>(rows: usize, dim: usize, rng: &mut R) -> Vec<f32> {
    let scale = 1.0 / dim as f32;
    (0..rows * dim).map(|_| (rng.gen::<f32>() - 0.5) * scale).collect()
}

#[inline]
fn sigmoid(x: f32) -> f32 {
    if x >= MAX_EXP {
        1.0
    } else if x <= -MAX_EXP {
        0.0
    } else {
        1.0 / (1.0 + (-x).exp())
    }
}

#[inline]
fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// y += a * x
#[inline]
fn axpy(a: f32, x: &[f32], y: &mut [f32]) {
    for (dst, &src) in y.iter_mut().zip(x) {
        *dst += a * src;
    }
}
