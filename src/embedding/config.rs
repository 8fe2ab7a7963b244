//! Trainer knobs and the learning-rate schedule.

use super::{EmbeddingError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_ALPHA: f32 = 0.00025;
pub const DEFAULT_ALPHA_STEP: f32 = 0.0002;

/// Everything `Doc2Vec` needs to build, train and infer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingConfig {
    /// Outer training passes; each one re-trains over the full corpus.
    pub max_epochs: usize,
    pub vector_size: usize,
    /// Initial learning rate.
    pub alpha: f32,
    /// Learning-rate floor.
    pub min_alpha: f32,
    /// Decrease applied to the rate after every outer pass.
    pub alpha_step: f32,
    /// Context words on each side of the predicted word.
    pub window: usize,
    /// Noise words drawn per prediction.
    pub negative: usize,
    /// Frequent-word downsampling threshold, 0 disables it.
    pub sample: f64,
    /// Words seen fewer times than this are left out of the vocabulary.
    pub min_count: u64,
    /// Corpus iterations inside one outer pass.
    pub passes_per_epoch: usize,
    pub infer_epochs: usize,
    pub seed: u64,
    /// Log progress every n outer passes.
    pub progress_every: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            max_epochs: 100,
            vector_size: 100,
            alpha: 0.025,
            min_alpha: DEFAULT_MIN_ALPHA,
            alpha_step: DEFAULT_ALPHA_STEP,
            window: 5,
            negative: 5,
            sample: 1e-3,
            min_count: 1,
            passes_per_epoch: 10,
            infer_epochs: 1000,
            seed: 1,
            progress_every: 10,
        }
    }
}

impl TrainingConfig {
    /// Defaults everywhere else. A starting rate below the default floor
    /// lowers the floor to match, so the schedule never climbs.
    pub fn new(max_epochs: usize, vector_size: usize, alpha: f32) -> Self {
        Self {
            max_epochs,
            vector_size,
            alpha,
            min_alpha: alpha.min(DEFAULT_MIN_ALPHA),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |details: &str| {
            Err(EmbeddingError::InvalidConfig {
                details: details.to_string(),
            })
        };

        if self.max_epochs == 0 {
            return fail("max_epochs must be at least 1");
        }
        if self.vector_size == 0 {
            return fail("vector_size must be at least 1");
        }
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return fail("alpha must be a positive number");
        }
        if !self.min_alpha.is_finite() || self.min_alpha <= 0.0 {
            return fail("min_alpha must be a positive number");
        }
        if !self.alpha_step.is_finite() || self.alpha_step < 0.0 {
            return fail("alpha_step must not be negative");
        }
        if self.window == 0 || self.negative == 0 {
            return fail("window and negative must be at least 1");
        }
        if !self.sample.is_finite() || self.sample < 0.0 {
            return fail("sample must not be negative");
        }
        if self.passes_per_epoch == 0 || self.infer_epochs == 0 {
            return fail("passes_per_epoch and infer_epochs must be at least 1");
        }
        Ok(())
    }

    /// Rate used by outer pass `epoch`.
    ///
    /// The first pass decays from `alpha` down to the floor. Every later pass
    /// runs at a constant rate, `alpha_step` lower than the one before, so the
    /// outer loop is the only thing driving decay.
    pub fn rate_for_epoch(&self, epoch: usize) -> LearningRate {
        if epoch == 0 {
            return LearningRate::new(self.alpha, self.min_alpha);
        }
        LearningRate::constant(self.stepped(epoch))
    }

    /// Rate left on the model once all outer passes ran, used for inference.
    pub fn inference_rate(&self) -> LearningRate {
        LearningRate::constant(self.stepped(self.max_epochs))
    }

    pub fn schedule(&self) -> impl Iterator<Item = LearningRate> + '_ {
        (0..self.max_epochs).map(move |epoch| self.rate_for_epoch(epoch))
    }

    fn stepped(&self, epoch: usize) -> f32 {
        (self.alpha - self.alpha_step * epoch as f32).max(self.min_alpha)
    }
}

/// Linear decay from `start` to `end` over one training call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LearningRate {
    pub start: f32,
    pub end: f32,
}

impl LearningRate {
    pub fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    pub fn constant(rate: f32) -> Self {
        Self::new(rate, rate)
    }

    /// Rate at iteration `step` of `total`.
    pub fn at(&self, step: usize, total: usize) -> f32 {
        if total == 0 {
            return self.start;
        }
        self.start - (self.start - self.end) * (step as f32 / total as f32)
    }
}
