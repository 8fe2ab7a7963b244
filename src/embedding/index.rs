//! Nearest-neighbour lookup over trained document vectors.
//! Brute-force cosine scan; corpora here are a few thousand rows at most.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub tag: usize,
    pub similarity: f32,
}

/// Row-major view of `vectors`, one row of `dim` values per tag.
pub struct DocIndex<'a> {
    vectors: &'a [f32],
    dim: usize,
}

impl<'a> DocIndex<'a> {
    pub fn new(vectors: &'a [f32], dim: usize) -> Self {
        Self { vectors, dim }
    }

    pub fn len(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.vectors.len() / self.dim
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Top-k rows by cosine similarity. Equal scores keep the lower tag first.
    pub fn most_similar(&self, query: &[f32], k: usize) -> Vec<Neighbor> {
        if self.is_empty() {
            return Vec::new();
        }

        #[cfg(feature = "parallel")]
        let rows = self.vectors.par_chunks_exact(self.dim);
        #[cfg(not(feature = "parallel"))]
        let rows = self.vectors.chunks_exact(self.dim);

        let mut scored: Vec<Neighbor> = rows
            .enumerate()
            .map(|(tag, row)| Neighbor {
                tag,
                similarity: cosine_similarity(query, row),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
                .then(a.tag.cmp(&b.tag))
        });
        scored.truncate(k);
        scored
    }

    pub fn nearest(&self, query: &[f32]) -> Option<Neighbor> {
        self.most_similar(query, 1).into_iter().next()
    }
}

/// cos(a, b) = dot(a, b) / (|a| |b|); zero when either side has no length.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0;
    let mut a_norm = 0.0;
    let mut b_norm = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        dot += x * y;
        a_norm += x * x;
        b_norm += y * y;
    }

    if a_norm == 0.0 || b_norm == 0.0 {
        return 0.0;
    }
    dot / (a_norm.sqrt() * b_norm.sqrt())
}
