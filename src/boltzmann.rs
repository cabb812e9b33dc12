//! Rejection sampler for the block-size vector of a random set partition. Conditioned on
//! the correct total size, the produced vector is uniform over all partitions of
//! `set_size` elements into `block_count` non-empty blocks, which is what makes the
//! partition-to-DFA construction uniform over the automaton family.

use tracing::{debug, trace};

use crate::error::GenerationError;
use crate::law::{DiscreteLaw, NonZeroPoissonLaw};

/// Default ceiling on rejection attempts before [`GenerationError::NonTermination`] is
/// reported. High enough that it is only ever hit for pathological parameters.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1 << 20;

/// Draws `block_count` block sizes from a non-zero Poisson law tuned so that the expected
/// total matches `set_size`, and accepts only vectors summing to `set_size` exactly.
///
/// The tuning constant `dzeta_k` is `μ + W(-μ·e^{-μ})` for the mean block size
/// `μ = set_size / block_count`, the parameter at which the non-zero Poisson law has
/// expected value exactly `μ`; the Lambert-W value is approximated by its truncated
/// series expansion.
#[derive(Clone, Debug)]
pub struct BoltzmannSampler {
    set_size: usize,
    block_count: usize,
    dzeta_k: f64,
    law: NonZeroPoissonLaw,
    blocks: Vec<usize>,
    attempt_count: usize,
    max_attempts: usize,
}

impl BoltzmannSampler {
    /// Creates a sampler for partitions of `set_size` elements into `block_count`
    /// non-empty blocks. Requires `set_size > block_count >= 1`: at mean block size 1 the
    /// series defining the tuning constant no longer converges at a useful rate and the
    /// only partition is the all-ones vector anyway.
    pub fn new(set_size: usize, block_count: usize) -> Self {
        assert!(block_count >= 1 && set_size > block_count);
        let mean = set_size as f64 / block_count as f64;
        let dzeta_k = dzeta_k(mean);
        debug!(set_size, block_count, dzeta_k, "creating boltzmann sampler");
        Self {
            set_size,
            block_count,
            dzeta_k,
            law: NonZeroPoissonLaw::new(dzeta_k),
            blocks: vec![0; block_count],
            attempt_count: 0,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Replaces the ceiling on rejection attempts.
    pub fn max_attempts(mut self, max_attempts: usize) -> Self {
        assert!(max_attempts >= 1);
        self.max_attempts = max_attempts;
        self
    }

    /// The tuning constant of the underlying non-zero Poisson law.
    pub fn dzeta_k(&self) -> f64 {
        self.dzeta_k
    }

    /// Number of draw attempts performed by the last call to [`Self::sample`], the
    /// accepted one included.
    pub fn attempt_count(&self) -> usize {
        self.attempt_count
    }

    /// Block sizes accepted by the last successful call to [`Self::sample`].
    pub fn blocks(&self) -> &[usize] {
        &self.blocks
    }

    /// Draws block-size vectors until one sums to `set_size` exactly and returns it. A
    /// draw is aborted early as soon as its running sum exceeds the target. The returned
    /// slice has `block_count` entries, each at least 1, and is valid until the next call.
    pub fn sample(&mut self, rng: &mut fastrand::Rng) -> Result<&[usize], GenerationError> {
        self.attempt_count = 0;
        while self.attempt_count < self.max_attempts {
            self.attempt_count += 1;
            let mut sum = 0;
            for block in self.blocks.iter_mut() {
                let size = self.law.sample(rng) as usize;
                *block = size;
                sum += size;
                if sum > self.set_size {
                    break;
                }
            }
            if sum == self.set_size {
                trace!(attempts = self.attempt_count, "boltzmann draw accepted");
                return Ok(&self.blocks);
            }
        }
        Err(GenerationError::NonTermination {
            attempts: self.attempt_count,
        })
    }
}

/// Sums the series `Σ_{i>=1} (-i)^{i-1}·z^i / i!` for `z = -μ·e^{-μ}` until a term's
/// magnitude drops below `1e-15`, then adds `μ`. The series is the principal branch of
/// the Lambert-W function at `z`, so the result `x` satisfies `x / (1 - e^{-x}) = μ`:
/// the non-zero Poisson law at `x` has mean block size `μ`.
fn dzeta_k(mean: f64) -> f64 {
    let z = -mean * (-mean).exp();
    // successive terms are related by term · (-z)·(1 + 1/i)^(i-1), which keeps every
    // intermediate value finite; the naive i^(i-1)·z^i/i! factors overflow f64 near i = 145
    let mut term = z;
    let mut w0 = 0.0;
    let mut i = 1;
    while term.abs() >= 1e-15 {
        w0 += term;
        term *= -z * (1.0 + 1.0 / i as f64).powi(i - 1);
        i += 1;
    }
    w0 + mean
}
