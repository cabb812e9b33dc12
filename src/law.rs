//! Discrete probability laws sampled by inverse-CDF search: starting from the probability
//! mass of the smallest supported value, a uniform draw is walked down the distribution,
//! subtracting one mass term per step, until it falls below the running term.

/// A parametrized discrete distribution over non-negative integers. Implementors only
/// describe the initial probability mass and the recurrence updating it; the sampling
/// loop is shared.
pub trait DiscreteLaw {
    /// Probability mass of the smallest supported value.
    fn initial(&self) -> f64;

    /// Mass of value `k`, computed from the mass `p` of value `k - 1`.
    fn update(&self, p: f64, k: u64) -> f64;

    /// Smallest supported value, 0 unless the law is supported on `k >= 1`.
    fn first_value(&self) -> u64 {
        0
    }

    /// Draws one value: `u` uniform in `[0, 1)` is decremented by the mass of each value
    /// in turn until it falls below the current mass, whose index is returned.
    fn sample(&self, rng: &mut fastrand::Rng) -> u64 {
        let mut k = self.first_value();
        let mut p = self.initial();
        let mut u = rng.f64();
        while u >= p {
            u -= p;
            k += 1;
            p = self.update(p, k);
        }
        k
    }
}

/// Geometric law with success probability `1 - x`: mass `(1-x)·x^k`.
#[derive(Clone, Copy, Debug)]
pub struct GeometricLaw {
    x: f64,
}

impl GeometricLaw {
    /// Creates a geometric law; `x` must lie in `(0, 1)`.
    pub fn new(x: f64) -> Self {
        assert!((0.0..1.0).contains(&x));
        Self { x }
    }
}

impl DiscreteLaw for GeometricLaw {
    fn initial(&self) -> f64 {
        1.0 - self.x
    }

    fn update(&self, p: f64, _k: u64) -> f64 {
        self.x * p
    }
}

/// Poisson law with rate `x`: mass `e^{-x}·x^k/k!`.
#[derive(Clone, Copy, Debug)]
pub struct PoissonLaw {
    x: f64,
}

impl PoissonLaw {
    /// Creates a Poisson law with the given positive rate.
    pub fn new(x: f64) -> Self {
        assert!(x > 0.0);
        Self { x }
    }
}

impl DiscreteLaw for PoissonLaw {
    fn initial(&self) -> f64 {
        (-self.x).exp()
    }

    fn update(&self, p: f64, k: u64) -> f64 {
        self.x * p / k as f64
    }
}

/// Poisson law conditioned on being non-zero: same recurrence as [`PoissonLaw`] but
/// supported on `k >= 1`, with mass `x^k / (k!·(e^x - 1))`. This is the block-size law of
/// the Boltzmann sampler.
#[derive(Clone, Copy, Debug)]
pub struct NonZeroPoissonLaw {
    x: f64,
}

impl NonZeroPoissonLaw {
    /// Creates a non-zero Poisson law with the given positive rate.
    pub fn new(x: f64) -> Self {
        assert!(x > 0.0);
        Self { x }
    }
}

impl DiscreteLaw for NonZeroPoissonLaw {
    fn initial(&self) -> f64 {
        self.x / (self.x.exp() - 1.0)
    }

    fn update(&self, p: f64, k: u64) -> f64 {
        self.x * p / k as f64
    }

    fn first_value(&self) -> u64 {
        1
    }
}

/// Logarithmic law with parameter `x`: mass `x^k / (k·ln(1/(1-x)))`, supported on
/// `k >= 1`.
#[derive(Clone, Copy, Debug)]
pub struct LogarithmicLaw {
    x: f64,
}

impl LogarithmicLaw {
    /// Creates a logarithmic law; `x` must lie in `(0, 1)`.
    pub fn new(x: f64) -> Self {
        assert!((0.0..1.0).contains(&x));
        Self { x }
    }
}

impl DiscreteLaw for LogarithmicLaw {
    fn initial(&self) -> f64 {
        self.x / (1.0 / (1.0 - self.x)).ln()
    }

    fn update(&self, p: f64, k: u64) -> f64 {
        self.x * p * (k as f64 - 1.0) / k as f64
    }

    fn first_value(&self) -> u64 {
        1
    }
}

/// Uniform law: every value carries the same mass `x`, so the sample is uniform over
/// `{0, ..., ceil(1/x) - 1}`.
#[derive(Clone, Copy, Debug)]
pub struct UniformLaw {
    x: f64,
}

impl UniformLaw {
    /// Creates a uniform law where each value has mass `x`.
    pub fn new(x: f64) -> Self {
        assert!(x > 0.0 && x <= 1.0);
        Self { x }
    }
}

impl DiscreteLaw for UniformLaw {
    fn initial(&self) -> f64 {
        self.x
    }

    fn update(&self, p: f64, _k: u64) -> f64 {
        p
    }
}

/// Bernoulli-style law over a finite probability vector indexed by `k`. Any residual mass
/// not covered by the vector falls on the first index past its end, so sampling always
/// terminates.
#[derive(Clone, Debug)]
pub struct BernoulliLaw {
    probabilities: Vec<f64>,
}

impl BernoulliLaw {
    /// Creates a law from the per-value probabilities; the vector should sum to at most 1.
    pub fn new(probabilities: Vec<f64>) -> Self {
        assert!(!probabilities.is_empty());
        Self { probabilities }
    }
}

impl DiscreteLaw for BernoulliLaw {
    fn initial(&self) -> f64 {
        self.probabilities[0]
    }

    fn update(&self, _p: f64, k: u64) -> f64 {
        self.probabilities
            .get(k as usize)
            .copied()
            .unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math;

    fn empirical_mean(law: &impl DiscreteLaw, seed: u64, draws: usize) -> f64 {
        let mut rng = fastrand::Rng::with_seed(seed);
        (0..draws).map(|_| law.sample(&mut rng) as f64).sum::<f64>() / draws as f64
    }

    #[test]
    fn geometric_mean_matches() {
        // mean of the geometric law with mass (1-x) x^k is x / (1-x)
        let mean = empirical_mean(&GeometricLaw::new(0.5), 0xfeed, 200_000);
        assert!(math::almost_equal(mean, 1.0, 0.02), "mean was {mean}");
    }

    #[test]
    fn poisson_mean_matches_rate() {
        let mean = empirical_mean(&PoissonLaw::new(3.0), 0xbeef, 200_000);
        assert!(math::almost_equal(mean, 3.0, 0.02), "mean was {mean}");
    }

    #[test]
    fn non_zero_poisson_never_draws_zero() {
        let law = NonZeroPoissonLaw::new(0.3);
        let mut rng = fastrand::Rng::with_seed(7);
        assert!((0..10_000).all(|_| law.sample(&mut rng) >= 1));
    }

    #[test]
    fn non_zero_poisson_mean_matches() {
        // mean of the Poisson law conditioned on k >= 1 is x / (1 - e^{-x})
        let x = 0.3f64;
        let mean = empirical_mean(&NonZeroPoissonLaw::new(x), 0x5eed, 200_000);
        assert!(
            math::almost_equal(mean, x / (1.0 - (-x).exp()), 0.02),
            "mean was {mean}"
        );
    }

    #[test]
    fn logarithmic_mean_matches() {
        // mean of the logarithmic law is x / ((1-x) ln(1/(1-x)))
        let mean = empirical_mean(&LogarithmicLaw::new(0.5), 0xabba, 200_000);
        assert!(math::almost_equal(mean, 1.0 / 2f64.ln(), 0.02), "mean was {mean}");
    }

    #[test]
    fn uniform_law_is_bounded() {
        let law = UniformLaw::new(0.25);
        let mut rng = fastrand::Rng::with_seed(42);
        for _ in 0..10_000 {
            assert!(law.sample(&mut rng) < 4);
        }
    }

    #[test]
    fn bernoulli_law_follows_its_vector() {
        let law = BernoulliLaw::new(vec![0.25, 0.75]);
        let mean = empirical_mean(&law, 0xc0de, 200_000);
        assert!(math::almost_equal(mean, 0.75, 0.03), "mean was {mean}");
    }

    #[test]
    fn sampling_is_reproducible_for_a_fixed_seed() {
        let law = PoissonLaw::new(2.0);
        let mut first = fastrand::Rng::with_seed(123);
        let mut second = fastrand::Rng::with_seed(123);
        let a: Vec<u64> = (0..64).map(|_| law.sample(&mut first)).collect();
        let b: Vec<u64> = (0..64).map(|_| law.sample(&mut second)).collect();
        assert_eq!(a, b);
    }
}
