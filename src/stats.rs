//! Numeric-sample seam for experiment writers. The crate pushes raw per-draw values
//! (reject counts, minimal sizes) into a [`StatSink`]; formatting, plotting and
//! persistence stay outside. [`MemorySink`] is the in-memory implementation the tests
//! use.

use crate::alphabet::Symbol;
use crate::error::GenerationError;
use crate::generate::RandomDfaGenerator;
use crate::minimization::MooreAlgorithm;

/// Receiver of a stream of numeric samples.
pub trait StatSink {
    /// Records one sample.
    fn record(&mut self, value: f64);

    /// Records a batch of related samples.
    fn record_all(&mut self, values: &[f64]) {
        for &value in values {
            self.record(value);
        }
    }

    /// Signals that a series of samples is complete. Writers flush buffers here; the
    /// default does nothing.
    fn flush(&mut self) {}
}

/// [`StatSink`] keeping running moments of the recorded samples.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    count: f64,
    sum: f64,
    sum_of_squares: f64,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of samples recorded so far.
    pub fn count(&self) -> usize {
        self.count as usize
    }

    /// Mean of the recorded samples. NaN while empty.
    pub fn mean(&self) -> f64 {
        self.sum / self.count
    }

    /// Population variance of the recorded samples.
    pub fn variance(&self) -> f64 {
        let mean = self.mean();
        self.sum_of_squares / self.count - mean * mean
    }

    /// Population standard deviation of the recorded samples.
    pub fn standard_deviation(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Discards all recorded samples.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl StatSink for MemorySink {
    fn record(&mut self, value: f64) {
        self.count += 1.0;
        self.sum += value;
        self.sum_of_squares += value * value;
    }
}

/// Performs `draws` random generations and records each draw's partition reject count.
pub fn record_partition_rejects<S: Symbol>(
    generator: &mut RandomDfaGenerator<S>,
    draws: usize,
    sink: &mut impl StatSink,
) -> Result<(), GenerationError> {
    for _ in 0..draws {
        generator.random()?;
        sink.record(generator.reject_counters().partition as f64);
    }
    sink.flush();
    Ok(())
}

/// Performs `draws` random generations and records the size of each draw's minimal
/// automaton. The spread of these sizes is what makes uniform random DFAs interesting
/// test subjects: most of them are minimal or very close to it.
pub fn record_minimal_sizes<S: Symbol>(
    generator: &mut RandomDfaGenerator<S>,
    moore: &mut MooreAlgorithm,
    draws: usize,
    sink: &mut impl StatSink,
) -> Result<(), GenerationError> {
    for _ in 0..draws {
        moore.partition(generator.random()?);
        sink.record(moore.class_count() as f64);
    }
    sink.flush();
    Ok(())
}
