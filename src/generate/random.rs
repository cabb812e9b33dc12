use tracing::{debug, trace};

use super::GeneratorCore;
use crate::alphabet::{Alphabet, Symbol};
use crate::automaton::{Automaton, DenseAutomaton};
use crate::boltzmann::BoltzmannSampler;
use crate::error::GenerationError;
use crate::minimization::FastMoore;
use crate::structure;

/// Default ceiling on structural rejections (invalid partitions, non-minimal or
/// non-connected draws) before a generation call gives up.
pub const DEFAULT_MAX_REJECTS: usize = 1 << 16;

/// Rejection tallies of the last generation call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RejectCounters {
    /// Block-size vectors drawn by the Boltzmann sampler, the accepted ones included.
    pub boltzmann: usize,
    /// Set partitions drawn, the accepted one included.
    pub partition: usize,
}

/// Draws uniform random complete accessible DFAs with `n` states over a `k`-symbol
/// alphabet, by the Bassino–David–Nicaud recipe: a Boltzmann-sampled random set partition
/// of the `n·k + 1` transition slots into `n` blocks, canonicalized, validity-checked by
/// rejection and folded into transitions.
///
/// The result automaton is allocated once and mutated in place, so the borrow returned by
/// the generation methods is only valid until the next call on the generator.
///
/// # Example
/// ```
/// use icdfa::prelude::*;
/// let mut gen = RandomDfaGenerator::new(10, Alphabet::of_size(2)).with_seed(1);
/// let dfa = gen.random().unwrap();
/// assert_eq!(dfa.size(), 10);
/// assert!(dfa.is_complete());
/// ```
#[derive(Debug)]
pub struct RandomDfaGenerator<S: Symbol = char> {
    core: GeneratorCore<S>,
    sampler: BoltzmannSampler,
    /// Scratch permutation of `1..=n·k + 1`, reused across draws.
    permutation: Vec<usize>,
    partition: Vec<usize>,
    /// Scratch block renumbering used by canonicalization.
    block_rank: Vec<usize>,
    probability: f64,
    rng: fastrand::Rng,
    max_rejects: usize,
    counters: RejectCounters,
    moore: FastMoore,
}

impl<S: Symbol> RandomDfaGenerator<S> {
    /// Creates a generator for automata with `automaton_size >= 1` states over the given
    /// non-empty alphabet. Each state is final with probability one half; see
    /// [`Self::final_probability`].
    pub fn new(automaton_size: usize, alphabet: Alphabet<S>) -> Self {
        let set_size = automaton_size * alphabet.size() + 1;
        debug!(automaton_size, alphabet_size = alphabet.size(), "creating random generator");
        Self {
            sampler: BoltzmannSampler::new(set_size, automaton_size),
            core: GeneratorCore::new(automaton_size, alphabet),
            permutation: vec![0; set_size],
            partition: vec![0; set_size],
            block_rank: vec![0; automaton_size + 1],
            probability: 0.5,
            rng: fastrand::Rng::new(),
            max_rejects: DEFAULT_MAX_REJECTS,
            counters: RejectCounters::default(),
            moore: FastMoore::new(),
        }
    }

    /// Seeds the generator's random source, making every subsequent draw reproducible.
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(fastrand::Rng::with_seed(seed))
    }

    /// Replaces the generator's random source.
    pub fn with_rng(mut self, rng: fastrand::Rng) -> Self {
        self.rng = rng;
        self
    }

    /// Replaces the probability for each state to be final, used by [`Self::random`].
    pub fn final_probability(mut self, probability: f64) -> Self {
        assert!((0.0..=1.0).contains(&probability));
        self.probability = probability;
        self
    }

    /// Replaces the ceiling on structural rejections.
    pub fn max_rejects(mut self, max_rejects: usize) -> Self {
        assert!(max_rejects >= 1);
        self.max_rejects = max_rejects;
        self
    }

    /// Switches the generator to possibly-incomplete automata: the partition gains an
    /// extra block whose slots are left as undefined transitions. Requires an alphabet of
    /// at least two symbols. The draws remain uniform over the extended family.
    pub fn incomplete(mut self) -> Self {
        assert!(
            self.core.result.alphabet_size() >= 2,
            "the incomplete heuristic needs at least two symbols"
        );
        let n = self.core.result.size();
        let set_size = self.partition.len();
        self.core.incomplete = 1;
        self.sampler = BoltzmannSampler::new(set_size, n + 1);
        self.block_rank = vec![0; n + 2];
        self
    }

    /// The current result automaton.
    pub fn dfa(&self) -> &DenseAutomaton<usize, S> {
        &self.core.result
    }

    /// Rejection tallies of the last generation call.
    pub fn reject_counters(&self) -> RejectCounters {
        self.counters
    }

    /// Draws a uniform random automaton of the family, each state independently final
    /// with the configured probability.
    pub fn random(&mut self) -> Result<&DenseAutomaton<usize, S>, GenerationError> {
        self.random_unfinalized()?;
        self.random_finalization();
        Ok(&self.core.result)
    }

    /// Draws random automata until one is minimal.
    pub fn random_minimal(&mut self) -> Result<&DenseAutomaton<usize, S>, GenerationError> {
        for _ in 0..self.max_rejects {
            self.random_unfinalized()?;
            self.random_finalization();
            if self.moore.is_minimal(&self.core.result) {
                return Ok(&self.core.result);
            }
        }
        Err(GenerationError::NonTermination {
            attempts: self.max_rejects,
        })
    }

    /// Draws random automata until one is strongly connected.
    pub fn random_strongly_connected(
        &mut self,
    ) -> Result<&DenseAutomaton<usize, S>, GenerationError> {
        for _ in 0..self.max_rejects {
            self.random_unfinalized()?;
            self.random_finalization();
            if structure::strongly_connected(&self.core.result) {
                return Ok(&self.core.result);
            }
        }
        Err(GenerationError::NonTermination {
            attempts: self.max_rejects,
        })
    }

    /// Draws random automata until one is co-accessible.
    pub fn random_co_accessible(&mut self) -> Result<&DenseAutomaton<usize, S>, GenerationError> {
        for _ in 0..self.max_rejects {
            self.random_unfinalized()?;
            self.random_finalization();
            if structure::co_accessible(&self.core.result) {
                return Ok(&self.core.result);
            }
        }
        Err(GenerationError::NonTermination {
            attempts: self.max_rejects,
        })
    }

    /// Draws strongly connected random automata until one is local.
    pub fn random_local(&mut self) -> Result<&DenseAutomaton<usize, S>, GenerationError> {
        for _ in 0..self.max_rejects {
            let _ = self.random_strongly_connected()?;
            if structure::local(&self.core.result) {
                return Ok(&self.core.result);
            }
        }
        Err(GenerationError::NonTermination {
            attempts: self.max_rejects,
        })
    }

    /// Draws a uniform random automaton with exactly one final state, chosen uniformly.
    pub fn random_one_final_state(&mut self) -> Result<&DenseAutomaton<usize, S>, GenerationError> {
        self.random_unfinalized()?;
        let n = self.core.result.size();
        for q in 0..n {
            self.core.result.set_final_index(q, false);
        }
        self.core.result.set_final_index(self.rng.usize(0..n), true);
        Ok(&self.core.result)
    }

    /// Draws canonical set partitions until a valid one comes up, then folds it into the
    /// result automaton's transitions. Final flags are left untouched.
    fn random_unfinalized(&mut self) -> Result<(), GenerationError> {
        self.counters = RejectCounters::default();
        while self.counters.partition < self.max_rejects {
            self.random_partition()?;
            self.counters.partition += 1;
            if self.core.is_valid_set_partition(&self.partition) {
                trace!(rejects = self.counters.partition - 1, "partition accepted");
                self.core.partition_to_dfa(&self.partition);
                return Ok(());
            }
        }
        Err(GenerationError::NonTermination {
            attempts: self.counters.partition,
        })
    }

    /// Draws a uniform random canonical set partition of the transition slots: a random
    /// permutation spreads Boltzmann-sampled block sizes over the slots, and the blocks
    /// are then renumbered in order of first appearance.
    fn random_partition(&mut self) -> Result<(), GenerationError> {
        self.random_permutation();
        self.sampler.sample(&mut self.rng)?;
        self.counters.boltzmann += self.sampler.attempt_count();

        let mut pos = 0;
        for (block, &size) in self.sampler.blocks().iter().enumerate() {
            for _ in 0..size {
                self.partition[self.permutation[pos] - 1] = block;
                pos += 1;
            }
        }
        self.sort_partition();
        Ok(())
    }

    /// Fisher–Yates shuffle of `1..=set_size` into the scratch buffer.
    fn random_permutation(&mut self) {
        for i in 0..self.permutation.len() {
            let pos = self.rng.usize(0..=i);
            if pos != i {
                self.permutation[i] = self.permutation[pos];
            }
            self.permutation[pos] = i + 1;
        }
    }

    /// Renumbers the partition's blocks by order of first appearance, the canonical form
    /// expected by the partition-to-DFA construction.
    fn sort_partition(&mut self) {
        const UNRANKED: usize = usize::MAX;
        self.block_rank.fill(UNRANKED);
        let mut next_rank = 0;
        for block in self.partition.iter_mut() {
            if self.block_rank[*block] == UNRANKED {
                self.block_rank[*block] = next_rank;
                next_rank += 1;
            }
            *block = self.block_rank[*block];
        }
    }

    /// Flips each state's final flag independently with the configured probability.
    fn random_finalization(&mut self) {
        for q in 0..self.core.result.size() {
            let is_final = self.rng.f64() < self.probability;
            self.core.result.set_final_index(q, is_final);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minimization::MooreAlgorithm;
    use crate::prelude::*;

    fn fingerprint(a: &DenseAutomaton<usize, char>) -> (Vec<Option<usize>>, Vec<bool>) {
        let table = (0..a.size())
            .flat_map(|q| (0..a.alphabet_size()).map(move |w| (q, w)))
            .map(|(q, w)| a.arrival_index(q, w))
            .collect();
        (table, a.final_flags().collect())
    }

    #[test_log::test]
    fn draws_are_complete_and_accessible() {
        let mut gen = RandomDfaGenerator::new(20, Alphabet::of_size(2)).with_seed(3);
        for _ in 0..50 {
            let a = gen.random().unwrap();
            assert_eq!(a.size(), 20);
            assert!(a.is_complete());
            assert!(structure::accessible(a));
        }
    }

    #[test]
    fn unary_alphabets_are_supported() {
        let mut gen = RandomDfaGenerator::new(5, Alphabet::of_size(1)).with_seed(77);
        for _ in 0..10 {
            let a = gen.random().unwrap();
            assert!(a.is_complete());
            assert!(structure::accessible(a));
        }
    }

    #[test]
    fn seeded_generators_agree() {
        let mut left = RandomDfaGenerator::new(12, Alphabet::of_size(3)).with_seed(7);
        let mut right = RandomDfaGenerator::new(12, Alphabet::of_size(3)).with_seed(7);
        for _ in 0..10 {
            assert_eq!(fingerprint(left.random().unwrap()), fingerprint(right.random().unwrap()));
        }
    }

    #[test]
    fn final_states_follow_the_configured_probability() {
        let mut gen = RandomDfaGenerator::new(50, Alphabet::of_size(2))
            .with_seed(11)
            .final_probability(0.3);
        let mut finals = 0usize;
        let mut states = 0usize;
        for _ in 0..200 {
            let a = gen.random().unwrap();
            finals += a.final_count();
            states += a.size();
        }
        let fraction = finals as f64 / states as f64;
        assert!((fraction - 0.3).abs() < 0.05, "observed fraction {fraction}");
    }

    #[test]
    fn one_final_state_draws_have_exactly_one() {
        let mut gen = RandomDfaGenerator::new(15, Alphabet::of_size(2)).with_seed(5);
        for _ in 0..20 {
            assert_eq!(gen.random_one_final_state().unwrap().final_count(), 1);
        }
    }

    #[test]
    fn minimal_draws_are_minimal() {
        let mut gen = RandomDfaGenerator::new(8, Alphabet::of_size(2)).with_seed(23);
        let mut checker = MooreAlgorithm::new();
        for _ in 0..10 {
            let a = gen.random_minimal().unwrap();
            assert!(checker.is_minimal(a));
        }
    }

    #[test]
    fn structural_draws_satisfy_their_predicate() {
        let mut gen = RandomDfaGenerator::new(8, Alphabet::of_size(2)).with_seed(41);
        assert!(structure::strongly_connected(gen.random_strongly_connected().unwrap()));
        assert!(structure::co_accessible(gen.random_co_accessible().unwrap()));
    }

    #[test]
    fn local_draws_are_local() {
        // local automata get rare quickly as the state count grows, so the draw is
        // tested at a size where rejection converges well inside the attempt ceiling
        let mut gen = RandomDfaGenerator::new(3, Alphabet::of_size(2)).with_seed(41);
        assert!(structure::local(gen.random_local().unwrap()));
    }

    #[test]
    fn incomplete_draws_stay_accessible() {
        let mut gen = RandomDfaGenerator::new(10, Alphabet::of_size(2))
            .with_seed(13)
            .incomplete();
        let mut saw_incomplete = false;
        for _ in 0..50 {
            let a = gen.random().unwrap();
            assert_eq!(a.size(), 10);
            assert!(structure::accessible(a));
            saw_incomplete |= !a.is_complete();
        }
        assert!(saw_incomplete, "fifty draws without an undefined transition");
    }

    #[test]
    fn reject_counters_cover_the_last_call() {
        let mut gen = RandomDfaGenerator::new(10, Alphabet::of_size(2)).with_seed(2);
        gen.random().unwrap();
        let counters = gen.reject_counters();
        assert!(counters.partition >= 1);
        assert!(counters.boltzmann >= counters.partition);
    }
}
