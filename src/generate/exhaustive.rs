use tracing::debug;

use super::GeneratorCore;
use crate::alphabet::{Alphabet, Symbol};
use crate::automaton::{Automaton, DenseAutomaton};
use crate::suit::{CatalanSuit, CompletionSuit, Suit};

/// Enumerates every complete accessible DFA with `n` states over a `k`-symbol alphabet
/// exactly once, as a state machine over three nested counters: the final-state
/// assignment (innermost), the completion suit and the catalan suit (outermost).
///
/// The result automaton is allocated once and mutated in place, so the borrow returned by
/// [`Self::first`] and [`Self::next`] is only valid until the next generation call.
///
/// # Example
/// ```
/// use icdfa::prelude::*;
/// let mut gen = ExhaustiveDfaGenerator::new(1, Alphabet::of_size(1));
/// assert!(!gen.first().is_final(0));
/// assert!(gen.next().unwrap().is_final(0));
/// assert!(gen.next().is_none());
/// ```
#[derive(Debug)]
pub struct ExhaustiveDfaGenerator<S: Symbol = char> {
    core: GeneratorCore<S>,
    catalan: CatalanSuit,
    completion: CompletionSuit,
    /// Cursor of the finalization counter, resting on the last state between calls.
    last_final: usize,
    final_count: usize,
}

impl<S: Symbol> ExhaustiveDfaGenerator<S> {
    /// Creates a generator for automata with `automaton_size >= 1` states over the given
    /// non-empty alphabet.
    pub fn new(automaton_size: usize, alphabet: Alphabet<S>) -> Self {
        let catalan = CatalanSuit::new(automaton_size, alphabet.size());
        let completion = CompletionSuit::new(&catalan);
        debug!(automaton_size, alphabet_size = alphabet.size(), "creating exhaustive generator");
        Self {
            core: GeneratorCore::new(automaton_size, alphabet),
            catalan,
            completion,
            last_final: 0,
            final_count: 0,
        }
    }

    /// The current result automaton.
    pub fn dfa(&self) -> &DenseAutomaton<usize, S> {
        &self.core.result
    }

    /// Number of final states in the current finalization.
    pub fn final_count(&self) -> usize {
        self.final_count
    }

    /// Seeds both suits to their minimal value, builds the automaton and clears every
    /// final flag, yielding the first automaton of the enumeration.
    pub fn first(&mut self) -> &DenseAutomaton<usize, S> {
        self.catalan.first();
        self.completion.first();
        self.core.build_trie(self.catalan.values());
        self.core.complete(self.completion.values(), 0);
        self.first_finalization();
        &self.core.result
    }

    /// Advances to the next automaton of the enumeration, or returns `None` once the
    /// family is exhausted. Finalizations advance fastest; when they wrap, the completion
    /// suit advances and only the transitions from its modified position onward are
    /// rebuilt; when it is exhausted, the catalan suit advances and the trie is rebuilt
    /// from scratch.
    pub fn next(&mut self) -> Option<&DenseAutomaton<usize, S>> {
        if self.next_finalization() {
            return Some(&self.core.result);
        }
        self.advance_structure()?;
        self.first_finalization();
        Some(&self.core.result)
    }

    /// Like [`Self::next`], but skips every finalization with more than `⌊n/2⌋` final
    /// states. Since the family is closed under complementing the set of final states,
    /// this yields one automaton out of each complement pair and halves the enumeration
    /// work. The halving argument is established for alphabets of at most two symbols;
    /// for larger alphabets the behavior is preserved as-is from the original algorithm
    /// without an independent correctness derivation.
    pub fn next_complementary(&mut self) -> Option<&DenseAutomaton<usize, S>> {
        let half = self.core.result.size() / 2;
        loop {
            if !self.next_finalization() {
                self.advance_structure()?;
                self.first_finalization();
                break;
            }
            if self.final_count <= half {
                break;
            }
        }
        Some(&self.core.result)
    }

    /// Advances the (completion, catalan) counters by one step, rebuilding the result's
    /// transitions. `None` when the outermost counter is exhausted.
    fn advance_structure(&mut self) -> Option<()> {
        if self.completion.next(&self.catalan).is_some() {
            let from = self.completion.modified_position();
            self.core.complete(self.completion.values(), from);
        } else {
            self.catalan.next()?;
            self.completion.first();
            self.core.build_trie(self.catalan.values());
            self.core.complete(self.completion.values(), 0);
        }
        Some(())
    }

    /// Clears every final flag, resetting the innermost counter.
    fn first_finalization(&mut self) {
        for q in 0..self.core.result.size() {
            self.core.result.set_final_index(q, false);
        }
        self.last_final = self.core.result.size() - 1;
        self.final_count = 0;
    }

    /// Advances the final-flag vector to its successor, treating it as a binary counter
    /// with the last state as least significant bit. Returns false once every state is
    /// final, i.e. when the counter wraps.
    fn next_finalization(&mut self) -> bool {
        let n = self.core.result.size();
        let mut pos = self.last_final;
        loop {
            if !self.core.result.is_final(pos) {
                break;
            }
            if pos == 0 {
                return false;
            }
            pos -= 1;
        }
        self.core.result.set_final_index(pos, true);
        self.final_count += 1;
        for q in pos + 1..n {
            if self.core.result.is_final(q) {
                self.core.result.set_final_index(q, false);
                self.final_count -= 1;
            }
        }
        self.last_final = n - 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Set;
    use crate::prelude::*;
    use crate::structure;

    /// Runs a full enumeration and returns the fingerprints (transition table under the
    /// identity state numbering, plus final flags) of every produced automaton.
    fn enumerate(n: usize, k: usize) -> Vec<(Vec<Option<usize>>, Vec<bool>)> {
        let mut gen = ExhaustiveDfaGenerator::new(n, Alphabet::of_size(k));
        let mut out = Vec::new();
        let fingerprint = |a: &DenseAutomaton<usize, char>| {
            let table = (0..a.size())
                .flat_map(|q| (0..a.alphabet_size()).map(move |w| (q, w)))
                .map(|(q, w)| a.arrival_index(q, w))
                .collect();
            (table, a.final_flags().collect())
        };
        out.push(fingerprint(gen.first()));
        while let Some(a) = gen.next() {
            out.push(fingerprint(a));
        }
        out
    }

    #[test]
    fn single_state_unary_family_has_two_members() {
        let all = enumerate(1, 1);
        assert_eq!(all.len(), 2);
        // both are the self-loop, once non-final and once final
        assert_eq!(all[0].0, vec![Some(0)]);
        assert_eq!(all[0].1, vec![false]);
        assert_eq!(all[1].1, vec![true]);
    }

    #[test]
    fn two_state_unary_family_has_eight_members() {
        // two transition structures (1 --a--> 0 or 1 --a--> 1), four finalizations each
        assert_eq!(enumerate(2, 1).len(), 8);
    }

    #[test]
    fn two_state_binary_family_has_forty_eight_members() {
        // 12 transition structures times 4 finalizations
        let all = enumerate(2, 2);
        assert_eq!(all.len(), 48);
        let distinct: Set<_> = all.into_iter().collect();
        assert_eq!(distinct.len(), 48, "enumeration repeated an automaton");
    }

    #[test]
    fn every_enumerated_automaton_is_complete_and_accessible() {
        let mut gen = ExhaustiveDfaGenerator::new(3, Alphabet::of_size(2));
        let mut current = Some(gen.first());
        let mut count = 0;
        while let Some(a) = current {
            assert!(a.is_complete());
            assert!(a.is_initial(0));
            assert!(structure::accessible(a));
            count += 1;
            current = gen.next();
        }
        assert!(count > 0);
    }

    #[test]
    fn complementary_enumeration_caps_final_states() {
        let mut gen = ExhaustiveDfaGenerator::new(2, Alphabet::of_size(2));
        let mut count = 1;
        assert!(gen.first().final_count() <= 1);
        while let Some(a) = gen.next_complementary() {
            assert!(a.final_count() <= 1);
            count += 1;
        }
        // 12 transition structures, 3 finalizations with at most one final state
        assert_eq!(count, 36);
    }
}
