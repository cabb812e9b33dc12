//! Generators for complete accessible DFAs. [`ExhaustiveDfaGenerator`] walks the whole
//! family of size `n` over `k` symbols exactly once; [`RandomDfaGenerator`] draws from it
//! uniformly. Both share the construction core turning combinatorial codes (suit pairs or
//! canonical set partitions) into transitions of a result automaton that is allocated
//! once and mutated in place across generation calls.

mod exhaustive;
mod random;

pub use exhaustive::ExhaustiveDfaGenerator;
pub use random::{RandomDfaGenerator, RejectCounters, DEFAULT_MAX_REJECTS};

use tracing::trace;

use crate::alphabet::{Alphabet, Symbol};
use crate::automaton::{Automaton, DenseAutomaton};

/// A pending transition obligation: state `state` still needs an outgoing transition
/// under `symbol`.
#[derive(Clone, Copy, Debug)]
struct Obligation<S: Symbol> {
    state: usize,
    symbol: S,
}

/// Shared construction core of the DFA generators: owns the result automaton and the
/// ordered queue of obligations left dangling by trie construction.
///
/// The `incomplete` offset shifts every suit/partition value by one so that the smallest
/// value resolves to "leave the transition undefined" instead of state 0, turning the
/// complete-DFA constructions into generators of possibly-incomplete automata.
#[derive(Clone, Debug)]
pub(crate) struct GeneratorCore<S: Symbol> {
    pub(crate) result: DenseAutomaton<usize, S>,
    slots: Vec<Obligation<S>>,
    stack: Vec<Obligation<S>>,
    pub(crate) incomplete: usize,
}

impl<S: Symbol> GeneratorCore<S> {
    pub(crate) fn new(automaton_size: usize, alphabet: Alphabet<S>) -> Self {
        assert!(automaton_size >= 1, "generated automata have at least one state");
        assert!(!alphabet.is_empty(), "the alphabet must not be empty");
        let slot_count = (alphabet.size() - 1) * automaton_size + 1;
        let result = DenseAutomaton::with_states(automaton_size, alphabet);
        Self {
            result,
            slots: Vec::with_capacity(slot_count),
            stack: Vec::with_capacity(slot_count + 1),
            incomplete: 0,
        }
    }

    fn push_obligations(stack: &mut Vec<Obligation<S>>, alphabet: &Alphabet<S>, state: usize) {
        for symbol in alphabet.symbols().rev() {
            stack.push(Obligation { state, symbol });
        }
    }

    /// First part of the Bassino–Nicaud construction: builds the trie coded by a catalan
    /// suit. Obligations are resolved depth-first in symbol order; whenever the suit value
    /// at the current position exceeds the number of states attached so far, the next
    /// obligation is wired to a fresh state. The obligation remaining on top at each
    /// position is retained for completion.
    pub(crate) fn build_trie(&mut self, suit: &[usize]) {
        let alphabet = self.result.alphabet().clone();
        let n = self.result.size();
        let slot_count = (alphabet.size() - 1) * n + 1;
        debug_assert_eq!(suit.len(), slot_count);
        self.slots.clear();
        self.stack.clear();
        self.result.set_initial_index(0, true);
        Self::push_obligations(&mut self.stack, &alphabet, 0);

        let mut next_state = 1;
        for &value in suit.iter().take(slot_count - 1) {
            while next_state < value - self.incomplete {
                let obligation = self
                    .stack
                    .pop()
                    .expect("a valid catalan suit never exhausts the obligation stack");
                self.result
                    .connect(obligation.state, next_state, obligation.symbol);
                Self::push_obligations(&mut self.stack, &alphabet, next_state);
                next_state += 1;
            }
            self.slots.push(
                self.stack
                    .pop()
                    .expect("a valid catalan suit never exhausts the obligation stack"),
            );
        }
        self.slots.push(
            self.stack
                .pop()
                .expect("a valid catalan suit never exhausts the obligation stack"),
        );
        trace!(states = n, "trie built");
    }

    /// Second part of the construction: resolves the retained obligations from
    /// `from_position` onward, pointing obligation `i` at the state numbered
    /// `completion[i] - 1`. With the `incomplete` offset active, the smallest completion
    /// value clears the transition instead.
    pub(crate) fn complete(&mut self, completion: &[usize], from_position: usize) {
        debug_assert_eq!(completion.len(), self.slots.len());
        for (obligation, &value) in self.slots[from_position..]
            .iter()
            .zip(&completion[from_position..])
        {
            match value.checked_sub(1 + self.incomplete) {
                Some(target) => self.result.connect(obligation.state, target, obligation.symbol),
                None => self.result.disconnect(obligation.state, obligation.symbol),
            }
        }
    }

    /// Direct Bassino–David–Nicaud construction: turns a canonical set partition of the
    /// `n·k + 1` transition slots into a DFA in one pass. Slots are processed in partition
    /// order off the obligation stack; whenever a slot's block is the next unused state,
    /// that state's own obligations are pushed.
    pub(crate) fn partition_to_dfa(&mut self, partition: &[usize]) {
        let alphabet = self.result.alphabet().clone();
        let n = self.result.size();
        debug_assert_eq!(partition.len(), n * alphabet.size() + 1);
        self.stack.clear();
        self.result.set_initial_index(0, true);
        Self::push_obligations(&mut self.stack, &alphabet, 0);

        let mut attached = 0;
        for &block in &partition[1..] {
            let obligation = self
                .stack
                .pop()
                .expect("a valid set partition never exhausts the obligation stack");
            match block.checked_sub(self.incomplete) {
                Some(target) => {
                    self.result.connect(obligation.state, target, obligation.symbol);
                    if target == attached + 1 {
                        Self::push_obligations(&mut self.stack, &alphabet, target);
                        attached += 1;
                    }
                }
                None => self.result.disconnect(obligation.state, obligation.symbol),
            }
        }
    }

    /// Prefix-growth validity check for a canonical set partition: at every
    /// alphabet-aligned slot, the running maximum block id must have reached the bound
    /// derived from the slot's position, otherwise the obligation stack of
    /// [`Self::partition_to_dfa`] would run dry.
    pub(crate) fn is_valid_set_partition(&self, partition: &[usize]) -> bool {
        let k = self.result.alphabet_size();
        let n = self.result.size();
        let mut max: isize = -1;
        for (i, &block) in partition.iter().enumerate().take(n * k).skip(self.incomplete) {
            max = max.max(block as isize);
            if i % k == 0 && max - (self.incomplete as isize) < (i / k) as isize {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn trie_and_completion_build_the_coded_automaton() {
        // catalan [1, 2, 2] over {a, b}: the trie wires 0 --b--> 1, leaving the
        // obligations (0, a), (1, a), (1, b) dangling in that resolution order
        let mut core = GeneratorCore::new(2, Alphabet::of_size(2));
        core.build_trie(&[1, 2, 2]);
        core.complete(&[1, 1, 2], 0);
        let a = &core.result;
        assert!(a.is_initial(0));
        assert!(a.is_complete());
        assert_eq!(a.arrival(0, 'b'), Some(1));
        assert_eq!(a.arrival(0, 'a'), Some(0));
        assert_eq!(a.arrival(1, 'a'), Some(0));
        assert_eq!(a.arrival(1, 'b'), Some(1));
    }

    #[test]
    fn partition_construction_matches_trie_construction() {
        // slots resolve in the order (0,a), (1,a), (1,b), (0,b) because attaching state 1
        // pushes its obligations on top; the partition {0,2,3}{1,4} therefore codes
        // 0 --a--> 1, 1 --a--> 0, 1 --b--> 0, 0 --b--> 1
        let mut core = GeneratorCore::new(2, Alphabet::of_size(2));
        assert!(core.is_valid_set_partition(&[0, 1, 0, 0, 1]));
        core.partition_to_dfa(&[0, 1, 0, 0, 1]);
        let a = &core.result;
        assert!(a.is_complete());
        assert_eq!(a.arrival(0, 'a'), Some(1));
        assert_eq!(a.arrival(1, 'a'), Some(0));
        assert_eq!(a.arrival(1, 'b'), Some(0));
        assert_eq!(a.arrival(0, 'b'), Some(1));
    }

    #[test]
    fn invalid_partitions_are_detected() {
        let core = GeneratorCore::new(2, Alphabet::of_size(2));
        // block 1 first appears too late: at slot 2 the running maximum is still 0
        assert!(!core.is_valid_set_partition(&[0, 0, 0, 1, 1]));
    }
}
