//! Moore partition refinement. Both implementations compute the Nerode partition of an
//! automaton's states by iterating a stable bucket sort on per-state signatures (own
//! class, then the class of each arrival state). [`MooreAlgorithm`] is the textbook
//! version; [`FastMoore`] additionally retires singleton classes from the re-sort, which
//! pays off on the near-minimal automata produced by uniform random generation.

use itertools::Itertools;
use tracing::{debug, trace};

use crate::alphabet::Symbol;
use crate::automaton::{Automaton, DenseAutomaton, StateLabel};

/// Signature entry standing in for the class of an undefined arrival state. Sorts into
/// the bucket past every real class, so partially defined states never merge with fully
/// defined ones that agree elsewhere.
const NO_CLASS: usize = usize::MAX;

/// Moore's minimization algorithm with preallocated scratch buffers, reusable across
/// automata of the same size.
///
/// # Example
/// ```
/// use icdfa::prelude::*;
/// let mut gen = RandomDfaGenerator::new(6, Alphabet::of_size(2)).with_seed(9);
/// let mut moore = MooreAlgorithm::new();
/// let minimal = moore.minimize(gen.random().unwrap());
/// assert!(minimal.size() <= 6);
/// assert!(moore.is_minimal(&minimal));
/// ```
#[derive(Clone, Debug, Default)]
pub struct MooreAlgorithm {
    classes: Vec<usize>,
    next: Vec<usize>,
    /// Flattened `n × k` matrix of arrival classes.
    signatures: Vec<usize>,
    /// States in lexicographic signature order, refined by each round's bucket passes.
    order: Vec<usize>,
    buckets: Vec<Vec<usize>>,
    class_count: usize,
    rounds: usize,
}

impl MooreAlgorithm {
    /// Creates an instance with empty buffers; they grow on first use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of classes in the last computed partition, i.e. the size of the minimal
    /// automaton.
    pub fn class_count(&self) -> usize {
        self.class_count
    }

    /// Number of refinement rounds the last computation took, the initial cut included.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Computes the Nerode partition of the automaton's states. Entry `i` of the returned
    /// slice is the class of state `i`; equal entries mean language-equivalent states.
    pub fn partition<A: Automaton>(&mut self, automaton: &A) -> &[usize] {
        self.partition_capped(automaton, usize::MAX)
    }

    /// Like [`Self::partition`], but stops early after `max_rounds` refinement rounds,
    /// yielding the partition by words of bounded length. Used to observe how fast the
    /// classes separate.
    pub fn partition_capped<A: Automaton>(&mut self, automaton: &A, max_rounds: usize) -> &[usize] {
        let n = automaton.size();
        let k = automaton.alphabet_size();
        self.reset(n, k);
        if !self.first_cut(automaton) {
            return &self.classes;
        }
        while self.rounds < max_rounds {
            self.rounds += 1;
            self.fill_signatures(automaton);
            self.sort_passes(k);
            self.assign_classes(k);
            std::mem::swap(&mut self.classes, &mut self.next);
            if self.class_count == n || self.classes == self.next {
                break;
            }
        }
        trace!(classes = self.class_count, rounds = self.rounds, "partition refined");
        &self.classes
    }

    /// True if the automaton is minimal, i.e. refinement separates all of its states.
    pub fn is_minimal<A: Automaton>(&mut self, automaton: &A) -> bool {
        self.partition(automaton);
        self.class_count == automaton.size()
    }

    /// Builds the quotient automaton: one state per class, renumbered by first appearance
    /// in state-id order, with flags and transitions induced from the members.
    pub fn minimize<L: StateLabel, S: Symbol>(
        &mut self,
        automaton: &DenseAutomaton<L, S>,
    ) -> DenseAutomaton<usize, S> {
        self.partition(automaton);
        debug!(from = automaton.size(), to = self.class_count, "building quotient");

        let mut renumber = vec![NO_CLASS; self.class_count];
        let mut fresh = 0;
        for &class in &self.classes {
            if renumber[class] == NO_CLASS {
                renumber[class] = fresh;
                fresh += 1;
            }
        }

        let mut quotient = DenseAutomaton::with_states(self.class_count, automaton.alphabet().clone());
        for state in 0..automaton.size() {
            let image = renumber[self.classes[state]];
            if automaton.is_initial(state) {
                quotient.set_initial_index(image, true);
            }
            if automaton.is_final(state) {
                quotient.set_final_index(image, true);
            }
            for symbol_index in 0..automaton.alphabet_size() {
                if let Some(arrival) = automaton.arrival_index(state, symbol_index) {
                    let symbol = automaton.alphabet()[symbol_index];
                    quotient.connect(image, renumber[self.classes[arrival]], symbol);
                }
            }
        }
        quotient
    }

    fn reset(&mut self, n: usize, k: usize) {
        self.classes.clear();
        self.classes.resize(n, 0);
        self.next.clear();
        self.next.resize(n, 0);
        self.signatures.clear();
        self.signatures.resize(n * k, NO_CLASS);
        self.order.clear();
        if self.buckets.len() < n + 1 {
            self.buckets.resize_with(n + 1, Vec::new);
        }
        self.rounds = 0;
    }

    /// Splits the states into finals (class 0) and non-finals (class 1), finals first in
    /// the sort order. A one-sided cut means the automaton has a single class and the
    /// refinement never starts.
    fn first_cut<A: Automaton>(&mut self, automaton: &A) -> bool {
        let n = automaton.size();
        self.rounds = 1;
        self.order.extend((0..n).filter(|&q| automaton.is_final(q)));
        if self.order.is_empty() || self.order.len() == n {
            self.class_count = 1;
            return false;
        }
        self.order.extend((0..n).filter(|&q| !automaton.is_final(q)));
        for q in 0..n {
            self.classes[q] = usize::from(!automaton.is_final(q));
        }
        self.class_count = 2;
        true
    }

    fn fill_signatures<A: Automaton>(&mut self, automaton: &A) {
        let k = automaton.alphabet_size();
        for (state, symbol_index) in (0..automaton.size()).cartesian_product(0..k) {
            self.signatures[state * k + symbol_index] = automaton
                .arrival_index(state, symbol_index)
                .map_or(NO_CLASS, |arrival| self.classes[arrival]);
        }
    }

    /// Stable bucket distribution by signature component, least significant first: symbol
    /// `k−1` down to symbol `0`, then the state's own class. Undefined arrivals go to the
    /// overflow bucket past every class.
    fn sort_passes(&mut self, k: usize) {
        let overflow = self.buckets.len() - 1;
        for pass in (0..=k).rev() {
            for state in self.order.drain(..) {
                let key = if pass == 0 {
                    self.classes[state]
                } else {
                    match self.signatures[state * k + pass - 1] {
                        NO_CLASS => overflow,
                        class => class,
                    }
                };
                self.buckets[key].push(state);
            }
            for bucket in self.buckets.iter_mut() {
                self.order.append(bucket);
            }
        }
    }

    /// Scans the sorted order and opens a new class whenever two adjacent states differ
    /// in signature.
    fn assign_classes(&mut self, k: usize) {
        self.class_count = 1;
        let mut previous = None;
        for &state in &self.order {
            if let Some(prev) = previous {
                if !same_signature(&self.classes, &self.signatures, k, prev, state) {
                    self.class_count += 1;
                }
            }
            self.next[state] = self.class_count - 1;
            previous = Some(state);
        }
    }
}

fn same_signature(classes: &[usize], signatures: &[usize], k: usize, a: usize, b: usize) -> bool {
    classes[a] == classes[b] && signatures[a * k..(a + 1) * k] == signatures[b * k..(b + 1) * k]
}

/// Variant of [`MooreAlgorithm`] that retires singleton classes: a state alone in its
/// class can never move again, so it is excluded from later sorting passes and its class
/// id is renumbered first each round. Produces the same partition.
#[derive(Clone, Debug, Default)]
pub struct FastMoore {
    classes: Vec<usize>,
    next: Vec<usize>,
    signatures: Vec<usize>,
    /// States still subject to refinement, in signature order.
    order: Vec<usize>,
    /// States whose classes are settled singletons, in settling order.
    settled: Vec<usize>,
    buckets: Vec<Vec<usize>>,
    scratch: Vec<usize>,
    class_count: usize,
    rounds: usize,
}

impl FastMoore {
    /// Creates an instance with empty buffers; they grow on first use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of classes in the last computed partition.
    pub fn class_count(&self) -> usize {
        self.class_count
    }

    /// Number of refinement rounds the last computation took, the initial cut included.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Computes the Nerode partition of the automaton's states; see
    /// [`MooreAlgorithm::partition`]. Class ids differ from the textbook version's (the
    /// settled states are renumbered first) but the induced partition is identical.
    pub fn partition<A: Automaton>(&mut self, automaton: &A) -> &[usize] {
        let n = automaton.size();
        let k = automaton.alphabet_size();
        self.reset(n, k);
        if !self.first_cut(automaton) {
            return &self.classes;
        }
        loop {
            self.rounds += 1;
            self.fill_signatures(automaton);
            self.sort_passes(k);
            self.assign_classes(k);
            std::mem::swap(&mut self.classes, &mut self.next);
            if self.order.is_empty() || self.classes == self.next {
                break;
            }
        }
        trace!(classes = self.class_count, rounds = self.rounds, "partition refined");
        &self.classes
    }

    /// True if the automaton is minimal.
    pub fn is_minimal<A: Automaton>(&mut self, automaton: &A) -> bool {
        self.partition(automaton);
        self.class_count == automaton.size()
    }

    fn reset(&mut self, n: usize, k: usize) {
        self.classes.clear();
        self.classes.resize(n, 0);
        self.next.clear();
        self.next.resize(n, 0);
        self.signatures.clear();
        self.signatures.resize(n * k, NO_CLASS);
        self.order.clear();
        self.settled.clear();
        if self.buckets.len() < n + 1 {
            self.buckets.resize_with(n + 1, Vec::new);
        }
        self.rounds = 0;
    }

    /// Initial finals/non-finals cut. A side that is already a singleton is settled
    /// immediately and only the other side enters the refinement order.
    fn first_cut<A: Automaton>(&mut self, automaton: &A) -> bool {
        let n = automaton.size();
        self.rounds = 1;
        let finals: Vec<usize> = (0..n).filter(|&q| automaton.is_final(q)).collect();
        let others: Vec<usize> = (0..n).filter(|&q| !automaton.is_final(q)).collect();
        if finals.is_empty() || others.is_empty() {
            self.class_count = 1;
            return false;
        }
        for &q in &finals {
            self.classes[q] = 0;
        }
        for &q in &others {
            self.classes[q] = 1;
        }
        if finals.len() == 1 {
            self.settled.extend(finals);
            self.order.extend(others);
        } else if others.len() == 1 {
            self.settled.extend(others);
            self.order.extend(finals);
        } else {
            self.order.extend(finals);
            self.order.extend(others);
        }
        self.class_count = 2;
        true
    }

    /// Signatures are only needed for states still in the refinement order.
    fn fill_signatures<A: Automaton>(&mut self, automaton: &A) {
        let k = automaton.alphabet_size();
        for (state, symbol_index) in self.order.iter().copied().cartesian_product(0..k) {
            self.signatures[state * k + symbol_index] = automaton
                .arrival_index(state, symbol_index)
                .map_or(NO_CLASS, |arrival| self.classes[arrival]);
        }
    }

    fn sort_passes(&mut self, k: usize) {
        let overflow = self.buckets.len() - 1;
        for pass in (0..=k).rev() {
            for state in self.order.drain(..) {
                let key = if pass == 0 {
                    self.classes[state]
                } else {
                    match self.signatures[state * k + pass - 1] {
                        NO_CLASS => overflow,
                        class => class,
                    }
                };
                self.buckets[key].push(state);
            }
            for bucket in self.buckets.iter_mut() {
                self.order.append(bucket);
            }
        }
    }

    /// Renumbers settled classes first, then scans the sorted order: a state whose
    /// signature differs from its predecessor's opens a fresh class and is tentatively
    /// settled; a matching successor pulls it back into the refinement order.
    fn assign_classes(&mut self, k: usize) {
        let mut fresh = 0;
        for &state in &self.settled {
            self.next[state] = fresh;
            fresh += 1;
        }

        let order = std::mem::take(&mut self.order);
        self.scratch.clear();
        let mut previous = None;
        for &state in &order {
            match previous {
                Some(prev) if same_signature(&self.classes, &self.signatures, k, prev, state) => {
                    self.next[state] = self.next[prev];
                    if self.settled.last() == Some(&prev) {
                        self.scratch.push(self.settled.pop().unwrap_or(prev));
                    }
                    self.scratch.push(state);
                }
                _ => {
                    self.next[state] = fresh;
                    fresh += 1;
                    self.settled.push(state);
                }
            }
            previous = Some(state);
        }
        self.order = order;
        self.order.clear();
        self.order.append(&mut self.scratch);
        self.class_count = fresh;
    }
}
