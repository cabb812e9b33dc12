use std::fmt::Debug;
use std::hash::Hash;

use crate::alphabet::{Alphabet, Symbol};
use crate::draw::Canvas;
use crate::error::AutomatonError;
use crate::math::Bijection;

/// A label identifying a state of an automaton. Labels are opaque to the algorithms, which
/// work on the dense integer index each label is bijectively mapped to in creation order.
pub trait StateLabel: Clone + Eq + Hash + Debug {}
impl<L: Clone + Eq + Hash + Debug> StateLabel for L {}

/// The capability set consumed by every algorithm in this crate: a read-only view of an
/// automaton with states identified by dense indices in `[0, size)`.
///
/// An automaton produced by the generators in [`crate::generate`] is always *complete*
/// (every `(state, symbol)` pair has a defined arrival state) and *accessible* (every
/// state is reachable from state 0) by construction. The algorithms that certify
/// structural properties rely on that invariant where documented.
pub trait Automaton {
    /// The symbol type labelling transitions.
    type Symbol: Symbol;

    /// The alphabet of this automaton.
    fn alphabet(&self) -> &Alphabet<Self::Symbol>;

    /// The current number of states.
    fn size(&self) -> usize;

    /// The number of symbols in the alphabet.
    fn alphabet_size(&self) -> usize {
        self.alphabet().size()
    }

    /// Returns the arrival state of the transition leaving `state` under the symbol with
    /// index `symbol_index`, or `None` if the transition is undefined.
    fn arrival_index(&self, state: usize, symbol_index: usize) -> Option<usize>;

    /// Returns true if the state with the given index is final.
    fn is_final(&self, state: usize) -> bool;

    /// Returns true if the state with the given index is initial.
    fn is_initial(&self, state: usize) -> bool;
}

/// An automaton stored as a preallocated `(max_size + 1) × k` transition matrix. State
/// labels of type `L` are mapped to dense integers in creation order; an undefined
/// transition is encoded by [`DenseAutomaton::UNDEFINED`], a sentinel distinct from every
/// valid state index.
///
/// The label-based operations validate their arguments and return [`AutomatonError`]s; the
/// index-based operations are the fast path used by the generation and minimization
/// algorithms, and panic when handed an out-of-range index.
#[derive(Clone, Debug)]
pub struct DenseAutomaton<L: StateLabel = usize, S: Symbol = char> {
    alphabet: Alphabet<S>,
    max_size: usize,
    size: usize,
    table: Vec<usize>,
    final_flags: Vec<bool>,
    initial_flags: Vec<bool>,
    labels: Bijection<L, usize>,
}

impl<L: StateLabel, S: Symbol> DenseAutomaton<L, S> {
    /// Sentinel encoding an undefined transition inside the matrix. Never a valid state
    /// index, since the preallocated capacity is bounded.
    pub const UNDEFINED: usize = usize::MAX;

    /// Creates an empty automaton able to hold up to `max_size + 1` states over the given
    /// alphabet. The extra row leaves room for completing an automaton with a trap state.
    pub fn with_capacity(max_size: usize, alphabet: Alphabet<S>) -> Self {
        let k = alphabet.size();
        let rows = max_size + 1;
        Self {
            alphabet,
            max_size,
            size: 0,
            table: vec![Self::UNDEFINED; rows * k],
            final_flags: vec![false; rows],
            initial_flags: vec![false; rows],
            labels: Bijection::with_capacity(rows),
        }
    }

    /// Adds a state carrying the given label and returns its dense index. Fails with
    /// [`AutomatonError::CapacityExceeded`] once the preallocated limit is reached and
    /// with [`AutomatonError::InvalidState`] when the label is already in use.
    pub fn add_state(&mut self, label: L) -> Result<usize, AutomatonError> {
        if self.size > self.max_size {
            return Err(AutomatonError::CapacityExceeded);
        }
        if self.labels.contains_left(&label) {
            return Err(AutomatonError::InvalidState);
        }
        let index = self.size;
        self.labels.insert(label, index);
        self.size += 1;
        Ok(index)
    }

    /// Removes the last created state, shrinking the automaton by one. Its row is cleared
    /// and its label mapping discarded; no other state may be removed. Returns false when
    /// the automaton is empty.
    pub fn remove_last_state(&mut self) -> bool {
        if self.size == 0 {
            return false;
        }
        self.size -= 1;
        let index = self.size;
        self.labels.remove_by_right(&index);
        self.final_flags[index] = false;
        self.initial_flags[index] = false;
        let k = self.alphabet.size();
        for cell in &mut self.table[index * k..(index + 1) * k] {
            *cell = Self::UNDEFINED;
        }
        true
    }

    /// Returns the dense index of the state carrying `label`.
    pub fn state_index(&self, label: &L) -> Result<usize, AutomatonError> {
        self.labels
            .get_by_left(label)
            .copied()
            .ok_or(AutomatonError::InvalidState)
    }

    /// Returns the label of the state with the given dense index, if any.
    pub fn label_of(&self, state: usize) -> Option<&L> {
        self.labels.get_by_right(&state)
    }

    /// Adds (or overwrites) the transition `from --symbol--> to`, both endpoints given by
    /// label. Fails with [`AutomatonError::InvalidState`] if either endpoint is unknown
    /// and with [`AutomatonError::UnknownSymbol`] if the symbol is not in the alphabet.
    pub fn add_transition(&mut self, from: &L, to: &L, symbol: S) -> Result<(), AutomatonError> {
        let from = self.state_index(from)?;
        let to = self.state_index(to)?;
        let w = self.alphabet.position(symbol)?;
        let k = self.alphabet.size();
        self.table[from * k + w] = to;
        Ok(())
    }

    /// Returns the arrival state of `from --symbol-->`, as a label. `None` encodes an
    /// undefined transition.
    pub fn arrival_state(&self, from: &L, symbol: S) -> Result<Option<&L>, AutomatonError> {
        let from = self.state_index(from)?;
        let w = self.alphabet.position(symbol)?;
        Ok(self.arrival_index(from, w).and_then(|q| self.label_of(q)))
    }

    /// Sets or clears the final flag of the state carrying `label`.
    pub fn set_final(&mut self, label: &L, value: bool) -> Result<(), AutomatonError> {
        let index = self.state_index(label)?;
        self.final_flags[index] = value;
        Ok(())
    }

    /// Sets or clears the initial flag of the state carrying `label`.
    pub fn set_initial(&mut self, label: &L, value: bool) -> Result<(), AutomatonError> {
        let index = self.state_index(label)?;
        self.initial_flags[index] = value;
        Ok(())
    }

    /// Adds (or overwrites) a transition between states given by dense index.
    ///
    /// Panics when an index is out of range or the symbol unknown; the generation
    /// algorithms only ever hand in indices they created.
    pub fn connect(&mut self, from: usize, to: usize, symbol: S) {
        assert!(from < self.size && to < self.size, "state index out of range");
        let w = self
            .alphabet
            .position(symbol)
            .expect("symbol must be part of the alphabet");
        let k = self.alphabet.size();
        self.table[from * k + w] = to;
    }

    /// Removes the transition leaving `from` under `symbol`, if any.
    pub fn disconnect(&mut self, from: usize, symbol: S) {
        assert!(from < self.size, "state index out of range");
        let w = self
            .alphabet
            .position(symbol)
            .expect("symbol must be part of the alphabet");
        let k = self.alphabet.size();
        self.table[from * k + w] = Self::UNDEFINED;
    }

    /// Sets or clears the final flag of the state with the given dense index.
    pub fn set_final_index(&mut self, state: usize, value: bool) {
        assert!(state < self.size, "state index out of range");
        self.final_flags[state] = value;
    }

    /// Sets or clears the initial flag of the state with the given dense index.
    pub fn set_initial_index(&mut self, state: usize, value: bool) {
        assert!(state < self.size, "state index out of range");
        self.initial_flags[state] = value;
    }

    /// The arrival state of `state` under `symbol`, by dense index.
    pub fn arrival(&self, state: usize, symbol: S) -> Option<usize> {
        let w = self.alphabet.position(symbol).ok()?;
        self.arrival_index(state, w)
    }

    /// The maximum number of states this automaton was allocated for, excluding the spare
    /// completion row.
    pub fn capacity(&self) -> usize {
        self.max_size
    }

    /// Iterates over the final-flag vector, indexed by dense state index.
    pub fn final_flags(&self) -> impl Iterator<Item = bool> + '_ {
        self.final_flags[..self.size].iter().copied()
    }

    /// Number of final states.
    pub fn final_count(&self) -> usize {
        self.final_flags[..self.size].iter().filter(|f| **f).count()
    }

    /// Returns true if every `(state, symbol)` pair has a defined transition.
    pub fn is_complete(&self) -> bool {
        let k = self.alphabet.size();
        self.table[..self.size * k]
            .iter()
            .all(|&cell| cell != Self::UNDEFINED)
    }

    /// Walks the drawing callback interface once for this automaton: nodes are laid out on
    /// a five-per-row grid, then every defined transition is emitted as an edge.
    pub fn draw(&self, canvas: &mut impl Canvas) {
        canvas.begin(165, (self.max_size as i32 / 5) * 33);
        for q in 0..self.size {
            canvas.node(
                &q.to_string(),
                (q as i32 % 5) * 20,
                -(q as i32 / 5) * 33,
                self.is_initial(q),
                self.is_final(q),
            );
        }
        for q in 0..self.size {
            for (w, sym) in self.alphabet.symbols().enumerate() {
                if let Some(target) = self.arrival_index(q, w) {
                    canvas.edge(&q.to_string(), &target.to_string(), &sym.to_string());
                }
            }
        }
        canvas.end();
    }
}

impl<S: Symbol> DenseAutomaton<usize, S> {
    /// Creates an automaton with `size` states labelled `0..size` over the given alphabet,
    /// without any transitions. This is the shape the generators start from.
    pub fn with_states(size: usize, alphabet: Alphabet<S>) -> Self {
        let mut out = Self::with_capacity(size, alphabet);
        for q in 0..size {
            out.add_state(q).expect("capacity suffices for size states");
        }
        out
    }

    /// Adds a state labelled with the next free integer.
    pub fn add_state_auto(&mut self) -> Result<usize, AutomatonError> {
        let label = self.size;
        self.add_state(label)
    }
}

impl<L: StateLabel, S: Symbol> Automaton for DenseAutomaton<L, S> {
    type Symbol = S;

    fn alphabet(&self) -> &Alphabet<S> {
        &self.alphabet
    }

    fn size(&self) -> usize {
        self.size
    }

    fn arrival_index(&self, state: usize, symbol_index: usize) -> Option<usize> {
        let k = self.alphabet.size();
        debug_assert!(state < self.size && symbol_index < k);
        match self.table[state * k + symbol_index] {
            Self::UNDEFINED => None,
            target => Some(target),
        }
    }

    fn is_final(&self, state: usize) -> bool {
        state < self.size && self.final_flags[state]
    }

    fn is_initial(&self, state: usize) -> bool {
        state < self.size && self.initial_flags[state]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_state() -> DenseAutomaton<usize, char> {
        let mut a = DenseAutomaton::with_states(2, Alphabet::of_size(2));
        a.set_initial_index(0, true);
        a.connect(0, 1, 'a');
        a.connect(0, 0, 'b');
        a.connect(1, 1, 'a');
        a.connect(1, 0, 'b');
        a
    }

    #[test]
    fn transitions_and_flags() {
        let mut a = two_state();
        assert_eq!(a.arrival(0, 'a'), Some(1));
        assert_eq!(a.arrival(1, 'b'), Some(0));
        assert!(a.is_complete());
        assert!(a.is_initial(0));
        assert!(!a.is_final(1));
        a.set_final_index(1, true);
        assert_eq!(a.final_count(), 1);
    }

    #[test]
    fn capacity_is_enforced() {
        let mut a: DenseAutomaton<usize, char> =
            DenseAutomaton::with_capacity(1, Alphabet::of_size(1));
        assert_eq!(a.add_state(0), Ok(0));
        assert_eq!(a.add_state(1), Ok(1));
        assert_eq!(a.add_state(2), Err(AutomatonError::CapacityExceeded));
        assert_eq!(a.add_state(1), Err(AutomatonError::CapacityExceeded));
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let mut a: DenseAutomaton<&str, char> =
            DenseAutomaton::with_capacity(4, Alphabet::of_size(1));
        a.add_state("p").unwrap();
        assert_eq!(a.add_state("p"), Err(AutomatonError::InvalidState));
    }

    #[test]
    fn label_based_api_validates() {
        let mut a: DenseAutomaton<char, char> =
            DenseAutomaton::with_capacity(2, Alphabet::of_size(1));
        a.add_state('p').unwrap();
        a.add_state('q').unwrap();
        a.add_transition(&'p', &'q', 'a').unwrap();
        assert_eq!(a.arrival_state(&'p', 'a'), Ok(Some(&'q')));
        assert_eq!(a.arrival_state(&'q', 'a'), Ok(None));
        assert_eq!(
            a.add_transition(&'p', &'x', 'a'),
            Err(AutomatonError::InvalidState)
        );
        assert_eq!(
            a.add_transition(&'p', &'q', 'z'),
            Err(AutomatonError::UnknownSymbol)
        );
    }

    #[test]
    fn truncation_clears_the_last_row() {
        let mut a = two_state();
        a.set_final_index(1, true);
        assert!(a.remove_last_state());
        assert_eq!(a.size(), 1);
        assert_eq!(a.arrival(0, 'b'), Some(0));
        // re-adding a state yields a fresh, fully undefined row
        let q = a.add_state_auto().unwrap();
        assert_eq!(q, 1);
        assert!(!a.is_final(1));
        assert_eq!(a.arrival(1, 'a'), None);
    }
}
