use std::fmt::{Debug, Display};
use std::hash::Hash;

use crate::error::AutomatonError;
use crate::math::Map;

/// A symbol of an alphabet, which is also the type labelling transitions of an automaton.
/// Symbols are cheap to copy and totally ordered so that algorithms can process them in a
/// fixed, reproducible order.
pub trait Symbol: Copy + Eq + Ord + Hash + Debug + Display {}
impl<S: Copy + Eq + Ord + Hash + Debug + Display> Symbol for S {}

/// An insertion-ordered set of symbols where each symbol is assigned a stable, dense
/// integer index at first insertion. The mapping is a bijection onto `[0, size)`: indices
/// are 0-based, never compacted and never reassigned.
///
/// # Example
/// ```
/// use icdfa::prelude::*;
/// let mut alphabet = Alphabet::default();
/// alphabet.insert('a');
/// alphabet.insert('b');
/// alphabet.insert('a');
/// assert_eq!(alphabet.size(), 2);
/// assert_eq!(alphabet.position('b'), Ok(1));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet<S: Symbol = char> {
    symbols: Vec<S>,
    positions: Map<S, usize>,
}

impl<S: Symbol> Default for Alphabet<S> {
    fn default() -> Self {
        Self {
            symbols: Vec::new(),
            positions: Map::default(),
        }
    }
}

impl<S: Symbol> Alphabet<S> {
    /// Creates an alphabet from the given symbols, keeping the first occurrence of each.
    pub fn new(symbols: impl IntoIterator<Item = S>) -> Self {
        let mut out = Self::default();
        for sym in symbols {
            out.insert(sym);
        }
        out
    }

    /// Inserts a symbol, assigning it the next free index. Inserting a symbol that is
    /// already present is a no-op.
    pub fn insert(&mut self, symbol: S) {
        if !self.positions.contains_key(&symbol) {
            self.positions.insert(symbol, self.symbols.len());
            self.symbols.push(symbol);
        }
    }

    /// Returns the index assigned to `symbol`, or [`AutomatonError::UnknownSymbol`] if the
    /// symbol was never inserted.
    pub fn position(&self, symbol: S) -> Result<usize, AutomatonError> {
        self.positions
            .get(&symbol)
            .copied()
            .ok_or(AutomatonError::UnknownSymbol)
    }

    /// Returns true if `symbol` is part of this alphabet.
    pub fn contains(&self, symbol: S) -> bool {
        self.positions.contains_key(&symbol)
    }

    /// Returns the symbol stored at `position`, if any.
    pub fn nth(&self, position: usize) -> Option<S> {
        self.symbols.get(position).copied()
    }

    /// Iterates over the symbols in insertion order. The iterator is finite and can be
    /// restarted by calling the method again.
    pub fn symbols(&self) -> impl DoubleEndedIterator<Item = S> + '_ {
        self.symbols.iter().copied()
    }

    /// The number of symbols in this alphabet.
    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if no symbol was inserted yet.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Alphabet<char> {
    /// Creates an alphabet of the given size over the first `size` lowercase latin
    /// letters, i.e. 'a' to 'z'.
    pub fn of_size(size: usize) -> Self {
        assert!(size <= 26, "latin alphabet is limited to 26 symbols");
        Self::new((0..size).map(|i| (b'a' + i as u8) as char))
    }
}

impl<S: Symbol> FromIterator<S> for Alphabet<S> {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl<S: Symbol> std::ops::Index<usize> for Alphabet<S> {
    type Output = S;

    fn index(&self, index: usize) -> &Self::Output {
        &self.symbols[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_assigns_dense_indices() {
        let mut alphabet = Alphabet::default();
        for sym in ['x', 'y', 'z', 'y', 'x'] {
            alphabet.insert(sym);
        }
        assert_eq!(alphabet.size(), 3);
        assert_eq!(alphabet.position('x'), Ok(0));
        assert_eq!(alphabet.position('y'), Ok(1));
        assert_eq!(alphabet.position('z'), Ok(2));
        assert_eq!(alphabet.position('w'), Err(AutomatonError::UnknownSymbol));
        assert_eq!(alphabet.symbols().collect::<Vec<_>>(), vec!['x', 'y', 'z']);
    }

    #[test]
    fn latin_alphabet() {
        let alphabet = Alphabet::of_size(3);
        assert_eq!(alphabet.symbols().collect::<Vec<_>>(), vec!['a', 'b', 'c']);
        assert_eq!(alphabet.nth(1), Some('b'));
        assert_eq!(alphabet.nth(3), None);
    }

    #[test]
    fn symbols_iterator_restarts() {
        let alphabet = Alphabet::new([0u8, 1, 2]);
        assert_eq!(alphabet.symbols().count(), 3);
        assert_eq!(alphabet.symbols().count(), 3);
    }
}
