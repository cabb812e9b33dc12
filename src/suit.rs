//! Integer sequences ("suits") driving the exhaustive enumeration of complete accessible
//! DFAs. A [`CatalanSuit`] of length `(k-1)·n + 1` is in bijection with DFA tries (words
//! of Dyck), a [`CompletionSuit`] of the same length describes how the trie's dangling
//! transitions are completed. Both carry a cursor remembering where the successor
//! operation resumes incrementing.

use tracing::trace;

/// Common surface of the combinatorial suits: a fixed-length integer sequence with a total
/// order, seeded by `first` and advanced by a successor operation. The successor operation
/// itself is inherent to each suit because [`CompletionSuit`] needs its paired
/// [`CatalanSuit`] to know the pointwise bounds.
pub trait Suit {
    /// Seeds the suit to its minimal valid sequence and returns it.
    fn first(&mut self) -> &[usize];

    /// The current sequence.
    fn values(&self) -> &[usize];

    /// The fixed length of the sequence.
    fn len(&self) -> usize {
        self.values().len()
    }

    /// True if the sequence has length zero. Never the case for the suits in this module.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A sequence `tab[0..(k-1)·n+1)` subject to `max(i/(k-1)+1, tab[i-1]) ≤ tab[i] ≤ n` with
/// the last entry pinned to `n`. These sequences are in bijection with the tries of
/// complete accessible DFAs with `n` states over `k` symbols.
#[derive(Clone, Debug)]
pub struct CatalanSuit {
    tab: Vec<usize>,
    automaton_size: usize,
    alphabet_size: usize,
    /// Cursor used by the successor operation; `None` once no position can be advanced.
    cursor: Option<usize>,
}

impl CatalanSuit {
    /// Creates a suit for automata with `automaton_size` states over `alphabet_size`
    /// symbols. Both must be at least 1.
    pub fn new(automaton_size: usize, alphabet_size: usize) -> Self {
        assert!(automaton_size >= 1 && alphabet_size >= 1);
        let len = (alphabet_size - 1) * automaton_size + 1;
        trace!(automaton_size, alphabet_size, len, "creating catalan suit");
        Self {
            tab: vec![0; len],
            automaton_size,
            alphabet_size,
            cursor: None,
        }
    }

    /// The value of the suit at `position` capped at the automaton size, and the automaton
    /// size itself for positions past the end. This is the pointwise bound the paired
    /// completion suit must respect.
    pub fn bound_at(&self, position: usize) -> usize {
        if position < self.tab.len() {
            self.tab[position].min(self.automaton_size)
        } else {
            self.automaton_size
        }
    }

    /// Advances to the immediate lexicographic successor under the validity rule, or
    /// returns `None` when the suit is exhausted. Increments at the cursor; a position
    /// already at its maximum `n` carries one position to the left, and every position
    /// after the accepted increment is refilled with its minimal valid value
    /// `max(tab[i-1], i+1)`.
    pub fn next(&mut self) -> Option<&[usize]> {
        let len = self.tab.len();
        let mut pos = self.cursor?;
        loop {
            let value = self.tab[pos];
            self.tab[pos] += 1;
            if value < self.automaton_size {
                break;
            }
            if pos == 0 {
                self.cursor = None;
                return None;
            }
            pos -= 1;
        }
        for i in pos + 1..len - 1 {
            self.tab[i] = self.tab[i - 1].max(i + 1);
        }
        self.cursor = Some(len - 2);
        Some(&self.tab)
    }
}

impl Suit for CatalanSuit {
    /// Seeds `tab[i] = i/(k-1) + 1` for every position but the last, which is pinned to
    /// `n`. For `(n,k) = (2,2)` this yields `[1, 2, 2]`.
    fn first(&mut self) -> &[usize] {
        let len = self.tab.len();
        for (i, cell) in self.tab.iter_mut().enumerate().take(len - 1) {
            *cell = i / (self.alphabet_size - 1) + 1;
        }
        self.tab[len - 1] = self.automaton_size;
        self.cursor = len.checked_sub(2);
        &self.tab
    }

    fn values(&self) -> &[usize] {
        &self.tab
    }
}

/// A sequence bounded pointwise by a paired [`CatalanSuit`], encoding how the retained
/// obligations of a trie are resolved into a complete DFA: position `i` holds the
/// 1-based index of the state the `i`-th dangling transition points to.
#[derive(Clone, Debug)]
pub struct CompletionSuit {
    tab: Vec<usize>,
    /// Lowest position modified by the last successor step, used to resume partial
    /// completion without rebuilding the whole trie.
    modified_position: usize,
    cursor: Option<usize>,
}

impl CompletionSuit {
    /// Creates a completion suit of the same length as its paired catalan suit.
    pub fn new(catalan: &CatalanSuit) -> Self {
        trace!(len = catalan.len(), "creating completion suit");
        Self {
            tab: vec![0; catalan.len()],
            modified_position: 0,
            cursor: None,
        }
    }

    /// The lowest position whose value changed in the last call to [`Self::next`] (0 after
    /// [`Suit::first`]).
    pub fn modified_position(&self) -> usize {
        self.modified_position
    }

    /// Advances to the immediate lexicographic successor under the pointwise bounds of the
    /// paired catalan suit, or returns `None` when exhausted. Positions after the accepted
    /// increment are refilled with 1.
    pub fn next(&mut self, bounds: &CatalanSuit) -> Option<&[usize]> {
        let len = self.tab.len();
        let mut pos = self.cursor?;
        loop {
            let value = self.tab[pos];
            self.tab[pos] += 1;
            if value < bounds.bound_at(pos) {
                break;
            }
            if pos == 0 {
                self.cursor = None;
                return None;
            }
            pos -= 1;
        }
        self.modified_position = pos;
        for cell in &mut self.tab[pos + 1..len] {
            *cell = 1;
        }
        self.cursor = Some(len - 1);
        Some(&self.tab)
    }
}

impl Suit for CompletionSuit {
    /// Seeds every entry to 1, the minimal completion.
    fn first(&mut self) -> &[usize] {
        self.tab.fill(1);
        self.modified_position = 0;
        self.cursor = Some(self.tab.len() - 1);
        &self.tab
    }

    fn values(&self) -> &[usize] {
        &self.tab
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_catalans(n: usize, k: usize) -> Vec<Vec<usize>> {
        let mut suit = CatalanSuit::new(n, k);
        let mut out = vec![suit.first().to_vec()];
        while let Some(tab) = suit.next() {
            out.push(tab.to_vec());
        }
        out
    }

    #[test]
    fn catalan_first_for_two_states_two_symbols() {
        let mut suit = CatalanSuit::new(2, 2);
        assert_eq!(suit.first(), &[1, 2, 2]);
    }

    #[test]
    fn catalan_successor_chain_is_exhausted_at_the_maximum() {
        assert_eq!(collect_catalans(2, 2), vec![vec![1, 2, 2], vec![2, 2, 2]]);
    }

    #[test]
    fn catalan_three_states() {
        let tabs = collect_catalans(3, 2);
        // rule: tab[0] >= 1, tab[1] >= max(tab[0], 2), tab[2] >= max(tab[1], 3), tab[3] = 3
        for tab in &tabs {
            assert_eq!(tab.len(), 4);
            assert_eq!(tab[3], 3);
            assert!(tab[0] >= 1);
            assert!(tab[1] >= tab[0].max(2));
            assert!(tab[2] >= tab[1].max(3));
            assert!(tab.iter().all(|&v| v <= 3));
        }
        // tab[2] is forced to 3, tab[1] in {2,3}, tab[0] in 1..=tab[1]
        assert_eq!(tabs.len(), 5);
    }

    #[test]
    fn unary_alphabet_has_a_single_catalan() {
        assert_eq!(collect_catalans(2, 1), vec![vec![2]]);
    }

    #[test]
    fn completion_respects_catalan_bounds() {
        let mut catalan = CatalanSuit::new(2, 2);
        catalan.first();
        let mut completion = CompletionSuit::new(&catalan);
        completion.first();
        let mut count = 1;
        while let Some(tab) = completion.next(&catalan) {
            for (i, &value) in tab.iter().enumerate() {
                assert!(value >= 1 && value <= catalan.bound_at(i));
            }
            count += 1;
        }
        // bounds (1, 2, 2) admit 1 * 2 * 2 completions
        assert_eq!(count, 4);
    }

    #[test]
    fn completion_reports_the_modified_position() {
        let mut catalan = CatalanSuit::new(2, 2);
        catalan.first();
        let mut completion = CompletionSuit::new(&catalan);
        assert_eq!(completion.first(), &[1, 1, 1]);
        assert_eq!(completion.next(&catalan).unwrap(), &[1, 1, 2]);
        assert_eq!(completion.modified_position(), 2);
        assert_eq!(completion.next(&catalan).unwrap(), &[1, 2, 1]);
        assert_eq!(completion.modified_position(), 1);
        assert_eq!(completion.next(&catalan).unwrap(), &[1, 2, 2]);
        assert_eq!(completion.modified_position(), 2);
        assert!(completion.next(&catalan).is_none());
    }
}
