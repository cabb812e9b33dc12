//! Reverse-graph reachability and the structural predicates used as rejection filters by
//! the specialized random generators: strong connectivity, co-accessibility and locality.

use bit_set::BitSet;
use tracing::trace;

use crate::automaton::Automaton;

/// Transition graph of an automaton with every edge reversed, as per-(state, symbol)
/// predecessor lists. Built in one `O(n·k)` pass.
#[derive(Clone, Debug)]
pub struct ReverseGraph {
    /// Predecessor lists indexed by `destination · k + symbol_index`.
    preds: Vec<Vec<usize>>,
    size: usize,
    alphabet_size: usize,
}

impl ReverseGraph {
    /// Builds the reverse graph of the given automaton.
    pub fn of<A: Automaton>(automaton: &A) -> Self {
        let n = automaton.size();
        let k = automaton.alphabet_size();
        let mut preds = vec![Vec::new(); n * k];
        for state in 0..n {
            for symbol_index in 0..k {
                if let Some(arrival) = automaton.arrival_index(state, symbol_index) {
                    preds[arrival * k + symbol_index].push(state);
                }
            }
        }
        Self {
            preds,
            size: n,
            alphabet_size: k,
        }
    }

    /// Number of states of the underlying automaton.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The states with a transition into `state` under the symbol with the given index.
    pub fn predecessors(&self, state: usize, symbol_index: usize) -> &[usize] {
        &self.preds[state * self.alphabet_size + symbol_index]
    }

    /// Marks every state from which some seed is reachable in the underlying automaton,
    /// by a traversal of the reversed edges.
    pub fn reaches(&self, seeds: impl IntoIterator<Item = usize>) -> BitSet {
        let mut marked = BitSet::with_capacity(self.size);
        let mut frontier: Vec<usize> = seeds.into_iter().filter(|&seed| marked.insert(seed)).collect();
        while let Some(state) = frontier.pop() {
            for symbol_index in 0..self.alphabet_size {
                for &pred in self.predecessors(state, symbol_index) {
                    if marked.insert(pred) {
                        frontier.push(pred);
                    }
                }
            }
        }
        marked
    }
}

/// True if every state is reachable from an initial state.
pub fn accessible<A: Automaton>(automaton: &A) -> bool {
    let n = automaton.size();
    let mut marked = BitSet::with_capacity(n);
    let mut frontier: Vec<usize> = (0..n)
        .filter(|&q| automaton.is_initial(q))
        .inspect(|&q| {
            marked.insert(q);
        })
        .collect();
    while let Some(state) = frontier.pop() {
        for symbol_index in 0..automaton.alphabet_size() {
            if let Some(arrival) = automaton.arrival_index(state, symbol_index) {
                if marked.insert(arrival) {
                    frontier.push(arrival);
                }
            }
        }
    }
    marked.len() == n
}

/// True if every state can reach state 0. On accessible automata, which the generators
/// produce by construction, this is exactly strong connectivity.
pub fn strongly_connected<A: Automaton>(automaton: &A) -> bool {
    let verdict = ReverseGraph::of(automaton).reaches([0]).len() == automaton.size();
    trace!(verdict, "strong connectivity tested");
    verdict
}

/// True if every state can reach a final state.
pub fn co_accessible<A: Automaton>(automaton: &A) -> bool {
    co_accessible_states(automaton).len() == automaton.size()
}

/// True if every state of `states` can reach a final state. Useful after trimming, when
/// only part of the automaton is expected to survive.
pub fn co_accessible_within<A: Automaton>(automaton: &A, states: &[usize]) -> bool {
    let marked = co_accessible_states(automaton);
    states.iter().all(|&q| marked.contains(q))
}

fn co_accessible_states<A: Automaton>(automaton: &A) -> BitSet {
    let finals = (0..automaton.size()).filter(|&q| automaton.is_final(q));
    ReverseGraph::of(automaton).reaches(finals)
}

const WHITE: u8 = 0;
const GRAY: u8 = 1;
const BLACK: u8 = 2;

/// True if the automaton is local: no word labels a cycle through two distinct states at
/// once. Tested on the product automaton restricted to unordered pairs of distinct
/// states, where a pair steps to the (sorted) pair of its arrivals and diagonal arrivals
/// close the branch. Locality holds exactly when this pair graph is acyclic, checked by an
/// iterative three-color depth-first search.
pub fn local<A: Automaton>(automaton: &A) -> bool {
    let n = automaton.size();
    let k = automaton.alphabet_size();
    let index = |p: usize, q: usize| p * n + q;
    let mut color = vec![WHITE; n * n];

    for p in 0..n {
        for q in p + 1..n {
            if color[index(p, q)] != WHITE {
                continue;
            }
            color[index(p, q)] = GRAY;
            let mut stack = vec![(p, q, 0usize)];
            while let Some(frame) = stack.last_mut() {
                let (cp, cq, symbol_index) = *frame;
                if symbol_index == k {
                    color[index(cp, cq)] = BLACK;
                    stack.pop();
                    continue;
                }
                frame.2 += 1;
                let (Some(rp), Some(rq)) = (
                    automaton.arrival_index(cp, symbol_index),
                    automaton.arrival_index(cq, symbol_index),
                ) else {
                    continue;
                };
                let (np, nq) = if rp <= rq { (rp, rq) } else { (rq, rp) };
                if np == nq {
                    continue;
                }
                match color[index(np, nq)] {
                    WHITE => {
                        color[index(np, nq)] = GRAY;
                        stack.push((np, nq, 0));
                    }
                    GRAY => {
                        trace!(pair = ?(np, nq), "pair cycle found");
                        return false;
                    }
                    _ => {}
                }
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    fn automaton(
        n: usize,
        k: usize,
        edges: &[(usize, char, usize)],
        finals: &[usize],
    ) -> DenseAutomaton<usize, char> {
        let mut a = DenseAutomaton::with_states(n, Alphabet::of_size(k));
        a.set_initial_index(0, true);
        for &(from, symbol, to) in edges {
            a.connect(from, to, symbol);
        }
        for &q in finals {
            a.set_final_index(q, true);
        }
        a
    }

    #[test]
    fn reverse_graph_lists_predecessors() {
        let a = automaton(3, 2, &[(0, 'a', 1), (2, 'a', 1), (1, 'b', 0)], &[]);
        let rev = ReverseGraph::of(&a);
        assert_eq!(rev.predecessors(1, 0), &[0, 2]);
        assert_eq!(rev.predecessors(0, 1), &[1]);
        assert!(rev.predecessors(2, 0).is_empty());
    }

    #[test]
    fn accessibility_spots_unreachable_states() {
        let reachable = automaton(2, 1, &[(0, 'a', 1), (1, 'a', 1)], &[]);
        assert!(accessible(&reachable));
        let stranded = automaton(2, 1, &[(0, 'a', 0), (1, 'a', 0)], &[]);
        assert!(!accessible(&stranded));
    }

    #[test]
    fn cycles_are_strongly_connected_and_sinks_are_not() {
        let cycle = automaton(3, 1, &[(0, 'a', 1), (1, 'a', 2), (2, 'a', 0)], &[]);
        assert!(strongly_connected(&cycle));
        let sink = automaton(2, 1, &[(0, 'a', 1), (1, 'a', 1)], &[]);
        assert!(!strongly_connected(&sink));
    }

    #[test]
    fn co_accessibility_needs_a_path_to_a_final_state() {
        let trap = automaton(3, 2, &[(0, 'a', 1), (0, 'b', 2), (1, 'a', 1), (2, 'a', 2)], &[1]);
        assert!(!co_accessible(&trap));
        assert!(co_accessible_within(&trap, &[0, 1]));
        let good = automaton(2, 1, &[(0, 'a', 1), (1, 'a', 1)], &[1]);
        assert!(co_accessible(&good));
    }

    #[test]
    fn pair_cycles_defeat_locality() {
        // the a-cycle maps the pair {0, 1} to itself
        let swap = automaton(2, 1, &[(0, 'a', 1), (1, 'a', 0)], &[]);
        assert!(!local(&swap));
        // all pairs collapse onto the diagonal in one step
        let definite = automaton(2, 2, &[(0, 'a', 0), (0, 'b', 1), (1, 'a', 0), (1, 'b', 1)], &[]);
        assert!(local(&definite));
    }

    #[test]
    fn single_state_automata_are_local() {
        let loop_a = automaton(1, 2, &[(0, 'a', 0), (0, 'b', 0)], &[]);
        assert!(local(&loop_a));
    }
}
