//! Library for the uniform random generation, exhaustive enumeration and minimization of
//! complete accessible deterministic finite automata (DFAs).
//!
//! The combinatorial backbone is the Bassino–Nicaud correspondence: a complete DFA with `n`
//! states over a `k`-symbol alphabet whose states are all reachable from the initial state
//! is coded, up to state renaming, by a pair of integer sequences (a [`suit::CatalanSuit`]
//! in bijection with DFA tries, and a [`suit::CompletionSuit`] describing how the trie's
//! dangling transitions are closed), or equivalently by a single canonical set partition of
//! the `n·k + 1` transition slots. Walking the suits in lexicographic order enumerates the
//! whole family exactly once ([`generate::ExhaustiveDfaGenerator`]); drawing the set
//! partition through a rejection-controlled Boltzmann sampler draws from the family
//! uniformly ([`generate::RandomDfaGenerator`]).
//!
//! On top of the generators, the crate provides Moore partition-refinement minimization
//! ([`minimization::MooreAlgorithm`]) and structural testers (strong connectivity,
//! co-accessibility and locality, see [`structure`]) which double as rejection predicates
//! for the specialized random-generation variants.
//!
//! All algorithms consume automata through the [`automaton::Automaton`] trait; the only
//! concrete implementation is [`automaton::DenseAutomaton`], a preallocated transition
//! matrix. Generators own their result automaton and mutate it in place, handing out a
//! borrow that is valid until the next generation call; callers clone when they need to
//! keep an automaton around.
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use icdfa::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        alphabet::{Alphabet, Symbol},
        automaton::{Automaton, DenseAutomaton, StateLabel},
        boltzmann::BoltzmannSampler,
        draw::{Canvas, DotCanvas},
        error::{AutomatonError, GenerationError},
        generate::{ExhaustiveDfaGenerator, RandomDfaGenerator},
        law::{
            BernoulliLaw, DiscreteLaw, GeometricLaw, LogarithmicLaw, NonZeroPoissonLaw,
            PoissonLaw, UniformLaw,
        },
        math,
        minimization::{FastMoore, MooreAlgorithm},
        stats::{MemorySink, StatSink},
        structure::{accessible, co_accessible, local, strongly_connected, ReverseGraph},
        suit::{CatalanSuit, CompletionSuit, Suit},
    };
}

/// This module contains some definitions of mathematical objects which are used throughout
/// the crate and do not really fit to the top level.
pub mod math;

/// Value-typed errors reported by automata and samplers.
pub mod error;

/// Module that contains definitions for dealing with alphabets.
pub mod alphabet;

/// Defines the automaton capability trait and the dense matrix implementation.
pub mod automaton;

/// Integer sequences in bijection with DFA tries and their completions.
pub mod suit;

/// Discrete probability laws sampled by inverse-CDF search.
pub mod law;

/// Rejection sampler producing uniformly distributed set-partition shapes.
pub mod boltzmann;

/// Exhaustive and random generators for complete accessible DFAs.
pub mod generate;

/// Contains implementations of Moore's partition-refinement minimization.
pub mod minimization;

/// Reverse-graph reachability analysis and structural property testers.
pub mod structure;

/// Narrow drawing-callback seam consumed by external graphical exporters.
pub mod draw;

/// Narrow numeric-sample seam consumed by external statistics writers.
pub mod stats;
