/// Errors reported by operations on an automaton instance. A failed mutation leaves the
/// automaton in its previous valid state, there are no partial writes across the state or
/// transition tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AutomatonError {
    /// An operation referenced a state label unknown to the automaton instance.
    #[error("operation referenced a state unknown to this automaton")]
    InvalidState,
    /// State creation was attempted beyond the preallocated capacity.
    #[error("state creation would exceed the preallocated capacity")]
    CapacityExceeded,
    /// An alphabet lookup was made for a symbol that was never registered.
    #[error("symbol is not part of this automaton's alphabet")]
    UnknownSymbol,
}

/// Errors reported by the rejection-sampling machinery. Exhaustion of suits and exhaustive
/// generators is not an error and is signalled through `Option::None` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// A rejection loop exceeded its configured attempt ceiling. The original algorithms
    /// retry forever; the ceiling turns pathological parameter choices into a reported
    /// error instead of a hang.
    #[error("rejection sampling exceeded {attempts} attempts without acceptance")]
    NonTermination {
        /// Number of attempts performed before giving up.
        attempts: usize,
    },
}
