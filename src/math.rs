/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// Represents a bijective mapping between `L` and `R`, that is a mapping which associates
/// each `L` with precisely one `R` and vice versa.
pub type Bijection<L, R> = bimap::BiHashMap<L, R>;

/// Compares two floating point numbers for equality within a certain delta.
/// # Example
/// ```
/// use icdfa::prelude::*;
/// assert!(math::almost_equal(0.7, 0.71, 0.1));
/// assert!(!math::almost_equal(0.7, 0.91, 0.1));
/// ```
pub fn almost_equal(l: f64, r: f64, delta: f64) -> bool {
    l == r || ((l - r).abs() / (l.abs() + r.abs())) < delta
}
