use std::io::Error;

/// Pull-based interface for numeric data streams.
///
/// Implementations may represent finite datasets or unbounded generators.
/// Every yielded pair carries a feature vector of constant length and a
/// class label.
pub trait Stream {
    /// Indicates whether the stream *may* produce more instances.
    ///
    /// Finite streams should return `false` once exhausted. Unbounded
    /// streams (e.g., generators) typically return `true` always.
    fn has_more_instances(&self) -> bool;

    /// Produces the next `(features, label)` pair, or `None` if exhausted.
    fn next_instance(&mut self) -> Option<(Vec<f64>, usize)>;

    /// Resets the stream to its initial state (for a generator: re-seeds
    /// the RNG and clears internal counters).
    fn restart(&mut self) -> Result<(), Error>;
}
