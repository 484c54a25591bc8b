use crate::evaluation::Measurement;

/// Online evaluator of predictive performance.
///
/// A `PerformanceEvaluator` consumes ground-truth labels and their
/// associated prediction scores (class votes) and exposes aggregated
/// metrics via [`performance`].
pub trait PerformanceEvaluator {
    /// Clears internal state/metrics (schema does not change).
    fn reset(&mut self);

    /// Feeds one labeled example's true class, weight, and class votes (one
    /// score per class). A non-positive weight is ignored.
    fn add_result(&mut self, y: usize, w: f64, class_votes: Vec<f64>);

    /// Returns a snapshot of current metrics.
    fn performance(&self) -> Vec<Measurement>;
}

/// Convenience extension used by the prequential driver to fetch a handful
/// of named metrics without scanning the full [`Measurement`] vector itself.
pub trait PerformanceEvaluatorExt: PerformanceEvaluator {
    fn metric(&self, name: &str) -> f64 {
        self.performance()
            .into_iter()
            .find(|m| m.name == name)
            .map(|m| m.value)
            .unwrap_or(f64::NAN)
    }

    fn metrics(&self, names: &[&str]) -> Vec<f64> {
        names.iter().map(|&n| self.metric(n)).collect()
    }
}

impl<T: PerformanceEvaluator + ?Sized> PerformanceEvaluatorExt for T {}
