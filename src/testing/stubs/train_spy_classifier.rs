use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::classifier::Classifier;

/// Shared counter handed out alongside a [`TrainSpyClassifier`] so tests can
/// observe how many times it was trained without holding onto the learner.
#[derive(Clone, Default)]
pub struct TrainSpyHandle(Arc<AtomicUsize>);

impl TrainSpyHandle {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// A classifier that records nothing but how many times it was trained.
pub struct TrainSpyClassifier {
    calls: Arc<AtomicUsize>,
}

impl TrainSpyClassifier {
    pub fn new() -> (Self, TrainSpyHandle) {
        let calls = Arc::new(AtomicUsize::new(0));
        let handle = TrainSpyHandle(Arc::clone(&calls));
        (Self { calls }, handle)
    }
}

impl Classifier for TrainSpyClassifier {
    fn learn_one(&mut self, _x: &[f64], _y: usize, _w: f64) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn predict_proba_one(&self, _x: &[f64]) -> Vec<f64> {
        vec![1.0, 0.0]
    }
}
