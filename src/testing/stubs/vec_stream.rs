use crate::streams::Stream;
use std::io::Error;

/// Deterministic finite stream replaying precomputed labels; each emitted
/// feature vector is simply `[label as f64]`.
pub struct VecStream {
    labels: Vec<usize>,
    idx: usize,
}

impl VecStream {
    pub fn new(labels: Vec<usize>) -> Self {
        Self { labels, idx: 0 }
    }
}

impl Stream for VecStream {
    fn has_more_instances(&self) -> bool {
        self.idx < self.labels.len()
    }

    fn next_instance(&mut self) -> Option<(Vec<f64>, usize)> {
        if !self.has_more_instances() {
            return None;
        }
        let y = self.labels[self.idx];
        self.idx += 1;
        Some((vec![y as f64], y))
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.idx = 0;
        Ok(())
    }
}
