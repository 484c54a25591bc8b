//! Prequential evaluation metrics.

/// Running confusion matrix over `num_labels` classes, growable so the
/// evaluator doesn't need to know the label count up front.
#[derive(Debug, Clone, Default)]
pub struct ConfusionMatrix {
    data: Vec<Vec<f64>>,
    total_weight: f64,
}

impl ConfusionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_size(&mut self, n: usize) {
        if self.data.len() < n {
            self.data.resize(n, Vec::new());
        }
        for row in &mut self.data {
            if row.len() < n {
                row.resize(n, 0.0);
            }
        }
    }

    pub fn update(&mut self, y_true: usize, y_pred: usize, w: f64) {
        let n = y_true.max(y_pred) + 1;
        self.ensure_size(n);
        self.data[y_true][y_pred] += w;
        self.total_weight += w;
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn total_true_positives(&self) -> f64 {
        self.data.iter().enumerate().map(|(i, row)| row.get(i).copied().unwrap_or(0.0)).sum()
    }
}

/// Prequential (test-then-train) accuracy, updated one prediction at a time.
#[derive(Debug, Clone, Default)]
pub struct Accuracy {
    cm: ConfusionMatrix,
}

impl Accuracy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, y_true: usize, y_pred: usize, w: f64) {
        self.cm.update(y_true, y_pred, w);
    }

    pub fn get(&self) -> f64 {
        if self.cm.total_weight() > 0.0 {
            self.cm.total_true_positives() / self.cm.total_weight()
        } else {
            0.0
        }
    }
}
