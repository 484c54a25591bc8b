use crate::preprocessing::Transformer;

/// Running per-feature z-score scaler.
///
/// Always operates "with std": a feature whose variance is still `0.0`
/// (fewer than two distinct observations) passes through as `0.0` rather
/// than dividing by zero.
#[derive(Debug, Clone, Default)]
pub struct StandardScaler {
    counts: Vec<f64>,
    means: Vec<f64>,
    vars: Vec<f64>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_size(&mut self, n: usize) {
        if self.counts.len() < n {
            self.counts.resize(n, 0.0);
            self.means.resize(n, 0.0);
            self.vars.resize(n, 0.0);
        }
    }
}

impl Transformer for StandardScaler {
    fn learn_one(&mut self, x: &[f64], _y: usize) {
        self.ensure_size(x.len());
        for i in 0..x.len() {
            self.counts[i] += 1.0;
            let old_mean = self.means[i];
            self.means[i] += (x[i] - old_mean) / self.counts[i];
            self.vars[i] += ((x[i] - old_mean) * (x[i] - self.means[i]) - self.vars[i]) / self.counts[i];
        }
    }

    fn transform_one(&self, x: &[f64]) -> Vec<f64> {
        let mut res = vec![0.0; x.len()];
        for i in 0..x.len() {
            let var = self.vars.get(i).copied().unwrap_or(0.0);
            if var > 0.0 {
                res[i] = (x[i] - self.means[i]) / var.sqrt();
            }
        }
        res
    }
}
