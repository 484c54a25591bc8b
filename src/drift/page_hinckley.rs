use super::Detector;
use crate::stats::Mean;

/// Page-Hinckley test for detecting sustained increases in a stream's mean.
#[derive(Debug, Clone)]
pub struct PageHinckley {
    threshold: f64,
    delta: f64,
    alpha: f64,
    min_instances: f64,
    x_mean: Mean,
    sum_increase: f64,
    min_increase: f64,
    drift_detected: bool,
}

impl PageHinckley {
    pub fn new(threshold: f64, delta: f64, alpha: f64, min_instances: f64) -> Self {
        Self {
            threshold,
            delta,
            alpha,
            min_instances,
            x_mean: Mean::new(),
            sum_increase: 0.0,
            min_increase: f64::MAX,
            drift_detected: false,
        }
    }

    fn reset(&mut self) {
        self.x_mean = Mean::new();
        self.sum_increase = 0.0;
        self.min_increase = f64::MAX;
        self.drift_detected = false;
    }
}

impl Default for PageHinckley {
    fn default() -> Self {
        Self::new(50.0, 0.005, 0.9999, 30.0)
    }
}

impl Detector for PageHinckley {
    fn update(&mut self, x: f64) {
        if self.drift_detected {
            self.reset();
        }

        self.x_mean.update(x);
        let dev = x - self.x_mean.get();
        self.sum_increase = self.alpha * self.sum_increase + dev - self.delta;
        self.min_increase = self.min_increase.min(self.sum_increase);

        if self.x_mean.n() >= self.min_instances {
            let test_increase = self.sum_increase - self.min_increase;
            self.drift_detected = test_increase > self.threshold;
        }
    }

    fn drift_detected(&self) -> bool {
        self.drift_detected
    }
}
