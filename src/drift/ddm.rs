use super::Detector;
use crate::stats::Mean;

/// Drift Detection Method (Gama et al.).
///
/// Tracks the running error-rate mean `p` and its standard error `s`, and
/// remembers the smallest `p + s` seen after a warm-up period. Drift fires
/// once `p + s` exceeds that minimum by `drift_threshold` standard errors.
#[derive(Debug, Clone)]
pub struct Ddm {
    warm_start: f64,
    drift_threshold: f64,
    p: Mean,
    ps_min: f64,
    p_min: f64,
    s_min: f64,
    drift_detected: bool,
}

impl Ddm {
    pub fn new(warm_start: f64, drift_threshold: f64) -> Self {
        Self {
            warm_start,
            drift_threshold,
            p: Mean::new(),
            ps_min: f64::MAX,
            p_min: f64::MAX,
            s_min: f64::MAX,
            drift_detected: false,
        }
    }

    fn reset(&mut self) {
        self.p = Mean::new();
        self.ps_min = f64::MAX;
        self.p_min = f64::MAX;
        self.s_min = f64::MAX;
        self.drift_detected = false;
    }
}

impl Default for Ddm {
    fn default() -> Self {
        Self::new(30.0, 3.0)
    }
}

impl Detector for Ddm {
    fn update(&mut self, x: f64) {
        if self.drift_detected {
            self.reset();
        }

        self.p.update(x);
        let n = self.p.n();
        let p_i = self.p.get();
        let s_i = (p_i * (1.0 - p_i) / n).sqrt();

        if n > self.warm_start {
            if p_i + s_i < self.ps_min {
                self.ps_min = p_i + s_i;
                self.p_min = p_i;
                self.s_min = s_i;
            }
            self.drift_detected = p_i + s_i > self.p_min + self.drift_threshold * self.s_min;
        }
    }

    fn drift_detected(&self) -> bool {
        self.drift_detected
    }
}
