use super::Detector;
use crate::stats::EwMean;

/// A single exponentially-weighted sample together with its McDiarmid
/// increment-variance bound recurrence (`ibc`).
#[derive(Debug, Clone, Copy)]
struct SampleInfo {
    lambda: f64,
    mean: EwMean,
    ibc: f64,
    is_init: bool,
}

impl SampleInfo {
    fn new(lambda: f64) -> Self {
        Self {
            lambda,
            mean: EwMean::new(lambda),
            ibc: 1.0,
            is_init: false,
        }
    }

    fn update(&mut self, x: f64) {
        self.mean.update(x);
        let c = 1.0 - self.lambda;
        self.ibc = self.lambda * self.lambda + c * c * self.ibc;
        self.is_init = true;
    }

    fn ewma(&self) -> f64 {
        self.mean.get()
    }
}

fn mcdiarmid_bound(ibc: f64, confidence: f64) -> f64 {
    (ibc * (1.0 / confidence).ln() / 2.0).sqrt()
}

/// HDDM-W: Hoeffding's bound Drift Detection Method with the McDiarmid
/// variant, using exponentially weighted moving averages instead of plain
/// running means.
#[derive(Debug, Clone)]
pub struct HddmW {
    lambda: f64,
    drift_confidence: f64,
    total: SampleInfo,
    s1_incr: SampleInfo,
    s2_incr: SampleInfo,
    incr_cutpoint: f64,
    drift_detected: bool,
}

impl HddmW {
    pub fn new(lambda: f64, drift_confidence: f64) -> Self {
        Self {
            lambda,
            drift_confidence,
            total: SampleInfo::new(lambda),
            s1_incr: SampleInfo::new(lambda),
            s2_incr: SampleInfo::new(lambda),
            incr_cutpoint: f64::MAX,
            drift_detected: false,
        }
    }

    fn reset(&mut self) {
        self.total = SampleInfo::new(self.lambda);
        self.s1_incr = SampleInfo::new(self.lambda);
        self.s2_incr = SampleInfo::new(self.lambda);
        self.incr_cutpoint = f64::MAX;
        self.drift_detected = false;
    }

    fn has_mean_changed(&self) -> bool {
        if !(self.s1_incr.is_init && self.s2_incr.is_init) {
            return false;
        }
        let bound = mcdiarmid_bound(self.s1_incr.ibc + self.s2_incr.ibc, self.drift_confidence);
        self.s2_incr.ewma() - self.s1_incr.ewma() > bound
    }

    fn update_incr_stats(&mut self, x: f64) {
        let eps = mcdiarmid_bound(self.total.ibc, self.drift_confidence);
        if self.total.ewma() + eps < self.incr_cutpoint {
            self.incr_cutpoint = self.total.ewma() + eps;
            self.s1_incr = self.total;
            self.s2_incr = SampleInfo::new(self.lambda);
        } else {
            self.s2_incr.update(x);
        }
    }
}

impl Default for HddmW {
    fn default() -> Self {
        Self::new(0.05, 0.001)
    }
}

impl Detector for HddmW {
    fn update(&mut self, x: f64) {
        if self.drift_detected {
            self.reset();
        }

        self.total.update(x);
        self.update_incr_stats(x);
        self.drift_detected = self.has_mean_changed();
    }

    fn drift_detected(&self) -> bool {
        self.drift_detected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_quiet_on_stationary_stream() {
        let mut d = HddmW::new(0.05, 0.001);
        for i in 0..500 {
            d.update(if i % 10 == 0 { 1.0 } else { 0.0 });
        }
        assert!(!d.drift_detected());
    }

    #[test]
    fn trips_after_sustained_error_increase() {
        let mut d = HddmW::new(0.05, 0.001);
        for _ in 0..200 {
            d.update(0.0);
        }
        let mut tripped = false;
        for _ in 0..400 {
            d.update(1.0);
            if d.drift_detected() {
                tripped = true;
                break;
            }
        }
        assert!(tripped);
    }
}
