use super::Detector;
use std::collections::VecDeque;

/// A single bucket: `total` is the sum of the values it summarizes, and
/// `variance` is the sum of squared deviations *within* the bucket (zero for
/// a freshly inserted singleton).
#[derive(Debug, Clone, Copy)]
struct Bucket {
    total: f64,
    variance: f64,
}

/// ADWIN: an adaptive sliding window backed by a row of exponentially larger
/// buckets (row `r` holds buckets of `2^r` raw samples each). Rows compress
/// by folding their two oldest buckets into one bucket of the next row up,
/// bounding memory to `O(max_buckets * log(width))`.
#[derive(Debug, Clone)]
pub struct Adwin {
    delta: f64,
    max_buckets: usize,
    min_window_length: f64,
    grace_period: f64,
    clock: u64,

    /// `rows[r]` holds buckets of size `2^r`, oldest at the front.
    rows: Vec<VecDeque<Bucket>>,
    total: f64,
    variance: f64,
    width: f64,
    tick: u64,
    drift_detected: bool,
}

impl Adwin {
    pub fn new(delta: f64) -> Self {
        Self::with_params(delta, 5, 5.0, 10.0, 32)
    }

    pub fn with_params(
        delta: f64,
        max_buckets: usize,
        min_window_length: f64,
        grace_period: f64,
        clock: u64,
    ) -> Self {
        Self {
            delta,
            max_buckets,
            min_window_length,
            grace_period,
            clock,
            rows: Vec::new(),
            total: 0.0,
            variance: 0.0,
            width: 0.0,
            tick: 0,
            drift_detected: false,
        }
    }

    fn reset(&mut self) {
        self.rows.clear();
        self.total = 0.0;
        self.variance = 0.0;
        self.width = 0.0;
        self.tick = 0;
        self.drift_detected = false;
    }

    fn bucket_size(row: usize) -> f64 {
        (1u64 << row) as f64
    }

    fn insert_element(&mut self, value: f64) {
        if self.width > 0.0 {
            let delta_term = value - self.total / self.width;
            self.variance += self.width * delta_term * delta_term / (self.width + 1.0);
        }
        self.total += value;
        self.width += 1.0;

        if self.rows.is_empty() {
            self.rows.push(VecDeque::new());
        }
        self.rows[0].push_back(Bucket {
            total: value,
            variance: 0.0,
        });
        self.compress_buckets();
    }

    fn compress_buckets(&mut self) {
        let mut r = 0;
        while r < self.rows.len() && self.rows[r].len() >= self.max_buckets + 1 {
            let b0 = self.rows[r].pop_front().unwrap();
            let b1 = self.rows[r].pop_front().unwrap();
            let n = Self::bucket_size(r);
            let mu0 = b0.total / n;
            let mu1 = b1.total / n;
            let merged = Bucket {
                total: b0.total + b1.total,
                variance: b0.variance + b1.variance + n * n * (mu0 - mu1).powi(2) / (2.0 * n),
            };
            if r + 1 == self.rows.len() {
                self.rows.push(VecDeque::new());
            }
            self.rows[r + 1].push_back(merged);
            r += 1;
        }
    }

    /// Removes the globally oldest bucket (the front of the highest
    /// nonempty row), shrinking the window.
    fn delete_oldest(&mut self) {
        let Some(row) = self.rows.iter().rposition(|r| !r.is_empty()) else {
            return;
        };
        let bucket = self.rows[row].pop_front().unwrap();
        let n_b = Self::bucket_size(row);
        let mu_b = bucket.total / n_b;

        let n_total = self.width;
        let n_r = n_total - n_b;
        if n_r > 0.0 {
            let mu_total = self.total / n_total;
            let mu_r = (self.total - bucket.total) / n_r;
            self.variance = (self.variance - bucket.variance
                - n_r * (mu_r - mu_total).powi(2)
                - n_b * (mu_b - mu_total).powi(2))
            .max(0.0);
        } else {
            self.variance = 0.0;
        }
        self.total -= bucket.total;
        self.width -= n_b;

        while self.rows.last().is_some_and(|r| r.is_empty()) {
            self.rows.pop();
        }
    }

    fn evaluate_cut(&self, n0: f64, n1: f64, delta_mean: f64) -> bool {
        let delta_prime = (2.0 * self.width.ln() / self.delta).ln();
        let m_inv = 1.0 / (n0 - self.min_window_length + 1.0)
            + 1.0 / (n1 - self.min_window_length + 1.0);
        let epsilon = (2.0 * m_inv * (self.variance / self.width) * delta_prime).sqrt()
            + (2.0 / 3.0) * delta_prime * m_inv;
        delta_mean.abs() > epsilon
    }

    fn detect_change(&mut self) -> bool {
        if self.width <= self.grace_period {
            return false;
        }

        let mut any_shrink = false;
        loop {
            let mut n0 = 0.0;
            let mut u0 = 0.0;
            let mut cut_found = false;

            'scan: for row in (0..self.rows.len()).rev() {
                let len = self.rows[row].len();
                for idx in 0..len {
                    let bucket = self.rows[row][idx];
                    let n = Self::bucket_size(row);
                    n0 += n;
                    u0 += bucket.total;
                    let n1 = self.width - n0;
                    if n1 <= 0.0 {
                        break 'scan;
                    }
                    if n0 < self.min_window_length || n1 < self.min_window_length {
                        continue;
                    }
                    let u1 = self.total - u0;
                    let mu0 = u0 / n0;
                    let mu1 = u1 / n1;
                    if self.evaluate_cut(n0, n1, mu0 - mu1) {
                        cut_found = true;
                        break 'scan;
                    }
                }
            }

            if cut_found {
                self.delete_oldest();
                any_shrink = true;
            } else {
                break;
            }
        }
        any_shrink
    }
}

impl Default for Adwin {
    fn default() -> Self {
        Self::new(0.002)
    }
}

impl Detector for Adwin {
    fn update(&mut self, value: f64) {
        if self.drift_detected {
            self.reset();
        }

        self.insert_element(value);

        self.tick += 1;
        if self.tick % self.clock == 0 {
            self.drift_detected = self.detect_change();
        }
    }

    fn drift_detected(&self) -> bool {
        self.drift_detected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::Rng;

    #[test]
    fn no_detections_on_constant_stream() {
        let mut a = Adwin::new(0.002);
        for _ in 0..2000 {
            a.update(0.0);
        }
        assert!(!a.drift_detected());
    }

    #[test]
    fn bounded_false_positive_rate_on_stationary_bernoulli() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut a = Adwin::new(0.002);
        let mut detections = 0;
        for _ in 0..10_000 {
            let x = if rng.random_bool(0.3) { 1.0 } else { 0.0 };
            a.update(x);
            if a.drift_detected() {
                detections += 1;
            }
        }
        assert!(detections <= 5, "detections={detections}");
    }

    #[test]
    fn detects_a_clear_mean_shift() {
        let mut a = Adwin::new(0.01);
        for _ in 0..300 {
            a.update(0.0);
        }
        let mut tripped = false;
        for _ in 0..300 {
            a.update(1.0);
            if a.drift_detected() {
                tripped = true;
                break;
            }
        }
        assert!(tripped);
    }
}
