//! Online running statistics shared by drift detectors and attribute observers.

use crate::utils::math::normal_probability;

/// Plain running mean, Welford-style, unweighted increments of weight 1.
///
/// Used by the drift detectors (DDM, Page-Hinckley), which observe a scalar
/// loss indicator per sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mean {
    mean: f64,
    n: f64,
}

impl Mean {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn update(&mut self, x: f64) {
        self.update_weighted(x, 1.0);
    }

    #[inline]
    pub fn update_weighted(&mut self, x: f64, w: f64) {
        self.n += w;
        self.mean += (w / self.n) * (x - self.mean);
    }

    #[inline]
    pub fn get(&self) -> f64 {
        self.mean
    }

    #[inline]
    pub fn n(&self) -> f64 {
        self.n
    }
}

/// Exponentially weighted mean used by HDDM-W.
///
/// Edge case preserved from the source: the pre-initialized state
/// `mean == 0.0` is treated as "no sample seen yet", so the very first
/// observation always replaces `mean` outright rather than blending into it,
/// even if that first observation happens to be `0.0`.
#[derive(Debug, Clone, Copy)]
pub struct EwMean {
    fading_factor: f64,
    mean: f64,
}

impl EwMean {
    pub fn new(fading_factor: f64) -> Self {
        Self {
            fading_factor,
            mean: 0.0,
        }
    }

    #[inline]
    pub fn update(&mut self, x: f64) {
        if self.mean == 0.0 {
            self.mean = x;
        } else {
            self.mean = self.fading_factor * x + (1.0 - self.fading_factor) * self.mean;
        }
    }

    #[inline]
    pub fn get(&self) -> f64 {
        self.mean
    }
}

/// Welford moment tracker with configurable degrees-of-freedom correction.
///
/// Backs the per-(feature, class) Gaussian used by the attribute observer.
#[derive(Debug, Clone, Copy)]
pub struct GaussianEstimator {
    mean: f64,
    s: f64,
    n: f64,
    ddof: f64,
}

impl GaussianEstimator {
    pub fn new() -> Self {
        Self {
            mean: 0.0,
            s: 0.0,
            n: 0.0,
            ddof: 1.0,
        }
    }

    #[inline]
    pub fn update(&mut self, x: f64, w: f64) {
        let mean_old = self.mean;
        self.n += w;
        self.mean += (w / self.n) * (x - mean_old);
        self.s += w * (x - mean_old) * (x - self.mean);
    }

    #[inline]
    pub fn n(&self) -> f64 {
        self.n
    }

    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    #[inline]
    pub fn variance(&self) -> f64 {
        if self.n > self.ddof {
            self.s / (self.n - self.ddof)
        } else {
            0.0
        }
    }

    /// Cumulative distribution function at `x`.
    #[inline]
    pub fn cdf(&self, x: f64) -> f64 {
        let var = self.variance();
        if var == 0.0 {
            0.0
        } else {
            normal_probability((x - self.mean) / var.sqrt())
        }
    }

    /// Probability density function at `x`.
    #[inline]
    pub fn pdf(&self, x: f64) -> f64 {
        let var = self.variance();
        if var == 0.0 {
            0.0
        } else {
            let diff = x - self.mean;
            (-0.5 * diff * diff / var).exp() / (2.0 * std::f64::consts::PI * var).sqrt()
        }
    }
}

impl Default for GaussianEstimator {
    fn default() -> Self {
        Self::new()
    }
}
