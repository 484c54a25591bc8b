use crate::classifiers::attribute_observers::AttributeSplitSuggestion;
use crate::classifiers::split_criteria::InfoGainSplitCriterion;
use crate::stats::GaussianEstimator;

/// Per-(feature, class) Gaussian observer used to suggest and score
/// candidate split thresholds at a leaf.
#[derive(Debug, Clone)]
pub struct GaussianAttributeObserver {
    per_class: Vec<GaussianEstimator>,
    min_per_class: Vec<f64>,
    max_per_class: Vec<f64>,
    n_split: usize,
}

impl GaussianAttributeObserver {
    pub fn new(num_labels: usize) -> Self {
        Self::with_n_split(num_labels, 10)
    }

    pub fn with_n_split(num_labels: usize, n_split: usize) -> Self {
        Self {
            per_class: (0..num_labels).map(|_| GaussianEstimator::new()).collect(),
            min_per_class: vec![f64::MAX; num_labels],
            max_per_class: vec![f64::MIN; num_labels],
            n_split,
        }
    }

    pub fn update(&mut self, att_val: f64, class: usize, w: f64) {
        if class >= self.per_class.len() {
            return;
        }
        self.min_per_class[class] = self.min_per_class[class].min(att_val);
        self.max_per_class[class] = self.max_per_class[class].max(att_val);
        self.per_class[class].update(att_val, w);
    }

    /// Class-conditional likelihood `p(att_val | class)`, used by Naive
    /// Bayes prediction. `0.0` for an unobserved class.
    pub fn cond_proba(&self, att_val: f64, class: usize) -> f64 {
        self.per_class
            .get(class)
            .map(|g| g.pdf(att_val))
            .unwrap_or(0.0)
    }

    fn global_range(&self) -> Option<(f64, f64)> {
        let min = self
            .min_per_class
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(f64::MAX, f64::min);
        let max = self
            .max_per_class
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(f64::MIN, f64::max);
        if min > max || min == f64::MAX || max == f64::MIN {
            None
        } else {
            Some((min, max))
        }
    }

    fn split_point_suggestions(&self) -> Vec<f64> {
        let Some((min, max)) = self.global_range() else {
            return Vec::new();
        };
        let bin = (max - min) / (self.n_split as f64 + 1.0);
        if bin <= 0.0 {
            return Vec::new();
        }
        (0..self.n_split)
            .map(|i| min + bin * (i as f64 + 1.0))
            .filter(|&t| t > min && t < max)
            .collect()
    }

    fn class_dists_from_binary_split(&self, threshold: f64) -> Vec<Vec<f64>> {
        let num_labels = self.per_class.len();
        let mut lhs = vec![-1.0; num_labels];
        let mut rhs = vec![-1.0; num_labels];
        for c in 0..num_labels {
            let n = self.per_class[c].n();
            if threshold < self.min_per_class[c] {
                rhs[c] = n;
            } else if threshold >= self.max_per_class[c] {
                lhs[c] = n;
            } else {
                let l = self.per_class[c].cdf(threshold) * n;
                lhs[c] = l;
                rhs[c] = n - l;
            }
        }
        vec![lhs, rhs]
    }

    pub fn best_evaluated_split_suggestion(
        &self,
        pre_split_dist: &[f64],
        feature_idx: usize,
        min_branch_fraction: f64,
    ) -> AttributeSplitSuggestion {
        let mut best = AttributeSplitSuggestion {
            feature: feature_idx as i64,
            threshold: -1.0,
            merit: f64::NEG_INFINITY,
            post_split_dists: Vec::new(),
        };
        for t in self.split_point_suggestions() {
            let post = self.class_dists_from_binary_split(t);
            let merit = InfoGainSplitCriterion::get_merit_of_split(pre_split_dist, &post, min_branch_fraction);
            if merit > best.merit {
                best = AttributeSplitSuggestion {
                    feature: feature_idx as i64,
                    threshold: t,
                    merit,
                    post_split_dists: post,
                };
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_observations_yields_negative_infinite_merit() {
        let obs = GaussianAttributeObserver::new(2);
        let pre = vec![0.0, 0.0];
        let suggestion = obs.best_evaluated_split_suggestion(&pre, 0, 0.01);
        assert_eq!(suggestion.merit, f64::NEG_INFINITY);
    }

    #[test]
    fn separable_classes_find_a_threshold_between_them() {
        let mut obs = GaussianAttributeObserver::new(2);
        for _ in 0..30 {
            obs.update(0.0, 0, 1.0);
            obs.update(10.0, 1, 1.0);
        }
        let pre = vec![30.0, 30.0];
        let suggestion = obs.best_evaluated_split_suggestion(&pre, 0, 0.01);
        assert!(suggestion.merit.is_finite());
        assert!(suggestion.threshold > 0.0 && suggestion.threshold < 10.0);
    }

    #[test]
    fn cond_proba_is_zero_for_unobserved_class() {
        let mut obs = GaussianAttributeObserver::new(2);
        obs.update(5.0, 0, 1.0);
        assert_eq!(obs.cond_proba(5.0, 1), 0.0);
    }
}
