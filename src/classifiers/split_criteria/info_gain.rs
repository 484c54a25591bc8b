/// Information-gain split criterion over weighted class distributions.
///
/// Distribution slots may carry the sentinel `-1.0` meaning "unobserved";
/// such slots are excluded from every sum, matching the attribute
/// observer's post-split distribution convention.
pub struct InfoGainSplitCriterion;

fn branch_weight(d: &[f64]) -> f64 {
    d.iter().filter(|&&v| v > 0.0).sum()
}

fn entropy(d: &[f64]) -> f64 {
    let mut total = 0.0;
    let mut acc = 0.0;
    for &v in d {
        if v > 0.0 {
            acc -= v * v.log2();
            total += v;
        }
    }
    if total > 0.0 {
        (acc + total * total.log2()) / total
    } else {
        0.0
    }
}

impl InfoGainSplitCriterion {
    /// Fraction of the two post-split branches that clear `min_branch_fraction`.
    pub fn num_subsets_greater_than_frac(post_split_dists: &[Vec<f64>], min_branch_fraction: f64) -> usize {
        let weights: Vec<f64> = post_split_dists.iter().map(|d| branch_weight(d)).collect();
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return 0;
        }
        weights
            .iter()
            .filter(|&&w| w / total > min_branch_fraction)
            .count()
    }

    pub fn get_merit_of_split(
        pre_split_dist: &[f64],
        post_split_dists: &[Vec<f64>],
        min_branch_fraction: f64,
    ) -> f64 {
        if Self::num_subsets_greater_than_frac(post_split_dists, min_branch_fraction) < 2 {
            return f64::NEG_INFINITY;
        }
        let pre_entropy = entropy(pre_split_dist);
        let t0 = branch_weight(&post_split_dists[0]);
        let t1 = branch_weight(&post_split_dists[1]);
        let total = t0 + t1;
        let post_entropy = if total > 0.0 {
            (t0 * entropy(&post_split_dists[0]) + t1 * entropy(&post_split_dists[1])) / total
        } else {
            0.0
        };
        pre_entropy - post_entropy
    }

    /// `num_observed_classes` is the count of classes with nonzero weight at
    /// the leaf, not the tree's total label count.
    pub fn get_range_of_merit(num_observed_classes: usize) -> f64 {
        (num_observed_classes.max(2) as f64).log2()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn entropy_of_pure_distribution_is_zero() {
        assert_eq!(entropy(&[10.0, 0.0]), 0.0);
    }

    #[test]
    fn entropy_of_uniform_binary_is_one_bit() {
        assert!(approx_eq(entropy(&[5.0, 5.0]), 1.0));
    }

    #[test]
    fn merit_rejects_split_that_starves_a_branch() {
        let pre = vec![5.0, 5.0];
        let post = vec![vec![9.9, 0.0], vec![0.1, 10.0]];
        let merit = InfoGainSplitCriterion::get_merit_of_split(&pre, &post, 0.1);
        assert_eq!(merit, f64::NEG_INFINITY);
    }

    #[test]
    fn merit_is_positive_for_a_clean_split() {
        let pre = vec![10.0, 10.0];
        let post = vec![vec![10.0, 0.0], vec![0.0, 10.0]];
        let merit = InfoGainSplitCriterion::get_merit_of_split(&pre, &post, 0.01);
        assert!(merit > 0.9);
    }

    #[test]
    fn range_of_merit_is_log2_of_observed_class_count() {
        assert!(approx_eq(InfoGainSplitCriterion::get_range_of_merit(1), 1.0));
        assert!(approx_eq(InfoGainSplitCriterion::get_range_of_merit(4), 2.0));
    }

    #[test]
    fn sentinel_unobserved_slots_are_ignored() {
        let d = [-1.0, 5.0, -1.0];
        assert_eq!(entropy(&d), 0.0);
    }
}
