use crate::classifier::Classifier;
use crate::classifiers::attribute_observers::AttributeSplitSuggestion;
use crate::classifiers::hoeffding_tree::node::{BranchNode, LeafNode, Node};
use crate::classifiers::split_criteria::InfoGainSplitCriterion;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Tunables governing growth and memory enforcement. Defaults match a
/// standalone tree; an ensemble member typically shortens `grace_period`
/// and loosens `delta` (see the forest module).
#[derive(Debug, Clone)]
pub struct HoeffdingTreeConfig {
    pub grace_period: u32,
    pub delta: f64,
    pub tau: f64,
    pub max_depth: usize,
    pub max_byte_size: f64,
    pub memory_estimate_period: u64,
    pub max_share_to_split: f64,
    pub min_branch_fraction: f64,
    pub max_features: Option<usize>,
    /// Unused hook kept for parity with the source's configuration surface.
    pub merit_preprune: bool,
}

impl Default for HoeffdingTreeConfig {
    fn default() -> Self {
        Self {
            grace_period: 200,
            delta: 1e-7,
            tau: 0.05,
            max_depth: 980,
            max_byte_size: 100.0 * (1u64 << 20) as f64,
            memory_estimate_period: 1_000_000,
            max_share_to_split: 0.99,
            min_branch_fraction: 0.01,
            max_features: None,
            merit_preprune: false,
        }
    }
}

fn hoeffding_bound(range: f64, confidence: f64, n: f64) -> f64 {
    if n <= 0.0 {
        return f64::INFINITY;
    }
    (range * range * (-confidence.ln()) / (2.0 * n)).sqrt()
}

/// An incrementally-grown decision tree with Gaussian numeric attribute
/// observers and Naive-Bayes-Adaptive leaves.
pub struct HoeffdingTreeClassifier {
    config: HoeffdingTreeConfig,
    num_features: usize,
    num_labels: usize,
    root: Option<Node>,
    n_active_leaves: usize,
    n_inactive_leaves: usize,
    train_weight_seen_by_model: f64,
    rng: StdRng,
}

impl HoeffdingTreeClassifier {
    pub fn new(num_features: usize, num_labels: usize, config: HoeffdingTreeConfig, seed: Option<u64>) -> Self {
        let rng = StdRng::seed_from_u64(seed.unwrap_or_else(rand::random));
        Self {
            config,
            num_features,
            num_labels,
            root: None,
            n_active_leaves: 0,
            n_inactive_leaves: 0,
            train_weight_seen_by_model: 0.0,
            rng,
        }
    }

    pub fn num_active_leaves(&self) -> usize {
        self.n_active_leaves
    }

    pub fn num_inactive_leaves(&self) -> usize {
        self.n_inactive_leaves
    }

    fn recount_leaves(&mut self) {
        match &self.root {
            Some(node) => {
                let (active, inactive) = node.count_leaves();
                self.n_active_leaves = active;
                self.n_inactive_leaves = inactive;
            }
            None => {
                self.n_active_leaves = 0;
                self.n_inactive_leaves = 0;
            }
        }
    }

    fn attempt_to_split(node: &mut Node, config: &HoeffdingTreeConfig, num_features: usize) {
        let Node::Leaf(leaf) = node else { return };
        if !leaf.is_active || leaf.observed_class_distribution_is_pure() || leaf.depth >= config.max_depth {
            return;
        }

        // A synthetic "do not split" option competes on equal footing with
        // every real feature suggestion; if it wins, the leaf is retired
        // instead of branched.
        let mut suggestions = leaf.best_split_suggestions(config.max_share_to_split, config.min_branch_fraction);
        suggestions.push(AttributeSplitSuggestion::null_suggestion(0.0));
        suggestions.sort();

        if suggestions.len() < 2 {
            return;
        }

        let best = suggestions[suggestions.len() - 1].clone();
        let second = &suggestions[suggestions.len() - 2];
        let range = InfoGainSplitCriterion::get_range_of_merit(leaf.num_non_zero_entries());
        let bound = hoeffding_bound(range, config.delta, leaf.total_weight());
        let should_split = best.merit - second.merit > bound || bound < config.tau;

        if !should_split {
            return;
        }

        if best.feature < 0 {
            leaf.deactivate();
            return;
        }

        let feature = best.feature as usize;
        let threshold = best.threshold;
        let depth = leaf.depth + 1;
        let max_features = leaf.max_features;
        let pre_split_stats = leaf.stats.clone();
        let left_stats = best.post_split_dists.first().cloned().unwrap_or_default();
        let right_stats = best.post_split_dists.get(1).cloned().unwrap_or_default();

        let left = LeafNode::with_initial_stats(depth, num_features, &left_stats, max_features);
        let right = LeafNode::with_initial_stats(depth, num_features, &right_stats, max_features);

        *node = Node::Branch(BranchNode {
            feature,
            threshold,
            left: Box::new(Node::Leaf(left)),
            right: Box::new(Node::Leaf(right)),
            stats: pre_split_stats,
        });
    }

    /// Deactivates the least-promising active leaves until the estimated
    /// footprint falls back under budget. The per-leaf cost is a rough
    /// heuristic (feature count times class count times a fixed word size)
    /// rather than a measured allocation size.
    fn enforce_size_limit(&mut self) {
        const BYTES_PER_SPLITTER_SLOT: f64 = 64.0;

        let Some(root) = self.root.as_mut() else { return };
        let per_leaf = self.num_features as f64 * BYTES_PER_SPLITTER_SLOT;
        let max_depth = self.config.max_depth;

        let mut leaves = Vec::new();
        root.collect_leaves(&mut leaves);
        let active_count = leaves.iter().filter(|l| l.is_active).count();
        let mut bytes = active_count as f64 * per_leaf;

        if bytes > self.config.max_byte_size {
            let mut active: Vec<_> = leaves.iter_mut().filter(|l| l.is_active).collect();
            active.sort_by(|a, b| a.calculate_promise().partial_cmp(&b.calculate_promise()).unwrap());
            for leaf in active {
                if bytes <= self.config.max_byte_size {
                    break;
                }
                leaf.deactivate();
                bytes -= per_leaf;
            }
        } else if bytes + per_leaf <= self.config.max_byte_size {
            let mut inactive: Vec<_> = leaves
                .iter_mut()
                .filter(|l| !l.is_active && l.depth < max_depth)
                .collect();
            inactive.sort_by(|a, b| b.calculate_promise().partial_cmp(&a.calculate_promise()).unwrap());
            for leaf in inactive {
                if bytes + per_leaf > self.config.max_byte_size {
                    break;
                }
                leaf.reactivate();
                bytes += per_leaf;
            }
        }

        self.recount_leaves();
    }

    /// Same as the `Classifier::learn_one` entry point, but draws feature-
    /// subspace sampling from a caller-supplied generator instead of this
    /// tree's own. Lets an ensemble route every member tree's randomness
    /// through one shared, order-sensitive PRNG.
    pub fn learn_one_with_rng(&mut self, x: &[f64], y: usize, w: f64, rng: &mut StdRng) {
        if self.root.is_none() {
            self.root = Some(Node::Leaf(LeafNode::new(0, self.num_features, self.num_labels, self.config.max_features)));
            self.n_active_leaves = 1;
        }

        self.train_weight_seen_by_model += w;

        let root = self.root.as_mut().unwrap();
        let node = root.node_for_mut(x);
        if let Node::Leaf(leaf) = node {
            leaf.learn_one(x, y, w, rng);
            let weight_seen = leaf.total_weight();
            let since_last_attempt = weight_seen - leaf.last_split_attempt_at;
            if leaf.is_active && since_last_attempt >= self.config.grace_period as f64 {
                leaf.last_split_attempt_at = weight_seen;
                Self::attempt_to_split(node, &self.config, self.num_features);
                self.recount_leaves();
            }
        }

        if self.config.memory_estimate_period > 0
            && (self.train_weight_seen_by_model as u64) % self.config.memory_estimate_period == 0
        {
            self.enforce_size_limit();
        }
    }
}

impl Classifier for HoeffdingTreeClassifier {
    fn learn_one(&mut self, x: &[f64], y: usize, w: f64) {
        let mut rng = std::mem::replace(&mut self.rng, StdRng::seed_from_u64(0));
        self.learn_one_with_rng(x, y, w, &mut rng);
        self.rng = rng;
    }

    fn predict_proba_one(&self, x: &[f64]) -> Vec<f64> {
        match &self.root {
            Some(root) => root.leaf_for(x).predict_proba_for(x),
            None => vec![0.0; self.num_labels],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_tree_predicts_uniform_zero() {
        let tree = HoeffdingTreeClassifier::new(2, 2, HoeffdingTreeConfig::default(), Some(1));
        assert_eq!(tree.predict_proba_one(&[0.0, 0.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn tree_splits_on_clearly_separable_data() {
        let config = HoeffdingTreeConfig {
            grace_period: 20,
            delta: 0.05,
            ..HoeffdingTreeConfig::default()
        };
        let mut tree = HoeffdingTreeClassifier::new(1, 2, config, Some(7));
        for _ in 0..200 {
            tree.learn_one(&[0.0], 0, 1.0);
            tree.learn_one(&[10.0], 1, 1.0);
        }
        assert!(tree.num_active_leaves() + tree.num_inactive_leaves() >= 2);
        assert_eq!(tree.predict_one(&[0.0]), 0);
        assert_eq!(tree.predict_one(&[10.0]), 1);
    }

    #[test]
    fn single_class_stream_never_splits() {
        let mut tree = HoeffdingTreeClassifier::new(1, 2, HoeffdingTreeConfig::default(), Some(3));
        for i in 0..500 {
            tree.learn_one(&[i as f64], 0, 1.0);
        }
        assert_eq!(tree.num_active_leaves(), 1);
        assert_eq!(tree.num_inactive_leaves(), 0);
    }
}
