use crate::classifiers::attribute_observers::{AttributeSplitSuggestion, GaussianAttributeObserver};
use rand::Rng;
use rand::seq::SliceRandom;

/// A tree node is either a branch (an internal decision point) or a leaf
/// (where statistics accumulate and predictions are made). Children are
/// owned outright by their parent; there is no shared ownership and no
/// possibility of a cycle.
pub enum Node {
    Leaf(LeafNode),
    Branch(BranchNode),
}

pub struct BranchNode {
    pub feature: usize,
    pub threshold: f64,
    pub left: Box<Node>,
    pub right: Box<Node>,
    /// Class distribution cached from the leaf this branch replaced.
    pub stats: Vec<f64>,
}

impl BranchNode {
    #[inline]
    pub fn branch_no(&self, x: &[f64]) -> usize {
        if x[self.feature] <= self.threshold { 0 } else { 1 }
    }

    pub fn total_weight(&self) -> f64 {
        self.left.total_weight() + self.right.total_weight()
    }
}

pub struct LeafNode {
    pub depth: usize,
    pub is_active: bool,
    pub stats: Vec<f64>,
    pub splitters: Vec<Option<GaussianAttributeObserver>>,
    pub last_split_attempt_at: f64,
    pub mc_correct_weight: f64,
    pub nb_correct_weight: f64,
    /// `Some(indices)` once a random-subspace leaf has sampled its feature
    /// subset; `None` until the first observation, or permanently for a
    /// plain NBA leaf that observes every feature.
    pub feature_indices: Option<Vec<usize>>,
    pub max_features: Option<usize>,
    num_features: usize,
    num_labels: usize,
}

impl LeafNode {
    pub fn new(depth: usize, num_features: usize, num_labels: usize, max_features: Option<usize>) -> Self {
        Self {
            depth,
            is_active: true,
            stats: vec![0.0; num_labels],
            splitters: vec![None; num_features],
            last_split_attempt_at: 0.0,
            mc_correct_weight: 0.0,
            nb_correct_weight: 0.0,
            feature_indices: None,
            max_features,
            num_features,
            num_labels,
        }
    }

    /// A child leaf grown from a split, warm-started with the parent's
    /// post-split class distribution (sentinel `-1.0` slots become `0.0`).
    pub fn with_initial_stats(
        depth: usize,
        num_features: usize,
        initial_stats: &[f64],
        max_features: Option<usize>,
    ) -> Self {
        let num_labels = initial_stats.len();
        let mut leaf = Self::new(depth, num_features, num_labels, max_features);
        leaf.stats = initial_stats.iter().map(|&v| if v > 0.0 { v } else { 0.0 }).collect();
        leaf
    }

    pub fn total_weight(&self) -> f64 {
        self.stats.iter().sum()
    }

    pub fn num_non_zero_entries(&self) -> usize {
        self.stats.iter().filter(|&&v| v > 0.0).count()
    }

    pub fn observed_class_distribution_is_pure(&self) -> bool {
        self.num_non_zero_entries() < 2
    }

    pub fn majority_class(&self) -> usize {
        crate::classifier::argmax(&self.stats)
    }

    /// `promise = total_weight - max_class_weight`, used to rank leaves for
    /// deactivation under memory pressure: the lower the promise, the less
    /// a leaf stands to gain from further splitting.
    pub fn calculate_promise(&self) -> f64 {
        let total = self.total_weight();
        let max = self.stats.iter().cloned().fold(0.0_f64, f64::max);
        total - max
    }

    fn active_feature_indices(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        match &self.feature_indices {
            Some(indices) => Box::new(indices.iter().copied()),
            None => Box::new(0..self.num_features),
        }
    }

    fn ensure_feature_subspace(&mut self, rng: &mut impl Rng) {
        let Some(k) = self.max_features else { return };
        if self.feature_indices.is_some() {
            return;
        }
        let k = k.min(self.num_features).max(1);
        let mut all: Vec<usize> = (0..self.num_features).collect();
        all.shuffle(rng);
        all.truncate(k);
        self.feature_indices = Some(all);
    }

    /// Records one observation, updating counters, correctness trackers and
    /// per-feature splitters. `rng` is only consulted the first time a
    /// random-subspace leaf needs to sample its feature subset.
    pub fn learn_one(&mut self, x: &[f64], y: usize, w: f64, rng: &mut impl Rng) {
        // correctness counters compare *pre-update* predictions
        if self.majority_class() == y {
            self.mc_correct_weight += w;
        }
        if self.naive_bayes_prediction(x) == y {
            self.nb_correct_weight += w;
        }

        self.ensure_feature_subspace(rng);

        if y >= self.stats.len() {
            self.stats.resize(y + 1, 0.0);
        }
        self.stats[y] += w;

        let indices: Vec<usize> = self.active_feature_indices().collect();
        for &i in &indices {
            if i >= x.len() {
                continue;
            }
            let num_labels = self.num_labels;
            let observer = self.splitters[i].get_or_insert_with(|| GaussianAttributeObserver::new(num_labels));
            observer.update(x[i], y, w);
        }
    }

    /// `_max_share_to_split` is carried for parity with the source's call
    /// shape; this implementation has no use for it yet.
    pub fn best_split_suggestions(
        &self,
        _max_share_to_split: f64,
        min_branch_fraction: f64,
    ) -> Vec<AttributeSplitSuggestion> {
        if !self.is_active {
            return Vec::new();
        }
        let mut suggestions = Vec::new();
        for (i, slot) in self.splitters.iter().enumerate() {
            if let Some(observer) = slot {
                suggestions.push(observer.best_evaluated_split_suggestion(&self.stats, i, min_branch_fraction));
            }
        }
        suggestions
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.splitters = Vec::new();
    }

    /// Restores an inactive leaf to active status with fresh splitters.
    /// Prior attribute observations are not recoverable; the leaf resumes
    /// learning from its current class distribution.
    pub fn reactivate(&mut self) {
        self.is_active = true;
        self.splitters = vec![None; self.num_features];
    }

    fn majority_class_proba(&self) -> Vec<f64> {
        let mut v = self.stats.clone();
        let total: f64 = v.iter().sum();
        if total > 0.0 {
            for x in v.iter_mut() {
                *x /= total;
            }
        }
        v
    }

    fn naive_bayes_prediction(&self, x: &[f64]) -> usize {
        crate::classifier::argmax(&naive_bayes_votes(&self.stats, &self.splitters, x))
    }

    /// Naive-Bayes-Adaptive prediction: majority class if the empirically
    /// more accurate predictor has been majority-class, else full Naive
    /// Bayes with the log-sum-exp trick for numerical stability.
    pub fn predict_proba_for(&self, x: &[f64]) -> Vec<f64> {
        if self.is_active && self.nb_correct_weight >= self.mc_correct_weight {
            naive_bayes_votes(&self.stats, &self.splitters, x)
        } else {
            self.majority_class_proba()
        }
    }
}

/// Naive Bayes prediction at a leaf, per the published contract: classes
/// with zero observed weight are left at `0.0` and skip the feature loop
/// entirely; classes with positive weight accumulate log-likelihoods with
/// `cond_proba == 0` treated as `-infinity`; the log-sum-exp trick recovers
/// normalized probabilities.
pub fn naive_bayes_votes(
    stats: &[f64],
    splitters: &[Option<GaussianAttributeObserver>],
    x: &[f64],
) -> Vec<f64> {
    let total_weight: f64 = stats.iter().sum();
    let mut votes = vec![0.0; stats.len()];
    if total_weight <= 0.0 {
        return votes;
    }

    for (c, &n_c) in stats.iter().enumerate() {
        if n_c <= 0.0 {
            continue;
        }
        votes[c] = (n_c / total_weight).ln();
        for (i, slot) in splitters.iter().enumerate() {
            let Some(observer) = slot else { continue };
            let Some(&xi) = x.get(i) else { continue };
            let p = observer.cond_proba(xi, c);
            votes[c] += if p > 0.0 { p.ln() } else { f64::NEG_INFINITY };
        }
    }

    let max_ll = votes.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if !max_ll.is_finite() {
        return vec![0.0; stats.len()];
    }
    let lse = max_ll + votes.iter().map(|&v| (v - max_ll).exp()).sum::<f64>().ln();
    for v in votes.iter_mut() {
        *v = (*v - lse).exp();
    }
    votes
}

impl Node {
    pub fn total_weight(&self) -> f64 {
        match self {
            Node::Leaf(l) => l.total_weight(),
            Node::Branch(b) => b.total_weight(),
        }
    }

    /// Descends to the leaf that `x` routes to, returning a mutable
    /// reference plus the chain of `(branch index taken)` not needed by
    /// callers that only read; callers that must mutate the parent's child
    /// slot use [`Node::leaf_mut_with_path`] instead.
    pub fn leaf_for<'a>(&'a self, x: &[f64]) -> &'a LeafNode {
        match self {
            Node::Leaf(l) => l,
            Node::Branch(b) => {
                if b.branch_no(x) == 0 {
                    b.left.leaf_for(x)
                } else {
                    b.right.leaf_for(x)
                }
            }
        }
    }

    pub fn leaf_for_mut<'a>(&'a mut self, x: &[f64]) -> &'a mut LeafNode {
        match self {
            Node::Leaf(l) => l,
            Node::Branch(b) => {
                if b.branch_no(x) == 0 {
                    b.left.leaf_for_mut(x)
                } else {
                    b.right.leaf_for_mut(x)
                }
            }
        }
    }

    /// Like [`Node::leaf_for_mut`] but returns the enum slot itself, so a
    /// caller can replace a leaf in place with a freshly grown branch.
    pub fn node_for_mut<'a>(&'a mut self, x: &[f64]) -> &'a mut Node {
        match self {
            Node::Leaf(_) => self,
            Node::Branch(b) => {
                if b.branch_no(x) == 0 {
                    b.left.node_for_mut(x)
                } else {
                    b.right.node_for_mut(x)
                }
            }
        }
    }

    pub fn count_leaves(&self) -> (usize, usize) {
        match self {
            Node::Leaf(l) => {
                if l.is_active {
                    (1, 0)
                } else {
                    (0, 1)
                }
            }
            Node::Branch(b) => {
                let (la, li) = b.left.count_leaves();
                let (ra, ri) = b.right.count_leaves();
                (la + ra, li + ri)
            }
        }
    }

    pub fn collect_leaves<'a>(&'a mut self, out: &mut Vec<&'a mut LeafNode>) {
        match self {
            Node::Leaf(l) => out.push(l),
            Node::Branch(b) => {
                b.left.collect_leaves(out);
                b.right.collect_leaves(out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn fresh_leaf_is_active_and_empty() {
        let leaf = LeafNode::new(0, 2, 2, None);
        assert!(leaf.is_active);
        assert_eq!(leaf.total_weight(), 0.0);
        assert!(leaf.observed_class_distribution_is_pure());
    }

    #[test]
    fn learn_one_increments_stats_and_splitters() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut leaf = LeafNode::new(0, 2, 2, None);
        leaf.learn_one(&[1.0, 2.0], 0, 1.0, &mut rng);
        assert_eq!(leaf.stats[0], 1.0);
        assert!(leaf.splitters[0].is_some());
        assert!(leaf.splitters[1].is_some());
    }

    #[test]
    fn deactivated_leaf_has_no_splitters_and_no_suggestions() {
        let mut leaf = LeafNode::new(0, 2, 2, None);
        let mut rng = StdRng::seed_from_u64(1);
        leaf.learn_one(&[1.0, 2.0], 0, 1.0, &mut rng);
        leaf.deactivate();
        assert!(leaf.splitters.is_empty());
        assert!(leaf.best_split_suggestions(0.99, 0.01).is_empty());
    }

    #[test]
    fn random_subspace_leaf_samples_requested_feature_count() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut leaf = LeafNode::new(0, 10, 2, Some(3));
        leaf.learn_one(&vec![0.0; 10], 0, 1.0, &mut rng);
        assert_eq!(leaf.feature_indices.as_ref().unwrap().len(), 3);
        assert_eq!(leaf.splitters.iter().filter(|s| s.is_some()).count(), 3);
    }

    #[test]
    fn naive_bayes_votes_zero_for_untrained_stats() {
        let v = naive_bayes_votes(&[0.0, 0.0], &[None, None], &[1.0, 2.0]);
        assert_eq!(v, vec![0.0, 0.0]);
    }
}
