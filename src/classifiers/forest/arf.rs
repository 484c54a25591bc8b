use crate::classifier::{argmax, Classifier};
use crate::classifiers::hoeffding_tree::{HoeffdingTreeClassifier, HoeffdingTreeConfig};
use crate::drift::Detector;
use crate::metrics::Accuracy;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Poisson};

fn default_tree_config(num_features: usize) -> HoeffdingTreeConfig {
    HoeffdingTreeConfig {
        grace_period: 50,
        delta: 0.01,
        tau: 0.05,
        max_features: Some((num_features as f64).sqrt().ceil() as usize),
        ..HoeffdingTreeConfig::default()
    }
}

struct Member<W, D> {
    tree: HoeffdingTreeClassifier,
    background: Option<Box<HoeffdingTreeClassifier>>,
    warning: W,
    drift: D,
    metrics: Accuracy,
    warning_count: u64,
    drift_count: u64,
}

/// Adaptive Random Forest: an ensemble of Hoeffding trees trained with
/// online (Poisson) bagging, each carrying its own warning and drift
/// detector pair. A warning signal spawns a background tree trained
/// alongside the foreground one; a drift signal replaces the foreground
/// tree with whatever background tree is currently available, or a fresh
/// one if none was growing yet.
pub struct ArfClassifier<W, D, WF, DF>
where
    W: Detector,
    D: Detector,
    WF: Fn() -> W,
    DF: Fn() -> D,
{
    num_features: usize,
    num_labels: usize,
    lambda: f64,
    members: Vec<Member<W, D>>,
    warning_factory: WF,
    drift_factory: DF,
    rng: StdRng,
}

impl<W, D, WF, DF> ArfClassifier<W, D, WF, DF>
where
    W: Detector,
    D: Detector,
    WF: Fn() -> W,
    DF: Fn() -> D,
{
    pub fn new(
        num_features: usize,
        num_labels: usize,
        n_models: usize,
        seed: Option<u64>,
        warning_factory: WF,
        drift_factory: DF,
    ) -> Self {
        let rng = StdRng::seed_from_u64(seed.unwrap_or_else(rand::random));

        let members = (0..n_models)
            .map(|_| {
                Member {
                    tree: HoeffdingTreeClassifier::new(
                        num_features,
                        num_labels,
                        default_tree_config(num_features),
                        None,
                    ),
                    background: None,
                    warning: warning_factory(),
                    drift: drift_factory(),
                    metrics: Accuracy::new(),
                    warning_count: 0,
                    drift_count: 0,
                }
            })
            .collect();

        Self {
            num_features,
            num_labels,
            lambda: 6.0,
            members,
            warning_factory,
            drift_factory,
            rng,
        }
    }

    pub fn num_models(&self) -> usize {
        self.members.len()
    }

    /// Total number of warning signals fired across all trees so far.
    pub fn warning_count(&self) -> u64 {
        self.members.iter().map(|m| m.warning_count).sum()
    }

    /// Total number of drift signals fired across all trees so far.
    pub fn drift_count(&self) -> u64 {
        self.members.iter().map(|m| m.drift_count).sum()
    }
}

impl<W, D, WF, DF> Classifier for ArfClassifier<W, D, WF, DF>
where
    W: Detector,
    D: Detector,
    WF: Fn() -> W,
    DF: Fn() -> D,
{
    fn learn_one(&mut self, x: &[f64], y: usize, w: f64) {
        let predicted_before: Vec<usize> = self
            .members
            .iter()
            .map(|m| argmax(&m.tree.predict_proba_one(x)))
            .collect();

        for (member, predicted) in self.members.iter_mut().zip(predicted_before) {
            member.metrics.update(y, predicted, 1.0);

            let k = Poisson::new(self.lambda)
                .map(|p| p.sample(&mut self.rng))
                .unwrap_or(1.0);
            if k <= 0.0 {
                continue;
            }

            if let Some(background) = member.background.as_mut() {
                background.learn_one_with_rng(x, y, w * k, &mut self.rng);
            }
            member.tree.learn_one_with_rng(x, y, w * k, &mut self.rng);

            let correct = if predicted == y { 0.0 } else { 1.0 };

            member.warning.update(correct);
            if member.warning.drift_detected() {
                member.background = Some(Box::new(HoeffdingTreeClassifier::new(
                    self.num_features,
                    self.num_labels,
                    default_tree_config(self.num_features),
                    None,
                )));
                member.warning = (self.warning_factory)();
                member.warning_count += 1;
            }

            member.drift.update(correct);
            if member.drift.drift_detected() {
                if let Some(background) = member.background.take() {
                    member.tree = *background;
                } else {
                    member.tree = HoeffdingTreeClassifier::new(
                        self.num_features,
                        self.num_labels,
                        default_tree_config(self.num_features),
                        None,
                    );
                }
                member.drift = (self.drift_factory)();
                member.warning = (self.warning_factory)();
                member.metrics = Accuracy::new();
                member.drift_count += 1;
            }
        }
    }

    fn predict_proba_one(&self, x: &[f64]) -> Vec<f64> {
        let mut votes = vec![0.0; self.num_labels];
        for member in &self.members {
            let proba = member.tree.predict_proba_one(x);
            let weight = member.metrics.get();
            let weight = if weight > 0.0 { weight } else { 1.0 };
            for (v, p) in votes.iter_mut().zip(proba.iter()) {
                *v += weight * p;
            }
        }
        let total: f64 = votes.iter().sum();
        if total > 0.0 {
            for v in votes.iter_mut() {
                *v /= total;
            }
        }
        votes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drift::Ddm;

    #[test]
    fn forest_learns_and_predicts_on_separable_data() {
        let mut forest = ArfClassifier::new(1, 2, 5, Some(1), || Ddm::new(30.0, 2.0), || Ddm::new(30.0, 3.0));
        for _ in 0..300 {
            forest.learn_one(&[0.0], 0, 1.0);
            forest.learn_one(&[10.0], 1, 1.0);
        }
        assert_eq!(forest.predict_one(&[0.0]), 0);
        assert_eq!(forest.predict_one(&[10.0]), 1);
    }

    #[test]
    fn untrained_forest_predicts_proba_all_zero() {
        let forest = ArfClassifier::new(2, 3, 4, Some(2), || Ddm::new(30.0, 2.0), || Ddm::new(30.0, 3.0));
        assert_eq!(forest.predict_proba_one(&[1.0, 1.0]), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn member_accuracy_down_weights_a_consistently_wrong_tree() {
        let mut forest = ArfClassifier::new(1, 2, 1, Some(7), || Ddm::new(30.0, 2.0), || Ddm::new(30.0, 3.0));
        for _ in 0..50 {
            forest.learn_one(&[0.0], 1, 1.0);
        }
        let member = &forest.members[0];
        assert!(member.metrics.get() < 0.5);
    }

    #[test]
    fn drift_resets_the_member_metric() {
        let mut forest = ArfClassifier::new(1, 2, 1, Some(9), || Ddm::new(5.0, 2.0), || Ddm::new(5.0, 2.0));
        for i in 0..200 {
            let y = if i % 2 == 0 { 1 } else { 0 };
            forest.learn_one(&[0.0], y, 1.0);
            if forest.members[0].drift_count > 0 {
                break;
            }
        }
        assert!(forest.drift_count() > 0);
        assert_eq!(forest.members[0].metrics.get(), 0.0);
    }

    #[test]
    fn same_seed_yields_identical_prediction_sequence() {
        let build = || ArfClassifier::new(2, 2, 4, Some(11), || Ddm::new(30.0, 2.0), || Ddm::new(30.0, 3.0));
        let mut a = build();
        let mut b = build();

        let xs: Vec<[f64; 2]> = (0..200).map(|i| [(i % 7) as f64, (i % 5) as f64]).collect();
        let ys: Vec<usize> = (0..200).map(|i| i % 2).collect();

        let mut preds_a = Vec::new();
        let mut preds_b = Vec::new();
        for (x, &y) in xs.iter().zip(ys.iter()) {
            preds_a.push(a.predict_proba_one(x));
            a.learn_one(x, y, 1.0);
            preds_b.push(b.predict_proba_one(x));
            b.learn_one(x, y, 1.0);
        }

        assert_eq!(preds_a, preds_b);
    }
}
