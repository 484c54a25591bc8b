use crate::classifier::Classifier;
use crate::error::CoreError;
use crate::preprocessing::Transformer;

/// Chains an owned [`Transformer`] in front of an owned [`Classifier`].
pub struct PipelineClassifier<T: Transformer, C: Classifier> {
    transformer: T,
    classifier: C,
}

impl<T: Transformer, C: Classifier> PipelineClassifier<T, C> {
    pub fn new(transformer: T, classifier: C) -> Self {
        Self {
            transformer,
            classifier,
        }
    }

    pub fn learn_one(&mut self, x: &[f64], y: usize, w: f64) {
        self.transformer.learn_one(x, y);
        let transformed = self.transformer.transform_one(x);
        self.classifier.learn_one(&transformed, y, w);
    }

    pub fn predict_one(&self, x: &[f64]) -> usize {
        let transformed = self.transformer.transform_one(x);
        self.classifier.predict_one(&transformed)
    }

    /// Not supported: the source pipeline surfaces this as a hard failure
    /// rather than composing a meaningful probability vector.
    pub fn predict_proba_one(&self, _x: &[f64]) -> Result<Vec<f64>, CoreError> {
        Err(CoreError::NotSupported("PipelineClassifier::predict_proba_one"))
    }
}

/// Lets a pipeline stand in for a plain [`Classifier`] (e.g. when boxed for
/// the prequential driver), delegating `predict_proba_one` to the wrapped
/// classifier over transformed features rather than the inherent method's
/// hard failure above.
impl<T: Transformer, C: Classifier> Classifier for PipelineClassifier<T, C> {
    fn learn_one(&mut self, x: &[f64], y: usize, w: f64) {
        PipelineClassifier::learn_one(self, x, y, w)
    }

    fn predict_proba_one(&self, x: &[f64]) -> Vec<f64> {
        let transformed = self.transformer.transform_one(x);
        self.classifier.predict_proba_one(&transformed)
    }

    fn predict_one(&self, x: &[f64]) -> usize {
        PipelineClassifier::predict_one(self, x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::forest::ArfClassifier;
    use crate::drift::Ddm;
    use crate::preprocessing::StandardScaler;

    #[test]
    fn predict_proba_one_is_unsupported() {
        let pipeline = PipelineClassifier::new(
            StandardScaler::new(),
            ArfClassifier::new(2, 2, 2, Some(1), || Ddm::new(30.0, 2.0), || Ddm::new(30.0, 3.0)),
        );
        let err = pipeline.predict_proba_one(&[0.0, 0.0]).unwrap_err();
        assert_eq!(err, CoreError::NotSupported("PipelineClassifier::predict_proba_one"));
    }

    #[test]
    fn predict_one_matches_classifier_on_transformed_input() {
        let mut pipeline = PipelineClassifier::new(
            StandardScaler::new(),
            ArfClassifier::new(2, 2, 1, Some(7), || Ddm::new(30.0, 2.0), || Ddm::new(30.0, 3.0)),
        );
        for i in 0..50 {
            let x = [(i % 2) as f64 * 10.0, 0.0];
            let y = i % 2;
            pipeline.learn_one(&x, y, 1.0);
        }
        let transformed_path = {
            let mut scaler = StandardScaler::new();
            let mut classifier =
                ArfClassifier::new(2, 2, 1, Some(7), || Ddm::new(30.0, 2.0), || Ddm::new(30.0, 3.0));
            for i in 0..50 {
                let x = [(i % 2) as f64 * 10.0, 0.0];
                let y = i % 2;
                scaler.learn_one(&x, y);
                let tx = scaler.transform_one(&x);
                classifier.learn_one(&tx, y, 1.0);
            }
            let tx = scaler.transform_one(&[10.0, 0.0]);
            classifier.predict_one(&tx)
        };
        assert_eq!(pipeline.predict_one(&[10.0, 0.0]), transformed_path);
    }
}
