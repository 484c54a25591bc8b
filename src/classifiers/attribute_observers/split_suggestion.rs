use std::cmp::Ordering;

/// A deferred split decision: `(merit, feature, threshold)` plus the
/// post-split class distributions it was scored against.
///
/// `feature < 0` is the "null suggestion" placeholder meaning "do not
/// split on any feature".
#[derive(Debug, Clone)]
pub struct AttributeSplitSuggestion {
    pub feature: i64,
    pub threshold: f64,
    pub merit: f64,
    pub post_split_dists: Vec<Vec<f64>>,
}

impl AttributeSplitSuggestion {
    pub fn null_suggestion(merit: f64) -> Self {
        Self {
            feature: -1,
            threshold: -1.0,
            merit,
            post_split_dists: Vec::new(),
        }
    }
}

impl PartialEq for AttributeSplitSuggestion {
    fn eq(&self, other: &Self) -> bool {
        self.merit == other.merit
    }
}
impl Eq for AttributeSplitSuggestion {}

impl PartialOrd for AttributeSplitSuggestion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AttributeSplitSuggestion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.merit.partial_cmp(&other.merit).unwrap_or(Ordering::Equal)
    }
}
