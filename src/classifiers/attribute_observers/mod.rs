mod gaussian_observer;
mod split_suggestion;

pub use gaussian_observer::GaussianAttributeObserver;
pub use split_suggestion::AttributeSplitSuggestion;
