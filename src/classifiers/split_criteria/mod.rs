mod info_gain;

pub use info_gain::InfoGainSplitCriterion;
