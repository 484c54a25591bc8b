mod arf;

pub use arf::ArfClassifier;
