//! Test-only doubles shared across the crate's unit and integration tests.

pub mod dummies;
pub mod stubs;

pub use dummies::ClassifierNoneVotes;
pub use stubs::{OracleClassifier, TrainSpyClassifier, TrainSpyHandle, VecStream};
