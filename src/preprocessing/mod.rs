mod standard_scaler;
mod transformer;

pub use standard_scaler::StandardScaler;
pub use transformer::Transformer;
