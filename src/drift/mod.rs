//! Streaming concept-drift detectors.
//!
//! Every detector consumes a scalar (typically a 0/1 correctness indicator)
//! and exposes a `drift_detected` flag that stays `true` until the next
//! `update`, at which point the detector resets itself before processing the
//! new sample.

mod adwin;
mod ddm;
mod hddm_w;
mod page_hinckley;

pub use adwin::Adwin;
pub use ddm::Ddm;
pub use hddm_w::HddmW;
pub use page_hinckley::PageHinckley;

/// Capability required of any drift detector consumed by the ensemble.
///
/// Kept as a plain trait (not an object-safe one is not required here) so
/// the ensemble can be generic over concrete detector types instead of
/// going through a trait object in the hot training loop.
pub trait Detector {
    fn update(&mut self, value: f64);
    fn drift_detected(&self) -> bool;
}
