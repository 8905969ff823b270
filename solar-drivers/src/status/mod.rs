//! Status indication

pub mod led;

pub use led::{BlinkStep, LedSignal, LedSignaller};
