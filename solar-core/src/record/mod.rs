//! Sample record schema
//!
//! Fixes the order and bit width of every field a measurement cycle
//! appends to the log. There is no header or delimiter in the stream, so
//! a reader must use this exact layout.

pub mod sample;

pub use sample::{Field, Sample};
