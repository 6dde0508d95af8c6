//! Layout math for Trellis.
//!
//! Pure, element-agnostic algorithms: size envelopes, proportional
//! distribution along an axis, and greedy line breaking. Containers in
//! [`crate::composite`] and [`crate::dynamic_list`] feed these with their
//! children's limits and cache the results as bounds.
//!
//! # Architecture
//!
//! ```text
//! limits() bottom-up -> allocate() per container -> bounds cache -> draw / hit_test
//! ```

pub mod flow;
pub mod limits;
pub mod tile;

pub use flow::break_lines;
pub use limits::{FULL_EXTENT, ViewLimits, ViewStretch};
pub use tile::{Allocation, allocate, grid_limits, grid_span, layer_limits, stack_limits};
