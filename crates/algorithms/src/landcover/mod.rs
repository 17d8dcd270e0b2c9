//! Land-cover label aggregation
//!
//! Two independent per-pixel aggregation products:
//! - **mode_label**: temporal mode of a discrete label band, confidence =
//!   fraction of matching observations
//! - **max_median**: argmax of per-class median probabilities, confidence =
//!   the winning median rescaled to a percentage

mod max_median;
mod mode_label;

pub use max_median::max_median_label;
pub use mode_label::mode_label;
