//! Temporal aggregation over image series
//!
//! - **reduce**: per-interval reduction with selectable statistics

mod reduce;

pub use reduce::{
    reduce_series, reduce_to_intervals, reduce_to_intervals_detailed, IntervalReduction,
    MetadataMode, ReduceParams,
};
