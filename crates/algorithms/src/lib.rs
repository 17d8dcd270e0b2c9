//! # TerraCover Algorithms
//!
//! Per-pixel aggregation and assessment algorithms for temporal
//! land-cover products.
//!
//! ## Available Algorithm Categories
//!
//! - **temporal**: per-interval reduction of an image series
//! - **landcover**: mode-label and max-median-probability aggregation
//! - **accuracy**: stratified sampling and confusion-matrix assessment
//! - **backend**: in-memory implementation of the collection contract

pub mod accuracy;
pub mod backend;
pub mod landcover;
pub mod temporal;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::accuracy::{
        assess, stratified_sample, AssessParams, ConfusionMatrix, LabeledMatrix, SamplePoint,
        SampleParams,
    };
    pub use crate::backend::MemoryBackend;
    pub use crate::landcover::{max_median_label, mode_label};
    pub use crate::temporal::{
        reduce_series, reduce_to_intervals, reduce_to_intervals_detailed, MetadataMode,
        ReduceParams,
    };
    pub use terracover_core::prelude::*;
}
