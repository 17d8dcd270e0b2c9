//! Accuracy assessment against reference data
//!
//! - **sampling**: stratified, seeded point sampling of label rasters
//! - **confusion**: confusion matrix, overall accuracy, row normalization

mod confusion;
mod sampling;

pub use confusion::{assess, AssessParams, ConfusionMatrix, LabeledMatrix};
pub use sampling::{stratified_sample, SamplePoint, SampleParams};
