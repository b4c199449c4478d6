//! Memory Layer - recall probability modeling
//!
//! Contains:
//! - Recall model (Beta prior over a power-law forgetting curve)
//! - Log-space Beta helpers shared by prediction and update

mod math;
pub mod model;

pub use model::{
    default_model, half_life, predict_recall, update, MemoryModel, MemoryRecord, RecallError,
};
