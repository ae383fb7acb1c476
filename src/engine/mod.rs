//! Estimate pipeline
//!
//! Stages, leaves first:
//! - `bridge`: modern <-> legacy vocabulary
//! - `personality`: traits, tags, risk
//! - `strategy`: grade, processes, budget
//! - `estimate`: itemized costing and validation
//! - `ui_adapter`: presentation projection
//!
//! `pipeline::Estimator` runs them in order.

pub mod bridge;
pub mod estimate;
pub mod personality;
pub mod pipeline;
pub mod strategy;
pub mod ui_adapter;

pub use pipeline::Estimator;
