//! Renovation estimator
//!
//! Turns a customer's home details, preferences and questionnaire answers
//! into a trait profile, a renovation strategy and an itemized, validated
//! cost estimate, served over HTTP.

pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod services;
