//! HTTP surface of the swing assessment engine
//!
//! This crate provides:
//! - The axum router exposing swing analysis, barrel classification,
//!   contact summaries, session reports and comparisons
//! - Health and readiness tracking
//! - Environment-driven service configuration

pub mod api;
pub mod config;
pub mod health;
