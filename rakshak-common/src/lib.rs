//! # Rakshak Common Library
//!
//! Shared code for all Rakshak services including:
//! - Platform record models (workers, orders, termination, reviews)
//! - Configuration loading
//! - Tracing setup
//! - Generative-model HTTP client
//! - Timestamp helpers

pub mod config;
pub mod error;
pub mod llm;
pub mod logging;
pub mod models;
pub mod time;

pub use error::{Error, Result};
