//! KrishiMitra Core - Domain models, error taxonomy, and configuration
//!
//! This crate contains the core domain logic shared by the advisory pipeline
//! and its adapters: typed soil/crop/farmer records, the season calendar,
//! the soil-deficiency rules, and layered configuration.

pub mod config;
pub mod deficiency;
pub mod error;
pub mod models;
pub mod season;

pub use error::{KrishiError, Result};
