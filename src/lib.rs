//! Daily crop growth simulation with yield, harvest-date and harvest-plan
//! projection.

pub mod catalog;
pub mod config;
pub mod datasources;
pub mod engine;
pub mod error;
pub mod models;
pub mod scenario;

pub use error::{CropCastError, Result};
