#[cfg(feature = "cli")]
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use core::validator::Validator;
pub use domain::model::CheckSummary;
pub use utils::error::{CheckError, Result};
