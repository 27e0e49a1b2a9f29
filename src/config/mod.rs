use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "csvcheck", version)]
#[command(about = "Check that every row of a CSV file has the same number of columns")]
pub struct CliConfig {
    /// CSV file to check
    pub path: PathBuf,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("path", &self.path)
    }
}
