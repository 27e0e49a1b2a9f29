use crate::utils::error::{CheckError, Result};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(CheckError::Config {
            message: format!("{} cannot be empty", field_name),
        });
    }

    Ok(())
}
