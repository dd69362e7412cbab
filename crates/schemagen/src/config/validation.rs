//! Configuration validation.

use super::Config;
use crate::error::{GenError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    if config.schema.as_os_str().is_empty() {
        return Err(GenError::Config("schema is required".into()));
    }

    if config.output.dir.as_os_str().is_empty() {
        return Err(GenError::Config("output.dir cannot be empty".into()));
    }

    validate_package(&config.output.package_base)?;

    // Runtime config validation - only check if explicitly set
    if let Some(0) = config.runtime.workers {
        return Err(GenError::Config(
            "runtime.workers must be at least 1".into(),
        ));
    }

    Ok(())
}

/// A dotted package name: non-empty segments starting with a letter or `_`.
fn validate_package(package: &str) -> Result<()> {
    if package.is_empty() {
        return Err(GenError::Config("output.package_base is required".into()));
    }

    for segment in package.split('.') {
        let mut chars = segment.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(GenError::Config(format!(
                "output.package_base '{}' is not a valid package name",
                package
            )));
        }
    }

    Ok(())
}
