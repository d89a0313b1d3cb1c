//! Error types
//!
//! The pipeline itself never fails; catalog failures are `CatalogError` and
//! are absorbed where they occur. What is left is invalid settings.

use thiserror::Error;

/// Common error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(String),
}

/// Result alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_config() {
        let error = Error::Config("unknown keyboard profile".to_string());
        assert_eq!(format!("{}", error), "Config error: unknown keyboard profile");
    }

    #[test]
    fn test_result_alias() {
        let result: Result<u8> = Err(Error::Config("x".into()));
        assert!(result.is_err());
    }
}
