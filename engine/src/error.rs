use crate::analysis::field_discovery::FieldRole;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Missing required field(s): {}", role_list(.0))]
    MissingRequiredField(Vec<FieldRole>),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    #[error("No data loaded: {0}")]
    NoDataLoaded(String),

    #[error("Analysis job cancelled before it started")]
    Cancelled,

    #[error("Internal processing error: {0}")]
    ProcessingError(String),

    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

impl EngineError {
    /// Roles named by a `MissingRequiredField` error, empty otherwise.
    pub fn missing_roles(&self) -> &[FieldRole] {
        match self {
            EngineError::MissingRequiredField(roles) => roles,
            _ => &[],
        }
    }
}

fn role_list(roles: &[FieldRole]) -> String {
    roles.iter().map(|r| r.as_str()).collect::<Vec<_>>().join(", ")
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message_names_roles() {
        let err = EngineError::MissingRequiredField(vec![FieldRole::Identity, FieldRole::Quantity]);
        assert_eq!(err.to_string(), "Missing required field(s): identity, quantity");
        assert_eq!(err.missing_roles(), &[FieldRole::Identity, FieldRole::Quantity]);
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: EngineError = io.into();
        assert!(err.to_string().starts_with("I/O error"));
        assert!(err.missing_roles().is_empty());
    }
}
