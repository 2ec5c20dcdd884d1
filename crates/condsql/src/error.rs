//! Error types for condsql

use std::time::Duration;
use thiserror::Error;

/// Result type alias for condsql operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Error types for statement compilation and execution
#[derive(Debug, Error)]
pub enum SqlError {
    /// Malformed condition, post-process or join input
    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    /// Mutation attempted on a joined table
    #[error("Write guard violation: {0}")]
    WriteGuardViolation(String),

    /// Failure reported by the executor (connectivity, constraints, ...)
    #[error("Execution error: {0}")]
    Execution(String),

    /// Query timeout error
    #[error("Query timeout after {0:?}")]
    Timeout(Duration),

    /// Invalid configuration (search schema files, ...)
    #[error("Config error: {0}")]
    Config(String),
}

impl SqlError {
    /// Create a schema violation error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::SchemaViolation(message.into())
    }

    /// Create a write guard error
    pub fn write_guard(message: impl Into<String>) -> Self {
        Self::WriteGuardViolation(message.into())
    }

    /// Create an execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is a schema violation
    pub fn is_schema_violation(&self) -> bool {
        matches!(self, Self::SchemaViolation(_))
    }

    /// Check if this is a write guard violation
    pub fn is_write_guard(&self) -> bool {
        matches!(self, Self::WriteGuardViolation(_))
    }

    /// Check if this error came from the execution layer
    pub fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_) | Self::Timeout(_))
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

impl From<toml::de::Error> for SqlError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
