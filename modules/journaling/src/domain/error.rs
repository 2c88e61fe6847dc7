use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors using thiserror
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Also returned when the entry exists but belongs to someone else.
    #[error("Journal entry not found: {id}")]
    EntryNotFound { id: Uuid },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn entry_not_found(id: Uuid) -> Self {
        Self::EntryNotFound { id }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    /// Field the error refers to, for validation failures.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}
