use axum::http::StatusCode;
use modkit::api::problem::{Problem, ProblemResponse, ValidationError};

use crate::domain::error::DomainError;

/// Map domain error to RFC 9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::EntryNotFound { .. } => Problem::from_parts(
            StatusCode::NOT_FOUND,
            "JOURNAL_ENTRY_NOT_FOUND",
            "Not Found",
            "Journal entry not found",
            instance,
        )
        .into(),
        DomainError::Validation { field, message } => Problem::from_parts(
            StatusCode::BAD_REQUEST,
            "JOURNAL_VALIDATION",
            "Validation error",
            format!("{field}: {message}"),
            instance,
        )
        .with_errors(vec![ValidationError {
            detail: message.clone(),
            pointer: format!("/{field}"),
        }])
        .into(),
        DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Database error occurred");
            Problem::from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_DB",
                "Internal error",
                "An internal database error occurred",
                instance,
            )
            .into()
        }
    }
}

/// Path id that is not a UUID; rejected before any lookup.
pub fn invalid_entry_id(instance: &str) -> ProblemResponse {
    Problem::from_parts(
        StatusCode::BAD_REQUEST,
        "JOURNAL_INVALID_ID",
        "Bad Request",
        "Invalid UUID format",
        instance,
    )
    .into()
}

/// Malformed body or query string, as reported by the axum extractor.
pub fn malformed_request(status: StatusCode, detail: String, instance: &str) -> ProblemResponse {
    Problem::from_parts(status, "JOURNAL_VALIDATION", "Validation error", detail, instance).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn not_found_maps_to_404() {
        let p = map_domain_error(&DomainError::entry_not_found(Uuid::new_v4()), "/x").0;
        assert_eq!(p.status, 404);
        assert_eq!(p.code, "JOURNAL_ENTRY_NOT_FOUND");
        assert_eq!(p.detail, "Journal entry not found");
        assert_eq!(p.instance, "/x");
    }

    #[test]
    fn validation_carries_pointer() {
        let p = map_domain_error(&DomainError::validation("mood_rating", "out of range"), "/x").0;
        assert_eq!(p.status, 400);
        assert_eq!(p.code, "JOURNAL_VALIDATION");
        let errors = p.errors.unwrap();
        assert_eq!(errors[0].pointer, "/mood_rating");
    }

    #[test]
    fn database_errors_are_opaque() {
        let p = map_domain_error(&DomainError::database("no such table: journal_entries"), "/x").0;
        assert_eq!(p.status, 500);
        assert_eq!(p.code, "INTERNAL_DB");
        assert!(!p.detail.contains("journal_entries"));
    }

    #[test]
    fn invalid_id_is_bad_request() {
        let p = invalid_entry_id("/api/v1/journal/entries/nope").0;
        assert_eq!(p.status, 400);
        assert_eq!(p.code, "JOURNAL_INVALID_ID");
    }
}
