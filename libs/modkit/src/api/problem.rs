use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Content type for Problem Details as per RFC 9457.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// Base URI for problem `type` links; the machine-readable code is appended.
pub const PROBLEM_TYPE_BASE: &str = "https://errors.mindjournal.dev";

/// RFC 9457 Problem Details for HTTP APIs.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(
    title = "Problem",
    description = "RFC 9457 Problem Details for HTTP APIs"
)]
pub struct Problem {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub type_url: String,
    /// A short, human-readable summary of the problem type.
    pub title: String,
    /// The HTTP status code for this occurrence of the problem.
    pub status: u16,
    /// A human-readable explanation specific to this occurrence of the problem.
    pub detail: String,
    /// The request path that produced the problem.
    pub instance: String,
    /// Machine-readable error code, e.g. `JOURNAL_ENTRY_NOT_FOUND`.
    pub code: String,
    /// Trace id of the span that handled the request, when one was active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    /// Field-level validation errors for 4xx problems.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ValidationError>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(title = "ValidationError")]
pub struct ValidationError {
    pub detail: String,
    /// JSON Pointer to the invalid location (e.g., "/mood_rating").
    pub pointer: String,
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_string(),
            title: title.into(),
            status: status.as_u16(),
            detail: detail.into(),
            instance: String::new(),
            code: String::new(),
            trace_id: None,
            errors: None,
        }
    }

    /// Build a fully populated problem: type link derived from `code`,
    /// trace id taken from the current span.
    pub fn from_parts(
        status: StatusCode,
        code: &str,
        title: &str,
        detail: impl Into<String>,
        instance: &str,
    ) -> Self {
        let mut p = Problem::new(status, title, detail)
            .with_type(format!("{PROBLEM_TYPE_BASE}/{code}"))
            .with_code(code)
            .with_instance(instance);
        if let Some(id) = tracing::Span::current().id() {
            p = p.with_trace_id(id.into_u64().to_string());
        }
        p
    }

    pub fn with_type(mut self, type_url: impl Into<String>) -> Self {
        self.type_url = type_url.into();
        self
    }

    pub fn with_instance(mut self, uri: impl Into<String>) -> Self {
        self.instance = uri.into();
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<ValidationError>) -> Self {
        self.errors = Some(errors);
        self
    }
}

/// Axum response wrapper that renders `Problem` with correct status & content type.
#[derive(Debug, Clone)]
pub struct ProblemResponse(pub Problem);

impl From<Problem> for ProblemResponse {
    fn from(p: Problem) -> Self {
        Self(p)
    }
}

impl IntoResponse for ProblemResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut resp = axum::Json(self.0).into_response();
        *resp.status_mut() = status;
        resp.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_PROBLEM_JSON),
        );
        resp
    }
}

pub fn bad_request(detail: impl Into<String>) -> ProblemResponse {
    Problem::new(StatusCode::BAD_REQUEST, "Bad Request", detail).into()
}

pub fn unauthorized(detail: impl Into<String>) -> ProblemResponse {
    Problem::new(StatusCode::UNAUTHORIZED, "Unauthorized", detail).into()
}

pub fn not_found(detail: impl Into<String>) -> ProblemResponse {
    Problem::new(StatusCode::NOT_FOUND, "Not Found", detail).into()
}

pub fn internal_error(detail: impl Into<String>) -> ProblemResponse {
    Problem::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal Server Error",
        detail,
    )
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_into_response_sets_status_and_content_type() {
        let p = Problem::new(StatusCode::BAD_REQUEST, "Bad Request", "invalid payload");
        let resp = ProblemResponse(p).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let ct = resp
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        assert_eq!(ct, APPLICATION_PROBLEM_JSON);
    }

    #[test]
    fn from_parts_derives_type_from_code() {
        let p = Problem::from_parts(
            StatusCode::NOT_FOUND,
            "JOURNAL_ENTRY_NOT_FOUND",
            "Journal entry not found",
            "Journal entry not found",
            "/api/v1/journal/entries/abc",
        );
        assert_eq!(p.status, 404);
        assert_eq!(p.code, "JOURNAL_ENTRY_NOT_FOUND");
        assert_eq!(
            p.type_url,
            "https://errors.mindjournal.dev/JOURNAL_ENTRY_NOT_FOUND"
        );
        assert_eq!(p.instance, "/api/v1/journal/entries/abc");
        // no subscriber installed, so no span id
        assert!(p.trace_id.is_none());
    }

    #[test]
    fn optional_members_are_omitted_from_json() {
        let p = Problem::new(StatusCode::UNAUTHORIZED, "Unauthorized", "missing identity");
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["type"], "about:blank");
        assert!(v.get("trace_id").is_none());
        assert!(v.get("errors").is_none());

        let with_errors = p.with_errors(vec![ValidationError {
            detail: "must be between 1 and 10".to_string(),
            pointer: "/mood_rating".to_string(),
        }]);
        let v = serde_json::to_value(&with_errors).unwrap();
        assert_eq!(v["errors"][0]["pointer"], "/mood_rating");
    }

    #[test]
    fn convenience_constructors() {
        assert_eq!(bad_request("Invalid input").0.status, 400);
        assert_eq!(unauthorized("no identity").0.title, "Unauthorized");
        assert_eq!(not_found("missing").0.status, 404);
        assert_eq!(internal_error("db down").0.status, 500);
    }
}
