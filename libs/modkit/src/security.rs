//! Request identity.
//!
//! Handlers take a [`SecurityCtx`] argument; the extractor asks the
//! [`IdentityResolver`] installed in request extensions (by the ingress host)
//! who the caller is.

use axum::extract::FromRequestParts;
use axum::http::{request::Parts, HeaderMap, HeaderName, StatusCode};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::problem::{Problem, ProblemResponse};

/// Header read by [`HeaderIdentityResolver`] unless configured otherwise.
pub const DEFAULT_IDENTITY_HEADER: &str = "x-user-id";

/// Authenticated caller of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityCtx {
    pub subject: Uuid,
}

impl SecurityCtx {
    pub fn new(subject: Uuid) -> Self {
        Self { subject }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing identity header '{0}'")]
    Missing(String),
    #[error("identity header '{0}' is not a valid UUID")]
    Malformed(String),
}

/// Resolves the caller of a request from its headers.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, headers: &HeaderMap) -> Result<SecurityCtx, AuthError>;
}

/// Trusts a UUID carried in a single request header.
#[derive(Debug, Clone)]
pub struct HeaderIdentityResolver {
    header: HeaderName,
}

impl HeaderIdentityResolver {
    pub fn new(header: HeaderName) -> Self {
        Self { header }
    }
}

impl Default for HeaderIdentityResolver {
    fn default() -> Self {
        Self::new(HeaderName::from_static(DEFAULT_IDENTITY_HEADER))
    }
}

impl IdentityResolver for HeaderIdentityResolver {
    fn resolve(&self, headers: &HeaderMap) -> Result<SecurityCtx, AuthError> {
        let name = self.header.as_str().to_string();
        let raw = headers
            .get(&self.header)
            .ok_or_else(|| AuthError::Missing(name.clone()))?;
        let text = raw.to_str().map_err(|_| AuthError::Malformed(name.clone()))?;
        let subject = Uuid::parse_str(text.trim()).map_err(|_| AuthError::Malformed(name))?;
        Ok(SecurityCtx::new(subject))
    }
}

impl<S> FromRequestParts<S> for SecurityCtx
where
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    #[allow(clippy::manual_async_fn)]
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl core::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let path = parts.uri.path().to_string();
            let Some(resolver) = parts.extensions.get::<Arc<dyn IdentityResolver>>().cloned()
            else {
                tracing::error!(path = %path, "no identity resolver installed");
                return Err(Problem::from_parts(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "AUTH_NOT_CONFIGURED",
                    "Internal Server Error",
                    "identity resolution is not configured",
                    &path,
                )
                .into());
            };

            resolver.resolve(&parts.headers).map_err(|e| {
                tracing::debug!(path = %path, error = %e, "request rejected: unauthenticated");
                Problem::from_parts(
                    StatusCode::UNAUTHORIZED,
                    "AUTH_UNAUTHENTICATED",
                    "Unauthorized",
                    e.to_string(),
                    &path,
                )
                .into()
            })
        }
    }
}
