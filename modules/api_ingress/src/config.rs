use serde::{Deserialize, Serialize};

/// `modules.api_ingress` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiIngressConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Serve the OpenAPI document at `/openapi.json`.
    #[serde(default = "default_true")]
    pub enable_docs: bool,
    /// Permissive CORS (any origin, method and header).
    #[serde(default = "default_true")]
    pub cors_enabled: bool,
    /// Request header carrying the caller's UUID.
    #[serde(default = "default_identity_header")]
    pub identity_header: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

impl Default for ApiIngressConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            enable_docs: true,
            cors_enabled: true,
            identity_header: default_identity_header(),
            request_timeout_secs: default_request_timeout_secs(),
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

fn default_bind_addr() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_true() -> bool {
    true
}

fn default_identity_header() -> String {
    modkit::security::DEFAULT_IDENTITY_HEADER.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_body_limit_bytes() -> usize {
    1024 * 1024
}
