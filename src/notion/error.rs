use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotionError {
    /// The API answered with a non-success status.
    #[error("Notion API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
        body: Value,
    },
    #[error("request to Notion failed: {0}")]
    Transport(String),
    #[error("unexpected response from Notion: {0}")]
    InvalidResponse(String),
    #[error("cannot append {count} blocks in one request (limit {limit})")]
    TooManyChildren { count: usize, limit: usize },
}

impl NotionError {
    /// Build an API error from the status and raw response body.
    ///
    /// The API returns `{"object":"error","status":..,"code":..,"message":..}`;
    /// anything else is kept verbatim in `body` with a generic code.
    pub fn from_response(status: u16, raw_body: &str) -> Self {
        let body: Value =
            serde_json::from_str(raw_body).unwrap_or_else(|_| Value::String(raw_body.to_string()));

        let code = body
            .get("code")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status));

        Self::Api {
            status,
            code,
            message,
            body,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Api { .. } => "APIResponseError",
            Self::Transport(_) => "RequestError",
            Self::InvalidResponse(_) => "InvalidResponseError",
            Self::TooManyChildren { .. } => "ValidationError",
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Api { body, .. } => Some(body),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_decodes_api_error() {
        let err = NotionError::from_response(
            400,
            r#"{"object":"error","status":400,"code":"validation_error","message":"Slug is not a property that exists."}"#,
        );

        assert_eq!(err.name(), "APIResponseError");
        assert_eq!(err.code(), Some("validation_error"));
        assert_eq!(err.status(), Some(400));
        assert_eq!(
            err.to_string(),
            "Notion API error 400 (validation_error): Slug is not a property that exists."
        );
    }

    #[test]
    fn test_from_response_keeps_non_json_body() {
        let err = NotionError::from_response(502, "Bad Gateway");

        assert_eq!(err.code(), Some("unknown"));
        assert_eq!(err.body(), Some(&Value::String("Bad Gateway".to_string())));
        assert!(err.to_string().contains("HTTP 502"));
    }

    #[test]
    fn test_transport_error_has_no_status() {
        let err = NotionError::Transport("dns failure".to_string());
        assert_eq!(err.status(), None);
        assert_eq!(err.body(), None);
        assert_eq!(err.name(), "RequestError");
    }
}
