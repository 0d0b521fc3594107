use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The pre-flight token check failed or the server answered 401.
    /// The token store has already been cleared by the time this is
    /// returned; the app reacts by routing to the login screen. Never
    /// retried.
    #[error("Authentication failed")]
    Unauthorized,

    /// Any other non-success HTTP status. The message comes from the
    /// error body's `message` field when one parses, otherwise a
    /// templated fallback.
    #[error("{message}")]
    Request { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Map a non-success status and its raw body to an error.
    /// Body-parse failures are swallowed into the templated message.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        if status.as_u16() == 401 {
            return ApiError::Unauthorized;
        }

        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message")?.as_str().map(str::to_string))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));

        ApiError::Request {
            status: status.as_u16(),
            message,
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn message_field_is_extracted() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, r#"{"message":"boom"}"#);
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn unparsable_body_falls_back_to_template() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(err.to_string(), "Request failed with status 500");
    }

    #[test]
    fn empty_message_falls_back_to_template() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"message":""}"#);
        assert_eq!(err.to_string(), "Request failed with status 400");
    }

    #[test]
    fn unauthorized_status_maps_to_auth_error() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, "");
        assert!(err.is_auth());
    }
}
