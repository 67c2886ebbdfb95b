use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Failure of a single `book_appointment` invocation.
///
/// `Display` is the internal reason and is meant for logs. What the end user
/// hears comes from [`ToolError::narration`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToolError {
    #[error("validation error: {0}")]
    Validation(ValidationReason),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("network error after {attempts} attempt(s): {message}")]
    Network { attempts: u32, message: String },

    #[error("remote rejection: HTTP {status}: {body}")]
    RemoteRejection { status: u16, body: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationReason {
    #[error("empty name")]
    EmptyName,

    #[error("invalid phone format")]
    InvalidPhone,

    #[error("unparseable date")]
    UnparseableDate,
}

impl ToolError {
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::Validation(_) => "validation_error",
            ToolError::Configuration(_) => "configuration_error",
            ToolError::Network { .. } => "network_error",
            ToolError::RemoteRejection { .. } => "remote_rejection_error",
        }
    }

    /// Message safe to read back to the caller. With `verbose` set, transport
    /// errors and remote responses are included verbatim.
    pub fn narration(&self, verbose: bool) -> String {
        match self {
            ToolError::Validation(reason) => match reason {
                ValidationReason::EmptyName => "First or last name cannot be empty.".to_string(),
                ValidationReason::InvalidPhone => {
                    "Invalid phone number format. Please provide a valid number.".to_string()
                }
                ValidationReason::UnparseableDate => {
                    "I couldn't understand that date. Please provide it like 2025-12-01T10:00:00."
                        .to_string()
                }
            },
            ToolError::Configuration(_) => {
                "The booking service is not available right now.".to_string()
            }
            ToolError::Network { message, .. } if verbose => {
                format!("Network issue - please try again later. ({message})")
            }
            ToolError::Network { .. } => "Network issue - please try again later.".to_string(),
            ToolError::RemoteRejection { status, body } if verbose => {
                format!("HTTP {status}: {body}")
            }
            ToolError::RemoteRejection { .. } => {
                "The booking could not be completed. Please try again later.".to_string()
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized")]
    Unauthorized,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
