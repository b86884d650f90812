use std::fmt::Display;

/// Errors seen by the client side when talking to the todo api
#[derive(Debug, Clone, PartialEq)]
pub enum TodoError {
    /// The server answered with a non success status
    ApiError { status: u16, message: String },
    HttpError(String),
    DecodeError(String),
}

impl Display for TodoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiError { status, message } => {
                write!(f, "{} ({})", message, status)
            }
            Self::HttpError(e) => {
                write!(f, "{}", e)
            }
            Self::DecodeError(e) => {
                write!(f, "Unexpected response: {}", e)
            }
        }
    }
}

impl From<reqwest::Error> for TodoError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            TodoError::DecodeError(e.to_string())
        } else {
            TodoError::HttpError(e.to_string())
        }
    }
}

impl From<serde_json::Error> for TodoError {
    fn from(e: serde_json::Error) -> Self {
        TodoError::DecodeError(e.to_string())
    }
}

impl std::error::Error for TodoError {}
