use thiserror::Error;

/// Failure taxonomy for the perspective and sentiment services.
///
/// `Display` is the user-facing message shown in the chat UI; the raw
/// detail carried by a variant is for logs only.
#[derive(Debug, Clone, Error)]
pub enum PerspectiveError {
    #[error("API key invalid or missing. Please check your API key.")]
    Auth,

    #[error("Rate limit exceeded. Please try again in a moment.")]
    RateLimited,

    #[error("The AI service is temporarily unavailable. Please try again.")]
    Upstream(String),

    #[error("Unknown persona: {0}")]
    UnknownPersona(String),

    #[error("The AI returned a response that could not be read.")]
    MalformedResponse(String),

    #[error("Something went wrong. Please try again.")]
    Unknown(String),
}

impl PerspectiveError {
    /// Map an HTTP status from the completion API onto the taxonomy.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 => PerspectiveError::Auth,
            429 => PerspectiveError::RateLimited,
            500..=599 => PerspectiveError::Upstream(body),
            _ => PerspectiveError::Unknown(format!("HTTP {}: {}", status, body)),
        }
    }

    /// Machine-readable kind, stable across wording changes.
    pub fn kind(&self) -> &'static str {
        match self {
            PerspectiveError::Auth => "auth_error",
            PerspectiveError::RateLimited => "rate_limit",
            PerspectiveError::Upstream(_) => "service_error",
            PerspectiveError::UnknownPersona(_) => "invalid_persona",
            PerspectiveError::MalformedResponse(_) => "malformed_response",
            PerspectiveError::Unknown(_) => "unknown_error",
        }
    }
}
