//! Failure taxonomy for one generation attempt.
//!
//! Every variant renders a single user-facing message; the controller stores
//! `to_string()` in the failure outcome and nothing else crosses that
//! boundary. The variants exist for message selection and logging.

use thiserror::Error;

pub const TRANSPORT_FALLBACK: &str = "Failed to generate assessment";
pub const UNKNOWN_FALLBACK: &str = "Unknown error occurred";

#[derive(Debug, Error)]
pub enum GenerateError {
    /// Missing required input, detected before any I/O.
    #[error("{0}")]
    Validation(String),

    /// Non-2xx response. `detail` is the server-supplied message, or the
    /// stock fallback when the error body had none.
    #[error("{detail}")]
    Transport { status: u16, detail: String },

    /// 2xx body that failed to parse or lacked a required field.
    #[error("Invalid response format from server")]
    InvalidFormat,

    /// Anything else: connect failure, I/O error mid-body, ...
    #[error("{0}")]
    Unknown(String),
}

impl GenerateError {
    pub fn transport(status: u16, detail: Option<String>) -> Self {
        Self::Transport {
            status,
            detail: detail.unwrap_or_else(|| TRANSPORT_FALLBACK.to_string()),
        }
    }

    /// Status code for transport failures, as a log field.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Wrap an arbitrary error, substituting the stock message when the
    /// source renders empty.
    pub fn unknown(err: impl std::fmt::Display) -> Self {
        let msg = err.to_string();
        if msg.is_empty() {
            Self::Unknown(UNKNOWN_FALLBACK.to_string())
        } else {
            Self::Unknown(msg)
        }
    }
}
