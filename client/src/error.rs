use thiserror::Error;

/// Everything that can go wrong talking to the lobby service or local storage.
///
/// None of these escape [`crate::LobbyClient`]; they end up as log lines.
#[derive(Debug, Error)]
pub enum LobbyError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("lobby service rejected {action} ({status}): {message}")]
    Rejected {
        action: &'static str,
        status: u16,
        message: String,
    },

    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("join succeeded but no session id came back")]
    MissingSessionId,

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("could not determine a data directory")]
    NoDataDirectory,
}

pub type Result<T, E = LobbyError> = std::result::Result<T, E>;
