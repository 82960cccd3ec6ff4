use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// The credential file does not exist at the expected location.
    #[error("credential file not found at {}", path.display())]
    ConfigMissing { path: PathBuf },

    /// The credential file exists but a required field is absent.
    #[error("credential file is missing required field {field}")]
    ConfigIncomplete { field: &'static str },

    /// The per-user home directory could not be determined.
    #[error("could not determine home directory")]
    HomeDirUnavailable,

    /// The credential file could not be read.
    #[error("failed to read credential file: {0}")]
    Io(#[from] std::io::Error),

    /// Network-level failure talking to the identity endpoint.
    #[error("token request transport failure: {0}")]
    Transport(String),

    /// The identity endpoint refused the credentials.
    #[error("token request rejected (status {status}): {body}")]
    Rejected { status: u16, body: String },

    /// The identity endpoint answered 200 but the body was not usable.
    #[error("failed to parse token response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
