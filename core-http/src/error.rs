use thiserror::Error;

#[derive(Error, Debug)]
pub enum HttpError {
    /// Connection, TLS, or timeout failure before a response was received.
    #[error("network error: {0}")]
    Network(String),

    /// The request could not be constructed or serialized.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The response body could not be read from the transport.
    #[error("failed to read response body: {0}")]
    BodyRead(String),
}

pub type Result<T> = std::result::Result<T, HttpError>;
