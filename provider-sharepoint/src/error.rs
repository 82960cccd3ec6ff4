//! Error types for the SharePoint provider

use thiserror::Error;

/// SharePoint provider errors
///
/// Every failure is fatal to the current invocation and carries the status
/// code and raw response body where one exists, so remote problems can be
/// diagnosed from the terminal output alone.
#[derive(Error, Debug)]
pub enum GraphError {
    /// Network-level failure before a response was received.
    #[error("network error: {0}")]
    Transport(String),

    /// A site or drive lookup did not yield a usable identifier.
    #[error("could not resolve {resource} (status {status}): {body}")]
    ResourceNotFound {
        resource: String,
        status: u16,
        body: String,
    },

    /// A Graph call returned an error status.
    #[error("Graph API error (status {status}): {body}")]
    ApiError { status: u16, body: String },

    /// The content download failed.
    #[error("download failed (status {status}): {body}")]
    DownloadFailed { status: u16, body: String },

    /// The content upload failed.
    #[error("upload failed (status {status}): {body}")]
    UploadFailed { status: u16, body: String },

    /// Files at or above the simple-upload limit need a resumable upload
    /// session, which this tool does not implement.
    #[error("file is {size} bytes; uploads of 4 MiB or more are not supported")]
    LargeUploadUnsupported { size: u64 },

    /// A response body could not be deserialized.
    #[error("failed to parse API response: {0}")]
    Parse(String),

    /// Local filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for SharePoint operations
pub type Result<T> = std::result::Result<T, GraphError>;
