//! # SharePoint Provider
//!
//! Microsoft Graph connector for SharePoint document libraries.
//!
//! Resolution is strictly ordered: a [`DriveId`] can only come from a
//! [`SiteId`], and a [`SiteId`] only from a connector constructed with a
//! bearer token. The file operations (list, download, upload) each consume
//! a resolved drive id and issue one terminal Graph call.

pub mod connector;
pub mod error;
pub mod types;

pub use connector::GraphConnector;
pub use error::{GraphError, Result};
pub use types::{DriveId, FileEntry, SiteId, UploadReceipt};
