//! Microsoft Graph response types and their local projections.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

/// Identifier of a SharePoint site, as returned by the site lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteId(String);

impl SiteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the default content drive backing a site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveId(String);

impl DriveId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DriveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Read-only projection of a remote drive item.
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    pub name: String,
    pub size: Option<u64>,
    pub url: Option<String>,
    pub download_url: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
    pub is_folder: bool,
    pub mime_type: Option<String>,
}

/// What Graph reports back after a simple upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadReceipt {
    pub name: String,
    pub url: Option<String>,
    pub size: Option<u64>,
}

/// Resource lookup response; only the `id` field matters.
///
/// Graph returns much more, but resolution deliberately extracts just the
/// identifier and treats its absence as a failed lookup.
#[derive(Debug, Deserialize)]
pub(crate) struct IdResponse {
    #[serde(default)]
    pub id: Option<String>,
}

/// Graph drive item resource.
///
/// See: https://learn.microsoft.com/en-us/graph/api/resources/driveitem
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DriveItem {
    pub name: String,

    #[serde(default)]
    pub size: Option<u64>,

    #[serde(default)]
    pub web_url: Option<String>,

    /// Pre-signed content URL, present on file items.
    #[serde(rename = "@microsoft.graph.downloadUrl", default)]
    pub download_url: Option<String>,

    /// Modification time (RFC 3339)
    #[serde(default)]
    pub last_modified_date_time: Option<String>,

    /// Folder facet; presence marks the item as a folder.
    #[serde(default)]
    pub folder: Option<FolderFacet>,

    /// File facet, carrying the MIME type when known.
    #[serde(default)]
    pub file: Option<FileFacet>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FolderFacet {
    #[serde(default)]
    #[allow(dead_code)]
    pub child_count: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FileFacet {
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// Graph children-listing response.
#[derive(Debug, Deserialize)]
pub(crate) struct ChildrenResponse {
    pub value: Vec<DriveItem>,
}

/// Graph simple-upload response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UploadResponse {
    pub name: String,

    #[serde(default)]
    pub web_url: Option<String>,

    #[serde(default)]
    pub size: Option<u64>,
}
