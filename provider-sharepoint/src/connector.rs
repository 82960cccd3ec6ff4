//! Microsoft Graph connector for SharePoint document libraries.

use core_auth::AccessToken;
use core_http::{HttpClient, HttpMethod, HttpRequest, StreamResponse};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info, instrument, warn};

use crate::error::{GraphError, Result};
use crate::types::{
    ChildrenResponse, DriveId, DriveItem, FileEntry, IdResponse, SiteId, UploadReceipt,
    UploadResponse,
};

/// Microsoft Graph API base URL
const GRAPH_API_BASE: &str = "https://graph.microsoft.com/v1.0";

/// Simple uploads are capped at 4 MiB; larger files need an upload session.
const SIMPLE_UPLOAD_LIMIT: u64 = 4 * 1024 * 1024;

/// Graph API connector for one authenticated invocation.
///
/// Holds the bearer token for its whole lifetime, so every request it issues
/// is authenticated by construction. Resolution runs strictly site → drive;
/// the typed identifiers make the ordering impossible to skip.
///
/// # Example
///
/// ```ignore
/// let connector = GraphConnector::new(http_client, token, "contoso.sharepoint.com");
/// let drive = connector.open_drive("engineering").await?;
/// let entries = connector.list_children(&drive, None).await?;
/// ```
pub struct GraphConnector {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    /// Bearer token acquired for this invocation
    access_token: AccessToken,

    /// SharePoint hostname, e.g. `contoso.sharepoint.com`
    host: String,
}

impl GraphConnector {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        access_token: AccessToken,
        host: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            access_token,
            host: host.into(),
        }
    }

    /// Encode a drive-relative path for Graph path addressing.
    ///
    /// Each segment is URL-component-encoded; the `/` separators survive.
    fn encode_path(path: &str) -> String {
        path.trim_matches('/')
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Parse RFC 3339 timestamp from Graph
    fn parse_timestamp(rfc3339: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(rfc3339)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Convert a Graph drive item to a FileEntry
    fn convert_item(item: DriveItem) -> FileEntry {
        FileEntry {
            name: item.name,
            size: item.size,
            url: item.web_url,
            download_url: item.download_url,
            last_modified: item
                .last_modified_date_time
                .as_deref()
                .and_then(Self::parse_timestamp),
            is_folder: item.folder.is_some(),
            mime_type: item.file.and_then(|f| f.mime_type),
        }
    }

    /// GET a resource and extract its `id` field.
    ///
    /// Any failure surfaces the raw response body; a lookup that cannot be
    /// diagnosed from the terminal is worse than one that fails loudly.
    async fn fetch_id(&self, url: String, resource: &str) -> Result<String> {
        let request = HttpRequest::new(HttpMethod::Get, url)
            .bearer_token(self.access_token.secret())
            .header("Accept", "application/json");

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| GraphError::Transport(e.to_string()))?;

        if !response.is_success() {
            warn!(status = response.status, resource = resource, "Lookup failed");
            return Err(GraphError::ResourceNotFound {
                resource: resource.to_string(),
                status: response.status,
                body: response.text(),
            });
        }

        let parsed: IdResponse = response
            .json()
            .map_err(|e| GraphError::Parse(e.to_string()))?;

        parsed.id.ok_or_else(|| GraphError::ResourceNotFound {
            resource: resource.to_string(),
            status: response.status,
            body: response.text(),
        })
    }

    /// Resolve a site name to its site identifier.
    #[instrument(skip(self), fields(site = %site_name))]
    pub async fn resolve_site(&self, site_name: &str) -> Result<SiteId> {
        let url = format!(
            "{}/sites/{}:/sites/{}",
            GRAPH_API_BASE,
            self.host,
            urlencoding::encode(site_name)
        );

        let id = self.fetch_id(url, &format!("site '{}'", site_name)).await?;
        debug!(site_id = %id, "Resolved site");
        Ok(SiteId::new(id))
    }

    /// Resolve a site to its default content drive.
    #[instrument(skip(self), fields(site_id = %site.as_str()))]
    pub async fn resolve_drive(&self, site: &SiteId) -> Result<DriveId> {
        let url = format!("{}/sites/{}/drive", GRAPH_API_BASE, site.as_str());

        let id = self.fetch_id(url, "default drive").await?;
        debug!(drive_id = %id, "Resolved drive");
        Ok(DriveId::new(id))
    }

    /// Resolve a site name straight through to its default drive.
    ///
    /// The two lookups are dependent: the second cannot start before the
    /// first completes, so this is plain sequential composition.
    pub async fn open_drive(&self, site_name: &str) -> Result<DriveId> {
        let site = self.resolve_site(site_name).await?;
        self.resolve_drive(&site).await
    }

    /// List the children of a drive folder (the root when `folder` is None).
    ///
    /// Entries come back in remote API order; nothing is re-sorted locally.
    #[instrument(skip(self), fields(drive_id = %drive.as_str(), folder = ?folder))]
    pub async fn list_children(
        &self,
        drive: &DriveId,
        folder: Option<&str>,
    ) -> Result<Vec<FileEntry>> {
        let url = match folder.map(Self::encode_path).filter(|p| !p.is_empty()) {
            Some(encoded) => format!(
                "{}/drives/{}/root:/{}:/children",
                GRAPH_API_BASE,
                drive.as_str(),
                encoded
            ),
            None => format!("{}/drives/{}/root/children", GRAPH_API_BASE, drive.as_str()),
        };

        let request = HttpRequest::new(HttpMethod::Get, url)
            .bearer_token(self.access_token.secret())
            .header("Accept", "application/json");

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| GraphError::Transport(e.to_string()))?;

        if !response.is_success() {
            return Err(GraphError::ApiError {
                status: response.status,
                body: response.text(),
            });
        }

        let listing: ChildrenResponse = response
            .json()
            .map_err(|e| GraphError::Parse(e.to_string()))?;

        let entries: Vec<FileEntry> = listing.value.into_iter().map(Self::convert_item).collect();

        info!(count = entries.len(), "Listed drive children");
        Ok(entries)
    }

    /// Download a file's content to a local path.
    ///
    /// Graph either streams the bytes directly or answers with a redirect to
    /// a pre-signed URL; the redirect target expects no Authorization header.
    /// A partially written output file is removed on every failure branch.
    #[instrument(skip(self), fields(drive_id = %drive.as_str(), path = %remote_path))]
    pub async fn download(
        &self,
        drive: &DriveId,
        remote_path: &str,
        output: &Path,
    ) -> Result<u64> {
        let url = format!(
            "{}/drives/{}/root:/{}:/content",
            GRAPH_API_BASE,
            drive.as_str(),
            Self::encode_path(remote_path)
        );

        let request =
            HttpRequest::new(HttpMethod::Get, url).bearer_token(self.access_token.secret());

        let mut response = self
            .http_client
            .fetch_stream(request)
            .await
            .map_err(|e| GraphError::Transport(e.to_string()))?;

        if response.status == 301 || response.status == 302 {
            let location = response
                .header("Location")
                .ok_or_else(|| GraphError::DownloadFailed {
                    status: response.status,
                    body: "redirect without Location header".to_string(),
                })?
                .to_string();

            debug!("Following content redirect");

            // Pre-signed URL; deliberately unauthenticated.
            response = self
                .http_client
                .fetch_stream(HttpRequest::new(HttpMethod::Get, location))
                .await
                .map_err(|e| GraphError::Transport(e.to_string()))?;
        }

        if response.status != 200 {
            let status = response.status;
            let body = Self::drain_to_string(response).await;
            return Err(GraphError::DownloadFailed { status, body });
        }

        Self::write_stream(response, output).await
    }

    /// Stream a response body to `output`, unlinking the file on failure.
    async fn write_stream(mut response: StreamResponse, output: &Path) -> Result<u64> {
        let mut file = tokio::fs::File::create(output).await?;

        let written = match tokio::io::copy(&mut response.body, &mut file).await {
            Ok(n) => n,
            Err(e) => {
                drop(file);
                let _ = tokio::fs::remove_file(output).await;
                return Err(GraphError::Io(e));
            }
        };

        if let Err(e) = file.flush().await {
            drop(file);
            let _ = tokio::fs::remove_file(output).await;
            return Err(GraphError::Io(e));
        }

        info!(bytes = written, "Downloaded file");
        Ok(written)
    }

    /// Read the remainder of a stream for error reporting.
    async fn drain_to_string(mut response: StreamResponse) -> String {
        let mut body = Vec::new();
        let _ = response.body.read_to_end(&mut body).await;
        String::from_utf8_lossy(&body).into_owned()
    }

    /// Upload a local file to a drive path with a single PUT.
    ///
    /// Files at or above 4 MiB would need a resumable upload session, which
    /// is out of scope; those fail fast before any network traffic.
    #[instrument(skip(self), fields(drive_id = %drive.as_str(), path = %remote_path))]
    pub async fn upload(
        &self,
        drive: &DriveId,
        remote_path: &str,
        local_file: &Path,
    ) -> Result<UploadReceipt> {
        let metadata = tokio::fs::metadata(local_file).await?;
        let size = metadata.len();

        if size >= SIMPLE_UPLOAD_LIMIT {
            return Err(GraphError::LargeUploadUnsupported { size });
        }

        let contents = tokio::fs::read(local_file).await?;

        let url = format!(
            "{}/drives/{}/root:/{}:/content",
            GRAPH_API_BASE,
            drive.as_str(),
            Self::encode_path(remote_path)
        );

        let request = HttpRequest::new(HttpMethod::Put, url)
            .bearer_token(self.access_token.secret())
            .header("Content-Type", "application/octet-stream")
            .body(Bytes::from(contents));

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| GraphError::Transport(e.to_string()))?;

        if !response.is_success() {
            return Err(GraphError::UploadFailed {
                status: response.status,
                body: response.text(),
            });
        }

        let uploaded: UploadResponse = response
            .json()
            .map_err(|e| GraphError::Parse(e.to_string()))?;

        info!(name = %uploaded.name, bytes = size, "Uploaded file");

        Ok(UploadReceipt {
            name: uploaded.name,
            url: uploaded.web_url,
            size: uploaded.size,
        })
    }
}
