//! Per-user credential file loading.
//!
//! Credentials live in a plain `KEY=VALUE` file at `~/.spdrive/credentials`.
//! Values may be wrapped in single or double quotes; lines that do not look
//! like an assignment (comments, blanks, prose) are ignored. Legacy key
//! names written by older setup tooling are accepted as fallbacks.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{AuthError, Result};

/// Directory under the user's home holding spdrive state.
const CONFIG_DIR: &str = ".spdrive";

/// Credential file name inside [`CONFIG_DIR`].
const CREDENTIAL_FILE: &str = "credentials";

/// Immutable credential record for one invocation.
///
/// Loaded once at startup and threaded by value through the pipeline;
/// nothing mutates or persists it.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    /// Tenant short name, e.g. `contoso` for `contoso.sharepoint.com`.
    pub tenant: String,
    /// OAuth application (client) id.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
}

impl CredentialRecord {
    /// SharePoint hostname for this tenant.
    pub fn sharepoint_host(&self) -> String {
        format!("{}.sharepoint.com", self.tenant)
    }
}

// The secret must never end up in logs or error chains.
impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("tenant", &self.tenant)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

/// Loads [`CredentialRecord`]s from the per-user credential file.
pub struct CredentialStore;

impl CredentialStore {
    /// Default credential file location: `~/.spdrive/credentials`.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(AuthError::HomeDirUnavailable)?;
        Ok(home.join(CONFIG_DIR).join(CREDENTIAL_FILE))
    }

    /// Load credentials from the default per-user location.
    pub fn load() -> Result<CredentialRecord> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load credentials from an explicit path.
    pub fn load_from(path: &Path) -> Result<CredentialRecord> {
        if !path.exists() {
            return Err(AuthError::ConfigMissing {
                path: path.to_path_buf(),
            });
        }

        let contents = fs::read_to_string(path)?;
        let entries = parse_entries(&contents);

        let record = CredentialRecord {
            tenant: required(&entries, "TENANT", &["TENANT_ID"])?,
            client_id: required(&entries, "CLIENT_ID", &["APP_ID"])?,
            client_secret: required(&entries, "CLIENT_SECRET", &["APP_SECRET"])?,
        };

        debug!(
            path = %path.display(),
            tenant = %record.tenant,
            "Loaded credential record"
        );

        Ok(record)
    }
}

/// Parse `KEY=VALUE` lines into a map, silently skipping anything else.
fn parse_entries(contents: &str) -> HashMap<String, String> {
    let mut entries = HashMap::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };

        let key = key.trim();
        if key.is_empty() {
            continue;
        }

        entries.insert(key.to_string(), unquote(value.trim()).to_string());
    }

    entries
}

/// Strip one matching pair of surrounding quotes, if present.
fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Look up a key, falling back through legacy aliases.
fn required(
    entries: &HashMap<String, String>,
    key: &'static str,
    aliases: &[&str],
) -> Result<String> {
    std::iter::once(key)
        .chain(aliases.iter().copied())
        .find_map(|k| entries.get(k))
        .filter(|v| !v.is_empty())
        .cloned()
        .ok_or(AuthError::ConfigIncomplete { field: key })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_credentials(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_complete_record() {
        let file = write_credentials(
            "TENANT=contoso\nCLIENT_ID=app-123\nCLIENT_SECRET=s3cret\n",
        );

        let record = CredentialStore::load_from(file.path()).unwrap();
        assert_eq!(record.tenant, "contoso");
        assert_eq!(record.client_id, "app-123");
        assert_eq!(record.client_secret, "s3cret");
        assert_eq!(record.sharepoint_host(), "contoso.sharepoint.com");
    }

    #[test]
    fn test_quotes_are_trimmed() {
        let file = write_credentials(
            "TENANT=\"contoso\"\nCLIENT_ID='app-123'\nCLIENT_SECRET=\"s3=cret\"\n",
        );

        let record = CredentialStore::load_from(file.path()).unwrap();
        assert_eq!(record.tenant, "contoso");
        assert_eq!(record.client_id, "app-123");
        // Only surrounding quotes go; embedded '=' in the value survives.
        assert_eq!(record.client_secret, "s3=cret");
    }

    #[test]
    fn test_legacy_aliases_accepted() {
        let file = write_credentials(
            "TENANT_ID=contoso\nAPP_ID=app-123\nAPP_SECRET=s3cret\n",
        );

        let record = CredentialStore::load_from(file.path()).unwrap();
        assert_eq!(record.tenant, "contoso");
        assert_eq!(record.client_id, "app-123");
        assert_eq!(record.client_secret, "s3cret");
    }

    #[test]
    fn test_canonical_key_wins_over_alias() {
        let file = write_credentials(
            "TENANT=new\nTENANT_ID=old\nCLIENT_ID=a\nCLIENT_SECRET=b\n",
        );

        let record = CredentialStore::load_from(file.path()).unwrap();
        assert_eq!(record.tenant, "new");
    }

    #[test]
    fn test_non_matching_lines_ignored() {
        let file = write_credentials(
            "# spdrive credentials\n\nthis line is prose\nTENANT=contoso\nCLIENT_ID=app\nCLIENT_SECRET=s\n=nokey\n",
        );

        let record = CredentialStore::load_from(file.path()).unwrap();
        assert_eq!(record.tenant, "contoso");
    }

    #[test]
    fn test_missing_file_is_config_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist");

        let err = CredentialStore::load_from(&path).unwrap_err();
        assert!(matches!(err, AuthError::ConfigMissing { .. }));
    }

    #[test]
    fn test_missing_field_is_config_incomplete() {
        let file = write_credentials("TENANT=contoso\nCLIENT_ID=app\n");

        let err = CredentialStore::load_from(file.path()).unwrap_err();
        assert!(matches!(
            err,
            AuthError::ConfigIncomplete {
                field: "CLIENT_SECRET"
            }
        ));
    }

    #[test]
    fn test_empty_value_is_config_incomplete() {
        let file = write_credentials("TENANT=contoso\nCLIENT_ID=\nCLIENT_SECRET=s\n");

        let err = CredentialStore::load_from(file.path()).unwrap_err();
        assert!(matches!(
            err,
            AuthError::ConfigIncomplete { field: "CLIENT_ID" }
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let record = CredentialRecord {
            tenant: "contoso".to_string(),
            client_id: "app".to_string(),
            client_secret: "very-secret".to_string(),
        };

        let rendered = format!("{:?}", record);
        assert!(!rendered.contains("very-secret"));
        assert!(rendered.contains("***"));
    }
}
