//! spdrive CLI - SharePoint document library operations from the command line.
//!
//! Each invocation runs one strictly sequential pipeline: load credentials,
//! acquire a bearer token, resolve site and drive, then perform exactly one
//! terminal operation. Any failure aborts the chain and exits non-zero.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use core_auth::{CredentialStore, TokenProvider};
use core_http::ReqwestHttpClient;
use provider_sharepoint::{FileEntry, GraphConnector};

#[derive(Parser)]
#[command(name = "spdrive")]
#[command(about = "SharePoint document library operations")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List files in a site's document library.
    List {
        /// Site name.
        site: String,

        /// Folder path inside the drive (default: root).
        folder: Option<String>,
    },

    /// Download a file from a site's document library.
    Download {
        /// Site name.
        site: String,

        /// Drive-relative path of the file.
        path: String,

        /// Local output path (default: the remote file name).
        output: Option<PathBuf>,
    },

    /// Upload a local file to a site's document library.
    Upload {
        /// Site name.
        site: String,

        /// Local file to upload.
        local: PathBuf,

        /// Drive-relative destination path.
        remote: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Status and logs go to stderr; stdout carries only results.
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let creds = CredentialStore::load().context("could not load credentials")?;

    let http_client = Arc::new(ReqwestHttpClient::new());
    let token = TokenProvider::new(http_client.clone())
        .acquire(&creds)
        .await
        .context("authentication failed")?;

    let connector = GraphConnector::new(http_client, token, creds.sharepoint_host());

    match cli.command {
        Commands::List { site, folder } => {
            let drive = connector.open_drive(&site).await?;
            let entries = connector.list_children(&drive, folder.as_deref()).await?;
            print_listing(&entries);
        }
        Commands::Download { site, path, output } => {
            let drive = connector.open_drive(&site).await?;
            let output = output.unwrap_or_else(|| default_output(&path));
            let written = connector.download(&drive, &path, &output).await?;
            eprintln!("Downloaded {} ({} bytes)", path, written);
            println!("{}", output.display());
        }
        Commands::Upload {
            site,
            local,
            remote,
        } => {
            let drive = connector.open_drive(&site).await?;
            let receipt = connector.upload(&drive, &remote, &local).await?;
            eprintln!(
                "Uploaded {} ({} bytes)",
                receipt.name,
                receipt.size.unwrap_or_default()
            );
            if let Some(url) = receipt.url {
                println!("{}", url);
            }
        }
    }

    Ok(())
}

/// Print one entry per line: kind, size, modification time, name.
fn print_listing(entries: &[FileEntry]) {
    for entry in entries {
        let kind = if entry.is_folder { "dir " } else { "file" };
        let size = entry
            .size
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        let modified = entry
            .last_modified
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{}  {:>12}  {:16}  {}", kind, size, modified, entry.name);
    }
}

/// Default download destination: the remote file's own name, in the cwd.
fn default_output(remote_path: &str) -> PathBuf {
    let name = remote_path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|n| !n.is_empty())
        .unwrap_or(remote_path);
    PathBuf::from(name)
}
