//! Credential loading and OAuth 2.0 client-credentials token acquisition.
//!
//! The pipeline entry point: read the per-user credential file, then exchange
//! tenant + client id + client secret for a short-lived bearer token. Every
//! invocation re-authenticates; there is no token cache or refresh path.

pub mod credentials;
pub mod error;
pub mod token;

pub use credentials::{CredentialRecord, CredentialStore};
pub use error::{AuthError, Result};
pub use token::{AccessToken, TokenProvider};
