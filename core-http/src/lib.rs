//! HTTP Client Abstraction
//!
//! Provides the async HTTP seam used by the token and Graph layers.
//! Production code talks to [`ReqwestHttpClient`]; tests substitute a mock
//! of the [`HttpClient`] trait so no request ever leaves the process.

pub mod client;
pub mod error;
pub mod reqwest_client;

pub use client::{HttpClient, HttpMethod, HttpRequest, HttpResponse, StreamResponse};
pub use error::{HttpError, Result};
pub use reqwest_client::ReqwestHttpClient;
