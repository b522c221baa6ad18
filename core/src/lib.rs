//! Client helper for invoking serverless functions over HTTP.
//!
//! # Overview
//! Every call targets `/.netlify/functions/<name>`. The function name may
//! carry `:name` placeholders that are filled from the call's parameters;
//! leftover parameters become the query string. Payloads are JSON-encoded
//! unless the caller picks another content type, and responses are
//! normalized into an [`Envelope`] or a [`LambdogError`].
//!
//! # Design
//! - The network call goes through a pluggable [`Transport`]. A [`Lambdog`]
//!   holds the default one and each call may override it. The bundled
//!   `UreqTransport` wraps the blocking `ureq` client and runs every request
//!   on a dedicated thread, so its futures are safe to await on any executor.
//! - Payloads are JSON values or raw bytes ([`Data`]); transport-specific
//!   options travel untouched in `RequestOptions::extra`.
//! - Request building ([`build_request`]) and response parsing
//!   ([`parse_response`]) are pure functions, so the I/O boundary is
//!   explicit and both halves are testable without a network.
//! - Nothing is shared between calls; every invocation builds its own
//!   headers, URL and body.

pub mod client;
pub mod error;
pub mod http;
pub mod options;
pub mod response;
pub mod transport;
pub mod url;

pub use client::{build_request, parse_response, Lambdog, FUNCTIONS_PREFIX};
pub use error::LambdogError;
pub use http::{Body, FetchOptions, Headers, HttpMethod, HttpRequest, HttpResponse};
pub use options::{Data, Params, RequestOptions};
pub use response::Envelope;
pub use transport::{Transport, TransportError};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use url::build_url;
