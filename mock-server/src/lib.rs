//! A stand-in serverless host that serves a few functions under
//! `/.netlify/functions/`.
//!
//! - `echo` (and anything below it) reflects the request back as JSON.
//! - `hello` answers with plain text, optionally addressed to `?name=`.
//! - `fail` always answers 500 with a plain-text body.

use std::collections::BTreeMap;

use axum::{
    extract::Query,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// What `echo` saw of the request.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/.netlify/functions/echo", any(echo))
        .route("/.netlify/functions/echo/{*rest}", any(echo))
        .route("/.netlify/functions/hello", get(hello))
        .route("/.netlify/functions/fail", any(fail))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: String) -> Json<Echo> {
    log::debug!("echo {method} {uri}");
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    Json(Echo {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        content_type,
        body,
    })
}

async fn hello(Query(query): Query<BTreeMap<String, String>>) -> String {
    let name = query.get("name").map(String::as_str).unwrap_or("world");
    format!("hello, {name}")
}

async fn fail() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "function crashed")
}
