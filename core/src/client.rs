//! Function invocation: request building, dispatch and response parsing.
//!
//! # Design
//! `Lambdog` holds only an optional default transport and carries no state
//! between calls. A call is split into `build_request`, which resolves the
//! URL and transport options, and `parse_response`, which turns the
//! transport's answer into an `Envelope` or an error. `Lambdog::invoke`
//! runs exactly one transport round-trip between the two.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::error::LambdogError;
use crate::http::{Body, FetchOptions, HttpMethod, HttpRequest, HttpResponse};
use crate::options::{Data, RequestOptions};
use crate::response::Envelope;
use crate::transport::Transport;
use crate::url::build_url;

/// Path every function is served under.
pub const FUNCTIONS_PREFIX: &str = "/.netlify/functions/";

const CONTENT_TYPE: &str = "content-type";
const APPLICATION_JSON: &str = "application/json";

/// Resolve the request for function `name` without touching the network.
///
/// A payload defaults the content type to `application/json` and is then
/// JSON-encoded; with any other content type a string payload is sent as is.
/// Byte payloads are never encoded. Falsy payloads (`null`, `false`, zero,
/// `""`) count as no payload. A body implies `POST` unless `options.method`
/// says otherwise. Headers, body and method are only set when there is
/// something to send; `options.extra` is copied through unchanged.
pub fn build_request(name: &str, options: &RequestOptions) -> Result<HttpRequest, LambdogError> {
    let url = build_url(&format!("{FUNCTIONS_PREFIX}{name}"), &options.params)?;

    let data = options.data.as_ref().filter(|data| data.is_truthy());
    let mut headers = options.headers.clone();
    if data.is_some() && !headers.contains(CONTENT_TYPE) {
        headers.set(CONTENT_TYPE, APPLICATION_JSON);
    }

    let encode_json = headers.get(CONTENT_TYPE) == Some(APPLICATION_JSON);
    let body = match data {
        Some(Data::Json(value)) if encode_json => Some(Body::Text(serde_json::to_string(value)?)),
        Some(Data::Json(Value::String(text))) => Some(Body::Text(text.clone())),
        Some(Data::Json(value)) => Some(Body::Text(value.to_string())),
        Some(Data::Bytes(bytes)) => Some(Body::Bytes(bytes.clone())),
        None => None,
    };

    let mut fetch_options = FetchOptions::default();
    if !headers.is_empty() {
        fetch_options.headers = Some(headers);
    }
    if body.is_some() {
        fetch_options.method = Some(HttpMethod::Post);
        fetch_options.body = body;
    }
    if let Some(method) = &options.method {
        fetch_options.method = Some(method.clone());
    }
    fetch_options.extra = options.extra.clone();

    Ok(HttpRequest {
        url,
        options: fetch_options,
    })
}

/// Normalize a transport response.
///
/// Non-success statuses become `LambdogError::Status` carrying the body text.
/// Otherwise the body is parsed as JSON when the content type is exactly
/// `application/json` and kept as text when it is not.
pub fn parse_response(response: HttpResponse) -> Result<Envelope, LambdogError> {
    if !response.ok() {
        log::warn!("function responded with {} {}", response.status, response.status_text);
        return Err(LambdogError::Status {
            status: response.status,
            status_text: response.status_text,
            message: response.body,
        });
    }

    let data = if response.headers.get(CONTENT_TYPE) == Some(APPLICATION_JSON) {
        serde_json::from_str(&response.body)?
    } else {
        Value::String(response.body.clone())
    };
    let headers = response
        .headers
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value))
        .collect();

    Ok(Envelope {
        status: response.status,
        status_text: response.status_text.clone(),
        headers,
        data,
        response,
    })
}

/// Serverless function client.
///
/// Holds the default transport; every call may override it through
/// `RequestOptions::fetch`.
#[derive(Clone, Default)]
pub struct Lambdog {
    transport: Option<Arc<dyn Transport>>,
}

impl Lambdog {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Some(Arc::new(transport)),
        }
    }

    /// Invoke function `name` and return the full envelope.
    pub async fn invoke(&self, name: &str, options: RequestOptions) -> Result<Envelope, LambdogError> {
        let transport = options
            .fetch
            .clone()
            .or_else(|| self.transport.clone())
            .ok_or(LambdogError::NoTransport)?;
        let HttpRequest { url, options: fetch_options } = build_request(name, &options)?;

        let method = fetch_options.method.as_ref().map_or("GET", HttpMethod::as_str);
        log::debug!("invoking {method} {url}");
        let response = transport.fetch(url, fetch_options).await?;
        log::debug!("function {name} responded with {}", response.status);

        parse_response(response)
    }

    /// Like [`Lambdog::invoke`], with the function path taken from
    /// `options.function_name`.
    pub async fn request(&self, mut options: RequestOptions) -> Result<Envelope, LambdogError> {
        let name = options
            .function_name
            .take()
            .ok_or(LambdogError::MissingFunctionName)?;
        self.invoke(&name, options).await
    }

    pub async fn get(&self, name: &str, options: RequestOptions) -> Result<Value, LambdogError> {
        self.call(name, HttpMethod::Get, None, options).await
    }

    pub async fn delete(&self, name: &str, options: RequestOptions) -> Result<Value, LambdogError> {
        self.call(name, HttpMethod::Delete, None, options).await
    }

    pub async fn head(&self, name: &str, options: RequestOptions) -> Result<Value, LambdogError> {
        self.call(name, HttpMethod::Head, None, options).await
    }

    pub async fn post<D>(&self, name: &str, data: &D, options: RequestOptions) -> Result<Value, LambdogError>
    where
        D: Serialize + ?Sized,
    {
        let data = Data::Json(serde_json::to_value(data)?);
        self.call(name, HttpMethod::Post, Some(data), options).await
    }

    pub async fn put<D>(&self, name: &str, data: &D, options: RequestOptions) -> Result<Value, LambdogError>
    where
        D: Serialize + ?Sized,
    {
        let data = Data::Json(serde_json::to_value(data)?);
        self.call(name, HttpMethod::Put, Some(data), options).await
    }

    pub async fn patch<D>(&self, name: &str, data: &D, options: RequestOptions) -> Result<Value, LambdogError>
    where
        D: Serialize + ?Sized,
    {
        let data = Data::Json(serde_json::to_value(data)?);
        self.call(name, HttpMethod::Patch, Some(data), options).await
    }

    /// Force the verb (and payload), invoke, and keep only the data.
    async fn call(
        &self,
        name: &str,
        method: HttpMethod,
        data: Option<Data>,
        mut options: RequestOptions,
    ) -> Result<Value, LambdogError> {
        options.method = Some(method);
        if data.is_some() {
            options.data = data;
        }
        Ok(self.invoke(name, options).await?.into_data())
    }
}

impl fmt::Debug for Lambdog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lambdog")
            .field("transport", &self.transport.as_ref().map(|_| "<transport>"))
            .finish()
    }
}
