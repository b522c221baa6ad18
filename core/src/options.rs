//! Per-call options and the parameter map.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde_json::{Map, Value};

use crate::http::{Headers, HttpMethod};
use crate::transport::Transport;

/// Ordered parameter map used for `:name` placeholders and the query string.
///
/// Repeated keys are allowed and keep their order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter; the value is coerced with `ToString`.
    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.push((key.into(), value.to_string()));
    }

    /// Builder form of [`Params::push`].
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.push(key, value);
        self
    }

    /// Remove and return the first entry named `key`.
    pub fn take(&mut self, key: &str) -> Option<String> {
        let index = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(index).1)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params(iter.into_iter().map(|(k, v)| (k.into(), v.to_string())).collect())
    }
}

/// Request payload.
///
/// `Json` values are encoded when the content type is `application/json`;
/// `Bytes` are always sent as they are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Data {
    Json(Value),
    Bytes(Bytes),
}

impl Data {
    /// Whether the payload counts as present. `null`, `false`, zero and the
    /// empty string do not; any byte buffer does.
    pub fn is_truthy(&self) -> bool {
        match self {
            Data::Json(Value::Null) => false,
            Data::Json(Value::Bool(flag)) => *flag,
            Data::Json(Value::Number(number)) => number.as_f64().map_or(true, |n| n != 0.0),
            Data::Json(Value::String(text)) => !text.is_empty(),
            Data::Json(_) | Data::Bytes(_) => true,
        }
    }
}

impl From<Value> for Data {
    fn from(value: Value) -> Self {
        Data::Json(value)
    }
}

impl From<&str> for Data {
    fn from(text: &str) -> Self {
        Data::Json(Value::String(text.to_string()))
    }
}

impl From<String> for Data {
    fn from(text: String) -> Self {
        Data::Json(Value::String(text))
    }
}

impl From<Bytes> for Data {
    fn from(bytes: Bytes) -> Self {
        Data::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Data {
    fn from(bytes: Vec<u8>) -> Self {
        Data::Bytes(Bytes::from(bytes))
    }
}

/// Options for a single invocation.
///
/// Built fresh per call and consumed by it. Unset fields fall back to the
/// client's defaults: the client's transport, no parameters, no payload, no
/// headers and no explicit method.
#[derive(Clone, Default)]
pub struct RequestOptions {
    /// Transport to use instead of the client's default.
    pub fetch: Option<Arc<dyn Transport>>,
    /// Function path, only read by `Lambdog::request`.
    pub function_name: Option<String>,
    pub params: Params,
    /// Request payload. JSON values are encoded unless a non-JSON content
    /// type is set.
    pub data: Option<Data>,
    pub headers: Headers,
    /// Explicit method; always wins over the `POST` implied by a body.
    pub method: Option<HttpMethod>,
    /// Transport options passed through untouched (credentials mode,
    /// timeouts, ...). What they mean is up to the transport.
    pub extra: Map<String, Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fetch(mut self, transport: impl Transport + 'static) -> Self {
        self.fetch = Some(Arc::new(transport));
        self
    }

    pub fn function_name(mut self, name: impl Into<String>) -> Self {
        self.function_name = Some(name.into());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push(key, value);
        self
    }

    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn data(mut self, data: impl Into<Data>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    pub fn headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    pub fn method(mut self, method: impl Into<HttpMethod>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("fetch", &self.fetch.as_ref().map(|_| "<transport>"))
            .field("function_name", &self.function_name)
            .field("params", &self.params)
            .field("data", &self.data)
            .field("headers", &self.headers)
            .field("method", &self.method)
            .field("extra", &self.extra)
            .finish()
    }
}
