//! The pluggable transport behind every invocation.
//!
//! # Design
//! A transport takes a relative URL plus [`FetchOptions`] and resolves to a
//! buffered [`HttpResponse`]. Non-success statuses are data, not errors; the
//! client decides what they mean. Only failures to complete the exchange are
//! reported as `Err`.
//!
//! Futures are boxed so transports can be stored as `Arc<dyn Transport>` and
//! swapped per call. Cancelling a request means dropping its future. Any `Fn(String, FetchOptions) -> impl Future` closure is
//! a transport.

use std::future::Future;

use futures::future::BoxFuture;

use crate::http::{FetchOptions, HttpResponse};

/// Error produced by a transport. Passed through to callers untouched.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

pub trait Transport: Send + Sync {
    fn fetch(
        &self,
        url: String,
        options: FetchOptions,
    ) -> BoxFuture<'static, Result<HttpResponse, TransportError>>;
}

impl<F, Fut> Transport for F
where
    F: Fn(String, FetchOptions) -> Fut + Send + Sync,
    Fut: Future<Output = Result<HttpResponse, TransportError>> + Send + 'static,
{
    fn fetch(
        &self,
        url: String,
        options: FetchOptions,
    ) -> BoxFuture<'static, Result<HttpResponse, TransportError>> {
        Box::pin((self)(url, options))
    }
}

#[cfg(feature = "ureq")]
pub use self::ureq_transport::UreqTransport;

#[cfg(feature = "ureq")]
mod ureq_transport {
    use futures::channel::oneshot;
    use futures::future::{self, BoxFuture};

    use super::{Transport, TransportError};
    use crate::http::{FetchOptions, Headers, HttpMethod, HttpResponse};

    /// Transport backed by a blocking `ureq` agent.
    ///
    /// Relative URLs are resolved against `origin`. Each request runs on its
    /// own thread and the returned future only waits for the result, so it
    /// never blocks the executor polling it. `FetchOptions::extra` is
    /// ignored.
    #[derive(Debug, Clone)]
    pub struct UreqTransport {
        origin: String,
        agent: ureq::Agent,
    }

    impl UreqTransport {
        pub fn new(origin: &str) -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent();
            Self {
                origin: origin.trim_end_matches('/').to_string(),
                agent,
            }
        }

        pub fn origin(&self) -> &str {
            &self.origin
        }
    }

    impl Transport for UreqTransport {
        fn fetch(
            &self,
            url: String,
            options: FetchOptions,
        ) -> BoxFuture<'static, Result<HttpResponse, TransportError>> {
            let agent = self.agent.clone();
            let url = format!("{}{url}", self.origin);
            let (tx, rx) = oneshot::channel();

            let spawned = std::thread::Builder::new()
                .name("lambdog-ureq".to_string())
                .spawn(move || {
                    // The receiver is gone when the caller dropped the future.
                    let _ = tx.send(execute(&agent, &url, options));
                });
            if let Err(err) = spawned {
                return Box::pin(future::ready(Err::<HttpResponse, _>(TransportError::from(err))));
            }

            Box::pin(async move {
                let response = rx.await??;
                Ok::<_, TransportError>(response)
            })
        }
    }

    fn execute(agent: &ureq::Agent, url: &str, options: FetchOptions) -> Result<HttpResponse, TransportError> {
        let method = options.method.unwrap_or(HttpMethod::Get);
        let mut builder = ureq::http::Request::builder().method(method.as_str()).uri(url);
        for (name, value) in options.headers.iter().flat_map(Headers::iter) {
            builder = builder.header(name, value);
        }

        let mut response = match &options.body {
            Some(body) => agent.run(builder.body(body.as_bytes())?)?,
            None => agent.run(builder.body(())?)?,
        };

        let status = response.status();
        let mut headers = Headers::new();
        for (name, value) in response.headers() {
            let Ok(value) = value.to_str() else { continue };
            let combined = match headers.get(name.as_str()) {
                Some(existing) => format!("{existing}, {value}"),
                None => value.to_string(),
            };
            headers.set(name.as_str(), combined);
        }
        let body = response.body_mut().read_to_string()?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}
