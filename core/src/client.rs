//! Request execution.
//!
//! # Design
//! `Client` pairs an immutable [`Config`] with a [`Transport`] and carries no
//! other state, so it can be cloned into as many threads as needed. Each call
//! is one round-trip. Two flavours are offered for every request:
//! `call`/`request` fail only when no response arrives, while
//! `run`/`request_checked` additionally turn non-2xx statuses into errors.

use tracing::{debug, warn};

use crate::body::Body;
use crate::builder::{build, RequestBuilder};
use crate::config::Config;
use crate::error::ApiError;
use crate::extender::Extender;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::Params;
use crate::transport::{Transport, UreqTransport};

#[derive(Debug, Clone)]
pub struct Client<T = UreqTransport> {
    config: Config,
    transport: T,
}

impl Client<UreqTransport> {
    pub fn new(config: Config) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }

    pub fn from_env() -> Self {
        Self::new(Config::from_env())
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(config: Config, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Execute an operation; any HTTP status is returned as a response.
    pub fn call<E: Extender>(&self, builder: &RequestBuilder<E>) -> Result<HttpResponse, ApiError> {
        let request = builder.build(&self.config)?;
        self.send(&request)
    }

    /// Execute an operation and fail on non-2xx statuses.
    pub fn run<E: Extender>(&self, builder: &RequestBuilder<E>) -> Result<HttpResponse, ApiError> {
        self.call(builder)?.error_for_status()
    }

    /// Hand an already built request to the transport.
    pub fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(
            method = %request.method,
            url = %request.url,
            params = request.query.len(),
            "sending request"
        );
        match self.transport.send(request) {
            Ok(response) => {
                debug!(status = response.status, url = %request.url, "received response");
                Ok(response)
            }
            Err(err) => {
                warn!(method = %request.method, url = %request.url, error = %err, "request failed");
                Err(err)
            }
        }
    }

    /// Ad-hoc request relative to the configured base URL. The method is sent
    /// as given, even with a body.
    pub fn request(
        &self,
        method: HttpMethod,
        path: &str,
        headers: &[(String, String)],
        body: Option<Body>,
        params: &Params,
    ) -> Result<HttpResponse, ApiError> {
        let mut request = build(method, path)
            .params(params.clone())
            .maybe_body(body)
            .build(&self.config)?;
        request.method = method;
        for (name, value) in headers {
            request
                .headers
                .retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
            request.headers.push((name.clone(), value.clone()));
        }
        self.send(&request)
    }

    pub fn request_checked(
        &self,
        method: HttpMethod,
        path: &str,
        headers: &[(String, String)],
        body: Option<Body>,
        params: &Params,
    ) -> Result<HttpResponse, ApiError> {
        self.request(method, path, headers, body, params)?
            .error_for_status()
    }

    pub fn get(&self, path: &str, params: &Params) -> Result<HttpResponse, ApiError> {
        self.request(HttpMethod::Get, path, &[], None, params)
    }

    pub fn head(&self, path: &str, params: &Params) -> Result<HttpResponse, ApiError> {
        self.request(HttpMethod::Head, path, &[], None, params)
    }

    pub fn delete(&self, path: &str, params: &Params) -> Result<HttpResponse, ApiError> {
        self.request(HttpMethod::Delete, path, &[], None, params)
    }

    pub fn options(&self, path: &str, params: &Params) -> Result<HttpResponse, ApiError> {
        self.request(HttpMethod::Options, path, &[], None, params)
    }

    pub fn post(&self, path: &str, body: Option<Body>, params: &Params) -> Result<HttpResponse, ApiError> {
        self.request(HttpMethod::Post, path, &[], body, params)
    }

    pub fn put(&self, path: &str, body: Option<Body>, params: &Params) -> Result<HttpResponse, ApiError> {
        self.request(HttpMethod::Put, path, &[], body, params)
    }

    pub fn patch(&self, path: &str, body: Option<Body>, params: &Params) -> Result<HttpResponse, ApiError> {
        self.request(HttpMethod::Patch, path, &[], body, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::Search;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records every request and answers with a fixed status.
    struct Recorder {
        status: u16,
        sent: Mutex<Vec<HttpRequest>>,
    }

    impl Recorder {
        fn answering(status: u16) -> Self {
            Self {
                status,
                sent: Mutex::new(Vec::new()),
            }
        }

        fn last(&self) -> HttpRequest {
            self.sent.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl Transport for Recorder {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.sent.lock().unwrap().push(request.clone());
            Ok(HttpResponse {
                status: self.status,
                headers: Vec::new(),
                body: r#"{"acknowledged":true}"#.to_string(),
            })
        }
    }

    struct Refused;

    impl Transport for Refused {
        fn send(&self, _request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            Err(ApiError::Transport("connection refused".to_string()))
        }
    }

    fn client(status: u16) -> Client<Recorder> {
        Client::with_transport(Config::new("http://localhost:9200"), Recorder::answering(status))
    }

    #[test]
    fn count_without_options_is_bare_get() {
        let client = client(200);
        client.call(&Search::count()).unwrap();
        let req = client.transport().last();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:9200/_count");
        assert!(req.query.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn call_returns_error_statuses_as_data() {
        let response = client(404).call(&Search::count()).unwrap();
        assert_eq!(response.status, 404);
    }

    #[test]
    fn run_turns_error_statuses_into_errors() {
        let err = client(404).run(&Search::count()).unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
        let err = client(503).run(&Search::count()).unwrap_err();
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn transport_failure_surfaces_on_both_variants() {
        let client = Client::with_transport(Config::default(), Refused);
        assert!(matches!(client.call(&Search::count()), Err(ApiError::Transport(_))));
        assert!(matches!(client.run(&Search::count()), Err(ApiError::Transport(_))));
    }

    #[test]
    fn verb_helpers_keep_method_and_forward_params() {
        let client = client(200);
        client
            .request(
                HttpMethod::Get,
                "/logs/_search",
                &[("x-opaque-id".to_string(), "trace-1".to_string())],
                Some(Body::from(json!({"size": 0}))),
                &Params::from([("request_cache", "true")]),
            )
            .unwrap();
        let req = client.transport().last();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:9200/logs/_search");
        assert_eq!(req.query_param("request_cache"), Some("true"));
        assert_eq!(req.header("x-opaque-id"), Some("trace-1"));

        client.options("/", &Params::new()).unwrap();
        assert_eq!(client.transport().last().method, HttpMethod::Options);
        client.patch("/logs/_settings", None, &Params::new()).unwrap();
        assert_eq!(client.transport().last().method, HttpMethod::Patch);
    }

    #[test]
    fn request_checked_maps_status() {
        let err = client(409)
            .request_checked(HttpMethod::Put, "/logs", &[], None, &Params::new())
            .unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 409, .. }));
    }
}
