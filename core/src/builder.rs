//! Request descriptors.
//!
//! # Design
//! A `RequestBuilder` is what every resource operation returns: the verb, the
//! base path, an optional body, and the caller's options. Nothing is decided
//! until `build` runs the endpoint's [`Extender`] over the options, so
//! callers can keep adding options after the operation is chosen.

use crate::body::Body;
use crate::config::Config;
use crate::error::ApiError;
use crate::extender::{Extender, Raw};
use crate::http::{HttpMethod, HttpRequest};
use crate::params::Params;

#[derive(Debug, Clone, PartialEq)]
pub struct RequestBuilder<E> {
    endpoint: E,
    method: HttpMethod,
    path: String,
    body: Option<Body>,
    options: Params,
}

/// Ad-hoc request against any path. Every option is forwarded as a query
/// parameter.
pub fn build(method: HttpMethod, path: &str) -> RequestBuilder<Raw> {
    RequestBuilder::new(Raw, method, crate::path!(path))
}

impl<E: Extender> RequestBuilder<E> {
    pub fn new(endpoint: E, method: HttpMethod, path: String) -> Self {
        Self {
            endpoint,
            method,
            path,
            body: None,
            options: Params::new(),
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.options.insert(key, value);
        self
    }

    pub fn params(mut self, params: impl Into<Params>) -> Self {
        self.options.merge(&params.into());
        self
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub(crate) fn maybe_body(mut self, body: Option<Body>) -> Self {
        self.body = body;
        self
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    pub fn options(&self) -> &Params {
        &self.options
    }

    pub fn request_body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// Verb actually sent. Elasticsearch serves every body-carrying GET on
    /// POST as well, and not every HTTP stack sends GET bodies.
    pub fn method(&self) -> HttpMethod {
        match (self.method, &self.body) {
            (HttpMethod::Get, Some(_)) => HttpMethod::Post,
            (method, _) => method,
        }
    }

    /// Operation path after path keys have been applied.
    pub fn path(&self) -> String {
        self.endpoint.extend_url(self.path.clone(), &self.options)
    }

    /// Options forwarded as query parameters.
    pub fn query(&self) -> Params {
        self.endpoint
            .params(&self.options, self.endpoint.recognized_keys())
    }

    /// Option keys that neither the query filter nor the path consume.
    pub fn unrecognized(&self) -> Vec<String> {
        let query = self.query();
        let path_keys = self.endpoint.path_keys();
        self.options
            .keys()
            .filter(|k| !query.contains_key(k) && !path_keys.iter().any(|p| p == k))
            .map(str::to_string)
            .collect()
    }

    pub fn build(&self, config: &Config) -> Result<HttpRequest, ApiError> {
        let mut query = config.params().clone();
        query.merge(&self.query());

        let mut headers = config.headers().to_vec();
        let body = match &self.body {
            Some(body) => {
                headers.retain(|(name, _)| !name.eq_ignore_ascii_case("content-type"));
                headers.push(("content-type".to_string(), body.content_type().to_string()));
                Some(body.encode()?)
            }
            None => None,
        };

        Ok(HttpRequest {
            method: self.method(),
            url: format!("{}{}", config.url(), self.path()),
            query: query.into_pairs(),
            headers,
            body,
        })
    }

    /// Like `build`, but rejects options the operation does not understand.
    pub fn build_strict(&self, config: &Config) -> Result<HttpRequest, ApiError> {
        let unknown = self.unrecognized();
        if !unknown.is_empty() {
            return Err(ApiError::UnrecognizedParams(unknown));
        }
        self.build(config)
    }
}
