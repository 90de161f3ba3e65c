//! Blocking client for the Elasticsearch REST API.
//!
//! # Overview
//! Operations are grouped by resource ([`Cluster`], [`Document`], [`Index`],
//! [`Search`]). Each returns a [`RequestBuilder`] describing the request as
//! data; a [`Client`] builds it against its [`Config`] and executes it through
//! a [`Transport`].
//!
//! ```no_run
//! use es_rest::{Client, Config, Document};
//!
//! let client = Client::new(Config::new("http://localhost:9200"));
//! let response = client.run(&Document::get("books", "book", 1).param("routing", "a"))?;
//! println!("{}", response.body);
//! # Ok::<(), es_rest::ApiError>(())
//! ```
//!
//! # Design
//! - Request construction is pure: every operation can be inspected and
//!   tested without a server.
//! - Options are free-form; each operation forwards only the keys it
//!   recognizes and silently drops the rest (`build_strict` reports them).
//! - `Client` is stateless apart from its immutable `Config`.

pub mod body;
pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod extender;
pub mod http;
pub mod params;
pub mod path;
pub mod resources;
pub mod transport;

pub use body::{Body, BulkAction, BulkMeta};
pub use builder::{build, RequestBuilder};
pub use client::Client;
pub use config::Config;
pub use error::ApiError;
pub use extender::{filter_params, Extender, Raw};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use params::Params;
pub use resources::{Cluster, Document, Index, Search};
pub use transport::{Transport, UreqTransport};
