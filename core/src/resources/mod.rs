//! Elasticsearch REST resources.
//!
//! Each resource is an enum of its operations. Constructors return a
//! [`RequestBuilder`](crate::RequestBuilder); the enum's
//! [`Extender`](crate::Extender) implementation decides which options become
//! path segments and which are sent as query parameters.

mod cluster;
mod document;
mod index;
mod search;

pub use cluster::Cluster;
pub use document::Document;
pub use index::Index;
pub use search::Search;
