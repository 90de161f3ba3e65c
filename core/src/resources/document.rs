//! Single- and multi-document APIs.
//!
//! Documents are addressed by index, type and id. The multi-document
//! endpoints (`bulk`, `mget`, `mterm_vectors`) take an optional default
//! `index` and `type` as options, which are placed in the path.

use std::fmt::Display;

use crate::body::{Body, BulkAction};
use crate::builder::RequestBuilder;
use crate::extender::Extender;
use crate::http::HttpMethod;
use crate::params::Params;
use crate::path;
use crate::path::escaped;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Document {
    Bulk,
    Delete,
    Exists,
    Get,
    Index,
    Mget,
    MtermVectors,
    TermVectors,
    Update,
}

impl Document {
    pub fn bulk(actions: Vec<BulkAction>) -> RequestBuilder<Document> {
        RequestBuilder::new(Document::Bulk, HttpMethod::Post, String::new()).body(actions)
    }

    pub fn delete(index: &str, doc_type: &str, id: impl Display) -> RequestBuilder<Document> {
        RequestBuilder::new(
            Document::Delete,
            HttpMethod::Delete,
            path!(escaped(index), escaped(doc_type), escaped(id)),
        )
    }

    pub fn exists(index: &str, doc_type: &str, id: impl Display) -> RequestBuilder<Document> {
        RequestBuilder::new(
            Document::Exists,
            HttpMethod::Head,
            path!(escaped(index), escaped(doc_type), escaped(id)),
        )
    }

    pub fn get(index: &str, doc_type: &str, id: impl Display) -> RequestBuilder<Document> {
        RequestBuilder::new(
            Document::Get,
            HttpMethod::Get,
            path!(escaped(index), escaped(doc_type), escaped(id)),
        )
    }

    /// Index a document under a server-generated id.
    pub fn index(index: &str, doc_type: &str, body: impl Into<Body>) -> RequestBuilder<Document> {
        RequestBuilder::new(
            Document::Index,
            HttpMethod::Post,
            path!(escaped(index), escaped(doc_type)),
        )
        .body(body)
    }

    /// Index (create or replace) a document under `id`.
    pub fn index_with_id(
        index: &str,
        doc_type: &str,
        id: impl Display,
        body: impl Into<Body>,
    ) -> RequestBuilder<Document> {
        RequestBuilder::new(
            Document::Index,
            HttpMethod::Put,
            path!(escaped(index), escaped(doc_type), escaped(id)),
        )
        .body(body)
    }

    pub fn mget(body: impl Into<Body>) -> RequestBuilder<Document> {
        RequestBuilder::new(Document::Mget, HttpMethod::Get, String::new()).body(body)
    }

    /// Without a body, the documents are selected with the `ids` option.
    pub fn mterm_vectors(body: Option<Body>) -> RequestBuilder<Document> {
        RequestBuilder::new(Document::MtermVectors, HttpMethod::Get, String::new()).maybe_body(body)
    }

    /// Attach a body to analyze an artificial document instead.
    pub fn term_vectors(index: &str, doc_type: &str, id: impl Display) -> RequestBuilder<Document> {
        RequestBuilder::new(
            Document::TermVectors,
            HttpMethod::Get,
            path!(escaped(index), escaped(doc_type), escaped(id), "_termvectors"),
        )
    }

    pub fn update(
        index: &str,
        doc_type: &str,
        id: impl Display,
        body: impl Into<Body>,
    ) -> RequestBuilder<Document> {
        RequestBuilder::new(
            Document::Update,
            HttpMethod::Post,
            path!(escaped(index), escaped(doc_type), escaped(id), "_update"),
        )
        .body(body)
    }
}

impl Extender for Document {
    fn recognized_keys(&self) -> &'static [&'static str] {
        match self {
            Document::Bulk => &[
                "wait_for_active_shards",
                "refresh",
                "routing",
                "timeout",
                "fields",
                "pipeline",
                "_source",
                "_source_exclude",
                "_source_include",
            ],
            Document::Delete => &[
                "wait_for_active_shards",
                "parent",
                "refresh",
                "routing",
                "timeout",
                "version",
                "version_type",
            ],
            Document::Exists | Document::Get => &[
                "stored_fields",
                "parent",
                "preference",
                "realtime",
                "refresh",
                "routing",
                "_source",
                "_source_exclude",
                "_source_include",
                "version",
                "version_type",
            ],
            Document::Index => &[
                "wait_for_active_shards",
                "op_type",
                "parent",
                "pipeline",
                "refresh",
                "routing",
                "timeout",
                "timestamp",
                "ttl",
                "version",
                "version_type",
            ],
            Document::Mget => &[
                "stored_fields",
                "preference",
                "realtime",
                "refresh",
                "routing",
                "_source",
                "_source_exclude",
                "_source_include",
            ],
            Document::MtermVectors => &[
                "ids",
                "term_statistics",
                "field_statistics",
                "fields",
                "offsets",
                "positions",
                "payloads",
                "preference",
                "routing",
                "parent",
                "realtime",
                "version",
                "version_type",
            ],
            Document::TermVectors => &[
                "term_statistics",
                "field_statistics",
                "fields",
                "offsets",
                "positions",
                "payloads",
                "preference",
                "routing",
                "parent",
                "realtime",
                "version",
                "version_type",
            ],
            Document::Update => &[
                "wait_for_active_shards",
                "fields",
                "lang",
                "parent",
                "refresh",
                "retry_on_conflict",
                "routing",
                "timeout",
                "timestamp",
                "ttl",
                "version",
                "version_type",
                "_source",
                "_source_exclude",
                "_source_include",
            ],
        }
    }

    fn path_keys(&self) -> &'static [&'static str] {
        match self {
            Document::Bulk | Document::Mget | Document::MtermVectors => &["index", "type"],
            _ => &[],
        }
    }

    fn extend_url(&self, url: String, params: &Params) -> String {
        let endpoint = match self {
            Document::Bulk => "_bulk",
            Document::Mget => "_mget",
            Document::MtermVectors => "_mtermvectors",
            _ => return url,
        };
        let doc_type = params.get("type");
        // A type alone would be read as an index name.
        let index = params.get("index").or(doc_type.map(|_| "_all"));
        path!(url, index.map(escaped), doc_type.map(escaped), endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BulkMeta;
    use crate::config::Config;
    use serde_json::json;

    fn config() -> Config {
        Config::new("http://localhost:9200")
    }

    #[test]
    fn get_builds_document_path() {
        let req = Document::get("my-index", "_doc", 42)
            .param("routing", "user-1")
            .param("bogus", "x")
            .build(&config())
            .unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:9200/my-index/_doc/42");
        assert_eq!(req.query, vec![("routing".to_string(), "user-1".to_string())]);
    }

    #[test]
    fn exists_is_head() {
        let req = Document::exists("books", "book", "abc").build(&config()).unwrap();
        assert_eq!(req.method, HttpMethod::Head);
        assert_eq!(req.url, "http://localhost:9200/books/book/abc");
    }

    #[test]
    fn delete_forwards_version_options() {
        let req = Document::delete("books", "book", 7)
            .param("version", 3)
            .param("version_type", "external")
            .build(&config())
            .unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.query_param("version"), Some("3"));
        assert_eq!(req.query_param("version_type"), Some("external"));
    }

    #[test]
    fn index_with_and_without_id() {
        let doc = json!({"title": "Dune"});
        let post = Document::index("books", "book", doc.clone()).build(&config()).unwrap();
        assert_eq!(post.method, HttpMethod::Post);
        assert_eq!(post.url, "http://localhost:9200/books/book");

        let put = Document::index_with_id("books", "book", 1, doc)
            .param("op_type", "create")
            .build(&config())
            .unwrap();
        assert_eq!(put.method, HttpMethod::Put);
        assert_eq!(put.url, "http://localhost:9200/books/book/1");
        assert_eq!(put.query_param("op_type"), Some("create"));
        assert_eq!(put.header("content-type"), Some("application/json"));
    }

    #[test]
    fn update_targets_update_endpoint() {
        let req = Document::update("books", "book", 1, json!({"doc": {"year": 1965}}))
            .param("retry_on_conflict", 3)
            .build(&config())
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:9200/books/book/1/_update");
        assert_eq!(req.query_param("retry_on_conflict"), Some("3"));
    }

    #[test]
    fn bulk_sends_ndjson_to_default_index() {
        let req = Document::bulk(vec![
            BulkAction::Index(BulkMeta::new().id(1), json!({"title": "Dune"})),
            BulkAction::Delete(BulkMeta::new().id(2)),
        ])
        .param("index", "books")
        .param("type", "book")
        .param("refresh", true)
        .build(&config())
        .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:9200/books/book/_bulk");
        assert_eq!(req.query, vec![("refresh".to_string(), "true".to_string())]);
        assert_eq!(req.header("content-type"), Some("application/x-ndjson"));
        assert_eq!(req.body.as_deref().unwrap().lines().count(), 3);
    }

    #[test]
    fn bulk_without_index() {
        assert_eq!(Document::bulk(Vec::new()).path(), "/_bulk");
    }

    #[test]
    fn mget_with_body_is_posted() {
        let req = Document::mget(json!({"ids": ["1", "2"]}))
            .param("index", "books")
            .build(&config())
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:9200/books/_mget");
    }

    #[test]
    fn mterm_vectors_by_ids_is_get() {
        let req = Document::mterm_vectors(None)
            .param("index", "books")
            .param("type", "book")
            .param("ids", "1,2")
            .build(&config())
            .unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:9200/books/book/_mtermvectors");
        assert_eq!(req.query_param("ids"), Some("1,2"));
    }

    #[test]
    fn mterm_vectors_with_body_is_posted() {
        let req = Document::mterm_vectors(Some(json!({"ids": ["1", "2"]}).into()))
            .param("index", "books")
            .build(&config())
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:9200/books/_mtermvectors");
        assert!(req.body.is_some());
    }

    #[test]
    fn ids_with_url_syntax_stay_in_their_segment() {
        assert_eq!(Document::get("books", "book", "a?b").path(), "/books/book/a%3Fb");
        assert_eq!(Document::get("books", "book", "x/y").path(), "/books/book/x%2Fy");
        assert_eq!(Document::get("books", "book", "a b").path(), "/books/book/a%20b");
        assert_eq!(Document::delete("my index", "book", "#1").path(), "/my%20index/book/%231");
        assert_eq!(
            Document::update("books", "book", "50%", json!({"doc": {}})).path(),
            "/books/book/50%25/_update"
        );
    }

    #[test]
    fn type_without_index_targets_all_indices() {
        let builder = Document::bulk(Vec::new()).param("type", "book");
        assert_eq!(builder.path(), "/_all/book/_bulk");
        assert_eq!(Document::mget(json!({"ids": ["1"]})).param("type", "book").path(), "/_all/book/_mget");
    }

    #[test]
    fn term_vectors_path() {
        let builder = Document::term_vectors("books", "book", 1).param("fields", "title");
        assert_eq!(builder.path(), "/books/book/1/_termvectors");
        assert_eq!(builder.query().get("fields"), Some("title"));
    }
}
