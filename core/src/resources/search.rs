//! Search APIs.
//!
//! Searches run across all indices unless the `index` (and optionally
//! `type`) options narrow them; both are placed in front of the endpoint.
//! A query body turns the request into a POST.

use std::fmt::Display;

use serde_json::Value;

use crate::body::Body;
use crate::builder::RequestBuilder;
use crate::extender::Extender;
use crate::http::HttpMethod;
use crate::params::Params;
use crate::path;
use crate::path::escaped;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Search {
    Count,
    Explain,
    MultiSearch,
    Query,
    Shards,
    Suggest,
    Template,
    Validate,
}

impl Search {
    pub fn count() -> RequestBuilder<Search> {
        RequestBuilder::new(Search::Count, HttpMethod::Get, path!("_count"))
    }

    /// Explain how `id` scores against the query given with `.body(...)` or
    /// the `q` option.
    pub fn explain(index: &str, doc_type: &str, id: impl Display) -> RequestBuilder<Search> {
        RequestBuilder::new(
            Search::Explain,
            HttpMethod::Get,
            path!(escaped(index), escaped(doc_type), escaped(id), "_explain"),
        )
    }

    /// `searches` alternates header and body documents.
    pub fn multi_search(searches: Vec<Value>) -> RequestBuilder<Search> {
        RequestBuilder::new(Search::MultiSearch, HttpMethod::Get, path!("_msearch"))
            .body(Body::Lines(searches))
    }

    pub fn query() -> RequestBuilder<Search> {
        RequestBuilder::new(Search::Query, HttpMethod::Get, path!("_search"))
    }

    pub fn shards(index: &str) -> RequestBuilder<Search> {
        RequestBuilder::new(Search::Shards, HttpMethod::Get, path!(escaped(index)))
    }

    pub fn suggest(body: impl Into<Body>) -> RequestBuilder<Search> {
        RequestBuilder::new(Search::Suggest, HttpMethod::Post, path!("_suggest")).body(body)
    }

    pub fn template(body: impl Into<Body>) -> RequestBuilder<Search> {
        RequestBuilder::new(Search::Template, HttpMethod::Get, path!("_search", "template")).body(body)
    }

    pub fn validate() -> RequestBuilder<Search> {
        RequestBuilder::new(Search::Validate, HttpMethod::Get, path!("_validate", "query"))
    }
}

impl Extender for Search {
    fn recognized_keys(&self) -> &'static [&'static str] {
        match self {
            Search::Count => &[
                "ignore_unavailable",
                "allow_no_indices",
                "expand_wildcards",
                "min_score",
                "preference",
                "routing",
                "q",
                "analyzer",
                "analyze_wildcard",
                "default_operator",
                "df",
                "lenient",
                "terminate_after",
            ],
            Search::Explain => &[
                "analyze_wildcard",
                "analyzer",
                "default_operator",
                "df",
                "stored_fields",
                "lenient",
                "parent",
                "preference",
                "q",
                "routing",
                "_source",
                "_source_exclude",
                "_source_include",
            ],
            Search::MultiSearch => &["search_type", "max_concurrent_searches", "typed_keys"],
            Search::Query => &[
                "analyzer",
                "analyze_wildcard",
                "default_operator",
                "df",
                "explain",
                "stored_fields",
                "docvalue_fields",
                "from",
                "ignore_unavailable",
                "allow_no_indices",
                "expand_wildcards",
                "lenient",
                "preference",
                "q",
                "routing",
                "scroll",
                "search_type",
                "size",
                "sort",
                "_source",
                "_source_exclude",
                "_source_include",
                "terminate_after",
                "stats",
                "suggest_field",
                "suggest_mode",
                "suggest_size",
                "suggest_text",
                "timeout",
                "track_scores",
                "typed_keys",
                "version",
                "request_cache",
                "batched_reduce_size",
            ],
            Search::Shards => &[
                "preference",
                "routing",
                "local",
                "ignore_unavailable",
                "allow_no_indices",
                "expand_wildcards",
            ],
            Search::Suggest => &[
                "ignore_unavailable",
                "allow_no_indices",
                "expand_wildcards",
                "preference",
                "routing",
            ],
            Search::Template => &[
                "ignore_unavailable",
                "allow_no_indices",
                "expand_wildcards",
                "preference",
                "routing",
                "scroll",
                "search_type",
                "explain",
                "profile",
                "typed_keys",
            ],
            Search::Validate => &[
                "explain",
                "ignore_unavailable",
                "allow_no_indices",
                "expand_wildcards",
                "q",
                "analyzer",
                "analyze_wildcard",
                "default_operator",
                "df",
                "lenient",
                "rewrite",
                "all_shards",
            ],
        }
    }

    fn path_keys(&self) -> &'static [&'static str] {
        match self {
            Search::Explain => &[],
            Search::Shards => &["type"],
            Search::Suggest => &["index"],
            _ => &["index", "type"],
        }
    }

    fn extend_url(&self, url: String, params: &Params) -> String {
        let doc_type = params.get("type");
        match self {
            Search::Explain => url,
            Search::Shards => path!(url, doc_type.map(escaped), "_search_shards"),
            Search::Suggest => path!(params.get("index").map(escaped), url),
            _ => {
                // A type alone would be read as an index name.
                let index = params.get("index").or(doc_type.map(|_| "_all"));
                path!(index.map(escaped), doc_type.map(escaped), url)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;

    fn config() -> Config {
        Config::new("http://localhost:9200")
    }

    #[test]
    fn bare_count_is_get_without_params() {
        let req = Search::count().build(&config()).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:9200/_count");
        assert!(req.query.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn count_with_index_type_and_body() {
        let req = Search::count()
            .param("index", "books")
            .param("type", "book")
            .param("q", "title:dune")
            .body(json!({"query": {"match_all": {}}}))
            .build(&config())
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:9200/books/book/_count");
        assert_eq!(req.query, vec![("q".to_string(), "title:dune".to_string())]);
    }

    #[test]
    fn query_forwards_paging_and_drops_unknown() {
        let query = Search::query()
            .param("index", "books")
            .param("from", 10)
            .param("size", 5)
            .param("colour", "blue")
            .query();
        assert_eq!(query, Params::from([("from", "10"), ("size", "5")]));
    }

    #[test]
    fn query_paths() {
        assert_eq!(Search::query().path(), "/_search");
        assert_eq!(Search::query().param("index", "a,b").path(), "/a,b/_search");
        assert_eq!(Search::template(json!({"id": "t1"})).path(), "/_search/template");
        assert_eq!(Search::validate().param("index", "books").path(), "/books/_validate/query");
    }

    #[test]
    fn type_without_index_searches_all_indices() {
        assert_eq!(Search::count().param("type", "book").path(), "/_all/book/_count");
        assert_eq!(Search::query().param("type", "book").path(), "/_all/book/_search");
        assert_eq!(
            Search::validate().param("type", "book").path(),
            "/_all/book/_validate/query"
        );
    }

    #[test]
    fn identifiers_are_escaped() {
        assert_eq!(Search::explain("books", "book", "a?b").path(), "/books/book/a%3Fb/_explain");
        assert_eq!(Search::shards("my books").path(), "/my%20books/_search_shards");
        assert_eq!(Search::query().param("index", "logs-*,x").path(), "/logs-*,x/_search");
        assert_eq!(Search::query().param("index", "a/b").path(), "/a%2Fb/_search");
    }

    #[test]
    fn explain_document() {
        let builder = Search::explain("books", "book", 1).param("q", "title:dune");
        assert_eq!(builder.path(), "/books/book/1/_explain");
        assert_eq!(builder.method(), HttpMethod::Get);
        assert_eq!(builder.body(json!({"query": {}})).method(), HttpMethod::Post);
    }

    #[test]
    fn multi_search_sends_ndjson() {
        let req = Search::multi_search(vec![
            json!({"index": "books"}),
            json!({"query": {"match_all": {}}}),
        ])
        .param("max_concurrent_searches", 2)
        .build(&config())
        .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:9200/_msearch");
        assert_eq!(req.header("content-type"), Some("application/x-ndjson"));
        assert!(req.body.unwrap().ends_with('\n'));
    }

    #[test]
    fn shards_optionally_by_type() {
        assert_eq!(Search::shards("books").path(), "/books/_search_shards");
        assert_eq!(Search::shards("books").param("type", "book").path(), "/books/book/_search_shards");
    }

    #[test]
    fn suggest_ignores_type_option() {
        let builder = Search::suggest(json!({"s": {"text": "dun", "term": {"field": "title"}}}))
            .param("index", "books")
            .param("type", "book");
        assert_eq!(builder.path(), "/books/_suggest");
        assert_eq!(builder.unrecognized(), vec!["type".to_string()]);
    }
}
