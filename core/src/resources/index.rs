//! Index management APIs: lifecycle, aliases, mappings, settings, templates
//! and maintenance.
//!
//! Operations that may be scoped to some indices or run cluster-wide
//! (`refresh`, `flush`, `stats`, ...) take the index list as the `index`
//! option; it is placed in front of the endpoint path.

use std::fmt::Display;

use crate::body::Body;
use crate::builder::RequestBuilder;
use crate::extender::{filter_params, Extender};
use crate::http::HttpMethod;
use crate::params::Params;
use crate::path;
use crate::path::escaped;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Index {
    AddAlias,
    AddTemplate,
    AliasExists,
    Aliases,
    Analyze,
    ClearCache,
    Close,
    Create,
    Delete,
    DeleteAlias,
    DeleteTemplate,
    Exists,
    Flush,
    ForceMerge,
    Get,
    GetAlias,
    GetFieldMapping,
    GetMapping,
    GetSettings,
    GetTemplate,
    Open,
    PutMapping,
    Recovery,
    Refresh,
    Rollover,
    Segments,
    ShardStores,
    Shrink,
    Stats,
    SyncedFlush,
    TemplateExists,
    TypeExists,
    UpdateSettings,
}

fn op(endpoint: Index, method: HttpMethod, path: String) -> RequestBuilder<Index> {
    RequestBuilder::new(endpoint, method, path)
}

impl Index {
    /// Point `name` at `index`. A body may add a filter or routing.
    pub fn add_alias(index: &str, name: &str) -> RequestBuilder<Index> {
        op(Index::AddAlias, HttpMethod::Put, path!(escaped(index), "_alias", escaped(name)))
    }

    pub fn add_template(name: &str, body: impl Into<Body>) -> RequestBuilder<Index> {
        op(Index::AddTemplate, HttpMethod::Put, path!("_template", escaped(name))).body(body)
    }

    pub fn alias_exists(index: &str, name: &str) -> RequestBuilder<Index> {
        op(Index::AliasExists, HttpMethod::Head, path!(escaped(index), "_alias", escaped(name)))
    }

    /// Atomic alias actions (`{"actions": [...]}`).
    pub fn aliases(body: impl Into<Body>) -> RequestBuilder<Index> {
        op(Index::Aliases, HttpMethod::Post, path!("_aliases")).body(body)
    }

    pub fn analyze(body: impl Into<Body>) -> RequestBuilder<Index> {
        op(Index::Analyze, HttpMethod::Get, path!("_analyze")).body(body)
    }

    pub fn clear_cache() -> RequestBuilder<Index> {
        op(Index::ClearCache, HttpMethod::Post, path!("_cache", "clear"))
    }

    pub fn close(index: &str) -> RequestBuilder<Index> {
        op(Index::Close, HttpMethod::Post, path!(escaped(index), "_close"))
    }

    /// Settings and mappings may be supplied with `.body(...)`.
    pub fn create(index: &str) -> RequestBuilder<Index> {
        op(Index::Create, HttpMethod::Put, path!(escaped(index)))
    }

    pub fn delete(index: &str) -> RequestBuilder<Index> {
        op(Index::Delete, HttpMethod::Delete, path!(escaped(index)))
    }

    pub fn delete_alias(index: &str, name: &str) -> RequestBuilder<Index> {
        op(Index::DeleteAlias, HttpMethod::Delete, path!(escaped(index), "_alias", escaped(name)))
    }

    pub fn delete_template(name: &str) -> RequestBuilder<Index> {
        op(Index::DeleteTemplate, HttpMethod::Delete, path!("_template", escaped(name)))
    }

    pub fn exists(index: &str) -> RequestBuilder<Index> {
        op(Index::Exists, HttpMethod::Head, path!(escaped(index)))
    }

    pub fn flush() -> RequestBuilder<Index> {
        op(Index::Flush, HttpMethod::Post, path!("_flush"))
    }

    pub fn force_merge() -> RequestBuilder<Index> {
        op(Index::ForceMerge, HttpMethod::Post, path!("_forcemerge"))
    }

    /// The `feature` option narrows the answer (`_settings`, `_mappings`,
    /// `_aliases`).
    pub fn get(index: &str) -> RequestBuilder<Index> {
        op(Index::Get, HttpMethod::Get, path!(escaped(index)))
    }

    pub fn get_alias(index: &str, name: &str) -> RequestBuilder<Index> {
        op(Index::GetAlias, HttpMethod::Get, path!(escaped(index), "_alias", escaped(name)))
    }

    pub fn get_field_mapping(index: &str, doc_type: &str, field: &str) -> RequestBuilder<Index> {
        op(
            Index::GetFieldMapping,
            HttpMethod::Get,
            path!(escaped(index), "_mapping", escaped(doc_type), "field", escaped(field)),
        )
    }

    pub fn get_mapping(index: &str) -> RequestBuilder<Index> {
        op(Index::GetMapping, HttpMethod::Get, path!(escaped(index), "_mapping"))
    }

    pub fn get_settings(index: &str) -> RequestBuilder<Index> {
        op(Index::GetSettings, HttpMethod::Get, path!(escaped(index), "_settings"))
    }

    pub fn get_template(name: &str) -> RequestBuilder<Index> {
        op(Index::GetTemplate, HttpMethod::Get, path!("_template", escaped(name)))
    }

    pub fn open(index: &str) -> RequestBuilder<Index> {
        op(Index::Open, HttpMethod::Post, path!(escaped(index), "_open"))
    }

    pub fn put_mapping(index: &str, body: impl Into<Body>) -> RequestBuilder<Index> {
        op(Index::PutMapping, HttpMethod::Put, path!(escaped(index), "_mapping")).body(body)
    }

    pub fn recovery() -> RequestBuilder<Index> {
        op(Index::Recovery, HttpMethod::Get, path!("_recovery"))
    }

    pub fn refresh() -> RequestBuilder<Index> {
        op(Index::Refresh, HttpMethod::Post, path!("_refresh"))
    }

    /// Roll `alias` over to a new index once the body's conditions hold. The
    /// new index name may be given with the `new_index` option.
    pub fn rollover(alias: &str, body: impl Into<Body>) -> RequestBuilder<Index> {
        op(Index::Rollover, HttpMethod::Post, path!(escaped(alias), "_rollover")).body(body)
    }

    pub fn segments() -> RequestBuilder<Index> {
        op(Index::Segments, HttpMethod::Get, path!("_segments"))
    }

    pub fn shard_stores() -> RequestBuilder<Index> {
        op(Index::ShardStores, HttpMethod::Get, path!("_shard_stores"))
    }

    pub fn shrink(index: &str, target: impl Display) -> RequestBuilder<Index> {
        op(Index::Shrink, HttpMethod::Put, path!(escaped(index), "_shrink", escaped(target)))
    }

    pub fn stats() -> RequestBuilder<Index> {
        op(Index::Stats, HttpMethod::Get, path!("_stats"))
    }

    pub fn synced_flush() -> RequestBuilder<Index> {
        op(Index::SyncedFlush, HttpMethod::Post, path!("_flush", "synced"))
    }

    pub fn template_exists(name: &str) -> RequestBuilder<Index> {
        op(Index::TemplateExists, HttpMethod::Head, path!("_template", escaped(name)))
    }

    pub fn type_exists(index: &str, doc_type: &str) -> RequestBuilder<Index> {
        op(
            Index::TypeExists,
            HttpMethod::Head,
            path!(escaped(index), "_mapping", escaped(doc_type)),
        )
    }

    pub fn update_settings(body: impl Into<Body>) -> RequestBuilder<Index> {
        op(Index::UpdateSettings, HttpMethod::Put, path!("_settings")).body(body)
    }
}

impl Extender for Index {
    fn recognized_keys(&self) -> &'static [&'static str] {
        match self {
            Index::AddAlias
            | Index::Aliases
            | Index::Delete
            | Index::DeleteAlias
            | Index::DeleteTemplate => &["timeout", "master_timeout"],
            Index::AddTemplate => &["create", "order", "flat_settings", "master_timeout", "timeout"],
            Index::AliasExists | Index::GetAlias | Index::GetMapping | Index::TypeExists => &[
                "local",
                "ignore_unavailable",
                "allow_no_indices",
                "expand_wildcards",
            ],
            Index::Analyze => &[
                "analyzer",
                "char_filter",
                "field",
                "filter",
                "format",
                "prefer_local",
                "text",
                "tokenizer",
            ],
            Index::ClearCache => &[
                "fielddata",
                "field_data",
                "fields",
                "query",
                "request",
                "recycler",
                "ignore_unavailable",
                "allow_no_indices",
                "expand_wildcards",
            ],
            Index::Close | Index::Open => &[
                "timeout",
                "master_timeout",
                "ignore_unavailable",
                "allow_no_indices",
                "expand_wildcards",
            ],
            Index::Create => &[
                "timeout",
                "master_timeout",
                "wait_for_active_shards",
                "update_all_types",
            ],
            Index::Exists | Index::Get => &[
                "local",
                "flat_settings",
                "human",
                "include_defaults",
                "ignore_unavailable",
                "allow_no_indices",
                "expand_wildcards",
            ],
            Index::Flush => &[
                "force",
                "wait_if_ongoing",
                "ignore_unavailable",
                "allow_no_indices",
                "expand_wildcards",
            ],
            Index::ForceMerge => &[
                "flush",
                "max_num_segments",
                "only_expunge_deletes",
                "wait_for_merge",
                "ignore_unavailable",
                "allow_no_indices",
                "expand_wildcards",
            ],
            Index::GetFieldMapping => &[
                "include_defaults",
                "local",
                "ignore_unavailable",
                "allow_no_indices",
                "expand_wildcards",
            ],
            Index::GetSettings => &[
                "flat_settings",
                "local",
                "human",
                "include_defaults",
                "ignore_unavailable",
                "allow_no_indices",
                "expand_wildcards",
            ],
            Index::GetTemplate | Index::TemplateExists => &["flat_settings", "local", "master_timeout"],
            Index::PutMapping => &[
                "timeout",
                "master_timeout",
                "update_all_types",
                "ignore_unavailable",
                "allow_no_indices",
                "expand_wildcards",
            ],
            Index::Recovery => &["detailed", "active_only", "human"],
            Index::Refresh | Index::SyncedFlush => &[
                "ignore_unavailable",
                "allow_no_indices",
                "expand_wildcards",
            ],
            Index::Rollover => &["timeout", "master_timeout", "wait_for_active_shards", "dry_run"],
            Index::Segments => &[
                "verbose",
                "human",
                "ignore_unavailable",
                "allow_no_indices",
                "expand_wildcards",
            ],
            Index::ShardStores => &[
                "status",
                "operation_threading",
                "ignore_unavailable",
                "allow_no_indices",
                "expand_wildcards",
            ],
            Index::Shrink => &["timeout", "master_timeout", "wait_for_active_shards"],
            Index::Stats => &[
                "completion_fields",
                "fielddata_fields",
                "fields",
                "groups",
                "level",
                "types",
                "include_segment_file_sizes",
                "human",
            ],
            Index::UpdateSettings => &[
                "master_timeout",
                "preserve_existing",
                "flat_settings",
                "ignore_unavailable",
                "allow_no_indices",
                "expand_wildcards",
            ],
        }
    }

    fn path_keys(&self) -> &'static [&'static str] {
        match self {
            Index::Analyze
            | Index::ClearCache
            | Index::Flush
            | Index::ForceMerge
            | Index::Recovery
            | Index::Refresh
            | Index::Segments
            | Index::ShardStores
            | Index::SyncedFlush
            | Index::UpdateSettings => &["index"],
            Index::Stats => &["index", "metric"],
            Index::Get => &["feature"],
            Index::GetMapping | Index::PutMapping => &["type"],
            Index::GetSettings => &["name"],
            Index::Rollover => &["new_index"],
            _ => &[],
        }
    }

    fn extend_url(&self, url: String, params: &Params) -> String {
        let index = params.get("index").map(escaped);
        match self {
            Index::Stats => path!(index, url, params.get("metric")),
            Index::Get => path!(url, params.get("feature")),
            Index::GetMapping | Index::PutMapping => path!(url, params.get("type").map(escaped)),
            Index::GetSettings => path!(url, params.get("name").map(escaped)),
            Index::Rollover => path!(url, params.get("new_index").map(escaped)),
            Index::Analyze
            | Index::ClearCache
            | Index::Flush
            | Index::ForceMerge
            | Index::Recovery
            | Index::Refresh
            | Index::Segments
            | Index::ShardStores
            | Index::SyncedFlush
            | Index::UpdateSettings => path!(index, url),
            _ => url,
        }
    }

    /// `fielddata` and its older spelling `field_data` select the same
    /// cache; whichever the caller uses is sent under both names.
    fn params(&self, params: &Params, recognized: &[&str]) -> Params {
        let mut filtered = filter_params(params, recognized);
        if *self == Index::ClearCache {
            let value = params
                .get("fielddata")
                .or_else(|| params.get("field_data"))
                .map(str::to_string);
            if let Some(value) = value {
                filtered.insert("fielddata", &value);
                filtered.insert("field_data", &value);
            }
        }
        filtered
    }
}
