//! Cluster-level APIs: health, settings, node information, state.

use crate::body::Body;
use crate::builder::RequestBuilder;
use crate::extender::Extender;
use crate::http::HttpMethod;
use crate::params::Params;
use crate::path;
use crate::path::escaped;

/// Cluster operations. Optional node ids, metrics and index names are given
/// as options (`node_id`, `metric`, `index`) and end up in the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cluster {
    Health,
    GetSettings,
    UpdateSettings,
    NodeHotThreads,
    NodeInfo,
    NodeStats,
    PendingTasks,
    Reroute,
    State,
    Stats,
}

impl Cluster {
    pub fn health() -> RequestBuilder<Cluster> {
        RequestBuilder::new(Cluster::Health, HttpMethod::Get, path!("_cluster", "health"))
    }

    pub fn get_settings() -> RequestBuilder<Cluster> {
        RequestBuilder::new(Cluster::GetSettings, HttpMethod::Get, path!("_cluster", "settings"))
    }

    pub fn update_settings(body: impl Into<Body>) -> RequestBuilder<Cluster> {
        RequestBuilder::new(Cluster::UpdateSettings, HttpMethod::Put, path!("_cluster", "settings"))
            .body(body)
    }

    pub fn node_hot_threads() -> RequestBuilder<Cluster> {
        RequestBuilder::new(Cluster::NodeHotThreads, HttpMethod::Get, path!("_nodes"))
    }

    pub fn node_info() -> RequestBuilder<Cluster> {
        RequestBuilder::new(Cluster::NodeInfo, HttpMethod::Get, path!("_nodes"))
    }

    pub fn node_stats() -> RequestBuilder<Cluster> {
        RequestBuilder::new(Cluster::NodeStats, HttpMethod::Get, path!("_nodes"))
    }

    pub fn pending_tasks() -> RequestBuilder<Cluster> {
        RequestBuilder::new(Cluster::PendingTasks, HttpMethod::Get, path!("_cluster", "pending_tasks"))
    }

    pub fn reroute(body: impl Into<Body>) -> RequestBuilder<Cluster> {
        RequestBuilder::new(Cluster::Reroute, HttpMethod::Post, path!("_cluster", "reroute")).body(body)
    }

    pub fn state() -> RequestBuilder<Cluster> {
        RequestBuilder::new(Cluster::State, HttpMethod::Get, path!("_cluster", "state"))
    }

    pub fn stats() -> RequestBuilder<Cluster> {
        RequestBuilder::new(Cluster::Stats, HttpMethod::Get, path!("_cluster", "stats"))
    }
}

impl Extender for Cluster {
    fn recognized_keys(&self) -> &'static [&'static str] {
        match self {
            Cluster::Health => &[
                "level",
                "local",
                "master_timeout",
                "timeout",
                "wait_for_active_shards",
                "wait_for_nodes",
                "wait_for_events",
                "wait_for_no_relocating_shards",
                "wait_for_status",
            ],
            Cluster::GetSettings => &["flat_settings", "include_defaults", "master_timeout", "timeout"],
            Cluster::UpdateSettings => &["flat_settings", "master_timeout", "timeout"],
            Cluster::NodeHotThreads => &[
                "ignore_idle_threads",
                "interval",
                "snapshots",
                "threads",
                "type",
                "timeout",
            ],
            Cluster::NodeInfo => &["flat_settings", "timeout"],
            Cluster::NodeStats => &[
                "completion_fields",
                "fielddata_fields",
                "fields",
                "groups",
                "level",
                "types",
                "timeout",
            ],
            Cluster::PendingTasks => &["local", "master_timeout"],
            Cluster::Reroute => &[
                "dry_run",
                "explain",
                "metric",
                "retry_failed",
                "master_timeout",
                "timeout",
            ],
            Cluster::State => &[
                "local",
                "master_timeout",
                "flat_settings",
                "ignore_unavailable",
                "allow_no_indices",
                "expand_wildcards",
            ],
            Cluster::Stats => &["flat_settings", "timeout"],
        }
    }

    fn path_keys(&self) -> &'static [&'static str] {
        match self {
            Cluster::Health => &["index"],
            Cluster::NodeHotThreads | Cluster::Stats => &["node_id"],
            Cluster::NodeInfo | Cluster::NodeStats => &["node_id", "metric"],
            Cluster::State => &["metric", "index"],
            _ => &[],
        }
    }

    fn extend_url(&self, url: String, params: &Params) -> String {
        let node_id = params.get("node_id");
        let metric = params.get("metric");
        match self {
            Cluster::Health => path!(url, params.get("index").map(escaped)),
            Cluster::NodeHotThreads => path!(url, node_id, "hot_threads"),
            // A metric alone would be read as a node id.
            Cluster::NodeInfo => {
                let node_id = node_id.or(metric.map(|_| "_all"));
                path!(url, node_id, metric)
            }
            Cluster::NodeStats => path!(url, node_id, "stats", metric),
            Cluster::State => {
                let index = params.get("index");
                let metric = metric.or(index.map(|_| "_all"));
                path!(url, metric, index.map(escaped))
            }
            Cluster::Stats => path!(url, node_id.map(|id| vec!["nodes", id])),
            _ => url,
        }
    }
}
