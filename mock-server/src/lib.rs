//! In-memory stand-in for a single Elasticsearch node.
//!
//! Speaks enough of the 5.x REST dialect to exercise the client end to end:
//! index lifecycle, typed documents, partial updates, bulk, count, paged
//! search and cluster health. Every index has one shard and scores are
//! constant; there is no query evaluation.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const CLUSTER_NAME: &str = "mock-cluster";

#[derive(Clone, Debug)]
pub struct StoredDoc {
    pub version: u64,
    pub source: Value,
}

/// Documents of one index keyed by `(type, id)`.
pub type Docs = BTreeMap<(String, String), StoredDoc>;

#[derive(Default, Debug)]
pub struct Store {
    indices: BTreeMap<String, Docs>,
}

pub type Db = Arc<RwLock<Store>>;

type Reply = (StatusCode, Json<Value>);

#[derive(Deserialize)]
struct Paging {
    from: Option<usize>,
    size: Option<usize>,
}

impl Store {
    /// Insert or replace a document, creating the index on first write.
    /// Returns the new version and whether the document is new.
    fn put(&mut self, index: &str, doc_type: &str, id: &str, source: Value) -> (u64, bool) {
        let docs = self.indices.entry(index.to_string()).or_default();
        let key = (doc_type.to_string(), id.to_string());
        match docs.get_mut(&key) {
            Some(doc) => {
                doc.version += 1;
                doc.source = source;
                (doc.version, false)
            }
            None => {
                docs.insert(key, StoredDoc { version: 1, source });
                (1, true)
            }
        }
    }

    fn remove(&mut self, index: &str, doc_type: &str, id: &str) -> Option<StoredDoc> {
        self.indices
            .get_mut(index)?
            .remove(&(doc_type.to_string(), id.to_string()))
    }

    /// Resolve a comma-separated index expression; `None` and `_all` mean
    /// every index.
    fn select(&self, expr: Option<&str>) -> Result<Vec<(&String, &Docs)>, Reply> {
        match expr {
            None | Some("_all") => Ok(self.indices.iter().collect()),
            Some(expr) => expr
                .split(',')
                .map(|name| {
                    self.indices
                        .get_key_value(name)
                        .ok_or_else(|| index_not_found(name))
                })
                .collect(),
        }
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/", get(info))
        .route("/_cluster/health", get(health_all))
        .route("/_cluster/health/{index}", get(health_index))
        .route("/_count", get(count_all).post(count_all))
        .route("/_search", get(search_all).post(search_all))
        .route("/_bulk", post(bulk_all))
        .route("/_refresh", post(refresh))
        .route("/{index}", put(create_index).get(get_index).delete(delete_index))
        .route("/{index}/_count", get(count_index).post(count_index))
        .route("/{index}/_search", get(search_index).post(search_index))
        .route("/{index}/_bulk", post(bulk_index))
        .route("/{index}/_refresh", post(refresh))
        .route("/{index}/{doc_type}", post(index_auto_id))
        .route("/{index}/{doc_type}/_bulk", post(bulk_typed))
        .route(
            "/{index}/{doc_type}/{id}",
            get(get_doc).put(index_doc).post(index_doc).delete(delete_doc),
        )
        .route("/{index}/{doc_type}/{id}/_update", post(update_doc))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Elasticsearch-style error body.
fn es_error(status: StatusCode, kind: &str, reason: String) -> Reply {
    let body = json!({
        "error": {
            "root_cause": [{ "type": kind, "reason": reason }],
            "type": kind,
            "reason": reason,
        },
        "status": status.as_u16(),
    });
    (status, Json(body))
}

fn index_not_found(index: &str) -> Reply {
    es_error(
        StatusCode::NOT_FOUND,
        "index_not_found_exception",
        format!("no such index [{index}]"),
    )
}

fn doc_meta(index: &str, doc_type: &str, id: &str, version: u64) -> Map<String, Value> {
    let mut meta = Map::new();
    meta.insert("_index".to_string(), json!(index));
    meta.insert("_type".to_string(), json!(doc_type));
    meta.insert("_id".to_string(), json!(id));
    meta.insert("_version".to_string(), json!(version));
    meta
}

fn write_result(index: &str, doc_type: &str, id: &str, version: u64, created: bool) -> Reply {
    let mut body = doc_meta(index, doc_type, id, version);
    body.insert("result".to_string(), json!(if created { "created" } else { "updated" }));
    body.insert("created".to_string(), json!(created));
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    (status, Json(Value::Object(body)))
}

async fn info() -> Json<Value> {
    Json(json!({
        "name": "mock-node",
        "cluster_name": CLUSTER_NAME,
        "version": { "number": "5.6.0" },
        "tagline": "You Know, for Search",
    }))
}

fn health(store: &Store, expr: Option<&str>) -> Reply {
    match store.select(expr) {
        Ok(indices) => (
            StatusCode::OK,
            Json(json!({
                "cluster_name": CLUSTER_NAME,
                "status": "green",
                "timed_out": false,
                "number_of_nodes": 1,
                "number_of_data_nodes": 1,
                "active_primary_shards": indices.len(),
                "active_shards": indices.len(),
            })),
        ),
        Err(reply) => reply,
    }
}

async fn health_all(State(db): State<Db>) -> Reply {
    let store = db.read().await;
    health(&store, None)
}

async fn health_index(State(db): State<Db>, Path(index): Path<String>) -> Reply {
    let store = db.read().await;
    health(&store, Some(&index))
}

async fn create_index(State(db): State<Db>, Path(index): Path<String>) -> Reply {
    let mut store = db.write().await;
    if store.indices.contains_key(&index) {
        return es_error(
            StatusCode::BAD_REQUEST,
            "index_already_exists_exception",
            format!("index [{index}] already exists"),
        );
    }
    store.indices.insert(index.clone(), Docs::new());
    (
        StatusCode::OK,
        Json(json!({ "acknowledged": true, "shards_acknowledged": true, "index": index })),
    )
}

async fn get_index(State(db): State<Db>, Path(index): Path<String>) -> Reply {
    let store = db.read().await;
    let indices = match store.select(Some(&index)) {
        Ok(indices) => indices,
        Err(reply) => return reply,
    };
    let body: Map<String, Value> = indices
        .into_iter()
        .map(|(name, _)| (name.clone(), json!({ "aliases": {}, "mappings": {}, "settings": {} })))
        .collect();
    (StatusCode::OK, Json(Value::Object(body)))
}

async fn delete_index(State(db): State<Db>, Path(index): Path<String>) -> Reply {
    let removed = db.write().await.indices.remove(&index);
    match removed {
        Some(_) => (StatusCode::OK, Json(json!({ "acknowledged": true }))),
        None => index_not_found(&index),
    }
}

async fn refresh() -> Json<Value> {
    Json(json!({ "_shards": { "total": 1, "successful": 1, "failed": 0 } }))
}

async fn index_doc(
    State(db): State<Db>,
    Path((index, doc_type, id)): Path<(String, String, String)>,
    Json(source): Json<Value>,
) -> Reply {
    let (version, created) = db.write().await.put(&index, &doc_type, &id, source);
    write_result(&index, &doc_type, &id, version, created)
}

async fn index_auto_id(
    State(db): State<Db>,
    Path((index, doc_type)): Path<(String, String)>,
    Json(source): Json<Value>,
) -> Reply {
    let id = Uuid::new_v4().simple().to_string();
    let (version, created) = db.write().await.put(&index, &doc_type, &id, source);
    write_result(&index, &doc_type, &id, version, created)
}

async fn get_doc(
    State(db): State<Db>,
    Path((index, doc_type, id)): Path<(String, String, String)>,
) -> Reply {
    let store = db.read().await;
    let Some(docs) = store.indices.get(&index) else {
        return index_not_found(&index);
    };
    let mut body = doc_meta(&index, &doc_type, &id, 0);
    match docs.get(&(doc_type.clone(), id.clone())) {
        Some(doc) => {
            body.insert("_version".to_string(), json!(doc.version));
            body.insert("found".to_string(), json!(true));
            body.insert("_source".to_string(), doc.source.clone());
            (StatusCode::OK, Json(Value::Object(body)))
        }
        None => {
            body.remove("_version");
            body.insert("found".to_string(), json!(false));
            (StatusCode::NOT_FOUND, Json(Value::Object(body)))
        }
    }
}

async fn delete_doc(
    State(db): State<Db>,
    Path((index, doc_type, id)): Path<(String, String, String)>,
) -> Reply {
    let removed = db.write().await.remove(&index, &doc_type, &id);
    let found = removed.is_some();
    let version = removed.map_or(1, |doc| doc.version + 1);
    let mut body = doc_meta(&index, &doc_type, &id, version);
    body.insert("found".to_string(), json!(found));
    body.insert("result".to_string(), json!(if found { "deleted" } else { "not_found" }));
    let status = if found { StatusCode::OK } else { StatusCode::NOT_FOUND };
    (status, Json(Value::Object(body)))
}

/// Shallow-merge `patch` into `target`.
fn merge(target: &mut Value, patch: &Value) {
    match (target.as_object_mut(), patch.as_object()) {
        (Some(target), Some(patch)) => {
            for (key, value) in patch {
                target.insert(key.clone(), value.clone());
            }
        }
        _ => *target = patch.clone(),
    }
}

async fn update_doc(
    State(db): State<Db>,
    Path((index, doc_type, id)): Path<(String, String, String)>,
    Json(body): Json<Value>,
) -> Reply {
    let mut store = db.write().await;
    let Some(doc) = store
        .indices
        .get_mut(&index)
        .and_then(|docs| docs.get_mut(&(doc_type.clone(), id.clone())))
    else {
        return es_error(
            StatusCode::NOT_FOUND,
            "document_missing_exception",
            format!("[{doc_type}][{id}]: document missing"),
        );
    };
    if let Some(patch) = body.get("doc") {
        merge(&mut doc.source, patch);
    }
    doc.version += 1;
    let mut reply = doc_meta(&index, &doc_type, &id, doc.version);
    reply.insert("result".to_string(), json!("updated"));
    (StatusCode::OK, Json(Value::Object(reply)))
}

fn count(store: &Store, expr: Option<&str>) -> Reply {
    match store.select(expr) {
        Ok(indices) => {
            let total: usize = indices.iter().map(|(_, docs)| docs.len()).sum();
            (
                StatusCode::OK,
                Json(json!({
                    "count": total,
                    "_shards": { "total": indices.len(), "successful": indices.len(), "failed": 0 },
                })),
            )
        }
        Err(reply) => reply,
    }
}

async fn count_all(State(db): State<Db>) -> Reply {
    let store = db.read().await;
    count(&store, None)
}

async fn count_index(State(db): State<Db>, Path(index): Path<String>) -> Reply {
    let store = db.read().await;
    count(&store, Some(&index))
}

fn search(store: &Store, expr: Option<&str>, paging: &Paging) -> Reply {
    let indices = match store.select(expr) {
        Ok(indices) => indices,
        Err(reply) => return reply,
    };
    let all: Vec<Value> = indices
        .iter()
        .flat_map(|(index, docs)| {
            docs.iter().map(move |((doc_type, id), doc)| {
                json!({
                    "_index": index,
                    "_type": doc_type,
                    "_id": id,
                    "_score": 1.0,
                    "_source": doc.source,
                })
            })
        })
        .collect();
    let total = all.len();
    let hits: Vec<Value> = all
        .into_iter()
        .skip(paging.from.unwrap_or(0))
        .take(paging.size.unwrap_or(10))
        .collect();
    (
        StatusCode::OK,
        Json(json!({
            "took": 0,
            "timed_out": false,
            "hits": { "total": total, "max_score": 1.0, "hits": hits },
        })),
    )
}

async fn search_all(State(db): State<Db>, Query(paging): Query<Paging>) -> Reply {
    let store = db.read().await;
    search(&store, None, &paging)
}

async fn search_index(
    State(db): State<Db>,
    Path(index): Path<String>,
    Query(paging): Query<Paging>,
) -> Reply {
    let store = db.read().await;
    search(&store, Some(&index), &paging)
}

fn meta_field(meta: &Value, key: &str, fallback: Option<&str>) -> Option<String> {
    meta.get(key)
        .and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .or_else(|| fallback.map(str::to_string))
}

fn bulk(store: &mut Store, index: Option<&str>, doc_type: Option<&str>, body: &str) -> Reply {
    let mut lines = body.lines().filter(|line| !line.trim().is_empty());
    let mut items = Vec::new();
    let mut errors = false;

    while let Some(line) = lines.next() {
        let header: HashMap<String, Value> = match serde_json::from_str(line) {
            Ok(header) => header,
            Err(e) => {
                return es_error(StatusCode::BAD_REQUEST, "parse_exception", format!("malformed action line: {e}"))
            }
        };
        let Some((action, meta)) = header.into_iter().next() else {
            return es_error(StatusCode::BAD_REQUEST, "parse_exception", "empty action line".to_string());
        };
        let source = if action == "delete" {
            Value::Null
        } else {
            match lines.next().map(serde_json::from_str::<Value>) {
                Some(Ok(source)) => source,
                _ => {
                    return es_error(
                        StatusCode::BAD_REQUEST,
                        "parse_exception",
                        format!("missing source for [{action}]"),
                    )
                }
            }
        };

        let target_index = meta_field(&meta, "_index", index);
        let target_type = meta_field(&meta, "_type", doc_type);
        let (Some(target_index), Some(target_type)) = (target_index, target_type) else {
            errors = true;
            items.push(json!({ action.clone(): { "status": 400, "error": { "type": "action_request_validation_exception", "reason": "index or type is missing" } } }));
            continue;
        };
        let id = meta_field(&meta, "_id", None).unwrap_or_else(|| Uuid::new_v4().simple().to_string());

        let (status, result, version) = match action.as_str() {
            "index" => {
                let (version, created) = store.put(&target_index, &target_type, &id, source);
                (if created { 201 } else { 200 }, if created { "created" } else { "updated" }, version)
            }
            "create" => {
                let exists = store
                    .indices
                    .get(&target_index)
                    .is_some_and(|docs| docs.contains_key(&(target_type.clone(), id.clone())));
                if exists {
                    (409, "conflict", 0)
                } else {
                    let (version, _) = store.put(&target_index, &target_type, &id, source);
                    (201, "created", version)
                }
            }
            "update" => {
                let doc = store
                    .indices
                    .get_mut(&target_index)
                    .and_then(|docs| docs.get_mut(&(target_type.clone(), id.clone())));
                match doc {
                    Some(doc) => {
                        if let Some(patch) = source.get("doc") {
                            merge(&mut doc.source, patch);
                        }
                        doc.version += 1;
                        (200, "updated", doc.version)
                    }
                    None => (404, "not_found", 0),
                }
            }
            "delete" => match store.remove(&target_index, &target_type, &id) {
                Some(doc) => (200, "deleted", doc.version + 1),
                None => (404, "not_found", 1),
            },
            other => {
                return es_error(
                    StatusCode::BAD_REQUEST,
                    "illegal_argument_exception",
                    format!("unknown bulk action [{other}]"),
                )
            }
        };

        errors |= status >= 300 && action != "delete";
        let mut item = doc_meta(&target_index, &target_type, &id, version);
        item.insert("status".to_string(), json!(status));
        item.insert("result".to_string(), json!(result));
        items.push(json!({ action: item }));
    }

    (
        StatusCode::OK,
        Json(json!({ "took": 0, "errors": errors, "items": items })),
    )
}

async fn bulk_all(State(db): State<Db>, body: String) -> Reply {
    let mut store = db.write().await;
    bulk(&mut store, None, None, &body)
}

async fn bulk_index(State(db): State<Db>, Path(index): Path<String>, body: String) -> Reply {
    let mut store = db.write().await;
    bulk(&mut store, Some(&index), None, &body)
}

async fn bulk_typed(
    State(db): State<Db>,
    Path((index, doc_type)): Path<(String, String)>,
    body: String,
) -> Reply {
    let mut store = db.write().await;
    bulk(&mut store, Some(&index), Some(&doc_type), &body)
}
