//! Verify request construction against JSON vectors stored in `test-vectors/`.
//!
//! Each vector names an operation with its arguments and options and
//! describes the request it must produce. Bodies are compared as parsed JSON
//! so field ordering does not matter.

use es_rest::{Cluster, Config, Document, Extender, HttpMethod, Index, RequestBuilder, Search};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:9200";

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "HEAD" => HttpMethod::Head,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            let pair = pair.as_array().unwrap();
            (pair[0].as_str().unwrap().to_string(), pair[1].as_str().unwrap().to_string())
        })
        .collect()
}

fn search(op: &str) -> RequestBuilder<Search> {
    match op {
        "count" => Search::count(),
        "query" => Search::query(),
        "validate" => Search::validate(),
        other => panic!("unknown search op: {other}"),
    }
}

fn document(op: &str, args: &[&str]) -> RequestBuilder<Document> {
    match op {
        "get" => Document::get(args[0], args[1], args[2]),
        "exists" => Document::exists(args[0], args[1], args[2]),
        "delete" => Document::delete(args[0], args[1], args[2]),
        "term_vectors" => Document::term_vectors(args[0], args[1], args[2]),
        other => panic!("unknown document op: {other}"),
    }
}

fn cluster(op: &str) -> RequestBuilder<Cluster> {
    match op {
        "health" => Cluster::health(),
        "state" => Cluster::state(),
        "node_stats" => Cluster::node_stats(),
        "pending_tasks" => Cluster::pending_tasks(),
        other => panic!("unknown cluster op: {other}"),
    }
}

fn index(op: &str, args: &[&str]) -> RequestBuilder<Index> {
    match op {
        "refresh" => Index::refresh(),
        "open" => Index::open(args[0]),
        "get_mapping" => Index::get_mapping(args[0]),
        "clear_cache" => Index::clear_cache(),
        "type_exists" => Index::type_exists(args[0], args[1]),
        other => panic!("unknown index op: {other}"),
    }
}

fn check<E: Extender>(name: &str, builder: RequestBuilder<E>, case: &Value) {
    let mut builder = builder;
    for (key, value) in pairs(&case["options"]) {
        builder = builder.param(key, value);
    }
    if let Some(body) = case.get("body") {
        builder = builder.body(body.clone());
    }

    let expected = &case["expected_request"];
    let req = builder.build(&Config::new(BASE_URL)).unwrap();
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");
    assert_eq!(req.query, pairs(&expected["query"]), "{name}: query");

    match case.get("body") {
        Some(body) => {
            let sent: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&sent, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let op = case["op"].as_str().unwrap();
        let args: Vec<&str> = case["args"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a.as_str().unwrap())
            .collect();

        match case["resource"].as_str().unwrap() {
            "search" => check(name, search(op), case),
            "document" => check(name, document(op, &args), case),
            "cluster" => check(name, cluster(op), case),
            "index" => check(name, index(op, &args), case),
            other => panic!("{name}: unknown resource {other}"),
        }
    }
}
