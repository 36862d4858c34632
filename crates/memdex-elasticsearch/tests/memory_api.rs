//! Facade behaviour against a mocked Elasticsearch endpoint

use std::sync::Arc;

use async_trait::async_trait;
use futures::TryStreamExt;
use memdex::{EmbeddingGenerator, MemoryDb, MemoryError, MemoryFilter, MemoryRecord};
use memdex_elasticsearch::{to_indexable_document, ElasticsearchConfig, ElasticsearchMemory};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct FixedEmbedding(Vec<f32>);

#[async_trait]
impl EmbeddingGenerator for FixedEmbedding {
    async fn generate_embedding(&self, _text: &str) -> Result<Vec<f32>, MemoryError> {
        Ok(self.0.clone())
    }
}

fn memory_for(server: &MockServer, indexable: &[&str]) -> ElasticsearchMemory {
    let config = ElasticsearchConfig::new(server.uri())
        .with_index_prefix("km-")
        .with_indexable_payload_properties(indexable.iter().copied());
    ElasticsearchMemory::new(config, Arc::new(FixedEmbedding(vec![1.0, 0.0, 0.0, 0.0]))).unwrap()
}

fn record(id: &str, color: &str, text: &str) -> MemoryRecord {
    MemoryRecord::new(id)
        .with_vector(vec![1.0, 2.0, 3.0, 4.0])
        .with_tag("tag1", color)
        .with_payload("text", text)
        .with_payload("num", 1)
}

fn hits(records: &[(MemoryRecord, f64)]) -> Value {
    let hits: Vec<Value> = records
        .iter()
        .map(|(r, score)| {
            json!({
                "_index": "km-notes",
                "_id": r.id,
                "_score": score,
                "_source": to_indexable_document(r, &["text".to_string()]).unwrap()
            })
        })
        .collect();
    json!({ "took": 1, "hits": { "total": { "value": hits.len(), "relation": "eq" }, "hits": hits } })
}

fn index_not_found(index: &str) -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({
        "error": {
            "type": "index_not_found_exception",
            "reason": format!("no such index [{index}]")
        },
        "status": 404
    }))
}

async fn mount_refresh(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/km-notes/_refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "_shards": { "successful": 1 } })))
        .mount(server)
        .await;
}

async fn mount_index_exists(server: &MockServer, exists: bool) {
    Mock::given(method("HEAD"))
        .and(path("/km-notes"))
        .respond_with(ResponseTemplate::new(if exists { 200 } else { 404 }))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_list_on_missing_index_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/km-notes/_refresh"))
        .respond_with(index_not_found("km-notes"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/km-notes/_search"))
        .respond_with(index_not_found("km-notes"))
        .mount(&server)
        .await;

    let memory = memory_for(&server, &[]);
    let records: Vec<MemoryRecord> = memory
        .get_list("notes", &[], 10, false)
        .try_collect()
        .await
        .unwrap();

    assert!(records.is_empty());
}

#[tokio::test]
async fn test_list_uses_default_limit_and_decodes_hits() {
    let server = MockServer::start().await;
    mount_refresh(&server).await;
    let red = record("r1", "red", "this is awesome content");
    let black = record("r2", "black", "earth antiquities");
    Mock::given(method("POST"))
        .and(path("/km-notes/_search"))
        .and(body_partial_json(json!({ "from": 0, "size": 10, "query": { "match_all": {} } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(&[(red.clone(), 1.0), (black.clone(), 1.0)])))
        .expect(1)
        .mount(&server)
        .await;

    let memory = memory_for(&server, &[]);
    let records: Vec<MemoryRecord> = memory
        .get_list("notes", &[], 0, false)
        .try_collect()
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, "r1");
    assert_eq!(records[0].tags, red.tags);
    assert_eq!(records[0].payload, red.payload);
    assert!(records[0].vector.is_empty());
    assert_eq!(records[1].id, "r2");
}

#[tokio::test]
async fn test_list_with_vector_restores_embedding() {
    let server = MockServer::start().await;
    mount_refresh(&server).await;
    let red = record("r1", "red", "this is awesome content");
    Mock::given(method("POST"))
        .and(path("/km-notes/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(&[(red.clone(), 1.0)])))
        .mount(&server)
        .await;

    let memory = memory_for(&server, &[]);
    let records: Vec<MemoryRecord> = memory
        .get_list("notes", &[], 5, true)
        .try_collect()
        .await
        .unwrap();

    assert_eq!(records, vec![red]);
}

#[tokio::test]
async fn test_list_sends_translated_filter() {
    let server = MockServer::start().await;
    mount_refresh(&server).await;
    Mock::given(method("POST"))
        .and(path("/km-notes/_search"))
        .and(body_partial_json(json!({
            "query": { "match": { "tag_tag1.na": { "query": "black" } } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(&[])))
        .expect(1)
        .mount(&server)
        .await;

    let memory = memory_for(&server, &[]);
    let filters = [MemoryFilter::new().by_tag("tag1", "black"), MemoryFilter::new()];
    let records: Vec<MemoryRecord> = memory
        .get_list("notes", &filters, 10, false)
        .try_collect()
        .await
        .unwrap();

    assert!(records.is_empty());
}

#[tokio::test]
async fn test_search_failure_carries_engine_reason() {
    let server = MockServer::start().await;
    mount_refresh(&server).await;
    Mock::given(method("POST"))
        .and(path("/km-notes/_search"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "type": "search_phase_execution_exception", "reason": "all shards failed" },
            "status": 400
        })))
        .mount(&server)
        .await;

    let memory = memory_for(&server, &[]);
    let result: Result<Vec<MemoryRecord>, MemoryError> =
        memory.get_list("notes", &[], 10, false).try_collect().await;

    match result {
        Err(MemoryError::IndexOperation { index, reason }) => {
            assert_eq!(index, "km-notes");
            assert!(reason.contains("all shards failed"));
        }
        other => panic!("expected IndexOperation, got {other:?}"),
    }
}

#[tokio::test]
async fn test_streams_are_lazy() {
    let server = MockServer::start().await;
    let memory = memory_for(&server, &["text"]);

    let list = memory.get_list("notes", &[], 10, false);
    let similar = memory.get_similar_list("notes", "earth", &[], 10, false);
    drop(list);
    drop(similar);

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_index_is_idempotent() {
    let server = MockServer::start().await;
    mount_index_exists(&server, true).await;
    Mock::given(method("PUT"))
        .and(path("/km-notes"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let memory = memory_for(&server, &[]);
    memory.create_index("notes", 4).await.unwrap();
}

#[tokio::test]
async fn test_create_index_sends_mapping() {
    let server = MockServer::start().await;
    mount_index_exists(&server, false).await;
    Mock::given(method("PUT"))
        .and(path("/km-notes"))
        .and(body_partial_json(json!({
            "mappings": { "properties": { "vector": { "type": "dense_vector", "dims": 4 } } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "acknowledged": true })))
        .expect(1)
        .mount(&server)
        .await;

    let memory = memory_for(&server, &[]);
    memory.create_index("notes", 4).await.unwrap();
}

#[tokio::test]
async fn test_create_index_failure_is_raised() {
    let server = MockServer::start().await;
    mount_index_exists(&server, false).await;
    Mock::given(method("PUT"))
        .and(path("/km-notes"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "type": "illegal_argument_exception", "reason": "bad dims" },
            "status": 400
        })))
        .mount(&server)
        .await;

    let memory = memory_for(&server, &[]);
    let err = memory.create_index("notes", 4).await.unwrap_err();
    assert!(matches!(err, MemoryError::IndexOperation { .. }));
    assert!(err.to_string().contains("bad dims"));
}

#[tokio::test]
async fn test_delete_index_failure_is_tolerated() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/km-notes"))
        .respond_with(index_not_found("km-notes"))
        .expect(1)
        .mount(&server)
        .await;

    let memory = memory_for(&server, &[]);
    memory.delete_index("notes").await.unwrap();
}

#[tokio::test]
async fn test_list_indexes_strips_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/km-*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "km-notes": { "aliases": {} },
            "km-docs": { "aliases": {} }
        })))
        .mount(&server)
        .await;

    let memory = memory_for(&server, &[]);
    let indexes = memory.list_indexes().await.unwrap();
    assert_eq!(indexes, vec!["docs", "notes"]);
}

#[tokio::test]
async fn test_upsert_requires_existing_index() {
    let server = MockServer::start().await;
    mount_index_exists(&server, false).await;
    Mock::given(method("PUT"))
        .and(path("/km-notes/_doc/r1"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let memory = memory_for(&server, &[]);
    let err = memory
        .upsert("notes", &record("r1", "red", "x"))
        .await
        .unwrap_err();
    assert!(err.is_index_not_found());
}

#[tokio::test]
async fn test_upsert_reports_rejected_existence_check() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/km-notes"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/km-notes/_doc/r1"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let memory = memory_for(&server, &[]);
    let err = memory
        .upsert("notes", &record("r1", "red", "x"))
        .await
        .unwrap_err();

    assert!(!err.is_index_not_found());
    match err {
        MemoryError::IndexOperation { index, reason } => {
            assert_eq!(index, "km-notes");
            assert!(reason.contains("401"));
        }
        other => panic!("expected IndexOperation, got {other:?}"),
    }
}

#[tokio::test]
async fn test_upsert_many_reports_unavailable_cluster() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/km-notes"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let memory = memory_for(&server, &[]);
    let err = memory
        .upsert_many("notes", &[record("r1", "red", "x")])
        .await
        .unwrap_err();
    assert!(matches!(err, MemoryError::IndexOperation { .. }));
}

#[tokio::test]
async fn test_upsert_rejects_empty_index_name() {
    let server = MockServer::start().await;
    let memory = memory_for(&server, &[]);

    let err = memory.upsert("", &record("r1", "red", "x")).await.unwrap_err();
    assert!(matches!(err, MemoryError::InvalidArgument(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_upsert_indexes_document_under_record_id() {
    let server = MockServer::start().await;
    mount_index_exists(&server, true).await;
    Mock::given(method("PUT"))
        .and(path("/km-notes/_doc/r1"))
        .and(body_partial_json(json!({
            "id": "r1",
            "tag_tag1": ["red"],
            "txt_text": "this is awesome content"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "result": "created" })))
        .expect(1)
        .mount(&server)
        .await;

    let memory = memory_for(&server, &["text"]);
    let id = memory
        .upsert("notes", &record("r1", "red", "this is awesome content"))
        .await
        .unwrap();
    assert_eq!(id, "r1");
}

#[tokio::test]
async fn test_upsert_many_aggregates_item_errors() {
    let server = MockServer::start().await;
    mount_index_exists(&server, true).await;
    Mock::given(method("POST"))
        .and(path("/km-notes/_bulk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "took": 5,
            "errors": true,
            "items": [
                { "index": { "_id": "r1", "status": 400,
                    "error": { "type": "mapper_parsing_exception", "reason": "failed to parse [vector]" } } },
                { "index": { "_id": "r2", "status": 201, "result": "created" } },
                { "index": { "_id": "r3", "status": 400,
                    "error": { "type": "illegal_argument_exception", "reason": "dims mismatch" } } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let memory = memory_for(&server, &[]);
    let records = [
        record("r1", "red", "a"),
        record("r2", "blue", "b"),
        record("r3", "black", "c"),
    ];
    let err = memory.upsert_many("notes", &records).await.unwrap_err();

    match &err {
        MemoryError::BulkWrite { index, errors } => {
            assert_eq!(index, "km-notes");
            assert_eq!(errors.len(), 2);
        }
        other => panic!("expected BulkWrite, got {other:?}"),
    }
    let message = err.to_string();
    assert!(message.contains("r1") && message.contains("failed to parse [vector]"));
    assert!(message.contains("r3") && message.contains("dims mismatch"));
}

#[tokio::test]
async fn test_upsert_many_fails_when_errors_lack_details() {
    let server = MockServer::start().await;
    mount_index_exists(&server, true).await;
    Mock::given(method("POST"))
        .and(path("/km-notes/_bulk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "errors": true, "items": [] })))
        .mount(&server)
        .await;

    let memory = memory_for(&server, &[]);
    let err = memory
        .upsert_many("notes", &[record("r1", "red", "a")])
        .await
        .unwrap_err();
    assert!(matches!(err, MemoryError::BulkWrite { ref errors, .. } if errors.len() == 1));
}

#[tokio::test]
async fn test_upsert_many_returns_ids() {
    let server = MockServer::start().await;
    mount_index_exists(&server, true).await;
    Mock::given(method("POST"))
        .and(path("/km-notes/_bulk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "errors": false, "items": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let memory = memory_for(&server, &[]);
    let ids = memory
        .upsert_many("notes", &[record("r1", "red", "a"), record("r2", "blue", "b")])
        .await
        .unwrap();
    assert_eq!(ids, vec!["r1", "r2"]);
}

#[tokio::test]
async fn test_delete_missing_record_is_ok() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/km-notes/_doc/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "_index": "km-notes", "_id": "gone", "result": "not_found"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let memory = memory_for(&server, &[]);
    memory.delete("notes", &MemoryRecord::new("gone")).await.unwrap();
}

#[tokio::test]
async fn test_delete_from_missing_index_fails() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/km-nowhere/_doc/r1"))
        .respond_with(index_not_found("km-nowhere"))
        .mount(&server)
        .await;

    let memory = memory_for(&server, &[]);
    let err = memory
        .delete("nowhere", &MemoryRecord::new("r1"))
        .await
        .unwrap_err();
    assert!(err.is_index_not_found());
}

#[tokio::test]
async fn test_replace_document_deletes_then_inserts() {
    let server = MockServer::start().await;
    mount_index_exists(&server, true).await;
    mount_refresh(&server).await;
    Mock::given(method("POST"))
        .and(path("/km-notes/_delete_by_query"))
        .and(body_partial_json(json!({
            "query": { "term": { "tag___document_id.keyword": { "value": "doc-1" } } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "deleted": 2, "failures": [] })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/km-notes/_bulk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "errors": false, "items": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let memory = memory_for(&server, &[]);
    let records = [
        record("r3", "red", "new").with_document_id("doc-1"),
        record("r4", "red", "newer").with_document_id("doc-1"),
    ];
    let ids = memory.replace_document("notes", "doc-1", &records).await.unwrap();
    assert_eq!(ids, vec!["r3", "r4"]);

    let requests = server.received_requests().await.unwrap();
    let delete_at = requests
        .iter()
        .position(|r| r.url.path() == "/km-notes/_delete_by_query")
        .unwrap();
    let bulk_at = requests
        .iter()
        .position(|r| r.url.path() == "/km-notes/_bulk")
        .unwrap();
    assert!(delete_at < bulk_at);
}

#[tokio::test]
async fn test_replace_document_fails_on_version_conflicts() {
    let server = MockServer::start().await;
    mount_index_exists(&server, true).await;
    mount_refresh(&server).await;
    Mock::given(method("POST"))
        .and(path("/km-notes/_delete_by_query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "deleted": 0, "version_conflicts": 2, "failures": []
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/km-notes/_bulk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "errors": false, "items": [] })))
        .expect(0)
        .mount(&server)
        .await;

    let memory = memory_for(&server, &[]);
    let err = memory
        .replace_document("notes", "doc-1", &[record("c", "red", "new").with_document_id("doc-1")])
        .await
        .unwrap_err();

    assert!(matches!(err, MemoryError::IndexOperation { .. }));
    assert!(err.to_string().contains("version conflicts"));
}

#[tokio::test]
async fn test_replace_document_does_not_proceed_on_conflicts() {
    let server = MockServer::start().await;
    mount_index_exists(&server, true).await;
    mount_refresh(&server).await;
    Mock::given(method("POST"))
        .and(path("/km-notes/_delete_by_query"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "deleted": 1,
            "version_conflicts": 1,
            "failures": [ { "index": "km-notes", "id": "a", "status": 409,
                "cause": { "type": "version_conflict_engine_exception", "reason": "version conflict" } } ]
        })))
        .mount(&server)
        .await;

    let memory = memory_for(&server, &[]);
    let err = memory
        .replace_document("notes", "doc-1", &[record("c", "red", "new")])
        .await
        .unwrap_err();
    assert!(matches!(err, MemoryError::IndexOperation { .. }));

    let requests = server.received_requests().await.unwrap();
    let delete = requests
        .iter()
        .find(|r| r.url.path() == "/km-notes/_delete_by_query")
        .unwrap();
    assert!(delete.url.query_pairs().all(|(key, _)| key != "conflicts"));
}

#[tokio::test]
async fn test_replace_document_on_missing_index_fails() {
    let server = MockServer::start().await;
    mount_index_exists(&server, false).await;

    let memory = memory_for(&server, &[]);
    let err = memory
        .replace_document("notes", "doc-1", &[record("r1", "red", "x")])
        .await
        .unwrap_err();
    assert!(err.is_index_not_found());
}

#[tokio::test]
async fn test_similarity_search_uses_knn_with_prefilter() {
    let server = MockServer::start().await;
    mount_refresh(&server).await;
    let near = record("near", "red", "a");
    let far = record("far", "red", "b");
    Mock::given(method("POST"))
        .and(path("/km-notes/_search"))
        .and(body_partial_json(json!({
            "size": 3,
            "query": {
                "knn": {
                    "field": "vector",
                    "num_candidates": 6,
                    "query_vector": [1.0, 0.0, 0.0, 0.0],
                    "filter": { "match": { "tag_tag1.na": { "query": "red" } } }
                }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(&[(near, 0.93), (far, 0.41)])))
        .expect(1)
        .mount(&server)
        .await;

    let memory = memory_for(&server, &[]);
    let filters = [MemoryFilter::new().by_tag("tag1", "red")];
    let results: Vec<(MemoryRecord, f64)> = memory
        .get_similar_list("notes", "anything", &filters, 3, false)
        .try_collect()
        .await
        .unwrap();

    let ids: Vec<&str> = results.iter().map(|(r, _)| r.id.as_str()).collect();
    assert_eq!(ids, vec!["near", "far"]);
    assert!(results[0].1 >= results[1].1);
    assert_eq!(results[0].1, 0.93);
}

#[tokio::test]
async fn test_similarity_search_with_huge_limit() {
    let server = MockServer::start().await;
    mount_refresh(&server).await;
    Mock::given(method("POST"))
        .and(path("/km-notes/_search"))
        .and(body_partial_json(json!({ "query": { "knn": { "num_candidates": usize::MAX } } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(&[])))
        .expect(1)
        .mount(&server)
        .await;

    let memory = memory_for(&server, &[]);
    let results: Vec<(MemoryRecord, f64)> = memory
        .get_similar_list("notes", "anything", &[], usize::MAX, false)
        .try_collect()
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_keyword_search_without_indexable_properties_yields_nothing() {
    let server = MockServer::start().await;
    let memory = memory_for(&server, &[]);

    let records: Vec<MemoryRecord> = memory
        .search_keyword("notes", "earth", &[], 10, false)
        .try_collect()
        .await
        .unwrap();

    assert!(records.is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_keyword_search_combines_text_and_filter() {
    let server = MockServer::start().await;
    mount_refresh(&server).await;
    let hit = record("r2", "black", "the moon is the only earth satellite");
    Mock::given(method("POST"))
        .and(path("/km-notes/_search"))
        .and(body_partial_json(json!({
            "query": { "bool": { "must": [
                { "multi_match": { "query": "earth", "fields": ["txt_text"] } },
                { "match": { "tag_tag2.na": { "query": "day" } } }
            ] } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(&[(hit, 1.2)])))
        .expect(1)
        .mount(&server)
        .await;

    let memory = memory_for(&server, &["text"]);
    let filters = [MemoryFilter::new().by_tag("tag2", "day")];
    let records: Vec<MemoryRecord> = memory
        .search_keyword("notes", "earth", &filters, 10, false)
        .try_collect()
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "r2");
}

#[tokio::test]
async fn test_get_missing_record_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/km-notes/_doc/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "_index": "km-notes", "_id": "gone", "found": false
        })))
        .mount(&server)
        .await;

    let memory = memory_for(&server, &[]);
    assert!(memory.get("notes", "gone", false).await.unwrap().is_none());
}

#[tokio::test]
async fn test_count_on_missing_index_is_zero() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/km-notes/_refresh"))
        .respond_with(index_not_found("km-notes"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/km-notes/_count"))
        .respond_with(index_not_found("km-notes"))
        .mount(&server)
        .await;

    let memory = memory_for(&server, &[]);
    assert_eq!(memory.count("notes", &[]).await.unwrap(), 0);
}
