//! Firestore adapter tests.

use super::helpers::{DOCUMENTS_PATH, TOKEN, document, store};
use mockable::DefaultClock;
use serde_json::json;
use tickbox::account::domain::UserId;
use tickbox::todo::{
    adapters::firestore::MAX_BATCH_WRITES,
    domain::{NewTodo, TodoId, TodoPatch, TodoText},
    ports::{TodoStore, TodoStoreError},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path, query_param},
};

fn ada() -> UserId {
    UserId::new("uid-ada").expect("valid id")
}

fn todo_id(raw: &str) -> TodoId {
    TodoId::new(raw).expect("valid id")
}

fn run_query_path() -> String {
    format!("{DOCUMENTS_PATH}:runQuery")
}

fn document_path(id: &str) -> String {
    format!("{DOCUMENTS_PATH}/todos/{id}")
}

#[tokio::test(flavor = "multi_thread")]
async fn list_queries_by_owner_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(run_query_path()))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .and(body_partial_json(json!({
            "structuredQuery": {
                "from": [{ "collectionId": "todos" }],
                "where": { "fieldFilter": {
                    "field": { "fieldPath": "userId" },
                    "op": "EQUAL",
                    "value": { "stringValue": "uid-ada" }
                }}
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "document": document("t1", "uid-ada", "Buy milk", false), "readTime": "2026-01-01T10:00:00Z" },
            { "document": document("t2", "uid-ada", "Walk dog", true), "readTime": "2026-01-01T10:00:00Z" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let listed = store(&server, Some(TOKEN))
        .list(&ada())
        .await
        .expect("list should succeed");

    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|todo| todo.is_owned_by(&ada())));
    assert!(listed.iter().any(|todo| todo.completed()));
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_query_result_is_an_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(run_query_path()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "readTime": "2026-01-01T10:00:00Z" }])),
        )
        .mount(&server)
        .await;

    let listed = store(&server, Some(TOKEN))
        .list(&ada())
        .await
        .expect("list should succeed");

    assert!(listed.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn blank_stored_text_does_not_hide_the_list() {
    let server = MockServer::start().await;
    let mut orphan = document("t3", "uid-ada", "Orphan", false);
    orphan
        .get_mut("fields")
        .and_then(serde_json::Value::as_object_mut)
        .expect("fields object")
        .remove("userId");
    Mock::given(method("POST"))
        .and(path(run_query_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "document": document("t1", "uid-ada", "Buy milk", false) },
            { "document": document("t2", "uid-ada", "", false) },
            { "document": orphan }
        ])))
        .mount(&server)
        .await;

    let listed = store(&server, Some(TOKEN))
        .list(&ada())
        .await
        .expect("list should succeed");

    let ids: Vec<&str> = listed.iter().map(|todo| todo.id().as_str()).collect();
    assert_eq!(ids, ["t1", "t2"]);
    let blank = listed.last().expect("blank task listed");
    assert_eq!(blank.text().as_str(), "");
}

#[tokio::test(flavor = "multi_thread")]
async fn add_posts_an_unchecked_document() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{DOCUMENTS_PATH}/todos")))
        .and(body_partial_json(json!({
            "fields": {
                "text": { "stringValue": "Buy milk" },
                "completed": { "booleanValue": false },
                "userId": { "stringValue": "uid-ada" }
            }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(document("t9", "uid-ada", "Buy milk", false)),
        )
        .expect(1)
        .mount(&server)
        .await;
    let new_todo = NewTodo::new(
        ada(),
        TodoText::new("Buy milk").expect("valid text"),
        &DefaultClock,
    );

    let created = store(&server, Some(TOKEN))
        .add(new_todo)
        .await
        .expect("add should succeed");

    assert_eq!(created.id().as_str(), "t9");
    assert!(!created.completed());
}

#[tokio::test(flavor = "multi_thread")]
async fn update_merges_only_the_named_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(document_path("t1")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(document("t1", "uid-ada", "Buy milk", false)),
        )
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(document_path("t1")))
        .and(query_param("updateMask.fieldPaths", "completed"))
        .and(query_param("currentDocument.exists", "true"))
        .and(body_partial_json(json!({
            "fields": { "completed": { "booleanValue": true } }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(document("t1", "uid-ada", "Buy milk", true)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let updated = store(&server, Some(TOKEN))
        .update(&ada(), &todo_id("t1"), &TodoPatch::new().with_completed(true))
        .await
        .expect("update should succeed");

    assert!(updated.completed());
    assert_eq!(updated.text().as_str(), "Buy milk");
}

#[tokio::test(flavor = "multi_thread")]
async fn foreign_documents_are_not_written() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(document_path("t1")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(document("t1", "uid-bob", "Fix bike", false)),
        )
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let tasks = store(&server, Some(TOKEN));

    let updated = tasks
        .update(&ada(), &todo_id("t1"), &TodoPatch::new().with_completed(true))
        .await;
    let deleted = tasks.delete(&ada(), &todo_id("t1")).await;

    assert!(matches!(updated, Err(TodoStoreError::PermissionDenied(_))));
    assert!(matches!(deleted, Err(TodoStoreError::PermissionDenied(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_documents_are_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(document_path("gone")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": 404, "message": "Document not found", "status": "NOT_FOUND" }
        })))
        .mount(&server)
        .await;

    let result = store(&server, Some(TOKEN)).delete(&ada(), &todo_id("gone")).await;

    assert!(matches!(result, Err(TodoStoreError::NotFound(id)) if id.as_str() == "gone"));
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_an_owned_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(document_path("t1")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(document("t1", "uid-ada", "Buy milk", false)),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(document_path("t1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    store(&server, Some(TOKEN))
        .delete(&ada(), &todo_id("t1"))
        .await
        .expect("delete should succeed");
}

#[tokio::test(flavor = "multi_thread")]
async fn requests_without_a_token_are_refused_locally() {
    let server = MockServer::start().await;

    let result = store(&server, None).list(&ada()).await;

    assert!(matches!(result, Err(TodoStoreError::Unauthenticated)));
    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_token_is_unauthenticated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(run_query_path()))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = store(&server, Some("expired")).list(&ada()).await;

    assert!(matches!(result, Err(TodoStoreError::Unauthenticated)));
}

async fn mount_owned_documents(server: &MockServer, count: usize) {
    let items: Vec<_> = (0..count)
        .map(|n| json!({ "document": document(&format!("t{n}"), "uid-ada", "task", false) }))
        .collect();
    Mock::given(method("POST"))
        .and(path(run_query_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(items))
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_all_commits_every_owned_document() {
    let server = MockServer::start().await;
    mount_owned_documents(&server, 3).await;
    Mock::given(method("POST"))
        .and(path(format!("{DOCUMENTS_PATH}:commit")))
        .and(body_partial_json(json!({
            "writes": [
                { "delete": "projects/demo/databases/(default)/documents/todos/t0" },
                { "delete": "projects/demo/databases/(default)/documents/todos/t1" },
                { "delete": "projects/demo/databases/(default)/documents/todos/t2" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "writeResults": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let removed = store(&server, Some(TOKEN))
        .delete_all(&ada())
        .await
        .expect("delete all should succeed");

    assert_eq!(removed, 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn failure_after_a_full_commit_reports_partial_progress() {
    let server = MockServer::start().await;
    mount_owned_documents(&server, MAX_BATCH_WRITES + 1).await;
    Mock::given(method("POST"))
        .and(path(format!("{DOCUMENTS_PATH}:commit")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "writeResults": [] })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{DOCUMENTS_PATH}:commit")))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let result = store(&server, Some(TOKEN)).delete_all(&ada()).await;

    let Err(TodoStoreError::PartialBatch { deleted, source }) = result else {
        panic!("expected a partial batch, got {result:?}");
    };
    assert_eq!(deleted, MAX_BATCH_WRITES);
    assert!(matches!(*source, TodoStoreError::Persistence(_)));
}
