//! REST client implementing [`TodoStore`] against Firestore.

use super::models::{Document, QueryItem, TodoFields, WriteBody, delete_commit, owner_query};
use crate::account::{domain::UserId, ports::AccessTokenSource};
use crate::config::BackendConfig;
use crate::todo::{
    domain::{NewTodo, Todo, TodoId, TodoPatch},
    ports::{TodoStore, TodoStoreError, TodoStoreResult},
};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Largest number of writes Firestore accepts in one atomic commit.
pub const MAX_BATCH_WRITES: usize = 500;

/// Unexpected HTTP status from the store.
#[derive(Debug, Clone, Error)]
#[error("unexpected status {status}: {body}")]
struct UnexpectedStatus {
    status: StatusCode,
    body: String,
}

/// Task store backed by the Firestore REST API.
#[derive(Debug, Clone)]
pub struct FirestoreTodoStore<T: AccessTokenSource> {
    http: Client,
    documents_url: String,
    collection: String,
    tokens: Arc<T>,
}

impl<T: AccessTokenSource> FirestoreTodoStore<T> {
    /// Creates a store rooted at `documents_url`
    /// (`.../v1/projects/{project}/databases/(default)/documents`).
    #[must_use]
    pub fn new(
        http: Client,
        documents_url: &str,
        collection: impl Into<String>,
        tokens: Arc<T>,
    ) -> Self {
        Self {
            http,
            documents_url: documents_url.trim_end_matches('/').to_owned(),
            collection: collection.into(),
            tokens,
        }
    }

    /// Creates a store from backend configuration.
    #[must_use]
    pub fn from_config(http: Client, config: &BackendConfig, tokens: Arc<T>) -> Self {
        Self::new(
            http,
            &config.documents_url(),
            config.collection.clone(),
            tokens,
        )
    }

    fn document_url(&self, id: &TodoId) -> String {
        format!("{}/{}/{}", self.documents_url, self.collection, id)
    }

    fn request(&self, method: Method, url: &str) -> TodoStoreResult<RequestBuilder> {
        let token = self
            .tokens
            .access_token()
            .ok_or(TodoStoreError::Unauthenticated)?;
        Ok(self.http.request(method, url).bearer_auth(token))
    }

    async fn send(&self, request: RequestBuilder, id: Option<&TodoId>) -> TodoStoreResult<Response> {
        let response = request.send().await.map_err(TodoStoreError::network)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, body, id))
    }

    async fn send_json<R: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        id: Option<&TodoId>,
    ) -> TodoStoreResult<R> {
        self.send(request, id)
            .await?
            .json::<R>()
            .await
            .map_err(TodoStoreError::persistence)
    }

    async fn query_owned(&self, owner: &UserId) -> TodoStoreResult<Vec<Document>> {
        let url = format!("{}:runQuery", self.documents_url);
        let request = self
            .request(Method::POST, &url)?
            .json(&owner_query(&self.collection, owner));
        let items: Vec<QueryItem> = self.send_json(request, None).await?;
        Ok(items.into_iter().filter_map(|item| item.document).collect())
    }

    /// Fetches a task and checks that `owner` may touch it.
    async fn fetch_owned(&self, owner: &UserId, id: &TodoId) -> TodoStoreResult<Document> {
        let request = self.request(Method::GET, &self.document_url(id))?;
        let document: Document = self.send_json(request, Some(id)).await?;
        if &document.owner().map_err(TodoStoreError::persistence)? != owner {
            warn!(todo_id = %id, "refusing to touch a task owned by another user");
            return Err(TodoStoreError::PermissionDenied(id.clone()));
        }
        Ok(document)
    }

    async fn commit_deletes(&self, names: &[String]) -> TodoStoreResult<()> {
        let url = format!("{}:commit", self.documents_url);
        let request = self.request(Method::POST, &url)?.json(&delete_commit(names));
        self.send(request, None).await?;
        Ok(())
    }
}

fn status_error(status: StatusCode, body: String, id: Option<&TodoId>) -> TodoStoreError {
    match (status, id) {
        (StatusCode::UNAUTHORIZED, _) | (StatusCode::FORBIDDEN, None) => {
            TodoStoreError::Unauthenticated
        }
        (StatusCode::FORBIDDEN, Some(id)) => TodoStoreError::PermissionDenied(id.clone()),
        (StatusCode::NOT_FOUND, Some(id)) => TodoStoreError::NotFound(id.clone()),
        _ => TodoStoreError::persistence(UnexpectedStatus { status, body }),
    }
}

fn to_todo(document: Document) -> TodoStoreResult<Todo> {
    document.into_todo().map_err(TodoStoreError::persistence)
}

#[async_trait]
impl<T: AccessTokenSource + 'static> TodoStore for FirestoreTodoStore<T> {
    async fn list(&self, owner: &UserId) -> TodoStoreResult<Vec<Todo>> {
        let documents = self.query_owned(owner).await?;
        debug!(user_id = %owner, count = documents.len(), "listed tasks");
        Ok(documents
            .into_iter()
            .filter_map(|document| match document.into_todo() {
                Ok(todo) => Some(todo),
                Err(err) => {
                    warn!(user_id = %owner, error = %err, "skipping malformed task document");
                    None
                }
            })
            .collect())
    }

    async fn add(&self, todo: NewTodo) -> TodoStoreResult<Todo> {
        let url = format!("{}/{}", self.documents_url, self.collection);
        let body = WriteBody {
            fields: TodoFields::for_new(&todo),
        };
        let request = self.request(Method::POST, &url)?.json(&body);
        let document: Document = self.send_json(request, None).await?;
        let created = to_todo(document)?;
        debug!(todo_id = %created.id(), "created task");
        Ok(created)
    }

    async fn update(
        &self,
        owner: &UserId,
        id: &TodoId,
        patch: &TodoPatch,
    ) -> TodoStoreResult<Todo> {
        self.fetch_owned(owner, id).await?;

        let mut query: Vec<(&str, &str)> = patch
            .field_paths()
            .into_iter()
            .map(|path| ("updateMask.fieldPaths", path))
            .collect();
        query.push(("currentDocument.exists", "true"));
        let body = WriteBody {
            fields: TodoFields::for_patch(patch),
        };
        let request = self
            .request(Method::PATCH, &self.document_url(id))?
            .query(&query)
            .json(&body);
        let document: Document = self.send_json(request, Some(id)).await?;
        debug!(todo_id = %id, fields = ?patch.field_paths(), "merged task update");
        to_todo(document)
    }

    async fn delete(&self, owner: &UserId, id: &TodoId) -> TodoStoreResult<()> {
        self.fetch_owned(owner, id).await?;
        let request = self
            .request(Method::DELETE, &self.document_url(id))?
            .query(&[("currentDocument.exists", "true")]);
        self.send(request, Some(id)).await?;
        debug!(todo_id = %id, "deleted task");
        Ok(())
    }

    async fn delete_all(&self, owner: &UserId) -> TodoStoreResult<usize> {
        let names: Vec<String> = self
            .query_owned(owner)
            .await?
            .into_iter()
            .map(|document| document.name)
            .collect();

        let mut deleted = 0;
        for chunk in names.chunks(MAX_BATCH_WRITES) {
            if let Err(err) = self.commit_deletes(chunk).await {
                if deleted == 0 {
                    return Err(err);
                }
                warn!(user_id = %owner, deleted, "bulk delete stopped part way");
                return Err(TodoStoreError::PartialBatch {
                    deleted,
                    source: Box::new(err),
                });
            }
            deleted += chunk.len();
        }
        debug!(user_id = %owner, deleted, "deleted all tasks");
        Ok(deleted)
    }
}
