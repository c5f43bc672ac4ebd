//! Wire types for Firestore documents and queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use crate::account::domain::UserId;
use crate::todo::domain::{NewTodo, PersistedTodoData, Todo, TodoId, TodoPatch, TodoText};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct StringValue {
    #[serde(rename = "stringValue")]
    pub string_value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct BooleanValue {
    #[serde(rename = "booleanValue")]
    pub boolean_value: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct TimestampValue {
    #[serde(rename = "timestampValue")]
    pub timestamp_value: DateTime<Utc>,
}

/// Typed view of the task fields; absent fields are skipped on write so a
/// patch body only carries what it changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TodoFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<StringValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<BooleanValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<StringValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<TimestampValue>,
}

impl TodoFields {
    pub fn for_new(todo: &NewTodo) -> Self {
        Self {
            text: Some(string(todo.text().as_str())),
            completed: Some(BooleanValue {
                boolean_value: false,
            }),
            user_id: Some(string(todo.owner().as_str())),
            created_at: Some(TimestampValue {
                timestamp_value: todo.created_at(),
            }),
        }
    }

    pub fn for_patch(patch: &TodoPatch) -> Self {
        Self {
            text: patch.text().map(|text| string(text.as_str())),
            completed: patch
                .completed()
                .map(|boolean_value| BooleanValue { boolean_value }),
            ..Self::default()
        }
    }
}

fn string(value: &str) -> StringValue {
    StringValue {
        string_value: value.to_owned(),
    }
}

/// Body of a create or patch request.
#[derive(Debug, Serialize)]
pub(super) struct WriteBody {
    pub fields: TodoFields,
}

/// A stored document as returned by the REST API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Document {
    pub name: String,
    #[serde(default)]
    pub fields: TodoFields,
    #[serde(default)]
    pub create_time: Option<DateTime<Utc>>,
}

/// One element of a `:runQuery` response stream.
#[derive(Debug, Deserialize)]
pub(super) struct QueryItem {
    #[serde(default)]
    pub document: Option<Document>,
}

/// A stored document that does not describe a task.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("malformed task document {name}: {reason}")]
pub(super) struct MalformedDocument {
    name: String,
    reason: String,
}

impl MalformedDocument {
    fn new(name: &str, reason: impl Into<String>) -> Self {
        Self {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}

impl Document {
    /// Returns the document identifier, the last segment of its name.
    pub fn id(&self) -> Result<TodoId, MalformedDocument> {
        let segment = self.name.rsplit('/').next().unwrap_or_default();
        TodoId::new(segment).map_err(|err| MalformedDocument::new(&self.name, err.to_string()))
    }

    /// Returns the owning user recorded in the document.
    pub fn owner(&self) -> Result<UserId, MalformedDocument> {
        let raw = self
            .fields
            .user_id
            .as_ref()
            .ok_or_else(|| MalformedDocument::new(&self.name, "missing userId"))?;
        UserId::new(raw.string_value.as_str())
            .map_err(|err| MalformedDocument::new(&self.name, err.to_string()))
    }

    pub fn into_todo(self) -> Result<Todo, MalformedDocument> {
        let id = self.id()?;
        let owner = self.owner()?;
        let text = TodoText::from_stored(
            self.fields
                .text
                .map(|value| value.string_value)
                .unwrap_or_default(),
        );
        let created_at = self
            .fields
            .created_at
            .map(|value| value.timestamp_value)
            .or(self.create_time)
            .ok_or_else(|| MalformedDocument::new(&self.name, "missing creation time"))?;

        Ok(Todo::from_persisted(PersistedTodoData {
            id,
            text,
            completed: self.fields.completed.is_some_and(|value| value.boolean_value),
            owner,
            created_at,
        }))
    }
}

/// Builds the structured query selecting every task of `owner`.
pub(super) fn owner_query(collection: &str, owner: &UserId) -> Value {
    json!({
        "structuredQuery": {
            "from": [{ "collectionId": collection }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": "userId" },
                    "op": "EQUAL",
                    "value": { "stringValue": owner.as_str() }
                }
            }
        }
    })
}

/// Builds an atomic commit deleting the named documents.
pub(super) fn delete_commit(names: &[String]) -> Value {
    let writes: Vec<Value> = names.iter().map(|name| json!({ "delete": name })).collect();
    json!({ "writes": writes })
}
