//! Gateway request and response types
//!
//! Serialized with the GraphQL schema's field names so an HTTP
//! implementation can send them as operation variables unchanged.

use serde::{Deserialize, Serialize};

use crate::domain::{Owner, Todo, TodoId};

/// Opaque pagination token issued by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Restricts fetches and streams to one owner when set
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
}

impl Filter {
    /// No restriction
    pub fn all() -> Self {
        Self::default()
    }

    pub fn owned_by(owner: Owner) -> Self {
        Self { owner: Some(owner) }
    }

    pub fn matches(&self, todo: &Todo) -> bool {
        match &self.owner {
            Some(owner) => todo.owner.as_ref() == Some(owner),
            None => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    #[serde(rename = "nextToken")]
    pub cursor: Option<Cursor>,
    pub limit: u32,
    pub filter: Filter,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Page {
    pub items: Vec<Todo>,
    #[serde(rename = "nextToken")]
    pub next_cursor: Option<Cursor>,
}

impl Page {
    pub fn new(items: Vec<Todo>, next_cursor: Option<Cursor>) -> Self {
        Self { items, next_cursor }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
}

/// Only the fields that are set are changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoInput {
    pub id: TodoId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complete: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl UpdateTodoInput {
    pub fn set_complete(id: TodoId, complete: bool) -> Self {
        Self {
            id,
            complete: Some(complete),
            name: None,
            description: None,
        }
    }
}
