//! Todo Entity
//!
//! A single todo as the backend reports it. Field names follow the GraphQL
//! schema (`updatedAt`, ...) on the wire.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::error::{StoreError, StoreResult};

/// Backend-assigned todo identifier. Opaque to the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TodoId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identity of the user that created a todo, as issued by the identity
/// provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Owner(String);

impl Owner {
    pub fn new(owner: impl Into<String>) -> Self {
        Self(owner.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A todo item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Unique identifier
    pub id: TodoId,
    /// Title
    pub name: String,
    /// Optional body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Completion status
    #[serde(default)]
    pub complete: bool,
    /// Set by the backend on every create and update
    pub updated_at: DateTime<Utc>,
    /// Creating user, present when the API filters by owner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
}

impl Todo {
    pub fn new(id: impl Into<TodoId>, name: impl Into<String>, updated_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            complete: false,
            updated_at,
            owner: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn completed(mut self, complete: bool) -> Self {
        self.complete = complete;
        self
    }

    pub fn owned_by(mut self, owner: Owner) -> Self {
        self.owner = Some(owner);
        self
    }
}

impl Entity for Todo {
    type Id = TodoId;
    type Version = DateTime<Utc>;

    fn id(&self) -> &TodoId {
        &self.id
    }

    fn version(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Fields the user submits when creating a todo
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewTodo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewTodo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Name must be non-blank; a description, when given, too.
    pub fn validate(&self) -> StoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(StoreError::Validation {
                field: "name",
                reason: "must not be empty".to_string(),
            });
        }
        if matches!(&self.description, Some(d) if d.trim().is_empty()) {
            return Err(StoreError::Validation {
                field: "description",
                reason: "must not be empty when present".to_string(),
            });
        }
        Ok(())
    }
}
