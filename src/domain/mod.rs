//! Domain Layer
//!
//! Contains the Todo entity and core abstractions.
//! This layer has no async or transport dependencies.

mod entity;
mod error;
mod todo;

pub use entity::Entity;
pub use error::{StoreError, StoreResult};
pub use todo::{NewTodo, Owner, Todo, TodoId};
