//! Gateway Layer - Core Traits
//!
//! Defines the abstract interface to the todo backend.
//! Implementations can talk to a hosted GraphQL API, an in-memory
//! backend, a scripted test double, etc.

use async_trait::async_trait;
use thiserror::Error;

use super::subscription::Subscription;
use super::types::{CreateTodoInput, Filter, Page, PageRequest, UpdateTodoInput};
use crate::domain::Todo;

/// Common result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Gateway-level errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Network or protocol failure
    #[error("transport error: {0}")]
    Transport(String),
    /// The identity provider rejected the current session
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// The backend refused the request (bad input, unknown id, ...)
    #[error("rejected by backend: {0}")]
    Rejected(String),
}

/// Remote todo backend
///
/// All operations are async; the store awaits them one at a time.
#[async_trait]
pub trait TodoGateway: Send + Sync {
    /// Fetch one page of todos. `next_cursor` is None on the last page.
    async fn fetch_page(&self, request: PageRequest) -> GatewayResult<Page>;

    /// Create a todo, returning the backend's copy
    async fn create_todo(&self, input: CreateTodoInput) -> GatewayResult<Todo>;

    /// Update fields of an existing todo, returning the backend's copy
    async fn update_todo(&self, input: UpdateTodoInput) -> GatewayResult<Todo>;

    /// Stream of todos created after the call
    async fn subscribe_created(&self, filter: &Filter) -> GatewayResult<Subscription>;

    /// Stream of todos updated after the call
    async fn subscribe_updated(&self, filter: &Filter) -> GatewayResult<Subscription>;
}
