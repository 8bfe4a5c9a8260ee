//! Todo Sync
//!
//! Client-side synchronization core for a todo list backed by a remote
//! GraphQL API with realtime subscriptions.
//!
//! Layered architecture:
//! - domain: Todo entity, identifiers and errors
//! - gateway: the remote backend contract and an in-memory implementation
//! - store: the reconciliation store, its reducer and projections
//! - config: JSON settings and logger setup

pub mod config;
pub mod domain;
pub mod gateway;
pub mod store;

pub use config::{ConfigError, SyncConfig};
pub use domain::{Entity, NewTodo, Owner, StoreError, StoreResult, Todo, TodoId};
pub use gateway::{
    Cursor, Filter, GatewayError, GatewayResult, MemoryGateway, Page, PageRequest, Subscription,
    TodoGateway,
};
pub use store::{
    Action, FeedEvent, LiveFeed, Merge, MergeSummary, Projection, StaleEvent, SyncStatus, TodoGroups,
    TodoStore,
};
