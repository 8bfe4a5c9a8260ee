//! Gateway Layer
//!
//! The contract for the remote backend (paginated fetch, mutations,
//! realtime subscriptions) and an in-process implementation of it.

mod memory;
mod subscription;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use memory::MemoryGateway;
pub use subscription::{Subscription, SubscriptionSender};
pub use traits::{GatewayError, GatewayResult, TodoGateway};
pub use types::{CreateTodoInput, Cursor, Filter, Page, PageRequest, UpdateTodoInput};
