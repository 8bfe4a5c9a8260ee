//! In-memory gateway
//!
//! Behaves like the hosted todo API: assigns ids and monotonic
//! `updated_at` stamps, paginates with opaque cursors, filters by owner and
//! fans every create/update out to the matching subscribers.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use super::subscription::{Subscription, SubscriptionSender};
use super::traits::{GatewayError, GatewayResult, TodoGateway};
use super::types::{CreateTodoInput, Cursor, Filter, Page, PageRequest, UpdateTodoInput};
use crate::domain::{Todo, TodoId};

/// In-memory implementation of `TodoGateway`
pub struct MemoryGateway {
    state: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    /// Creation order, which is also the listing order
    todos: Vec<Todo>,
    next_id: u64,
    last_stamp: Option<DateTime<Utc>>,
    created: Vec<Listener>,
    updated: Vec<Listener>,
    /// Returned by the next call instead of doing any work
    injected_failure: Option<GatewayError>,
}

struct Listener {
    filter: Filter,
    sender: SubscriptionSender,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
        }
    }

    /// Store todos as-is, without stamping or notifying subscribers
    pub async fn seed(&self, todos: impl IntoIterator<Item = Todo>) {
        let mut state = self.state.lock().await;
        for todo in todos {
            state.last_stamp = state.last_stamp.max(Some(todo.updated_at));
            state.todos.push(todo);
        }
    }

    /// Make the next gateway call fail with `error`
    pub async fn fail_next(&self, error: GatewayError) {
        self.state.lock().await.injected_failure = Some(error);
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.todos.len()
    }

    /// Number of live subscriptions across both streams
    pub async fn subscriber_count(&self) -> usize {
        let mut state = self.state.lock().await;
        state.prune_closed();
        state.created.len() + state.updated.len()
    }

    async fn subscribe(&self, filter: &Filter, created: bool) -> GatewayResult<Subscription> {
        let mut state = self.state.lock().await;
        state.take_failure()?;

        let (sender, subscription) = Subscription::channel();
        let listener = Listener {
            filter: filter.clone(),
            sender,
        };
        if created {
            state.created.push(listener);
        } else {
            state.updated.push(listener);
        }
        Ok(subscription)
    }
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryState {
    fn take_failure(&mut self) -> GatewayResult<()> {
        match self.injected_failure.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Strictly increasing even when the wall clock stalls or steps back
    fn next_stamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + Duration::milliseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }

    fn prune_closed(&mut self) {
        self.created.retain(|l| !l.sender.is_closed());
        self.updated.retain(|l| !l.sender.is_closed());
    }

    fn publish(listeners: &mut Vec<Listener>, todo: &Todo) {
        listeners.retain(|listener| {
            if !listener.filter.matches(todo) {
                return !listener.sender.is_closed();
            }
            listener.sender.deliver(todo.clone())
        });
    }
}

fn parse_cursor(cursor: &Cursor) -> GatewayResult<usize> {
    cursor
        .as_str()
        .parse::<usize>()
        .map_err(|_| GatewayError::Rejected(format!("invalid cursor {:?}", cursor.as_str())))
}

#[async_trait]
impl TodoGateway for MemoryGateway {
    async fn fetch_page(&self, request: PageRequest) -> GatewayResult<Page> {
        let mut state = self.state.lock().await;
        state.take_failure()?;

        let offset = match &request.cursor {
            Some(cursor) => parse_cursor(cursor)?,
            None => 0,
        };
        let limit = request.limit.max(1) as usize;

        let visible: Vec<&Todo> = state
            .todos
            .iter()
            .filter(|todo| request.filter.matches(todo))
            .collect();
        if offset > visible.len() {
            return Err(GatewayError::Rejected(format!(
                "cursor {offset} is past the end of the list"
            )));
        }
        let end = offset.saturating_add(limit).min(visible.len());
        let items = visible
            .get(offset..end)
            .unwrap_or_default()
            .iter()
            .map(|todo| (*todo).clone())
            .collect();
        let next_cursor = (end < visible.len()).then(|| Cursor::new(end.to_string()));

        Ok(Page::new(items, next_cursor))
    }

    async fn create_todo(&self, input: CreateTodoInput) -> GatewayResult<Todo> {
        let mut state = self.state.lock().await;
        state.take_failure()?;

        if input.name.trim().is_empty() {
            return Err(GatewayError::Rejected("name must not be empty".to_string()));
        }

        state.next_id += 1;
        let todo = Todo {
            id: TodoId::new(format!("todo-{}", state.next_id)),
            name: input.name,
            description: input.description,
            complete: input.complete,
            updated_at: state.next_stamp(),
            owner: input.owner,
        };
        state.todos.push(todo.clone());
        MemoryState::publish(&mut state.created, &todo);

        log::debug!("memory gateway: created {}", todo.id);
        Ok(todo)
    }

    async fn update_todo(&self, input: UpdateTodoInput) -> GatewayResult<Todo> {
        let mut state = self.state.lock().await;
        state.take_failure()?;

        let stamp = state.next_stamp();
        let todo = state
            .todos
            .iter_mut()
            .find(|todo| todo.id == input.id)
            .ok_or_else(|| GatewayError::Rejected(format!("no todo with id {}", input.id)))?;

        if let Some(complete) = input.complete {
            todo.complete = complete;
        }
        if let Some(name) = input.name {
            todo.name = name;
        }
        if let Some(description) = input.description {
            todo.description = Some(description);
        }
        todo.updated_at = stamp;

        let todo = todo.clone();
        MemoryState::publish(&mut state.updated, &todo);

        log::debug!("memory gateway: updated {}", todo.id);
        Ok(todo)
    }

    async fn subscribe_created(&self, filter: &Filter) -> GatewayResult<Subscription> {
        self.subscribe(filter, true).await
    }

    async fn subscribe_updated(&self, filter: &Filter) -> GatewayResult<Subscription> {
        self.subscribe(filter, false).await
    }
}
