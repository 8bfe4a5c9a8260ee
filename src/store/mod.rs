//! Reconciliation Store
//!
//! Owns the client's copy of the todo list. The initial paginated fetch and
//! the create/update streams all feed the same id-keyed merge, so a todo seen
//! through several paths, or delivered twice, ends up as one entry holding
//! its newest version.
//!
//! Intents (create, toggle) go to the gateway only. Their effect reaches the
//! store through the event streams or the next `load_initial`.

mod action;
mod feed;
mod projection;
mod reconcile;


use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::{ConfigError, SyncConfig};
use crate::domain::{NewTodo, Owner, StoreError, StoreResult, Todo, TodoId};
use crate::gateway::{
    CreateTodoInput, Cursor, Filter, GatewayError, PageRequest, TodoGateway, UpdateTodoInput,
};

pub use action::{Action, MergeSummary};
pub use feed::{FeedEvent, LiveFeed};
pub use projection::{
    is_complete, is_incomplete, most_recent_first, FixedProjection, Projection, TodoGroups,
};
pub use reconcile::{Entry, Merge, ReconcileMap};

/// Default page size for `load_initial`
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// A stale event that was dropped by the merge
#[derive(Debug, Clone, PartialEq)]
pub struct StaleEvent {
    pub incoming: Todo,
    pub stored: Todo,
}

type StaleHook = Box<dyn Fn(&StaleEvent) + Send + Sync>;

/// Outcome of the most recent initial load
#[derive(Debug, Clone, PartialEq)]
pub enum SyncStatus {
    Unloaded,
    Settled { loaded_at: DateTime<Utc>, fetched: usize },
    Failed(StoreError),
}

pub struct TodoStore<G: TodoGateway + ?Sized> {
    gateway: Arc<G>,
    filter: Filter,
    page_limit: u32,
    items: ReconcileMap<Todo>,
    status: SyncStatus,
    stale_discards: u64,
    stale_hook: Option<StaleHook>,
}

impl<G: TodoGateway + ?Sized> TodoStore<G> {
    pub fn new(gateway: Arc<G>, filter: Filter) -> Self {
        Self {
            gateway,
            filter,
            page_limit: DEFAULT_PAGE_LIMIT,
            items: ReconcileMap::new(),
            status: SyncStatus::Unloaded,
            stale_discards: 0,
            stale_hook: None,
        }
    }

    /// Build a store from settings. `identity` is the signed-in user, required
    /// when `owner_only` is set.
    pub fn from_config(
        gateway: Arc<G>,
        config: &SyncConfig,
        identity: Option<Owner>,
    ) -> Result<Self, ConfigError> {
        let filter = match (config.owner_only, identity) {
            (true, Some(owner)) => Filter::owned_by(owner),
            (true, None) => return Err(ConfigError::MissingIdentity),
            (false, _) => Filter::all(),
        };
        Ok(Self::new(gateway, filter).with_page_limit(config.page_limit))
    }

    pub fn with_page_limit(mut self, page_limit: u32) -> Self {
        self.page_limit = page_limit.max(1);
        self
    }

    /// Called for every event dropped as stale
    pub fn with_stale_hook(mut self, hook: impl Fn(&StaleEvent) + Send + Sync + 'static) -> Self {
        self.stale_hook = Some(Box::new(hook));
        self
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn status(&self) -> &SyncStatus {
        &self.status
    }

    pub fn stale_discards(&self) -> u64 {
        self.stale_discards
    }

    pub fn get(&self, id: &TodoId) -> Option<&Todo> {
        self.items.get(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // ========================
    // Reducer
    // ========================

    pub fn dispatch(&mut self, action: Action) -> MergeSummary {
        let mut summary = MergeSummary::default();
        match action {
            Action::Upsert(todo) => self.merge(todo, &mut summary),
            Action::LoadInitial(todos) => {
                let fetched = todos.len();
                for todo in todos {
                    self.merge(todo, &mut summary);
                }
                self.status = SyncStatus::Settled {
                    loaded_at: Utc::now(),
                    fetched,
                };
            }
            Action::Fail(error) => {
                self.status = SyncStatus::Failed(error);
            }
        }
        summary
    }

    fn merge(&mut self, todo: Todo, summary: &mut MergeSummary) {
        match self.items.upsert(todo) {
            Merge::Inserted => summary.inserted += 1,
            Merge::Replaced => summary.replaced += 1,
            Merge::Discarded { incoming, stored } => {
                summary.discarded += 1;
                self.stale_discards += 1;
                log::debug!(
                    "discarding stale event for {} ({} < {})",
                    incoming.id,
                    incoming.updated_at,
                    stored.updated_at
                );
                if let Some(hook) = &self.stale_hook {
                    hook(&StaleEvent { incoming, stored });
                }
            }
        }
    }

    // ========================
    // Synchronization
    // ========================

    /// Fetch every page, then merge them all at once.
    ///
    /// Nothing is merged until the last page arrives: on failure, or if this
    /// future is dropped mid-drain, the items are left untouched.
    pub async fn load_initial(&mut self) -> StoreResult<usize> {
        match self.drain_pages().await {
            Ok(todos) => {
                let fetched = todos.len();
                let summary = self.dispatch(Action::LoadInitial(todos));
                log::info!(
                    "initial load: {} fetched, {} new, {} replaced, {} stale",
                    fetched,
                    summary.inserted,
                    summary.replaced,
                    summary.discarded
                );
                Ok(fetched)
            }
            Err(error) => {
                log::warn!("initial load failed: {}", error);
                self.dispatch(Action::Fail(error.clone()));
                Err(error)
            }
        }
    }

    async fn drain_pages(&self) -> StoreResult<Vec<Todo>> {
        let mut todos = Vec::new();
        let mut cursor: Option<Cursor> = None;
        let mut seen: HashSet<Cursor> = HashSet::new();
        let mut pages = 0usize;

        loop {
            let page = self
                .gateway
                .fetch_page(PageRequest {
                    cursor: cursor.clone(),
                    limit: self.page_limit,
                    filter: self.filter.clone(),
                })
                .await?;
            pages += 1;
            todos.extend(page.items);

            match page.next_cursor {
                // a repeated cursor means the backend would page forever
                Some(next) if !seen.insert(next.clone()) => {
                    return Err(GatewayError::Rejected(format!(
                        "pagination cursor {:?} was already visited",
                        next.as_str()
                    ))
                    .into());
                }
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        log::debug!("drained {} page(s), {} todo(s)", pages, todos.len());
        Ok(todos)
    }

    pub fn on_create_event(&mut self, todo: Todo) -> MergeSummary {
        self.dispatch(Action::Upsert(todo))
    }

    pub fn on_update_event(&mut self, todo: Todo) -> MergeSummary {
        self.dispatch(Action::Upsert(todo))
    }

    pub fn apply_feed_event(&mut self, event: FeedEvent) -> MergeSummary {
        match event {
            FeedEvent::Created(todo) => self.on_create_event(todo),
            FeedEvent::Updated(todo) => self.on_update_event(todo),
        }
    }

    /// Open the create and update streams with this store's filter.
    pub async fn subscribe(&self) -> StoreResult<LiveFeed> {
        let created = self.gateway.subscribe_created(&self.filter).await?;
        let updated = self.gateway.subscribe_updated(&self.filter).await?;
        log::debug!("subscribed to todo events ({:?})", self.filter);
        Ok(LiveFeed::new(created, updated))
    }

    /// Wait for one event from `feed` and merge it. None once the feed ended.
    pub async fn pump(&mut self, feed: &mut LiveFeed) -> Option<MergeSummary> {
        let event = feed.next().await?;
        Some(self.apply_feed_event(event))
    }

    // ========================
    // Intents
    // ========================

    /// Send a create mutation. The new todo arrives through the create stream.
    pub async fn submit_create(&self, new_todo: NewTodo) -> StoreResult<()> {
        new_todo.validate()?;

        let input = CreateTodoInput {
            name: new_todo.name,
            description: new_todo.description,
            complete: false,
            owner: self.filter.owner.clone(),
        };
        let created = self.gateway.create_todo(input).await?;
        log::debug!("create accepted as {}", created.id);
        Ok(())
    }

    /// Send an update flipping `complete`. The change arrives through the
    /// update stream.
    pub async fn submit_toggle(&self, id: &TodoId) -> StoreResult<()> {
        let current = self
            .items
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let input = UpdateTodoInput::set_complete(id.clone(), !current.complete);
        self.gateway.update_todo(input).await?;
        Ok(())
    }

    // ========================
    // Projections
    // ========================

    pub fn project_by<P, C>(&self, predicate: P, comparator: C) -> Projection<'_, P, C>
    where
        P: Fn(&Todo) -> bool,
        C: Fn(&Todo, &Todo) -> Ordering,
    {
        Projection::new(&self.items, predicate, comparator)
    }

    /// Incomplete todos, most recently updated first
    pub fn incomplete(&self) -> FixedProjection<'_> {
        self.project_by(
            is_incomplete as fn(&Todo) -> bool,
            most_recent_first as fn(&Todo, &Todo) -> Ordering,
        )
    }

    /// Complete todos, most recently updated first
    pub fn complete(&self) -> FixedProjection<'_> {
        self.project_by(
            is_complete as fn(&Todo) -> bool,
            most_recent_first as fn(&Todo, &Todo) -> Ordering,
        )
    }

    pub fn grouped(&self) -> TodoGroups {
        TodoGroups {
            incomplete: self.incomplete().to_vec(),
            complete: self.complete().to_vec(),
        }
    }
}
