//! Store actions
//!
//! Every change to the store's state is one of these, applied by
//! `TodoStore::dispatch`.

use crate::domain::{StoreError, Todo};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// One todo from the create or update stream
    Upsert(Todo),
    /// Every todo from a fully drained initial fetch
    LoadInitial(Vec<Todo>),
    /// A fetch failed; items are left as they are
    Fail(StoreError),
}

/// Counts of what a dispatched action did to the items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeSummary {
    pub inserted: usize,
    pub replaced: usize,
    pub discarded: usize,
}
