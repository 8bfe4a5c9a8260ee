//! Read projections over the store
//!
//! A projection borrows the store and does no work until iterated. Each
//! iteration filters and sorts the current snapshot again, so a projection
//! can be walked any number of times.

use std::cmp::Ordering;

use serde::Serialize;

use super::reconcile::{Entry, ReconcileMap};
use crate::domain::{Todo, TodoId};

/// Projection with plain function pointers, as used by the fixed views
pub type FixedProjection<'a> = Projection<'a, fn(&Todo) -> bool, fn(&Todo, &Todo) -> Ordering>;

pub struct Projection<'a, P, C> {
    items: &'a ReconcileMap<Todo>,
    predicate: P,
    comparator: C,
}

impl<'a, P, C> Projection<'a, P, C>
where
    P: Fn(&Todo) -> bool,
    C: Fn(&Todo, &Todo) -> Ordering,
{
    pub(crate) fn new(items: &'a ReconcileMap<Todo>, predicate: P, comparator: C) -> Self {
        Self {
            items,
            predicate,
            comparator,
        }
    }

    /// Matching todos in comparator order; ties keep first-insertion order.
    pub fn iter(&self) -> std::vec::IntoIter<&'a Todo> {
        let items: &'a ReconcileMap<Todo> = self.items;
        let mut matched: Vec<&'a Entry<Todo>> = items
            .entries()
            .filter(|entry| (self.predicate)(&entry.value))
            .collect();
        matched.sort_by(|a, b| (self.comparator)(&a.value, &b.value).then(a.seq.cmp(&b.seq)));

        matched
            .into_iter()
            .map(|entry| &entry.value)
            .collect::<Vec<_>>()
            .into_iter()
    }

    pub fn ids(&self) -> Vec<TodoId> {
        self.iter().map(|todo| todo.id.clone()).collect()
    }

    /// Owned snapshot, detached from the store
    pub fn to_vec(&self) -> Vec<Todo> {
        self.iter().cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.items
            .entries()
            .filter(|entry| (self.predicate)(&entry.value))
            .count()
    }
}

impl<'p, 'a, P, C> IntoIterator for &'p Projection<'a, P, C>
where
    P: Fn(&Todo) -> bool,
    C: Fn(&Todo, &Todo) -> Ordering,
{
    type Item = &'a Todo;
    type IntoIter = std::vec::IntoIter<&'a Todo>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Both fixed views as owned lists, ready to hand to a renderer
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TodoGroups {
    pub incomplete: Vec<Todo>,
    pub complete: Vec<Todo>,
}

pub fn is_incomplete(todo: &Todo) -> bool {
    !todo.complete
}

pub fn is_complete(todo: &Todo) -> bool {
    todo.complete
}

pub fn most_recent_first(a: &Todo, b: &Todo) -> Ordering {
    b.updated_at.cmp(&a.updated_at)
}
