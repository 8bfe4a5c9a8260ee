//! Domain Layer - Core Entity Trait
//!
//! The basic contract for anything the reconciliation map can hold:
//! a stable identifier and a totally ordered version.

use std::fmt::Debug;
use std::hash::Hash;

/// Core trait for synchronized entities
pub trait Entity: Sized + Clone {
    /// The type of the entity's unique identifier
    type Id: Clone + Eq + Hash + Debug;

    /// Backend-assigned version used to order competing writes
    type Version: Ord + Copy + Debug;

    /// Returns the entity's unique identifier
    fn id(&self) -> &Self::Id;

    /// Returns the entity's version
    fn version(&self) -> Self::Version;
}
