//! # Selection
//!
//! Selection state machine. A set with one member is always the single
//! selection, never a one-element multi-selection.

use serde::{Deserialize, Serialize};

use crate::object::ObjectId;

/// Current selection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    None,
    Single(ObjectId),
    /// Two or more objects, in the order they were added
    Multi(Vec<ObjectId>),
}

impl Selection {
    fn from_ids(mut ids: Vec<ObjectId>) -> Self {
        match ids.len() {
            0 => Selection::None,
            1 => Selection::Single(ids.remove(0)),
            _ => Selection::Multi(ids),
        }
    }

    /// Replaces the selection with `id`.
    pub fn select(&mut self, id: ObjectId) {
        *self = Selection::Single(id);
    }

    /// Adds `id` when absent, removes it when present.
    pub fn toggle(&mut self, id: ObjectId) {
        let mut ids = self.ids();
        match ids.iter().position(|selected| *selected == id) {
            Some(index) => {
                ids.remove(index);
            }
            None => ids.push(id),
        }
        *self = Self::from_ids(ids);
    }

    pub fn clear(&mut self) {
        *self = Selection::None;
    }

    /// Drops `id` if it is selected (the object went away).
    pub fn remove(&mut self, id: ObjectId) {
        if self.contains(id) {
            self.toggle(id);
        }
    }

    pub fn ids(&self) -> Vec<ObjectId> {
        match self {
            Selection::None => Vec::new(),
            Selection::Single(id) => vec![*id],
            Selection::Multi(ids) => ids.clone(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Selection::None => 0,
            Selection::Single(_) => 1,
            Selection::Multi(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::None)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        match self {
            Selection::None => false,
            Selection::Single(selected) => *selected == id,
            Selection::Multi(ids) => ids.contains(&id),
        }
    }

    /// The single selected object, if exactly one is selected.
    pub fn single(&self) -> Option<ObjectId> {
        match self {
            Selection::Single(id) => Some(*id),
            _ => None,
        }
    }
}
