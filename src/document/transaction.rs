//! Undo journal of an open operation.

use crate::document::entity::{Entity, EntityId};
use std::collections::BTreeMap;

/// The inverse of one applied mutation.
#[derive(Debug, Clone)]
pub(crate) enum JournalEntry {
    /// The entity did not exist before.
    Inserted(EntityId),
    /// The entity existed with this value and was removed.
    Removed(EntityId, Entity),
    /// The entity had this value before it was changed.
    Modified(EntityId, Entity),
}

#[derive(Debug, Clone)]
pub(crate) struct Transaction {
    pub name: String,
    journal: Vec<JournalEntry>,
}

impl Transaction {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            journal: Vec::new(),
        }
    }

    pub fn record(&mut self, entry: JournalEntry) {
        self.journal.push(entry);
    }

    pub fn len(&self) -> usize {
        self.journal.len()
    }

    /// Undo every recorded mutation, newest first.
    pub fn rollback(self, entities: &mut BTreeMap<EntityId, Entity>) {
        for entry in self.journal.into_iter().rev() {
            match entry {
                JournalEntry::Inserted(id) => {
                    entities.remove(&id);
                },
                JournalEntry::Removed(id, entity) | JournalEntry::Modified(id, entity) => {
                    entities.insert(id, entity);
                },
            }
        }
    }
}
