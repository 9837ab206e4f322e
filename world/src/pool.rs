//! Collections with per-entry selection flags.
//!
//! Entries receive a stable [`EntryId`] when added; every lookup goes through
//! that identifier. The [`SelectionPolicy`] decides how many entries may be
//! selected at once.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use train_match_core::EntryId;

/// Lookup failures raised by selectable pools.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PoolError {
    /// The identifier does not belong to any entry of the pool.
    #[error("entry {} is not part of this pool", .0.get())]
    UnknownEntry(EntryId),
}

/// Selection cardinality of a pool.
pub trait SelectionPolicy {
    /// Whether selecting an entry clears every other selection first.
    const EXCLUSIVE: bool;
}

/// At most one entry selected at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Single;

impl SelectionPolicy for Single {
    const EXCLUSIVE: bool = true;
}

/// Any number of entries selected independently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Multi;

impl SelectionPolicy for Multi {
    const EXCLUSIVE: bool = false;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Entry<T> {
    id: EntryId,
    value: T,
    selected: bool,
}

/// Ordered collection of values, each carrying a selection flag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Serialize",
    deserialize = "T: Deserialize<'de>"
))]
pub struct SelectablePool<T, P> {
    entries: Vec<Entry<T>>,
    next_id: u32,
    #[serde(skip)]
    policy: PhantomData<P>,
}

impl<T, P> Default for SelectablePool<T, P> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
            policy: PhantomData,
        }
    }
}

impl<T, P: SelectionPolicy> SelectablePool<T, P> {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an unselected entry and returns its identifier.
    pub fn add(&mut self, value: T) -> EntryId {
        let id = EntryId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push(Entry {
            id,
            value,
            selected: false,
        });
        id
    }

    /// Selects the entry. Exclusive pools deselect every other entry first.
    pub fn select(&mut self, id: EntryId) -> Result<(), PoolError> {
        let index = self.index_of(id)?;
        if P::EXCLUSIVE {
            for entry in &mut self.entries {
                entry.selected = false;
            }
        }
        self.entries[index].selected = true;
        Ok(())
    }

    /// Clears the entry's selection flag.
    pub fn deselect(&mut self, id: EntryId) -> Result<(), PoolError> {
        let index = self.index_of(id)?;
        self.entries[index].selected = false;
        Ok(())
    }

    /// Reports whether the entry is selected.
    pub fn is_selected(&self, id: EntryId) -> Result<bool, PoolError> {
        let index = self.index_of(id)?;
        Ok(self.entries[index].selected)
    }

    /// Removes the entry, returning its value.
    pub fn remove(&mut self, id: EntryId) -> Result<T, PoolError> {
        let index = self.index_of(id)?;
        Ok(self.entries.remove(index).value)
    }

    /// Looks up an entry's value.
    pub fn get(&self, id: EntryId) -> Result<&T, PoolError> {
        let index = self.index_of(id)?;
        Ok(&self.entries[index].value)
    }

    /// Selected values in insertion order.
    pub fn selected(&self) -> impl Iterator<Item = &T> {
        self.entries
            .iter()
            .filter(|entry| entry.selected)
            .map(|entry| &entry.value)
    }

    /// Every value in insertion order.
    pub fn all(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|entry| &entry.value)
    }

    /// Every identifier in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = EntryId> + '_ {
        self.entries.iter().map(|entry| entry.id)
    }

    /// Number of entries in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the pool has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of selected entries.
    #[must_use]
    pub fn number_of_selected(&self) -> usize {
        self.entries.iter().filter(|entry| entry.selected).count()
    }

    /// Reports whether at least one entry is selected.
    #[must_use]
    pub fn is_selected_enough(&self) -> bool {
        self.entries.iter().any(|entry| entry.selected)
    }

    /// Identifier of the first entry whose value satisfies `predicate`.
    pub fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<EntryId> {
        self.entries
            .iter()
            .find(|entry| predicate(&entry.value))
            .map(|entry| entry.id)
    }

    fn index_of(&self, id: EntryId) -> Result<usize, PoolError> {
        self.entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(PoolError::UnknownEntry(id))
    }
}

impl<T> SelectablePool<T, Single> {
    /// The selected value, if any.
    #[must_use]
    pub fn current(&self) -> Option<&T> {
        self.selected().next()
    }
}
