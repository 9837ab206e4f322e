use serde::{Deserialize, Serialize};
use tracing::warn;
use train_match_core::{EntryId, Symbol, SymbolMapping};

use crate::pool::{Multi, PoolError, SelectablePool};

/// Custom content registry edited by the player.
///
/// Holds the selectable list of mappings used by the custom game mode plus a
/// deduplicated pool of every symbol offered for matching.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolMappings {
    mappings: SelectablePool<SymbolMapping, Multi>,
    matchees: Vec<Symbol>,
}

impl SymbolMappings {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `symbol` to the matching pool unless an equal symbol of the same
    /// kind is already present. Returns whether the pool grew.
    pub fn add_matchee(&mut self, symbol: Symbol) -> bool {
        let exists = self
            .matchees
            .iter()
            .any(|existing| existing.is_same_kind(&symbol) && *existing == symbol);
        if !exists {
            self.matchees.push(symbol);
        }
        !exists
    }

    /// Drops `symbol` from the matching pool and deselects every mapping
    /// displaying it.
    pub fn remove_matchee(&mut self, symbol: &Symbol) {
        self.matchees.retain(|existing| existing != symbol);
        let affected: Vec<EntryId> = self
            .mappings
            .ids()
            .filter(|id| {
                self.mappings
                    .get(*id)
                    .map_or(false, |mapping| mapping.canonical() == symbol)
            })
            .collect();
        for id in affected {
            if self.mappings.deselect(id).is_err() {
                warn!(entry = id.get(), "mapping vanished while deselecting");
            }
        }
    }

    /// Pool entry equal to `symbol` under kind-specific equality.
    #[must_use]
    pub fn get_matchee(&self, symbol: &Symbol) -> Option<&Symbol> {
        self.matchees
            .iter()
            .find(|existing| existing.is_same_kind(symbol) && *existing == symbol)
    }

    /// Every symbol in the matching pool, in registration order.
    #[must_use]
    pub fn matchees(&self) -> &[Symbol] {
        &self.matchees
    }

    /// Appends an unselected mapping.
    pub fn add(&mut self, mapping: SymbolMapping) -> EntryId {
        self.mappings.add(mapping)
    }

    /// Selects the mapping.
    pub fn select(&mut self, id: EntryId) -> Result<(), PoolError> {
        self.mappings.select(id)
    }

    /// Deselects the mapping.
    pub fn deselect(&mut self, id: EntryId) -> Result<(), PoolError> {
        self.mappings.deselect(id)
    }

    /// Reports whether the mapping is selected.
    pub fn is_selected(&self, id: EntryId) -> Result<bool, PoolError> {
        self.mappings.is_selected(id)
    }

    /// Removes the mapping from the registry.
    pub fn remove(&mut self, id: EntryId) -> Result<SymbolMapping, PoolError> {
        self.mappings.remove(id)
    }

    /// Identifier of the registered mapping equal to `mapping`.
    #[must_use]
    pub fn id_of(&self, mapping: &SymbolMapping) -> Option<EntryId> {
        self.mappings.find(|candidate| candidate == mapping)
    }

    /// Selected mappings in insertion order.
    #[must_use]
    pub fn selected(&self) -> Vec<SymbolMapping> {
        self.mappings.selected().cloned().collect()
    }

    /// Every mapping in insertion order.
    #[must_use]
    pub fn all(&self) -> Vec<SymbolMapping> {
        self.mappings.all().cloned().collect()
    }

    /// Reports whether at least one mapping is selected.
    #[must_use]
    pub fn is_selected_enough(&self) -> bool {
        self.mappings.is_selected_enough()
    }

    /// Number of selected mappings.
    #[must_use]
    pub fn number_of_selected(&self) -> usize {
        self.mappings.number_of_selected()
    }
}
