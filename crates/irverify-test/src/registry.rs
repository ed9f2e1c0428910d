//! Ordered ownership registry for harness modules.
//!
//! Primary and additional modules live in one list. The primary entry, when
//! present, is always at the front, so iteration order is verification order:
//! primary first, then additional modules in creation order.

use irverify_core::{IrModule, ModuleId};

/// Which slot a registry entry occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// The distinguished, lazily created module.
    Primary,
    /// Any module created explicitly.
    Additional,
}

/// A module owned by the registry.
#[derive(Debug)]
pub struct ModuleEntry<M> {
    /// Slot tag.
    pub slot: Slot,
    /// The owned module.
    pub module: M,
}

/// Ordered registry owning every module a harness created.
#[derive(Debug)]
pub struct ModuleRegistry<M> {
    entries: Vec<ModuleEntry<M>>,
}

impl<M> Default for ModuleRegistry<M> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<M: IrModule> ModuleRegistry<M> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the primary slot is filled.
    #[must_use]
    pub fn has_primary(&self) -> bool {
        self.entries
            .first()
            .is_some_and(|entry| entry.slot == Slot::Primary)
    }

    /// Returns the primary module, if any.
    #[must_use]
    pub fn primary(&self) -> Option<&M> {
        self.entries
            .first()
            .filter(|entry| entry.slot == Slot::Primary)
            .map(|entry| &entry.module)
    }

    /// Returns the primary module, filling the slot with `create()` first if empty.
    pub fn primary_or_insert_with(&mut self, create: impl FnOnce() -> M) -> &mut M {
        if !self.has_primary() {
            self.entries.insert(
                0,
                ModuleEntry {
                    slot: Slot::Primary,
                    module: create(),
                },
            );
        }
        &mut self.entries[0].module
    }

    /// Appends an additional module and returns it.
    pub fn push_additional(&mut self, module: M) -> &mut M {
        let index = self.entries.len();
        self.entries.push(ModuleEntry {
            slot: Slot::Additional,
            module,
        });
        &mut self.entries[index].module
    }

    /// Number of owned modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no module is owned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a module by id.
    #[must_use]
    pub fn get(&self, id: ModuleId) -> Option<&M> {
        self.entries
            .iter()
            .map(|entry| &entry.module)
            .find(|module| module.id() == id)
    }

    /// Looks up a module by id, mutably.
    pub fn get_mut(&mut self, id: ModuleId) -> Option<&mut M> {
        self.entries
            .iter_mut()
            .map(|entry| &mut entry.module)
            .find(|module| module.id() == id)
    }

    /// Iterates entries in verification order.
    pub fn iter(&self) -> impl Iterator<Item = &ModuleEntry<M>> {
        self.entries.iter()
    }

    /// Iterates entries mutably in verification order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ModuleEntry<M>> {
        self.entries.iter_mut()
    }
}
