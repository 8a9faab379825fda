//! In-memory lead lists and their persistence hook.
//!
//! [`LeadStore`] owns two independent lists: the transient results of the
//! most recent search and the saved leads. Only the saved list is durable;
//! every change to it is written through the store's [`LeadStorage`].

use uuid::Uuid;

use crate::error::StorageError;
use crate::lead::Lead;
use crate::storage::LeadStorage;

/// Which list a mutation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListTarget {
    Results,
    Saved,
}

/// Owner of the transient results and the persisted saved-leads list.
///
/// Mutations on a missing id are silent no-ops; the `bool` they return only
/// reports whether anything changed. A failed write keeps the in-memory
/// change and is held until [`LeadStore::take_persist_error`] collects it.
pub struct LeadStore<S: LeadStorage> {
    results: Vec<Lead>,
    saved: Vec<Lead>,
    storage: S,
    persist_error: Option<StorageError>,
}

impl<S: LeadStorage> LeadStore<S> {
    /// Open the store, loading the saved list from `storage` once.
    pub fn open(storage: S) -> Self {
        let saved = storage.load();
        tracing::debug!(count = saved.len(), "saved leads loaded");
        Self {
            results: Vec::new(),
            saved,
            storage,
            persist_error: None,
        }
    }

    #[must_use]
    pub fn results(&self) -> &[Lead] {
        &self.results
    }

    #[must_use]
    pub fn saved(&self) -> &[Lead] {
        &self.saved
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    #[must_use]
    pub fn find_result(&self, id: Uuid) -> Option<&Lead> {
        self.results.iter().find(|l| l.id == id)
    }

    #[must_use]
    pub fn find_saved(&self, id: Uuid) -> Option<&Lead> {
        self.saved.iter().find(|l| l.id == id)
    }

    /// Flip `called` on the lead with `id` in the chosen list.
    pub fn toggle_called(&mut self, id: Uuid, target: ListTarget) -> bool {
        let list = match target {
            ListTarget::Results => &mut self.results,
            ListTarget::Saved => &mut self.saved,
        };
        let Some(lead) = list.iter_mut().find(|l| l.id == id) else {
            return false;
        };
        lead.called = !lead.called;

        if target == ListTarget::Saved {
            self.persist_saved();
        }
        true
    }

    /// Insert `lead` at the front of the saved list unless a saved entry
    /// already has the same `(name, phone)`.
    pub fn save_lead(&mut self, lead: Lead) -> bool {
        if self.saved.iter().any(|l| l.is_duplicate_of(&lead)) {
            tracing::debug!(name = %lead.name, "lead already saved; skipping");
            return false;
        }
        self.saved.insert(0, lead);
        self.persist_saved();
        true
    }

    /// Delete the saved lead with `id`.
    pub fn remove_lead(&mut self, id: Uuid) -> bool {
        let before = self.saved.len();
        self.saved.retain(|l| l.id != id);
        if self.saved.len() == before {
            return false;
        }
        self.persist_saved();
        true
    }

    /// Overwrite the notes of the saved lead with `id`.
    pub fn update_notes(&mut self, id: Uuid, notes: impl Into<String>) -> bool {
        let Some(lead) = self.saved.iter_mut().find(|l| l.id == id) else {
            return false;
        };
        lead.notes = notes.into();
        self.persist_saved();
        true
    }

    /// Replace the transient results wholesale.
    pub fn replace_search_results(&mut self, leads: Vec<Lead>) {
        self.results = leads;
    }

    pub fn clear_search_results(&mut self) {
        self.results.clear();
    }

    /// The most recent write failure since the last call, if any.
    ///
    /// A later successful write clears it, since the slot then matches memory.
    pub fn take_persist_error(&mut self) -> Option<StorageError> {
        self.persist_error.take()
    }

    /// `Err` when the saved list in memory differs from what was written.
    ///
    /// # Errors
    ///
    /// Returns the pending [`StorageError`] from the last failed write.
    pub fn check_persisted(&mut self) -> Result<(), StorageError> {
        self.take_persist_error().map_or(Ok(()), Err)
    }

    fn persist_saved(&mut self) {
        match self.storage.persist(&self.saved) {
            Ok(()) => self.persist_error = None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to persist saved leads");
                self.persist_error = Some(e);
            }
        }
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
