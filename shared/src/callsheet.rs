//! Week-bucketed callsheet entries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::CallsheetEntry;
use crate::week::WeekId;

/// Mapping from week to the ordered entries of that week. Entries are
/// opaque here; a week's list exists from its first append on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallsheetBook<E> {
    weeks: BTreeMap<WeekId, Vec<E>>,
}

impl<E> Default for CallsheetBook<E> {
    fn default() -> Self {
        Self {
            weeks: BTreeMap::new(),
        }
    }
}

impl<E> CallsheetBook<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self, week: &WeekId) -> &[E] {
        self.weeks.get(week).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn append(&mut self, week: WeekId, entry: E) -> usize {
        let list = self.weeks.entry(week).or_default();
        list.push(entry);
        list.len()
    }

    /// Remove the entry at `index`. Out-of-range indices leave the book
    /// untouched and return `None`.
    pub fn remove(&mut self, week: &WeekId, index: usize) -> Option<E> {
        let list = self.weeks.get_mut(week)?;
        if index >= list.len() {
            return None;
        }
        Some(list.remove(index))
    }

    /// Move the entry at `from` to position `to`. Entries in between shift by
    /// one toward the gap. `false` and no change when either index is out of
    /// range.
    pub fn move_entry(&mut self, week: &WeekId, from: usize, to: usize) -> bool {
        let Some(list) = self.weeks.get_mut(week) else {
            return false;
        };
        if from >= list.len() || to >= list.len() {
            return false;
        }
        let entry = list.remove(from);
        list.insert(to, entry);
        true
    }

    /// Overwrite a week's entries wholesale.
    pub fn replace(&mut self, week: WeekId, entries: Vec<E>) {
        self.weeks.insert(week, entries);
    }

    pub fn entry_mut(&mut self, week: &WeekId, index: usize) -> Option<&mut E> {
        self.weeks.get_mut(week)?.get_mut(index)
    }
}

impl CallsheetBook<CallsheetEntry> {
    /// Reset every entry of the week to `not_called`. Returns how many
    /// entries were touched.
    pub fn reset_week(&mut self, week: &WeekId) -> usize {
        match self.weeks.get_mut(week) {
            Some(list) => {
                list.iter_mut().for_each(CallsheetEntry::reset);
                list.len()
            }
            None => 0,
        }
    }

    /// Flip the paused flag of one entry and return the new state. A newly
    /// paused entry goes to the end of the week's list.
    pub fn toggle_pause(&mut self, week: &WeekId, index: usize) -> Option<bool> {
        let list = self.weeks.get_mut(week)?;
        let entry = list.get_mut(index)?;
        entry.is_paused = !entry.is_paused;
        let paused = entry.is_paused;
        if paused {
            let entry = list.remove(index);
            list.push(entry);
        }
        Some(paused)
    }

    pub fn contains_stop(&self, week: &WeekId, entry: &CallsheetEntry) -> bool {
        self.entries(week).iter().any(|e| e.same_stop(entry))
    }
}
