use std::marker::PhantomData;

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};
use shared::callsheet::CallsheetBook;
use shared::week::{week_identifier, WeekId};
use shared::CallsheetEntry;

use crate::storage::{read_for_update, read_or, write, KeyValueStore, CALLSHEETS_KEY};
use crate::utils::today;

/// Per-week entry lists persisted under `callsheets`. Every change rewrites
/// the whole mapping.
#[derive(Debug, Clone, Default)]
pub struct CallsheetRepository<S, E = CallsheetEntry> {
    store: S,
    _entry: PhantomData<E>,
}

impl<S, E> CallsheetRepository<S, E>
where
    S: KeyValueStore,
    E: Serialize + DeserializeOwned + Clone,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            _entry: PhantomData,
        }
    }

    pub fn book(&self) -> CallsheetBook<E> {
        read_or(&self.store, CALLSHEETS_KEY, CallsheetBook::new())
    }

    /// The stored book for a read-modify-write; `None` when it is unreadable.
    fn book_for_update(&self) -> Option<CallsheetBook<E>> {
        read_for_update(&self.store, CALLSHEETS_KEY, CallsheetBook::new())
    }

    fn persist(&self, book: &CallsheetBook<E>) -> bool {
        write(&self.store, CALLSHEETS_KEY, book)
    }

    pub fn entries(&self, week: &WeekId) -> Vec<E> {
        self.book().entries(week).to_vec()
    }

    /// Append to the current week, as of the moment of the call.
    pub fn add_entry(&self, entry: E) -> bool {
        self.add_entry_on(today(), entry)
    }

    pub fn add_entry_on(&self, date: NaiveDate, entry: E) -> bool {
        self.add_entry_for(week_identifier(date), entry)
    }

    pub fn add_entry_for(&self, week: WeekId, entry: E) -> bool {
        let Some(mut book) = self.book_for_update() else {
            return false;
        };
        book.append(week, entry);
        self.persist(&book)
    }

    /// `false` and no change when `index` is out of range.
    pub fn remove_entry(&self, week: &WeekId, index: usize) -> bool {
        let Some(mut book) = self.book_for_update() else {
            return false;
        };
        if book.remove(week, index).is_none() {
            return false;
        }
        self.persist(&book)
    }

    pub fn replace_week(&self, week: WeekId, entries: Vec<E>) -> bool {
        let Some(mut book) = self.book_for_update() else {
            return false;
        };
        book.replace(week, entries);
        self.persist(&book)
    }

    /// Reorder within a week; see [`CallsheetBook::move_entry`].
    pub fn move_entry(&self, week: &WeekId, from: usize, to: usize) -> bool {
        let Some(mut book) = self.book_for_update() else {
            return false;
        };
        if !book.move_entry(week, from, to) {
            return false;
        }
        self.persist(&book)
    }
}

impl<S: KeyValueStore> CallsheetRepository<S, CallsheetEntry> {
    pub fn update_entry(&self, week: &WeekId, index: usize, update: impl FnOnce(&mut CallsheetEntry)) -> bool {
        let Some(mut book) = self.book_for_update() else {
            return false;
        };
        match book.entry_mut(week, index) {
            Some(entry) => update(entry),
            None => return false,
        }
        self.persist(&book)
    }

    /// New paused state of the entry, or `None` when nothing was saved.
    pub fn toggle_pause(&self, week: &WeekId, index: usize) -> Option<bool> {
        let mut book = self.book_for_update()?;
        let paused = book.toggle_pause(week, index)?;
        self.persist(&book).then_some(paused)
    }

    pub fn reset_week(&self, week: &WeekId) -> usize {
        let Some(mut book) = self.book_for_update() else {
            return 0;
        };
        let count = book.reset_week(week);
        if count > 0 && !self.persist(&book) {
            return 0;
        }
        count
    }
}
