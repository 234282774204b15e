//! Per-input autocomplete state.
//!
//! ```text
//! Idle ──keystroke──▶ Debouncing ──timer──▶ Searching ──≥1 result──▶ ShowingResults
//!  ▲                                            │                        │
//!  └──── short input / 0 results / error ───────┴── select / blur / outside click
//! ```
//!
//! The machine owns no timers and performs no I/O. The widget restarts its
//! debounce timer when [`Autocomplete::on_input`] says so, calls
//! [`Autocomplete::begin_search`] when the timer fires, and hands the
//! response back with the [`SearchTicket`] it got. Any keystroke or newer
//! search invalidates older tickets, so a late response for a stale query
//! is dropped instead of overwriting newer results.

use std::time::Duration;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Debouncing,
    Searching,
    ShowingResults,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    pub query: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Input too short: cancel any timer, clear dependent fields and the
    /// current selection.
    Cleared,
    /// (Re)start the debounce timer.
    Debounce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Shown(usize),
    Hidden,
    /// Response for a superseded request.
    Stale,
}

#[derive(Debug, Clone)]
pub struct Autocomplete<T> {
    phase: Phase,
    query: String,
    results: Vec<T>,
    selected: Option<T>,
    generation: u64,
    pointer_over_dropdown: bool,
    min_query_len: usize,
}

impl<T: Clone> Default for Autocomplete<T> {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_QUERY_LEN)
    }
}

impl<T: Clone> Autocomplete<T> {
    pub fn new(min_query_len: usize) -> Self {
        Self {
            phase: Phase::Idle,
            query: String::new(),
            results: Vec::new(),
            selected: None,
            generation: 0,
            pointer_over_dropdown: false,
            min_query_len,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn results(&self) -> &[T] {
        &self.results
    }

    pub fn selected(&self) -> Option<&T> {
        self.selected.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.phase == Phase::ShowingResults
    }

    pub fn on_input(&mut self, value: &str) -> InputOutcome {
        self.generation += 1;
        self.query = value.trim().to_string();

        if self.query.chars().count() < self.min_query_len {
            self.close();
            self.selected = None;
            return InputOutcome::Cleared;
        }

        self.phase = Phase::Debouncing;
        InputOutcome::Debounce
    }

    /// Debounce timer fired. Returns `None` if nothing is pending.
    pub fn begin_search(&mut self) -> Option<SearchTicket> {
        if self.phase != Phase::Debouncing {
            return None;
        }
        self.generation += 1;
        self.phase = Phase::Searching;
        Some(SearchTicket {
            generation: self.generation,
            query: self.query.clone(),
        })
    }

    /// Apply a search response. Errors count as "no results".
    pub fn apply_results<E>(&mut self, ticket: &SearchTicket, response: Result<Vec<T>, E>) -> ApplyOutcome {
        if ticket.generation != self.generation || self.phase != Phase::Searching {
            return ApplyOutcome::Stale;
        }

        match response {
            Ok(results) if !results.is_empty() => {
                let count = results.len();
                self.results = results;
                self.phase = Phase::ShowingResults;
                ApplyOutcome::Shown(count)
            }
            _ => {
                self.close();
                ApplyOutcome::Hidden
            }
        }
    }

    /// Pick the result at `index` from the open dropdown.
    pub fn select(&mut self, index: usize) -> Option<T> {
        if self.phase != Phase::ShowingResults {
            return None;
        }
        let chosen = self.results.get(index).cloned()?;
        self.selected = Some(chosen.clone());
        self.close();
        Some(chosen)
    }

    pub fn set_pointer_over_dropdown(&mut self, over: bool) {
        self.pointer_over_dropdown = over;
    }

    /// Focus left the input. Kept open while the pointer is on the dropdown
    /// so a click on a result still lands.
    pub fn on_blur(&mut self) -> bool {
        if self.pointer_over_dropdown || self.phase != Phase::ShowingResults {
            return false;
        }
        self.close();
        true
    }

    /// Pointer-down outside the widget's container.
    pub fn on_outside_pointer_down(&mut self) -> bool {
        if self.phase != Phase::ShowingResults {
            return false;
        }
        self.close();
        true
    }

    fn close(&mut self) {
        self.phase = Phase::Idle;
        self.results.clear();
        self.pointer_over_dropdown = false;
    }
}
