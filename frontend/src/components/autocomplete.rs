use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use leptos::html::Div;
use leptos::*;
use shared::autocomplete::{ApplyOutcome, Autocomplete, InputOutcome};
use wasm_bindgen::JsCast;

use crate::api::SearchConfig;

type SearchFuture<T> = Pin<Box<dyn Future<Output = Result<Vec<T>, String>>>>;
type SearchFn<T> = Rc<dyn Fn(String) -> SearchFuture<T>>;

/// Reactive wrapper around [`Autocomplete`]: owns the debounce timer and
/// runs the search when it fires.
pub struct AutocompleteHandle<T: 'static> {
    pub state: RwSignal<Autocomplete<T>>,
    pub container: NodeRef<Div>,
    timer: StoredValue<Option<Timeout>>,
    search: StoredValue<SearchFn<T>>,
    debounce_ms: u32,
}

impl<T: 'static> Clone for AutocompleteHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for AutocompleteHandle<T> {}

/// Set up an autocomplete for the current component. `search` is called
/// with the trimmed query once typing pauses.
pub fn use_autocomplete<T, F, Fut>(config: &SearchConfig, search: F) -> AutocompleteHandle<T>
where
    T: Clone + 'static,
    F: Fn(String) -> Fut + 'static,
    Fut: Future<Output = Result<Vec<T>, String>> + 'static,
{
    let search: SearchFn<T> = Rc::new(move |query| Box::pin(search(query)));
    let handle = AutocompleteHandle {
        state: create_rw_signal(Autocomplete::new(config.min_query_len)),
        container: create_node_ref::<Div>(),
        timer: store_value(None),
        search: store_value(search),
        debounce_ms: config.debounce_ms.min(u32::MAX as u64) as u32,
    };

    let listener = window_event_listener(ev::pointerdown, move |ev| {
        let Some(container) = handle.container.get_untracked() else {
            return;
        };
        let inside = ev
            .target()
            .and_then(|target| target.dyn_into::<web_sys::Node>().ok())
            .map(|node| container.contains(Some(&node)))
            .unwrap_or(false);
        if !inside {
            handle.state.update(|s| {
                s.on_outside_pointer_down();
            });
        }
    });
    on_cleanup(move || {
        listener.remove();
        handle.timer.set_value(None);
    });

    handle
}

impl<T: Clone + 'static> AutocompleteHandle<T> {
    /// Returns `true` when the input became too short and whatever depends
    /// on the selection should be cleared.
    pub fn input(&self, value: &str) -> bool {
        // Dropping the old timeout cancels it.
        self.timer.set_value(None);

        match self.state.try_update(|s| s.on_input(value)) {
            Some(InputOutcome::Debounce) => {
                let handle = *self;
                let timeout = Timeout::new(self.debounce_ms, move || handle.fire());
                self.timer.set_value(Some(timeout));
                false
            }
            Some(InputOutcome::Cleared) => true,
            None => false,
        }
    }

    fn fire(&self) {
        let Some(ticket) = self.state.try_update(|s| s.begin_search()).flatten() else {
            return;
        };
        let search = self.search.get_value();
        let state = self.state;

        wasm_bindgen_futures::spawn_local(async move {
            let response = search(ticket.query.clone()).await;
            if let Err(e) = &response {
                log::warn!("Search for '{}' failed: {}", ticket.query, e);
            }
            if let Some(ApplyOutcome::Stale) = state.try_update(|s| s.apply_results(&ticket, response)) {
                log::debug!("Dropped stale results for '{}'", ticket.query);
            }
        });
    }

    pub fn select(&self, index: usize) -> Option<T> {
        self.state.try_update(|s| s.select(index)).flatten()
    }

    pub fn hover(&self, over: bool) {
        self.state.update(|s| s.set_pointer_over_dropdown(over));
    }

    pub fn blur(&self) {
        self.state.update(|s| {
            s.on_blur();
        });
    }

    pub fn is_open(&self) -> bool {
        self.state.with(|s| s.is_open())
    }

    pub fn results(&self) -> Vec<T> {
        self.state.with(|s| s.results().to_vec())
    }
}
