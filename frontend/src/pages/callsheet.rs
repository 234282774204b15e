use leptos::*;
use shared::address::AddressSelector;
use shared::{CallStatus, CallsheetEntry, Customer, CustomerSearchResult};

use crate::api::{ApiClient, SearchConfig};
use crate::components::address_selector::AddressSelectorField;
use crate::components::customer_search::CustomerSearch;
use crate::components::form_errors::{MessageList, Severity};
use crate::repo::{CallsheetRepository, CustomerRepository};
use crate::storage::BrowserStore;
use crate::utils::{current_week, week_heading};

fn callsheets() -> CallsheetRepository<BrowserStore> {
    CallsheetRepository::new(BrowserStore)
}

fn customers() -> CustomerRepository<BrowserStore> {
    CustomerRepository::new(BrowserStore)
}

/// Optional text field: blank becomes `None`.
fn optional_text(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn row_class(entry: &CallsheetEntry) -> &'static str {
    match (entry.is_paused, entry.status.is_called()) {
        (true, _) => "callsheet-row paused",
        (false, true) => "callsheet-row called",
        (false, false) => "callsheet-row",
    }
}

#[component]
pub fn CallsheetPage() -> impl IntoView {
    let api = store_value(SearchConfig::default());
    let week = create_rw_signal(current_week());
    let entries = create_rw_signal(Vec::<CallsheetEntry>::new());
    let errors = create_rw_signal(Vec::<String>::new());
    let notices = create_rw_signal(Vec::<String>::new());

    // Customer being added
    let search_text = create_rw_signal(String::new());
    let picked = create_rw_signal(Option::<Customer>::None);
    let selector = create_rw_signal(AddressSelector::default());

    create_effect(move |_| {
        let current = week.get();
        entries.set(callsheets().entries(&current));
    });

    let reload = move || entries.set(callsheets().entries(&week.get_untracked()));

    let clear_pick = move || {
        picked.set(None);
        selector.set(AddressSelector::default());
    };

    let on_pick = Callback::new(move |result: CustomerSearchResult| {
        let customer = Customer::from(&result);
        customers().save(customer.clone());
        selector.set(AddressSelector::new(customer.addresses.clone(), false));
        picked.set(Some(customer));

        if !result.addresses.is_empty() {
            return;
        }

        // Search rows may only carry the legacy single address
        let customer_id = result.id;
        let config = api.get_value();
        wasm_bindgen_futures::spawn_local(async move {
            match ApiClient::get_customer_addresses(&config, &customer_id.to_string()).await {
                Ok(addresses) if !addresses.is_empty() => {
                    let still_picked =
                        picked.with_untracked(|c| c.as_ref().and_then(|c| c.id) == Some(customer_id));
                    if !still_picked {
                        return;
                    }
                    picked.update(|c| {
                        if let Some(c) = c {
                            c.addresses = addresses.clone();
                            customers().save(c.clone());
                        }
                    });
                    selector.set(AddressSelector::new(addresses, false));
                }
                Ok(_) => {}
                Err(e) => log::warn!("Failed to load addresses for {}: {}", customer_id, e),
            }
        });
    });

    let on_add = move |_| {
        notices.set(Vec::new());
        let Some(customer) = picked.get_untracked() else {
            errors.set(vec!["Choose a customer first".to_string()]);
            return;
        };

        let label = optional_text(selector.with_untracked(|s| s.to_resolve_request().address_label));
        let entry = CallsheetEntry::for_customer(&customer, label);
        let current = week.get_untracked();
        let repo = callsheets();

        if repo.book().contains_stop(&current, &entry) {
            errors.set(vec![format!("{} is already on this callsheet", customer.display())]);
            return;
        }
        if !repo.add_entry_for(current, entry) {
            errors.set(vec!["Could not save the callsheet".to_string()]);
            return;
        }

        errors.set(Vec::new());
        search_text.set(String::new());
        clear_pick();
        reload();
    };

    let update = move |index: usize, change: Box<dyn FnOnce(&mut CallsheetEntry)>| {
        if !callsheets().update_entry(&week.get_untracked(), index, change) {
            log::warn!("No callsheet entry at {}", index);
        }
        reload();
    };

    let remove = move |index: usize| {
        callsheets().remove_entry(&week.get_untracked(), index);
        reload();
    };

    let toggle_pause = move |index: usize| {
        if callsheets().toggle_pause(&week.get_untracked(), index).is_none() {
            errors.set(vec!["Could not update the callsheet".to_string()]);
        }
        reload();
    };

    let move_entry = move |from: usize, to: usize| {
        callsheets().move_entry(&week.get_untracked(), from, to);
        reload();
    };

    let on_reset = move |_| {
        let count = callsheets().reset_week(&week.get_untracked());
        notices.set(vec![format!("{} entries reset", count)]);
        reload();
    };

    let progress = move || {
        entries.with(|list| {
            let called = list.iter().filter(|e| e.status.is_called()).count();
            format!("{}/{} called", called, list.len())
        })
    };

    view! {
        <div class="callsheet-page">
            <div class="week-nav">
                <button class="btn btn-outline" on:click=move |_| week.update(|w| *w = w.previous())>
                    "‹ Previous"
                </button>
                <h2>{move || week_heading(&week.get())}</h2>
                <button class="btn btn-outline" on:click=move |_| week.update(|w| *w = w.next())>
                    "Next ›"
                </button>
                <button class="btn btn-link" on:click=move |_| week.set(current_week())>
                    "This week"
                </button>
            </div>

            <MessageList messages=errors on_dismiss=Callback::new(move |_| errors.set(Vec::new())) />
            <MessageList messages=notices severity=Severity::Success />

            <div class="card callsheet-add">
                <CustomerSearch
                    value=search_text
                    on_select=on_pick
                    on_clear=Callback::new(move |_| clear_pick())
                />
                <AddressSelectorField selector=selector />
                <button class="btn btn-primary" on:click=on_add>"Add to callsheet"</button>
            </div>

            <div class="callsheet-summary">
                <span>{progress}</span>
                <button class="btn btn-outline" on:click=on_reset>"Reset week"</button>
            </div>

            <Show
                when=move || !entries.with(Vec::is_empty)
                fallback=|| view! { <p class="empty-state">"No customers on this week's callsheet"</p> }
            >
                <table class="callsheet-table">
                    <thead>
                        <tr>
                            <th>"Account"</th>
                            <th>"Customer"</th>
                            <th>"Address"</th>
                            <th>"Status"</th>
                            <th>"Spoke to"</th>
                            <th>"Callback"</th>
                            <th>"Notes"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            let count = entries.with(Vec::len);
                            entries.get().into_iter().enumerate().map(|(index, entry)| {
                                let class = row_class(&entry);
                                let status = entry.status;
                                let pause_label = if entry.is_paused { "Resume" } else { "Pause" };
                                view! {
                                    <tr class=class>
                                        <td>{entry.account_number.clone()}</td>
                                        <td>{entry.customer_name.clone()}</td>
                                        <td>{entry.address_label.clone().unwrap_or_default()}</td>
                                        <td>
                                            <select
                                                class="form-select"
                                                on:change=move |ev| {
                                                    if let Ok(next) = event_target_value(&ev).parse::<CallStatus>() {
                                                        update(index, Box::new(move |e| e.status = next));
                                                    }
                                                }
                                            >
                                                {CallStatus::ALL.iter().map(|s| view! {
                                                    <option value=s.as_str() selected=*s == status>{s.label()}</option>
                                                }).collect_view()}
                                            </select>
                                        </td>
                                        <td>
                                            <input
                                                class="form-input"
                                                prop:value=entry.person_spoken_to.clone().unwrap_or_default()
                                                on:change=move |ev| {
                                                    let text = optional_text(event_target_value(&ev));
                                                    update(index, Box::new(move |e| e.person_spoken_to = text));
                                                }
                                            />
                                        </td>
                                        <td>
                                            <input
                                                class="form-input"
                                                prop:value=entry.callback_time.clone().unwrap_or_default()
                                                on:change=move |ev| {
                                                    let text = optional_text(event_target_value(&ev));
                                                    update(index, Box::new(move |e| e.callback_time = text));
                                                }
                                            />
                                        </td>
                                        <td>
                                            <input
                                                class="form-input"
                                                prop:value=entry.notes.clone()
                                                on:change=move |ev| {
                                                    let text = event_target_value(&ev);
                                                    update(index, Box::new(move |e| e.notes = text));
                                                }
                                            />
                                        </td>
                                        <td class="row-actions">
                                            <button
                                                class="btn btn-outline"
                                                title="Move up"
                                                disabled=index == 0
                                                on:click=move |_| move_entry(index, index.saturating_sub(1))
                                            >
                                                "↑"
                                            </button>
                                            <button
                                                class="btn btn-outline"
                                                title="Move down"
                                                disabled=index + 1 >= count
                                                on:click=move |_| move_entry(index, index + 1)
                                            >
                                                "↓"
                                            </button>
                                            <button class="btn btn-outline" on:click=move |_| toggle_pause(index)>
                                                {pause_label}
                                            </button>
                                            <button class="btn btn-danger" on:click=move |_| remove(index)>
                                                "Remove"
                                            </button>
                                        </td>
                                    </tr>
                                }
                            }).collect_view()
                        }}
                    </tbody>
                </table>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text("  ".to_string()), None);
        assert_eq!(optional_text(" Sam ".to_string()), Some("Sam".to_string()));
    }

    #[test]
    fn test_row_class() {
        let mut entry = CallsheetEntry::default();
        assert_eq!(row_class(&entry), "callsheet-row");
        entry.status = CallStatus::Ordered;
        assert_eq!(row_class(&entry), "callsheet-row called");
        entry.is_paused = true;
        assert_eq!(row_class(&entry), "callsheet-row paused");
    }
}
