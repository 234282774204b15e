use leptos::*;
use shared::address::format_address_line;
use shared::CustomerSearchResult;

use crate::api::{ApiClient, SearchConfig};
use crate::components::autocomplete::use_autocomplete;

/// First address of a result as a one-line hint, blank when it has none.
fn address_hint(customer: &CustomerSearchResult) -> String {
    customer
        .address_list()
        .first()
        .map(format_address_line)
        .unwrap_or_default()
}

/// Customer lookup by account number or name.
///
/// `value` is the visible text; picking a result sets it to the customer's
/// name and fires `on_select`. When the text gets too short to search,
/// `on_clear` fires so dependent fields can be emptied.
#[component]
pub fn CustomerSearch(
    #[prop(into)] value: RwSignal<String>,
    #[prop(into)] on_select: Callback<CustomerSearchResult>,
    #[prop(optional, into)] on_clear: Option<Callback<()>>,
    #[prop(optional)] config: Option<SearchConfig>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional, into)] placeholder: Option<String>,
) -> impl IntoView {
    let config = config.unwrap_or_default();
    let search_config = config.clone();
    let search = use_autocomplete(&config, move |query: String| {
        let config = search_config.clone();
        async move { ApiClient::search_customers(&config, &query).await }
    });

    let placeholder = placeholder.unwrap_or_else(|| "Account number or name".to_string());
    let container = search.container;

    view! {
        <div class="autocomplete" node_ref=container>
            <input
                type="text"
                class="form-input"
                id=id
                placeholder=placeholder
                autocomplete="off"
                prop:value=move || value.get()
                on:input=move |ev| {
                    let text = event_target_value(&ev);
                    value.set(text.clone());
                    if search.input(&text) {
                        if let Some(on_clear) = on_clear {
                            on_clear.call(());
                        }
                    }
                }
                on:blur=move |_| search.blur()
            />
            <Show when=move || search.is_open()>
                <ul
                    class="autocomplete-dropdown"
                    on:mouseenter=move |_| search.hover(true)
                    on:mouseleave=move |_| search.hover(false)
                >
                    {move || {
                        search.results().into_iter().enumerate().map(|(index, customer)| {
                            let address = address_hint(&customer);
                            view! {
                                <li
                                    class="autocomplete-item"
                                    on:click=move |_| {
                                        if let Some(chosen) = search.select(index) {
                                            value.set(chosen.name.clone());
                                            on_select.call(chosen);
                                        }
                                    }
                                >
                                    <strong>{customer.account_number.clone()}</strong>
                                    " - "
                                    {customer.name.clone()}
                                    <span class="autocomplete-meta">{address}</span>
                                </li>
                            }
                        }).collect_view()
                    }}
                </ul>
            </Show>
        </div>
    }
}
