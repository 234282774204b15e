use leptos::*;
use shared::format::format_product_with_code;
use shared::Product;

use crate::api::{ApiClient, SearchConfig};
use crate::components::autocomplete::use_autocomplete;

/// Product lookup for one order row. Selecting fills the name and the
/// separate code field.
#[component]
pub fn ProductSearch(
    #[prop(into)] name: RwSignal<String>,
    #[prop(into)] code: RwSignal<String>,
    #[prop(optional, into)] on_select: Option<Callback<Product>>,
    #[prop(optional)] config: Option<SearchConfig>,
) -> impl IntoView {
    let config = config.unwrap_or_default();
    let search_config = config.clone();
    let search = use_autocomplete(&config, move |query: String| {
        let config = search_config.clone();
        async move {
            ApiClient::search_products(&config, &query)
                .await
                .map(|rows| rows.into_iter().map(Product::from).collect::<Vec<_>>())
        }
    });

    let container = search.container;

    view! {
        <div class="autocomplete" node_ref=container>
            <input
                type="text"
                class="form-input product-name"
                placeholder="Product name or code"
                autocomplete="off"
                prop:value=move || name.get()
                on:input=move |ev| {
                    let text = event_target_value(&ev);
                    name.set(text.clone());
                    if search.input(&text) {
                        code.set(String::new());
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
                        search.results().into_iter().enumerate().map(|(index, product)| {
                            view! {
                                <li
                                    class="autocomplete-item"
                                    on:click=move |_| {
                                        if let Some(chosen) = search.select(index) {
                                            name.set(chosen.name.clone());
                                            code.set(chosen.code.clone());
                                            if let Some(on_select) = on_select {
                                                on_select.call(chosen);
                                            }
                                        }
                                    }
                                >
                                    {format_product_with_code(&product)}
                                </li>
                            }
                        }).collect_view()
                    }}
                </ul>
            </Show>
        </div>
    }
}
