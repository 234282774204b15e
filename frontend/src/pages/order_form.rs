use leptos::*;
use shared::address::AddressSelector;
use shared::format::{format_currency, format_product_with_code};
use shared::validation::{validate, ValidationError};
use shared::week::parse_date;
use shared::{CustomerSearchResult, Product};

use crate::api::{ApiClient, SearchConfig};
use crate::bindings::{DomForm, FieldBindings};
use crate::components::address_selector::AddressSelectorField;
use crate::components::customer_search::CustomerSearch;
use crate::components::form_errors::{report_validation, MessageList, Severity};
use crate::components::labeled_field::{FieldGroup, LabeledField};
use crate::components::product_search::ProductSearch;
use crate::repo::{CustomerRepository, ProductRepository};
use crate::storage::BrowserStore;
use crate::utils::{relative_label, today};

#[derive(Clone, Copy)]
struct ProductLine {
    key: usize,
    name: RwSignal<String>,
    code: RwSignal<String>,
    quantity: RwSignal<String>,
    unit_price: RwSignal<String>,
}

impl ProductLine {
    fn new(key: usize) -> Self {
        Self {
            key,
            name: create_rw_signal(String::new()),
            code: create_rw_signal(String::new()),
            quantity: create_rw_signal(String::from("1")),
            unit_price: create_rw_signal(String::new()),
        }
    }

    /// Quantity times unit price; unparseable parts count as zero.
    fn total(&self) -> f64 {
        let quantity = self.quantity.with(|q| q.trim().parse::<f64>().unwrap_or(0.0));
        let price = self.unit_price.with(|p| p.trim().parse::<f64>().unwrap_or(0.0));
        quantity * price
    }

    fn product(&self) -> Option<Product> {
        let name = self.name.get_untracked();
        if name.trim().is_empty() {
            return None;
        }
        Some(Product::new(name.trim(), self.code.get_untracked().trim()))
    }
}

/// Add a picked product to the local catalog if its code is new.
fn remember_product(product: Product) {
    let repo = ProductRepository::new(BrowserStore);
    if product.code.is_empty() || repo.find_by_code(&product.code).is_some() {
        return;
    }
    let mut all = repo.all();
    all.push(product);
    repo.replace_all(&all);
}

#[component]
pub fn OrderFormPage() -> impl IntoView {
    let bindings = FieldBindings::default();
    let api = store_value(SearchConfig::default());

    let account = create_rw_signal(String::new());
    let name = create_rw_signal(String::new());
    let delivery_date = create_rw_signal(String::new());
    let selector = create_rw_signal(AddressSelector::default());
    let lines = create_rw_signal(vec![ProductLine::new(0)]);
    let next_key = store_value(1usize);
    let owner = Owner::current();

    let errors = create_rw_signal(Vec::<String>::new());
    let notices = create_rw_signal(Vec::<String>::new());
    let submitting = create_rw_signal(false);

    create_effect(move |_| {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        for id in bindings.missing(&document) {
            log::warn!("Order form has no element with id '{}'", id);
        }
    });

    let on_customer = Callback::new(move |result: CustomerSearchResult| {
        account.set(result.account_number.clone());
        name.set(result.name.clone());
        let customer = shared::Customer::from(&result);
        selector.set(AddressSelector::new(customer.addresses.clone(), true));
        CustomerRepository::new(BrowserStore).save(customer);

        if result.addresses.is_empty() {
            let customer_id = result.id.to_string();
            let account_number = result.account_number;
            let config = api.get_value();
            wasm_bindgen_futures::spawn_local(async move {
                match ApiClient::get_customer_addresses(&config, &customer_id).await {
                    Ok(addresses) if account.get_untracked() == account_number => {
                        selector.set(AddressSelector::new(addresses, true));
                    }
                    Ok(_) => {}
                    Err(e) => log::warn!("Failed to load addresses: {}", e),
                }
            });
        }
    });

    let on_customer_cleared = Callback::new(move |_| {
        name.set(String::new());
        selector.set(AddressSelector::default());
    });

    let add_line = move |_| {
        let key = next_key.get_value();
        next_key.set_value(key + 1);
        // Row signals belong to the page, not to the click handler
        let line = match owner {
            Some(owner) => with_owner(owner, move || ProductLine::new(key)),
            None => ProductLine::new(key),
        };
        lines.update(|l| l.push(line));
    };

    let remove_line = move |key: usize| {
        lines.update(|l| {
            if l.len() > 1 {
                l.retain(|line| line.key != key);
            }
        });
    };

    let delivery_hint = move || {
        parse_date(&delivery_date.get())
            .map(|date| relative_label(date, today()))
            .unwrap_or_default()
    };

    let order_total = move || format_currency(lines.with(|l| l.iter().map(ProductLine::total).sum()));

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        notices.set(Vec::new());

        let Some(form) = DomForm::current() else {
            return;
        };
        let mut result = validate(&form, &bindings.required_order_fields());
        let products: Vec<(Product, String)> = lines
            .get_untracked()
            .iter()
            .filter_map(|line| line.product().map(|p| (p, line.quantity.get_untracked())))
            .collect();
        if products.is_empty() {
            result.errors.push(ValidationError::Required("At least one product".to_string()));
            result.is_valid = false;
        }

        report_validation(&result, Some(errors.write_only()));
        if !result.is_valid {
            return;
        }

        let customer_name = name.get_untracked();
        let mut request = selector.with_untracked(|s| s.to_resolve_request());
        request.account_number = account.get_untracked().trim().to_string();
        let date = delivery_date.get_untracked();
        let total = lines.with_untracked(|l| l.iter().map(ProductLine::total).sum::<f64>());
        let config = api.get_value();
        submitting.set(true);

        wasm_bindgen_futures::spawn_local(async move {
            match ApiClient::resolve_address(&config, request).await {
                Ok(resolved) => {
                    let mut summary = vec![format!(
                        "Order for {} to {} on {}",
                        customer_name,
                        resolved.label.as_deref().unwrap_or("no address"),
                        date
                    )];
                    if resolved.created {
                        summary.push("New delivery address saved".to_string());
                    }
                    summary.extend(
                        products
                            .iter()
                            .map(|(p, qty)| format!("{} x {}", qty, format_product_with_code(p))),
                    );
                    if total > 0.0 {
                        summary.push(format!("Total {}", format_currency(total)));
                    }
                    notices.set(summary);
                }
                Err(e) => errors.set(vec![e]),
            }
            submitting.set(false);
        });
    };

    view! {
        <div class="order-page">
            <h2>"New order"</h2>
            <MessageList messages=errors on_dismiss=Callback::new(move |_| errors.set(Vec::new())) />
            <MessageList messages=notices severity=Severity::Success />

            <form class="card order-form" on:submit=on_submit>
                <FieldGroup label="Account number" for_id=bindings.account required=true>
                    <CustomerSearch
                        value=account
                        id=bindings.account
                        on_select=on_customer
                        on_clear=on_customer_cleared
                    />
                </FieldGroup>
                <LabeledField label="Customer name" id=bindings.name value=name required=true />
                <AddressSelectorField selector=selector bindings=bindings />
                <LabeledField
                    label="Delivery date"
                    id=bindings.delivery_date
                    value=delivery_date
                    input_type="date"
                    required=true
                />
                <span class="form-hint">{delivery_hint}</span>

                <h3>"Products"</h3>
                <For
                    each=move || lines.get()
                    key=|line| line.key
                    children=move |line: ProductLine| {
                        view! {
                            <div class=bindings.product_row>
                                <ProductSearch
                                    name=line.name
                                    code=line.code
                                    on_select=Callback::new(remember_product)
                                />
                                <input
                                    type="text"
                                    class=format!("form-input {}", bindings.product_code)
                                    placeholder="Code"
                                    prop:value=move || line.code.get()
                                    on:input=move |ev| line.code.set(event_target_value(&ev))
                                />
                                <input
                                    type="number"
                                    class="form-input product-qty"
                                    min="1"
                                    prop:value=move || line.quantity.get()
                                    on:input=move |ev| line.quantity.set(event_target_value(&ev))
                                />
                                <input
                                    type="number"
                                    class="form-input product-price"
                                    min="0"
                                    step="0.01"
                                    placeholder="Unit price"
                                    prop:value=move || line.unit_price.get()
                                    on:input=move |ev| line.unit_price.set(event_target_value(&ev))
                                />
                                <button type="button" class="btn btn-outline" on:click=move |_| remove_line(line.key)>
                                    "Remove"
                                </button>
                            </div>
                        }
                    }
                />
                <button type="button" class="btn btn-outline" on:click=add_line>"+ Add product"</button>
                <p class="order-total">"Total: " {order_total}</p>

                <div class="form-actions">
                    <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>
                        "Submit order"
                    </button>
                </div>
            </form>
        </div>
    }
}
