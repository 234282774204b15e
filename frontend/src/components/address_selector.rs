use leptos::*;
use shared::address::{AddressSelector, SelectOutcome};
use shared::NewAddressRequest;

use crate::bindings::FieldBindings;
use crate::components::labeled_field::{FieldGroup, LabeledField};

/// Id of the `<select>` that sits next to the address field `address_id`.
fn select_id_for(address_id: &str) -> String {
    format!("{}_select", address_id)
}

/// Address picker for the chosen customer.
///
/// Writes the formatted address to the visible address field and the
/// submission values to hidden inputs. A new address is only staged here;
/// the server stores it when the form is submitted.
#[component]
pub fn AddressSelectorField(
    #[prop(into)] selector: RwSignal<AddressSelector>,
    #[prop(optional)] bindings: Option<FieldBindings>,
) -> impl IntoView {
    let bindings = bindings.unwrap_or_default();
    let select_id = store_value(select_id_for(bindings.address));

    let draft_label = create_rw_signal(String::new());
    let draft_street = create_rw_signal(String::new());
    let draft_city = create_rw_signal(String::new());
    let draft_zip = create_rw_signal(String::new());
    let draft_phone = create_rw_signal(String::new());
    let draft_error = create_rw_signal(None::<String>);

    let clear_draft = move || {
        draft_label.set(String::new());
        draft_street.set(String::new());
        draft_city.set(String::new());
        draft_zip.set(String::new());
        draft_phone.set(String::new());
        draft_error.set(None);
    };

    let on_change = move |ev: ev::Event| {
        let value = event_target_value(&ev);
        let outcome = selector.try_update(|s| s.select(&value));
        match outcome {
            Some(SelectOutcome::Selected { label, .. }) => {
                log::debug!("Address '{}' selected", label);
            }
            Some(SelectOutcome::ShowNewForm) => clear_draft(),
            _ => {}
        }
    };

    let on_save_new = move |_| {
        let draft = NewAddressRequest {
            label: draft_label.get_untracked(),
            street: draft_street.get_untracked(),
            city: draft_city.get_untracked(),
            zip: draft_zip.get_untracked(),
            phone: draft_phone.get_untracked(),
        };
        match selector.try_update(|s| s.stage_new(draft)) {
            Some(Err(e)) => draft_error.set(Some(e.to_string())),
            _ => draft_error.set(None),
        }
    };

    let on_cancel_new = move |_| {
        clear_draft();
        selector.update(|s| s.cancel_new());
    };

    let display = Signal::derive(move || selector.with(|s| s.display_text()));

    view! {
        <div class="address-selector">
            <Show
                when=move || selector.with(|s| !s.options().is_empty())
                fallback=|| view! { <p class="form-hint">"Select a customer to choose an address"</p> }
            >
                <FieldGroup label="Delivery address" for_id=select_id.get_value()>
                    <select class="form-select" id=select_id.get_value() on:change=on_change>
                        {move || {
                            let current = selector.with(|s| s.selected_value());
                            selector.with(|s| s.options()).into_iter().map(|(value, text)| {
                                let selected = value == current;
                                view! { <option value=value selected=selected>{text}</option> }
                            }).collect_view()
                        }}
                    </select>
                </FieldGroup>
            </Show>

            <FieldGroup label="Address" for_id=bindings.address required=true>
                <input
                    type="text"
                    class="form-input"
                    id=bindings.address
                    name=bindings.address
                    readonly=true
                    prop:value=move || display.get()
                />
            </FieldGroup>

            {move || selector.with(|s| s.form_fields()).into_iter().map(|(name, value)| {
                view! { <input type="hidden" id=name name=name value=value /> }
            }).collect_view()}

            <Show when=move || selector.with(|s| s.is_new_form_open())>
                <div class="address-new-form">
                    <LabeledField label="Label" id="new_address_label_input" value=draft_label required=true />
                    <LabeledField label="Street" id="new_address_street_input" value=draft_street />
                    <LabeledField label="City" id="new_address_city_input" value=draft_city />
                    <LabeledField label="Postcode" id="new_address_zip_input" value=draft_zip />
                    <LabeledField label="Phone" id="new_address_phone_input" value=draft_phone input_type="tel" />
                    {move || draft_error.get().map(|e| view! { <p class="form-error">{e}</p> })}
                    <div class="form-actions">
                        <button type="button" class="btn btn-primary" on:click=on_save_new>"Use this address"</button>
                        <button type="button" class="btn btn-outline" on:click=on_cancel_new>"Cancel"</button>
                    </div>
                </div>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_id_does_not_clash_with_address_field() {
        let bindings = FieldBindings::default();
        let id = select_id_for(bindings.address);
        assert_eq!(id, "customerAddress_select");
        assert_ne!(id, bindings.address);
        assert!(!bindings.required_order_fields().contains(&id.as_str()));
    }
}
