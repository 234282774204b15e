use leptos::*;

/// Label plus text input. The label is tied to the input with `for`, which
/// is where validation messages take the field's name from.
#[component]
pub fn LabeledField(
    #[prop(into)] label: String,
    #[prop(into)] id: String,
    #[prop(into)] value: RwSignal<String>,
    #[prop(optional, into)] input_type: Option<String>,
    #[prop(optional, into)] placeholder: Option<String>,
    #[prop(optional)] required: bool,
    #[prop(optional)] readonly: bool,
    #[prop(optional, into)] hint: Option<String>,
) -> impl IntoView {
    let input_type = input_type.unwrap_or_else(|| "text".to_string());

    view! {
        <div class="form-group">
            <label class="form-label" for=id.clone()>
                {label}
                {required.then(|| view! { <span class="form-required">" *"</span> })}
            </label>
            <input
                type=input_type
                class="form-input"
                id=id.clone()
                name=id
                placeholder=placeholder
                readonly=readonly
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
            {hint.map(|h| view! { <span class="form-hint">{h}</span> })}
        </div>
    }
}

/// Wraps an arbitrary control with the same label layout.
#[component]
pub fn FieldGroup(
    #[prop(into)] label: String,
    #[prop(optional, into)] for_id: Option<String>,
    #[prop(optional)] required: bool,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="form-group">
            <label class="form-label" for=for_id>
                {label}
                {required.then(|| view! { <span class="form-required">" *"</span> })}
            </label>
            {children()}
        </div>
    }
}
