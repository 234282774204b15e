use leptos::*;
use shared::validation::ValidationResult;

#[derive(Default, Clone, Copy, PartialEq)]
pub enum Severity {
    #[default]
    Error,
    Warning,
    Success,
}

impl Severity {
    fn class(self) -> &'static str {
        match self {
            Severity::Error => "alert alert-error",
            Severity::Warning => "alert alert-warning",
            Severity::Success => "alert alert-success",
        }
    }
}

/// Message box listing `messages`. Renders nothing while the list is empty.
#[component]
pub fn MessageList(
    #[prop(into)] messages: Signal<Vec<String>>,
    #[prop(optional)] severity: Severity,
    #[prop(optional)] on_dismiss: Option<Callback<()>>,
) -> impl IntoView {
    view! {
        <Show when=move || !messages.with(Vec::is_empty)>
            <div class=severity.class() role="alert">
                <ul class="form-errors">
                    {move || messages.get().into_iter().map(|m| view! { <li>{m}</li> }).collect_view()}
                </ul>
                {on_dismiss.map(|callback| view! {
                    <button class="alert-dismiss" type="button" on:click=move |_| callback.call(())>
                        "×"
                    </button>
                })}
            </div>
        </Show>
    }
}

/// Show a validation result inline when there is somewhere to put it,
/// otherwise as a blocking browser alert.
pub fn report_validation(result: &ValidationResult, inline: Option<WriteSignal<Vec<String>>>) {
    let messages = result.messages();
    match inline {
        Some(target) => target.set(messages),
        None if !messages.is_empty() => {
            log::warn!("No error container; falling back to alert");
            let text = format!("Please fix the following errors:\n\n{}", messages.join("\n"));
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message(&text);
            }
        }
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_severity_classes() {
        assert_eq!(Severity::default().class(), "alert alert-error");
        assert_eq!(Severity::Success.class(), "alert alert-success");
    }
}
