//! Element ids the order and callsheet forms render with, and DOM lookups
//! over them.

use shared::address::{
    FIELD_ADDRESS_LABEL, FIELD_NEW_CITY, FIELD_NEW_LABEL, FIELD_NEW_PHONE, FIELD_NEW_STREET,
    FIELD_NEW_ZIP,
};
use shared::validation::{FieldValue, FormFields};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

/// Logical field role to concrete element id (or class, for product rows).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBindings {
    pub account: &'static str,
    pub name: &'static str,
    pub address: &'static str,
    pub address_label: &'static str,
    pub new_label: &'static str,
    pub new_street: &'static str,
    pub new_city: &'static str,
    pub new_zip: &'static str,
    pub new_phone: &'static str,
    pub delivery_date: &'static str,
    pub product_row: &'static str,
    pub product_code: &'static str,
    pub product_name: &'static str,
}

impl Default for FieldBindings {
    fn default() -> Self {
        Self {
            account: "customerAccount",
            name: "customerName",
            address: "customerAddress",
            address_label: FIELD_ADDRESS_LABEL,
            new_label: FIELD_NEW_LABEL,
            new_street: FIELD_NEW_STREET,
            new_city: FIELD_NEW_CITY,
            new_zip: FIELD_NEW_ZIP,
            new_phone: FIELD_NEW_PHONE,
            delivery_date: "deliveryDate",
            product_row: "product-row",
            product_code: "product-code",
            product_name: "product-name",
        }
    }
}

impl FieldBindings {
    /// Fields an order cannot be submitted without.
    pub fn required_order_fields(&self) -> Vec<&'static str> {
        vec![self.account, self.name, self.address, self.delivery_date]
    }

    /// Ids every order form must render.
    fn order_form_ids(&self) -> [&'static str; 5] {
        [
            self.account,
            self.name,
            self.address,
            self.address_label,
            self.delivery_date,
        ]
    }

    /// Ids from the order form that are not in `document`.
    pub fn missing(&self, document: &Document) -> Vec<&'static str> {
        self.order_form_ids()
            .into_iter()
            .filter(|id| document.get_element_by_id(id).is_none())
            .collect()
    }

    pub fn product_row_selector(&self) -> String {
        format!(".{}", self.product_row)
    }
}

/// Current value of an input, select or textarea; text content otherwise.
pub fn element_value(element: &Element) -> String {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        select.value()
    } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
        area.value()
    } else {
        element.text_content().unwrap_or_default()
    }
}

/// The live document as a form: fields are found by id, labels by
/// `label[for=...]`.
pub struct DomForm {
    document: Document,
}

impl DomForm {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// `None` outside a browser window.
    pub fn current() -> Option<Self> {
        web_sys::window()
            .and_then(|w| w.document())
            .map(Self::new)
    }

    fn label_for(&self, id: &str) -> Option<String> {
        self.document
            .query_selector(&format!("label[for=\"{}\"]", id))
            .ok()
            .flatten()
            .and_then(|label| label.text_content())
    }
}

impl FormFields for DomForm {
    fn field(&self, id: &str) -> Option<FieldValue> {
        let element = self.document.get_element_by_id(id)?;
        Some(FieldValue {
            value: element_value(&element),
            label: self.label_for(id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ids() {
        let bindings = FieldBindings::default();
        assert_eq!(bindings.account, "customerAccount");
        assert_eq!(bindings.name, "customerName");
        assert_eq!(bindings.address, "customerAddress");
        assert_eq!(bindings.address_label, "address_label");
        assert_eq!(bindings.new_street, "new_address_street");
        assert_eq!(bindings.product_row_selector(), ".product-row");
    }

    #[test]
    fn test_required_fields_exclude_hidden_label() {
        let bindings = FieldBindings::default();
        let required = bindings.required_order_fields();
        assert!(required.contains(&"customerAccount"));
        assert!(!required.contains(&"address_label"));
    }
}
