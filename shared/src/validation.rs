use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use crate::types::{CreateCustomerRequest, NewAddressRequest, UpdateCustomerRequest};

/// A located form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    pub value: String,
    /// Text of the field's `<label>`, if it has one.
    pub label: Option<String>,
}

/// Anything required fields can be looked up in: the live DOM, a map of
/// submitted values, ...
pub trait FormFields {
    fn field(&self, id: &str) -> Option<FieldValue>;
}

impl FormFields for HashMap<String, String> {
    fn field(&self, id: &str) -> Option<FieldValue> {
        self.get(id).map(|value| FieldValue {
            value: value.clone(),
            label: None,
        })
    }
}

impl FormFields for BTreeMap<String, String> {
    fn field(&self, id: &str) -> Option<FieldValue> {
        self.get(id).map(|value| FieldValue {
            value: value.clone(),
            label: None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The form has no field with this id.
    #[error("Field '{0}' was not found")]
    MissingField(String),
    /// Present but blank.
    #[error("{0} is required")]
    Required(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Strip the decoration forms put on labels (`"Name *"`, `"Name:"`).
fn clean_label(label: &str) -> String {
    label
        .trim()
        .trim_end_matches(|c: char| c == '*' || c == ':' || c.is_whitespace())
        .to_string()
}

/// Check that every id in `required` exists and is non-blank. Never
/// mutates the form.
pub fn validate<F: FormFields + ?Sized>(form: &F, required: &[&str]) -> ValidationResult {
    let mut errors = Vec::new();

    for id in required {
        match form.field(id) {
            None => errors.push(ValidationError::MissingField(id.to_string())),
            Some(field) if field.value.trim().is_empty() => {
                let name = field
                    .label
                    .as_deref()
                    .map(clean_label)
                    .filter(|l| !l.is_empty())
                    .unwrap_or_else(|| id.to_string());
                errors.push(ValidationError::Required(name));
            }
            Some(_) => {}
        }
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

// ============================================================================
// Customer data
// ============================================================================

const MAX_ACCOUNT_NUMBER: usize = 50;
const MAX_NAME: usize = 100;
const MAX_CONTACT_NAME: usize = 100;
const MAX_PHONE: usize = 20;
const MAX_EMAIL: usize = 100;

fn too_long(value: &str, max: usize) -> bool {
    value.chars().count() > max
}

fn check_optional_fields(
    contact_name: Option<&str>,
    phone: Option<&str>,
    email: Option<&str>,
    errors: &mut Vec<String>,
) {
    if contact_name.is_some_and(|v| too_long(v, MAX_CONTACT_NAME)) {
        errors.push(format!("Contact name too long (max {} characters)", MAX_CONTACT_NAME));
    }
    if phone.is_some_and(|v| too_long(v, MAX_PHONE)) {
        errors.push(format!("Phone number too long (max {} characters)", MAX_PHONE));
    }
    if let Some(email) = email {
        if too_long(email, MAX_EMAIL) {
            errors.push(format!("Email too long (max {} characters)", MAX_EMAIL));
        }
        let email = email.trim();
        if !email.is_empty() && !email.contains('@') {
            errors.push("Invalid email format".to_string());
        }
    }
}

fn check_addresses(addresses: &[NewAddressRequest], errors: &mut Vec<String>) {
    if addresses.iter().any(|a| a.label.trim().is_empty()) {
        errors.push("Each address must have a label".to_string());
    }
}

/// Field rules for a new customer. Returns every problem found.
pub fn validate_customer(request: &CreateCustomerRequest) -> Vec<String> {
    let mut errors = Vec::new();

    if request.account_number.trim().is_empty() {
        errors.push("Account number is required".to_string());
    }
    if request.name.trim().is_empty() {
        errors.push("Customer name is required".to_string());
    }
    if too_long(&request.account_number, MAX_ACCOUNT_NUMBER) {
        errors.push(format!("Account number too long (max {} characters)", MAX_ACCOUNT_NUMBER));
    }
    if too_long(&request.name, MAX_NAME) {
        errors.push(format!("Customer name too long (max {} characters)", MAX_NAME));
    }
    check_optional_fields(
        request.contact_name.as_deref(),
        request.phone.as_deref(),
        request.email.as_deref(),
        &mut errors,
    );

    if request.addresses.is_empty() {
        errors.push("At least one address is required".to_string());
    }
    check_addresses(&request.addresses, &mut errors);

    errors
}

/// Rules for a partial update: only the fields present are checked.
pub fn validate_customer_update(request: &UpdateCustomerRequest) -> Vec<String> {
    let mut errors = Vec::new();

    if let Some(account_number) = &request.account_number {
        if account_number.trim().is_empty() {
            errors.push("Account number is required".to_string());
        } else if too_long(account_number, MAX_ACCOUNT_NUMBER) {
            errors.push(format!("Account number too long (max {} characters)", MAX_ACCOUNT_NUMBER));
        }
    }
    if let Some(name) = &request.name {
        if name.trim().is_empty() {
            errors.push("Customer name is required".to_string());
        } else if too_long(name, MAX_NAME) {
            errors.push(format!("Customer name too long (max {} characters)", MAX_NAME));
        }
    }
    check_optional_fields(
        request.contact_name.as_deref(),
        request.phone.as_deref(),
        request.email.as_deref(),
        &mut errors,
    );
    if let Some(addresses) = &request.addresses {
        check_addresses(addresses, &mut errors);
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    struct LabelledForm(Vec<(&'static str, &'static str, Option<&'static str>)>);

    impl FormFields for LabelledForm {
        fn field(&self, id: &str) -> Option<FieldValue> {
            self.0.iter().find(|(fid, _, _)| *fid == id).map(|(_, value, label)| FieldValue {
                value: value.to_string(),
                label: label.map(str::to_string),
            })
        }
    }

    fn valid_request() -> CreateCustomerRequest {
        CreateCustomerRequest {
            account_number: "ACM01".to_string(),
            name: "Acme Ltd".to_string(),
            addresses: vec![NewAddressRequest {
                label: "Primary".to_string(),
                ..NewAddressRequest::default()
            }],
            ..CreateCustomerRequest::default()
        }
    }

    #[test]
    fn test_validate_all_present() {
        let mut form = HashMap::new();
        form.insert("customerName".to_string(), "Acme".to_string());
        form.insert("customerAccount".to_string(), "ACM01".to_string());

        let result = validate(&form, &["customerName", "customerAccount"]);
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_validate_reports_missing_and_blank() {
        let form = LabelledForm(vec![
            ("customerName", "   ", Some("Customer Name *")),
            ("deliveryDate", "", None),
        ]);

        let result = validate(&form, &["customerName", "deliveryDate", "customerAccount"]);
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec![
                ValidationError::Required("Customer Name".to_string()),
                ValidationError::Required("deliveryDate".to_string()),
                ValidationError::MissingField("customerAccount".to_string()),
            ]
        );
        assert_eq!(result.messages()[0], "Customer Name is required");
        assert_eq!(result.messages()[2], "Field 'customerAccount' was not found");
    }

    #[test]
    fn test_validate_blank_label_falls_back_to_id() {
        let form = LabelledForm(vec![("notes", "", Some(" * "))]);
        let result = validate(&form, &["notes"]);
        assert_eq!(result.errors, vec![ValidationError::Required("notes".to_string())]);
    }

    #[test]
    fn test_validate_customer_ok() {
        assert!(validate_customer(&valid_request()).is_empty());
    }

    #[test]
    fn test_validate_customer_required_fields() {
        let request = CreateCustomerRequest::default();
        let errors = validate_customer(&request);
        assert!(errors.contains(&"Account number is required".to_string()));
        assert!(errors.contains(&"Customer name is required".to_string()));
        assert!(errors.contains(&"At least one address is required".to_string()));
    }

    #[test]
    fn test_validate_customer_lengths_and_email() {
        let mut request = valid_request();
        request.name = "x".repeat(101);
        request.phone = Some("0".repeat(21));
        request.email = Some("not-an-email".to_string());

        let errors = validate_customer(&request);
        assert_eq!(
            errors,
            vec![
                "Customer name too long (max 100 characters)".to_string(),
                "Phone number too long (max 20 characters)".to_string(),
                "Invalid email format".to_string(),
            ]
        );
    }

    #[test]
    fn test_validate_customer_address_labels() {
        let mut request = valid_request();
        request.addresses.push(NewAddressRequest::default());
        assert_eq!(
            validate_customer(&request),
            vec!["Each address must have a label".to_string()]
        );
    }

    #[test]
    fn test_validate_customer_update_only_checks_present_fields() {
        assert!(validate_customer_update(&UpdateCustomerRequest::default()).is_empty());

        let request = UpdateCustomerRequest {
            name: Some(" ".to_string()),
            email: Some("a@b".to_string()),
            ..UpdateCustomerRequest::default()
        };
        assert_eq!(
            validate_customer_update(&request),
            vec!["Customer name is required".to_string()]
        );
    }
}
