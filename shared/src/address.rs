//! Delivery address selection for a chosen customer.
//!
//! The selector offers every address of the customer plus, when enabled, an
//! "add new address" entry. A new address is only staged here: it travels
//! with the form as hidden fields flagged [`NEW_ADDRESS_VALUE`] and the
//! server persists it on submission (see [`resolve_submitted_address`]).

use thiserror::Error;

use crate::types::{Address, NewAddressRequest, ResolveAddressRequest};

/// Option value and hidden-field marker for a staged new address.
pub const NEW_ADDRESS_VALUE: &str = "__NEW__";
pub const ADDRESS_NOT_SPECIFIED: &str = "Address not specified";

pub const FIELD_ADDRESS_LABEL: &str = "address_label";
pub const FIELD_NEW_LABEL: &str = "new_address_label";
pub const FIELD_NEW_STREET: &str = "new_address_street";
pub const FIELD_NEW_CITY: &str = "new_address_city";
pub const FIELD_NEW_ZIP: &str = "new_address_zip";
pub const FIELD_NEW_PHONE: &str = "new_address_phone";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("A label is required for the new address")]
    MissingLabel,
}

/// `"street, city, zip"` with empty parts left out.
pub fn format_address_line(address: &Address) -> String {
    let parts: Vec<&str> = [&address.street, &address.city, &address.zip]
        .into_iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        ADDRESS_NOT_SPECIFIED.to_string()
    } else {
        parts.join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressChoice {
    Existing(usize),
    New,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// An existing address was picked; write `display` to the visible field
    /// and `label` to the hidden label field.
    Selected { display: String, label: String },
    /// The "new address" entry was picked; show the inline form.
    ShowNewForm,
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct AddressSelector {
    addresses: Vec<Address>,
    allow_new: bool,
    choice: Option<AddressChoice>,
    staged: Option<NewAddressRequest>,
}

impl AddressSelector {
    /// The first address is preselected when there is one.
    pub fn new(addresses: Vec<Address>, allow_new: bool) -> Self {
        let choice = if addresses.is_empty() {
            None
        } else {
            Some(AddressChoice::Existing(0))
        };
        Self {
            addresses,
            allow_new,
            choice,
            staged: None,
        }
    }

    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    pub fn choice(&self) -> Option<&AddressChoice> {
        self.choice.as_ref()
    }

    /// `(value, text)` pairs for a select control.
    pub fn options(&self) -> Vec<(String, String)> {
        let mut options: Vec<(String, String)> = self
            .addresses
            .iter()
            .enumerate()
            .map(|(i, address)| {
                let text = if address.label.is_empty() {
                    format_address_line(address)
                } else {
                    format!("{} - {}", address.label, format_address_line(address))
                };
                (i.to_string(), text)
            })
            .collect();

        if self.allow_new {
            options.push((NEW_ADDRESS_VALUE.to_string(), "+ Add new address".to_string()));
        }
        options
    }

    /// Value of the option currently selected, for binding the control.
    pub fn selected_value(&self) -> String {
        match &self.choice {
            Some(AddressChoice::Existing(i)) => i.to_string(),
            Some(AddressChoice::New) => NEW_ADDRESS_VALUE.to_string(),
            None => String::new(),
        }
    }

    pub fn select(&mut self, value: &str) -> SelectOutcome {
        if value == NEW_ADDRESS_VALUE {
            if !self.allow_new {
                return SelectOutcome::Ignored;
            }
            self.choice = Some(AddressChoice::New);
            return SelectOutcome::ShowNewForm;
        }

        match value.parse::<usize>() {
            Ok(index) if index < self.addresses.len() => {
                self.choice = Some(AddressChoice::Existing(index));
                self.staged = None;
                let address = &self.addresses[index];
                SelectOutcome::Selected {
                    display: format_address_line(address),
                    label: address.label.clone(),
                }
            }
            _ => SelectOutcome::Ignored,
        }
    }

    pub fn is_new_form_open(&self) -> bool {
        self.choice == Some(AddressChoice::New) && self.staged.is_none()
    }

    /// Stage the inline form's values. Nothing is persisted here.
    pub fn stage_new(&mut self, draft: NewAddressRequest) -> Result<(), AddressError> {
        if draft.label.trim().is_empty() {
            return Err(AddressError::MissingLabel);
        }
        self.choice = Some(AddressChoice::New);
        self.staged = Some(NewAddressRequest {
            label: draft.label.trim().to_string(),
            street: draft.street.trim().to_string(),
            city: draft.city.trim().to_string(),
            zip: draft.zip.trim().to_string(),
            phone: draft.phone.trim().to_string(),
        });
        Ok(())
    }

    /// Close the inline form without staging; falls back to the first address.
    pub fn cancel_new(&mut self) {
        self.staged = None;
        self.choice = if self.addresses.is_empty() {
            None
        } else {
            Some(AddressChoice::Existing(0))
        };
    }

    /// Text for the visible address field.
    pub fn display_text(&self) -> String {
        match &self.choice {
            Some(AddressChoice::Existing(i)) => self
                .addresses
                .get(*i)
                .map(format_address_line)
                .unwrap_or_else(|| ADDRESS_NOT_SPECIFIED.to_string()),
            Some(AddressChoice::New) => match &self.staged {
                Some(draft) => format_address_line(&Address {
                    street: draft.street.clone(),
                    city: draft.city.clone(),
                    zip: draft.zip.clone(),
                    ..Address::default()
                }),
                None => String::new(),
            },
            None => String::new(),
        }
    }

    /// Hidden fields submitted with the form.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        match (&self.choice, &self.staged) {
            (Some(AddressChoice::Existing(i)), _) => vec![(
                FIELD_ADDRESS_LABEL,
                self.addresses
                    .get(*i)
                    .map(|a| a.label.clone())
                    .unwrap_or_default(),
            )],
            (Some(AddressChoice::New), Some(draft)) => vec![
                (FIELD_ADDRESS_LABEL, NEW_ADDRESS_VALUE.to_string()),
                (FIELD_NEW_LABEL, draft.label.clone()),
                (FIELD_NEW_STREET, draft.street.clone()),
                (FIELD_NEW_CITY, draft.city.clone()),
                (FIELD_NEW_ZIP, draft.zip.clone()),
                (FIELD_NEW_PHONE, draft.phone.clone()),
            ],
            _ => vec![(FIELD_ADDRESS_LABEL, String::new())],
        }
    }

    /// The same hidden fields as a request body.
    pub fn to_resolve_request(&self) -> ResolveAddressRequest {
        let mut request = ResolveAddressRequest::default();
        for (name, value) in self.form_fields() {
            match name {
                FIELD_ADDRESS_LABEL => request.address_label = value,
                FIELD_NEW_LABEL => request.new_address_label = value,
                FIELD_NEW_STREET => request.new_address_street = value,
                FIELD_NEW_CITY => request.new_address_city = value,
                FIELD_NEW_ZIP => request.new_address_zip = value,
                FIELD_NEW_PHONE => request.new_address_phone = value,
                _ => {}
            }
        }
        request
    }
}

/// What a submitted form asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmittedAddress {
    None,
    Existing(String),
    New(NewAddressRequest),
}

pub fn resolve_submitted_address(
    request: &ResolveAddressRequest,
) -> Result<SubmittedAddress, AddressError> {
    let label = request.address_label.trim();

    if label == NEW_ADDRESS_VALUE {
        let new_label = request.new_address_label.trim();
        if new_label.is_empty() {
            return Err(AddressError::MissingLabel);
        }
        return Ok(SubmittedAddress::New(NewAddressRequest {
            label: new_label.to_string(),
            street: request.new_address_street.trim().to_string(),
            city: request.new_address_city.trim().to_string(),
            zip: request.new_address_zip.trim().to_string(),
            phone: request.new_address_phone.trim().to_string(),
        }));
    }

    if label.is_empty() {
        Ok(SubmittedAddress::None)
    } else {
        Ok(SubmittedAddress::Existing(label.to_string()))
    }
}
