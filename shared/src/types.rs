use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Address Types
// ============================================================================

/// Label given to the address synthesized from a legacy single-address record.
pub const PRIMARY_ADDRESS_LABEL: &str = "Primary";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAddressRequest {
    pub label: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub phone: String,
}

// ============================================================================
// Customer Types
// ============================================================================

/// An explicit `null` reads the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A customer as persisted in the browser store and returned by the API.
///
/// Older records carry a single address in the top-level `street`/`city`/...
/// fields and no `addresses` list; see [`Customer::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub account_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub addresses: Vec<Address>,

    // Legacy single-address fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Customer {
    /// Bring a record into the multi-address shape.
    ///
    /// Records that already have at least one address come back unchanged.
    /// Otherwise a single `Primary` address is built from the legacy fields,
    /// with missing parts as empty strings. Idempotent.
    pub fn normalize(mut self) -> Self {
        if !self.addresses.is_empty() {
            return self;
        }

        self.addresses.push(Address {
            label: PRIMARY_ADDRESS_LABEL.to_string(),
            street: self.street.clone().unwrap_or_default(),
            city: self.city.clone().unwrap_or_default(),
            state: self.state.clone().unwrap_or_default(),
            zip: self.zip.clone().unwrap_or_default(),
            country: self.country.clone().unwrap_or_default(),
            is_primary: true,
            ..Address::default()
        });
        self
    }

    pub fn primary_address(&self) -> Option<&Address> {
        self.addresses
            .iter()
            .find(|a| a.is_primary)
            .or_else(|| self.addresses.first())
    }

    /// `"<account> - <name>"`, or just the name when there is no account.
    pub fn display(&self) -> String {
        if self.account_number.is_empty() {
            self.name.clone()
        } else {
            format!("{} - {}", self.account_number, self.name)
        }
    }
}

/// One row of `GET /api/customers/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSearchResult {
    pub id: Uuid,
    pub name: String,
    pub account_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub display: String,
}

impl CustomerSearchResult {
    /// Addresses to offer for this customer, falling back to the legacy
    /// single `address` line as a `Primary` entry.
    pub fn address_list(&self) -> Vec<Address> {
        if !self.addresses.is_empty() {
            return self.addresses.clone();
        }
        match self.address.as_deref().map(str::trim) {
            Some(street) if !street.is_empty() => vec![Address {
                label: PRIMARY_ADDRESS_LABEL.to_string(),
                street: street.to_string(),
                is_primary: true,
                ..Address::default()
            }],
            _ => Vec::new(),
        }
    }
}

impl From<&CustomerSearchResult> for Customer {
    fn from(result: &CustomerSearchResult) -> Self {
        Customer {
            id: Some(result.id),
            name: result.name.clone(),
            account_number: result.account_number.clone(),
            addresses: result.address_list(),
            ..Customer::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    pub account_number: String,
    pub name: String,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub addresses: Vec<NewAddressRequest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCustomerRequest {
    pub account_number: Option<String>,
    pub name: Option<String>,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub addresses: Option<Vec<NewAddressRequest>>,
}

/// Hidden address fields posted with a form, see [`crate::address`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveAddressRequest {
    #[serde(default)]
    pub account_number: String,
    #[serde(default)]
    pub address_label: String,
    #[serde(default)]
    pub new_address_label: String,
    #[serde(default)]
    pub new_address_street: String,
    #[serde(default)]
    pub new_address_city: String,
    #[serde(default)]
    pub new_address_zip: String,
    #[serde(default)]
    pub new_address_phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveAddressResponse {
    pub label: Option<String>,
    pub created: bool,
}

// ============================================================================
// Product Types
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    #[serde(default)]
    pub code: String,
}

impl Product {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }

    /// Case-insensitive substring match against name or code. An empty
    /// query matches nothing.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return false;
        }
        self.name.to_lowercase().contains(&query) || self.code.to_lowercase().contains(&query)
    }
}

/// One row of `GET /api/products/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSearchResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub code: String,
    pub name: String,
}

impl From<ProductSearchResult> for Product {
    fn from(result: ProductSearchResult) -> Self {
        Product {
            name: result.name,
            code: result.code,
        }
    }
}

// ============================================================================
// Callsheet Types
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    #[default]
    NotCalled,
    Called,
    Ordered,
    Callback,
    NoAnswer,
}

impl CallStatus {
    pub const ALL: [CallStatus; 5] = [
        CallStatus::NotCalled,
        CallStatus::Called,
        CallStatus::Ordered,
        CallStatus::Callback,
        CallStatus::NoAnswer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CallStatus::NotCalled => "not_called",
            CallStatus::Called => "called",
            CallStatus::Ordered => "ordered",
            CallStatus::Callback => "callback",
            CallStatus::NoAnswer => "no_answer",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CallStatus::NotCalled => "Not called",
            CallStatus::Called => "Called",
            CallStatus::Ordered => "Ordered",
            CallStatus::Callback => "Call back",
            CallStatus::NoAnswer => "No answer",
        }
    }

    pub fn is_called(&self) -> bool {
        !matches!(self, CallStatus::NotCalled)
    }
}

impl FromStr for CallStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "not_called" => Ok(CallStatus::NotCalled),
            "called" => Ok(CallStatus::Called),
            "ordered" => Ok(CallStatus::Ordered),
            "callback" => Ok(CallStatus::Callback),
            "no_answer" => Ok(CallStatus::NoAnswer),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallsheetEntry {
    pub customer_name: String,
    #[serde(default)]
    pub account_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_label: Option<String>,
    #[serde(default)]
    pub status: CallStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_spoken_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_time: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub is_paused: bool,
}

impl CallsheetEntry {
    pub fn for_customer(customer: &Customer, address_label: Option<String>) -> Self {
        Self {
            customer_name: customer.name.clone(),
            account_number: customer.account_number.clone(),
            address_label,
            ..Self::default()
        }
    }

    /// Same customer at the same delivery address.
    pub fn same_stop(&self, other: &CallsheetEntry) -> bool {
        let key = |e: &CallsheetEntry| {
            if e.account_number.is_empty() {
                e.customer_name.clone()
            } else {
                e.account_number.clone()
            }
        };
        key(self) == key(other)
            && self.address_label.as_deref().unwrap_or(PRIMARY_ADDRESS_LABEL)
                == other.address_label.as_deref().unwrap_or(PRIMARY_ADDRESS_LABEL)
    }

    /// Back to `not_called` for a new round of calls. Notes and the paused
    /// flag are kept.
    pub fn reset(&mut self) {
        self.status = CallStatus::NotCalled;
        self.person_spoken_to = None;
        self.callback_time = None;
    }
}

// ============================================================================
// API Response Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub message: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSuccess<T> {
    pub data: T,
}

impl<T> ApiSuccess<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy_customer() -> Customer {
        serde_json::from_str(
            r#"{"name":"Acme Ltd","street":"1 High St","city":"Leeds","zip":"LS1 1AA","country":"UK"}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_normalize_legacy_customer() {
        let customer = legacy_customer().normalize();
        assert_eq!(customer.addresses.len(), 1);

        let address = &customer.addresses[0];
        assert_eq!(address.label, "Primary");
        assert_eq!(address.street, "1 High St");
        assert_eq!(address.city, "Leeds");
        assert_eq!(address.state, "");
        assert_eq!(address.zip, "LS1 1AA");
        assert_eq!(address.country, "UK");

        // Legacy fields are carried along
        assert_eq!(customer.street.as_deref(), Some("1 High St"));
    }

    #[test]
    fn test_null_address_list_normalizes_like_missing() {
        let customer: Customer =
            serde_json::from_str(r#"{"name":"Odd","street":"2 Low Rd","addresses":null}"#).unwrap();
        assert!(customer.addresses.is_empty());

        let customer = customer.normalize();
        assert_eq!(customer.addresses.len(), 1);
        assert_eq!(customer.addresses[0].label, "Primary");
        assert_eq!(customer.addresses[0].street, "2 Low Rd");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = vec![
            legacy_customer(),
            Customer {
                name: "Bare".to_string(),
                ..Customer::default()
            },
            Customer {
                name: "Multi".to_string(),
                addresses: vec![
                    Address {
                        label: "Depot".to_string(),
                        ..Address::default()
                    },
                    Address {
                        label: "Shop".to_string(),
                        ..Address::default()
                    },
                ],
                ..Customer::default()
            },
        ];

        for customer in samples {
            let once = customer.normalize();
            assert_eq!(once.clone().normalize(), once);
        }
    }

    #[test]
    fn test_normalize_keeps_existing_addresses() {
        let customer = Customer {
            name: "Multi".to_string(),
            street: Some("ignored".to_string()),
            addresses: vec![Address {
                label: "Depot".to_string(),
                ..Address::default()
            }],
            ..Customer::default()
        };
        let normalized = customer.clone().normalize();
        assert_eq!(normalized, customer);
    }

    #[test]
    fn test_normalize_absent_customer() {
        let none: Option<Customer> = None;
        assert_eq!(none.map(Customer::normalize), None);
    }

    #[test]
    fn test_customer_display() {
        let mut customer = Customer {
            name: "Acme Ltd".to_string(),
            ..Customer::default()
        };
        assert_eq!(customer.display(), "Acme Ltd");
        customer.account_number = "ACM01".to_string();
        assert_eq!(customer.display(), "ACM01 - Acme Ltd");
    }

    #[test]
    fn test_search_result_address_fallback() {
        let result: CustomerSearchResult = serde_json::from_str(
            r#"{"id":"7f1a8e9e-3c5d-4c1b-9b7e-0d6f1c2a3b4c","name":"Acme","account_number":"A1","address":"Unit 4"}"#,
        )
        .unwrap();
        let addresses = result.address_list();
        assert_eq!(addresses.len(), 1);
        assert_eq!(addresses[0].label, "Primary");
        assert_eq!(addresses[0].street, "Unit 4");

        let customer = Customer::from(&result);
        assert_eq!(customer.account_number, "A1");
        assert_eq!(customer.primary_address().map(|a| a.street.as_str()), Some("Unit 4"));
        assert_eq!(customer.clone().normalize(), customer);
    }

    #[test]
    fn test_product_matches() {
        let product = Product::new("Hand Soap Refill", "HYG002");
        assert!(product.matches("soap"));
        assert!(product.matches("hyg"));
        assert!(product.matches("  SOAP "));
        assert!(!product.matches("plates"));
        assert!(!product.matches(""));
        assert!(!product.matches("   "));
    }

    #[test]
    fn test_call_status_from_str() {
        assert_eq!("not_called".parse(), Ok(CallStatus::NotCalled));
        assert_eq!("ORDERED".parse(), Ok(CallStatus::Ordered));
        assert_eq!("Callback".parse(), Ok(CallStatus::Callback));
        assert!("invalid".parse::<CallStatus>().is_err());
        for status in CallStatus::ALL {
            assert_eq!(status.as_str().parse(), Ok(status));
        }
    }

    #[test]
    fn test_call_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&CallStatus::NoAnswer).unwrap(),
            "\"no_answer\""
        );
    }

    #[test]
    fn test_entry_same_stop() {
        let a = CallsheetEntry {
            customer_name: "Acme".to_string(),
            account_number: "A1".to_string(),
            ..CallsheetEntry::default()
        };
        let mut b = a.clone();
        b.address_label = Some("Primary".to_string());
        assert!(a.same_stop(&b));

        b.address_label = Some("Depot".to_string());
        assert!(!a.same_stop(&b));
    }

    #[test]
    fn test_entry_reset_keeps_notes() {
        let mut entry = CallsheetEntry {
            customer_name: "Acme".to_string(),
            status: CallStatus::Callback,
            person_spoken_to: Some("Jo".to_string()),
            callback_time: Some("14:00".to_string()),
            notes: "Prefers mornings".to_string(),
            is_paused: true,
            ..CallsheetEntry::default()
        };
        entry.reset();
        assert_eq!(entry.status, CallStatus::NotCalled);
        assert_eq!(entry.person_spoken_to, None);
        assert_eq!(entry.callback_time, None);
        assert_eq!(entry.notes, "Prefers mornings");
        assert!(entry.is_paused);
    }

    #[test]
    fn test_entry_without_paused_flag_is_active() {
        let entry: CallsheetEntry = serde_json::from_str(r#"{"customer_name":"Acme"}"#).unwrap();
        assert!(!entry.is_paused);
    }

    #[test]
    fn test_api_success() {
        let success = ApiSuccess::new("test data");
        assert_eq!(success.data, "test data");
    }
}
