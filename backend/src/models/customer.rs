use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use shared::{Address, Customer, CustomerSearchResult, PRIMARY_ADDRESS_LABEL};

/// Database model for customers
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CustomerRow {
    pub id: String,
    pub account_number: String,
    pub name: String,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database model for one delivery address of a customer
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CustomerAddressRow {
    pub id: String,
    pub customer_id: String,
    pub label: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub phone: String,
    pub is_primary: bool,
    pub position: i64,
    pub created_at: DateTime<Utc>,
}

impl CustomerAddressRow {
    pub fn to_shared(&self) -> Address {
        Address {
            id: Uuid::parse_str(&self.id).ok(),
            label: self.label.clone(),
            street: self.street.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zip: self.zip.clone(),
            country: self.country.clone(),
            phone: if self.phone.is_empty() {
                None
            } else {
                Some(self.phone.clone())
            },
            is_primary: self.is_primary,
        }
    }
}

impl CustomerRow {
    /// Addresses to expose for this customer. Customers stored before
    /// address lists existed get their free-text `address` as `Primary`.
    pub fn address_list(&self, rows: &[CustomerAddressRow]) -> Vec<Address> {
        if !rows.is_empty() {
            return rows.iter().map(CustomerAddressRow::to_shared).collect();
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

    pub fn to_shared(&self, rows: &[CustomerAddressRow]) -> Customer {
        Customer {
            id: Uuid::parse_str(&self.id).ok(),
            name: self.name.clone(),
            account_number: self.account_number.clone(),
            contact_name: self.contact_name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            notes: self.notes.clone(),
            addresses: self.address_list(rows),
            ..Customer::default()
        }
    }

    pub fn to_search_result(&self, rows: &[CustomerAddressRow]) -> CustomerSearchResult {
        CustomerSearchResult {
            id: Uuid::parse_str(&self.id).unwrap_or_default(),
            name: self.name.clone(),
            account_number: self.account_number.clone(),
            address: self.address.clone(),
            addresses: self.address_list(rows),
            display: format!("{} - {}", self.account_number, self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer_row(address: Option<&str>) -> CustomerRow {
        let now = Utc::now();
        CustomerRow {
            id: Uuid::new_v4().to_string(),
            account_number: "ACM01".to_string(),
            name: "Acme Ltd".to_string(),
            contact_name: None,
            phone: None,
            email: None,
            notes: None,
            address: address.map(str::to_string),
            created_at: now,
            updated_at: now,
        }
    }

    fn address_row(customer_id: &str, label: &str, phone: &str) -> CustomerAddressRow {
        CustomerAddressRow {
            id: Uuid::new_v4().to_string(),
            customer_id: customer_id.to_string(),
            label: label.to_string(),
            street: "1 High St".to_string(),
            city: "Leeds".to_string(),
            state: String::new(),
            zip: "LS1 1AA".to_string(),
            country: String::new(),
            phone: phone.to_string(),
            is_primary: true,
            position: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_address_row_to_shared() {
        let row = address_row("c1", "Depot", "");
        let address = row.to_shared();
        assert_eq!(address.label, "Depot");
        assert_eq!(address.phone, None);
        assert!(address.id.is_some());

        let row = address_row("c1", "Depot", "0113 000000");
        assert_eq!(row.to_shared().phone.as_deref(), Some("0113 000000"));
    }

    #[test]
    fn test_legacy_address_fallback() {
        let row = customer_row(Some("  7 Old Road  "));
        let addresses = row.address_list(&[]);
        assert_eq!(addresses.len(), 1);
        assert_eq!(addresses[0].label, "Primary");
        assert_eq!(addresses[0].street, "7 Old Road");

        assert!(customer_row(Some("   ")).address_list(&[]).is_empty());
        assert!(customer_row(None).address_list(&[]).is_empty());
    }

    #[test]
    fn test_address_rows_win_over_legacy() {
        let row = customer_row(Some("7 Old Road"));
        let rows = vec![address_row(&row.id, "Depot", "")];
        let customer = row.to_shared(&rows);
        assert_eq!(customer.addresses.len(), 1);
        assert_eq!(customer.addresses[0].label, "Depot");
    }

    #[test]
    fn test_search_result_display() {
        let row = customer_row(None);
        let result = row.to_search_result(&[]);
        assert_eq!(result.display, "ACM01 - Acme Ltd");
        assert_eq!(result.id.to_string(), row.id);
    }
}
