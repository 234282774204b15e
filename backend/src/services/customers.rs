use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{CustomerAddressRow, CustomerRow};
use shared::address::{resolve_submitted_address, AddressError, SubmittedAddress};
use shared::validation::{validate_customer, validate_customer_update};
use shared::{
    Address, CreateCustomerRequest, Customer, CustomerSearchResult, NewAddressRequest,
    ResolveAddressRequest, ResolveAddressResponse, UpdateCustomerRequest,
};

/// Queries shorter than this return no results.
pub const MIN_SEARCH_LEN: usize = 2;

#[derive(Debug, Error)]
pub enum CustomerError {
    #[error("Customer not found")]
    NotFound,
    #[error("Account number already exists")]
    DuplicateAccount,
    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("{0}")]
    Address(#[from] AddressError),
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Escape `LIKE` wildcards so user input matches literally.
pub(crate) fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

async fn address_rows(
    pool: &SqlitePool,
    customer_id: &str,
) -> Result<Vec<CustomerAddressRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM customer_addresses WHERE customer_id = ? ORDER BY position, created_at")
        .bind(customer_id)
        .fetch_all(pool)
        .await
}

async fn insert_addresses(
    tx: &mut Transaction<'_, Sqlite>,
    customer_id: &str,
    addresses: &[NewAddressRequest],
) -> Result<(), sqlx::Error> {
    let now = Utc::now();
    for (position, address) in addresses.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO customer_addresses (id, customer_id, label, street, city, zip, phone, is_primary, position, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(customer_id)
        .bind(address.label.trim())
        .bind(address.street.trim())
        .bind(address.city.trim())
        .bind(address.zip.trim())
        .bind(address.phone.trim())
        // First address is primary
        .bind(position == 0)
        .bind(position as i64)
        .bind(now)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

/// Case-insensitive match on account number or name.
pub async fn search_customers(
    pool: &SqlitePool,
    query: &str,
    limit: i64,
) -> Result<Vec<CustomerSearchResult>, CustomerError> {
    let query = query.trim();
    if query.chars().count() < MIN_SEARCH_LEN {
        return Ok(Vec::new());
    }

    let pattern = like_pattern(query);
    let customers: Vec<CustomerRow> = sqlx::query_as(
        r#"
        SELECT * FROM customers
        WHERE account_number LIKE ? ESCAPE '\' OR name LIKE ? ESCAPE '\'
        ORDER BY name
        LIMIT ?
        "#,
    )
    .bind(&pattern)
    .bind(&pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let mut results = Vec::with_capacity(customers.len());
    for customer in customers {
        let rows = address_rows(pool, &customer.id).await?;
        results.push(customer.to_search_result(&rows));
    }
    Ok(results)
}

async fn find_row(pool: &SqlitePool, customer_id: &Uuid) -> Result<Option<CustomerRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM customers WHERE id = ?")
        .bind(customer_id.to_string())
        .fetch_optional(pool)
        .await
}

async fn find_row_by_account(
    pool: &SqlitePool,
    account_number: &str,
) -> Result<Option<CustomerRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM customers WHERE account_number = ?")
        .bind(account_number)
        .fetch_optional(pool)
        .await
}

pub async fn get_customer(pool: &SqlitePool, customer_id: &Uuid) -> Result<Customer, CustomerError> {
    let row = find_row(pool, customer_id).await?.ok_or(CustomerError::NotFound)?;
    let addresses = address_rows(pool, &row.id).await?;
    Ok(row.to_shared(&addresses))
}

pub async fn get_customer_addresses(
    pool: &SqlitePool,
    customer_id: &Uuid,
) -> Result<Vec<Address>, CustomerError> {
    let row = find_row(pool, customer_id).await?.ok_or(CustomerError::NotFound)?;
    let addresses = address_rows(pool, &row.id).await?;
    Ok(row.address_list(&addresses))
}

pub async fn create_customer(
    pool: &SqlitePool,
    request: &CreateCustomerRequest,
) -> Result<Customer, CustomerError> {
    let errors = validate_customer(request);
    if !errors.is_empty() {
        return Err(CustomerError::Validation(errors));
    }

    let account_number = request.account_number.trim();
    if find_row_by_account(pool, account_number).await?.is_some() {
        return Err(CustomerError::DuplicateAccount);
    }

    let id = Uuid::new_v4();
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO customers (id, account_number, name, contact_name, phone, email, notes, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id.to_string())
    .bind(account_number)
    .bind(request.name.trim())
    .bind(&request.contact_name)
    .bind(&request.phone)
    .bind(&request.email)
    .bind(&request.notes)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    insert_addresses(&mut tx, &id.to_string(), &request.addresses).await?;
    tx.commit().await?;

    log::info!("Created customer {} ({})", request.name.trim(), account_number);
    get_customer(pool, &id).await
}

/// Partial update. When `addresses` is given it replaces the whole list.
pub async fn update_customer(
    pool: &SqlitePool,
    customer_id: &Uuid,
    request: &UpdateCustomerRequest,
) -> Result<Customer, CustomerError> {
    let errors = validate_customer_update(request);
    if !errors.is_empty() {
        return Err(CustomerError::Validation(errors));
    }

    let mut row = find_row(pool, customer_id).await?.ok_or(CustomerError::NotFound)?;

    if let Some(account_number) = &request.account_number {
        let account_number = account_number.trim();
        if let Some(existing) = find_row_by_account(pool, account_number).await? {
            if existing.id != row.id {
                return Err(CustomerError::DuplicateAccount);
            }
        }
        row.account_number = account_number.to_string();
    }
    if let Some(name) = &request.name {
        row.name = name.trim().to_string();
    }
    if request.contact_name.is_some() {
        row.contact_name = request.contact_name.clone();
    }
    if request.phone.is_some() {
        row.phone = request.phone.clone();
    }
    if request.email.is_some() {
        row.email = request.email.clone();
    }
    if request.notes.is_some() {
        row.notes = request.notes.clone();
    }

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE customers
        SET account_number = ?, name = ?, contact_name = ?, phone = ?, email = ?, notes = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&row.account_number)
    .bind(&row.name)
    .bind(&row.contact_name)
    .bind(&row.phone)
    .bind(&row.email)
    .bind(&row.notes)
    .bind(Utc::now())
    .bind(&row.id)
    .execute(&mut *tx)
    .await?;

    if let Some(addresses) = &request.addresses {
        sqlx::query("DELETE FROM customer_addresses WHERE customer_id = ?")
            .bind(&row.id)
            .execute(&mut *tx)
            .await?;
        insert_addresses(&mut tx, &row.id, addresses).await?;
    }

    tx.commit().await?;
    get_customer(pool, customer_id).await
}

/// Work out the address label a submitted form refers to, persisting a
/// staged new address first for the customer named by
/// `request.account_number`. A new address whose label already exists for
/// the customer reuses the existing one.
pub async fn resolve_address(
    pool: &SqlitePool,
    request: &ResolveAddressRequest,
) -> Result<ResolveAddressResponse, CustomerError> {
    let draft = match resolve_submitted_address(request)? {
        SubmittedAddress::None => {
            return Ok(ResolveAddressResponse {
                label: None,
                created: false,
            })
        }
        SubmittedAddress::Existing(label) => {
            return Ok(ResolveAddressResponse {
                label: Some(label),
                created: false,
            })
        }
        SubmittedAddress::New(draft) => draft,
    };

    let customer = find_row_by_account(pool, request.account_number.trim())
        .await?
        .ok_or(CustomerError::NotFound)?;
    let existing = address_rows(pool, &customer.id).await?;

    if existing.iter().any(|a| a.label == draft.label) {
        log::warn!(
            "Address with label '{}' already exists for customer {}",
            draft.label,
            customer.name
        );
        return Ok(ResolveAddressResponse {
            label: Some(draft.label),
            created: false,
        });
    }

    sqlx::query(
        r#"
        INSERT INTO customer_addresses (id, customer_id, label, street, city, zip, phone, is_primary, position, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, FALSE, ?, ?)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&customer.id)
    .bind(&draft.label)
    .bind(&draft.street)
    .bind(&draft.city)
    .bind(&draft.zip)
    .bind(&draft.phone)
    .bind(existing.len() as i64)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    log::info!("Created new address '{}' for customer {}", draft.label, customer.name);

    Ok(ResolveAddressResponse {
        label: Some(draft.label),
        created: true,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use shared::address::NEW_ADDRESS_VALUE;
    use sqlx::sqlite::SqlitePoolOptions;

    pub(crate) async fn setup_test_db() -> SqlitePool {
        // One connection: every in-memory connection is its own database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::raw_sql(include_str!("../../migrations/001_initial.sql"))
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    pub(crate) fn create_request(account: &str, name: &str) -> CreateCustomerRequest {
        CreateCustomerRequest {
            account_number: account.to_string(),
            name: name.to_string(),
            addresses: vec![
                NewAddressRequest {
                    label: "Primary".to_string(),
                    street: "1 High St".to_string(),
                    city: "Leeds".to_string(),
                    zip: "LS1 1AA".to_string(),
                    phone: String::new(),
                },
                NewAddressRequest {
                    label: "Depot".to_string(),
                    street: "Unit 4".to_string(),
                    ..NewAddressRequest::default()
                },
            ],
            ..CreateCustomerRequest::default()
        }
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("ac"), "%ac%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn test_customer_error_display() {
        assert_eq!(CustomerError::NotFound.to_string(), "Customer not found");
        assert_eq!(
            CustomerError::Validation(vec!["a".to_string(), "b".to_string()]).to_string(),
            "Validation errors: a; b"
        );
    }

    #[tokio::test]
    async fn test_create_and_get_customer() {
        let pool = setup_test_db().await;
        let created = create_customer(&pool, &create_request("ACM01", "Acme Ltd"))
            .await
            .unwrap();

        assert_eq!(created.account_number, "ACM01");
        assert_eq!(created.addresses.len(), 2);
        assert!(created.addresses[0].is_primary);
        assert!(!created.addresses[1].is_primary);

        let fetched = get_customer(&pool, &created.id.unwrap()).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_account() {
        let pool = setup_test_db().await;
        create_customer(&pool, &create_request("ACM01", "Acme Ltd")).await.unwrap();
        let err = create_customer(&pool, &create_request("ACM01", "Other"))
            .await
            .unwrap_err();
        assert!(matches!(err, CustomerError::DuplicateAccount));
    }

    #[tokio::test]
    async fn test_create_requires_address() {
        let pool = setup_test_db().await;
        let mut request = create_request("ACM01", "Acme Ltd");
        request.addresses.clear();
        let err = create_customer(&pool, &request).await.unwrap_err();
        assert!(matches!(err, CustomerError::Validation(_)));
    }

    #[tokio::test]
    async fn test_search_customers() {
        let pool = setup_test_db().await;
        create_customer(&pool, &create_request("ACM01", "Acme Ltd")).await.unwrap();
        create_customer(&pool, &create_request("BRK02", "Brook Cafe")).await.unwrap();

        assert!(search_customers(&pool, "a", 20).await.unwrap().is_empty());
        assert!(search_customers(&pool, "  ", 20).await.unwrap().is_empty());

        let by_name = search_customers(&pool, "acme", 20).await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].display, "ACM01 - Acme Ltd");
        assert_eq!(by_name[0].addresses.len(), 2);

        let by_account = search_customers(&pool, "brk", 20).await.unwrap();
        assert_eq!(by_account[0].name, "Brook Cafe");

        assert!(search_customers(&pool, "a%", 20).await.unwrap().is_empty());
        assert_eq!(search_customers(&pool, "0", 1).await.unwrap().len(), 0);
        assert_eq!(search_customers(&pool, "ACM0", 1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_replaces_addresses() {
        let pool = setup_test_db().await;
        let created = create_customer(&pool, &create_request("ACM01", "Acme Ltd"))
            .await
            .unwrap();
        let id = created.id.unwrap();

        let updated = update_customer(
            &pool,
            &id,
            &UpdateCustomerRequest {
                name: Some("Acme Trading".to_string()),
                addresses: Some(vec![NewAddressRequest {
                    label: "Shop".to_string(),
                    ..NewAddressRequest::default()
                }]),
                ..UpdateCustomerRequest::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.name, "Acme Trading");
        assert_eq!(updated.account_number, "ACM01");
        assert_eq!(updated.addresses.len(), 1);
        assert_eq!(updated.addresses[0].label, "Shop");
        assert!(updated.addresses[0].is_primary);
    }

    #[tokio::test]
    async fn test_update_rejects_taken_account() {
        let pool = setup_test_db().await;
        create_customer(&pool, &create_request("ACM01", "Acme Ltd")).await.unwrap();
        let other = create_customer(&pool, &create_request("BRK02", "Brook Cafe"))
            .await
            .unwrap();

        let err = update_customer(
            &pool,
            &other.id.unwrap(),
            &UpdateCustomerRequest {
                account_number: Some("ACM01".to_string()),
                ..UpdateCustomerRequest::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CustomerError::DuplicateAccount));
    }

    #[tokio::test]
    async fn test_update_missing_customer() {
        let pool = setup_test_db().await;
        let err = update_customer(&pool, &Uuid::new_v4(), &UpdateCustomerRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CustomerError::NotFound));
    }

    #[tokio::test]
    async fn test_legacy_address_column_is_exposed() {
        let pool = setup_test_db().await;
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO customers (id, account_number, name, address, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind("OLD01")
        .bind("Old Customer")
        .bind("7 Old Road")
        .bind(Utc::now())
        .bind(Utc::now())
        .execute(&pool)
        .await
        .unwrap();

        let addresses = get_customer_addresses(&pool, &id).await.unwrap();
        assert_eq!(addresses.len(), 1);
        assert_eq!(addresses[0].label, "Primary");
        assert_eq!(addresses[0].street, "7 Old Road");
    }

    #[tokio::test]
    async fn test_resolve_address_paths() {
        let pool = setup_test_db().await;
        let created = create_customer(&pool, &create_request("ACM01", "Acme Ltd"))
            .await
            .unwrap();
        let id = created.id.unwrap();

        let existing = resolve_address(
            &pool,
            &ResolveAddressRequest {
                account_number: "ACM01".to_string(),
                address_label: "Depot".to_string(),
                ..ResolveAddressRequest::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(existing.label.as_deref(), Some("Depot"));
        assert!(!existing.created);

        let new = ResolveAddressRequest {
            account_number: "ACM01".to_string(),
            address_label: NEW_ADDRESS_VALUE.to_string(),
            new_address_label: "Warehouse".to_string(),
            new_address_street: "9 Mill Lane".to_string(),
            ..ResolveAddressRequest::default()
        };
        let first = resolve_address(&pool, &new).await.unwrap();
        assert!(first.created);
        let second = resolve_address(&pool, &new).await.unwrap();
        assert!(!second.created);
        assert_eq!(second.label.as_deref(), Some("Warehouse"));

        let addresses = get_customer_addresses(&pool, &id).await.unwrap();
        assert_eq!(addresses.len(), 3);
        assert_eq!(addresses[2].label, "Warehouse");
        assert!(!addresses[2].is_primary);
    }

    #[tokio::test]
    async fn test_resolve_address_errors() {
        let pool = setup_test_db().await;
        let missing_label = ResolveAddressRequest {
            account_number: "ACM01".to_string(),
            address_label: NEW_ADDRESS_VALUE.to_string(),
            ..ResolveAddressRequest::default()
        };
        let err = resolve_address(&pool, &missing_label).await.unwrap_err();
        assert!(matches!(err, CustomerError::Address(AddressError::MissingLabel)));

        let unknown_customer = ResolveAddressRequest {
            account_number: "NOPE".to_string(),
            address_label: NEW_ADDRESS_VALUE.to_string(),
            new_address_label: "Shop".to_string(),
            ..ResolveAddressRequest::default()
        };
        let err = resolve_address(&pool, &unknown_customer).await.unwrap_err();
        assert!(matches!(err, CustomerError::NotFound));
    }
}
