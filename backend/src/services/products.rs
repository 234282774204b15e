use sqlx::SqlitePool;
use thiserror::Error;

use crate::models::ProductRow;
use crate::services::customers::{like_pattern, MIN_SEARCH_LEN};
use shared::ProductSearchResult;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Match on code, name or description.
pub async fn search_products(
    pool: &SqlitePool,
    query: &str,
    limit: i64,
) -> Result<Vec<ProductSearchResult>, ProductError> {
    let query = query.trim();
    if query.chars().count() < MIN_SEARCH_LEN {
        return Ok(Vec::new());
    }

    let pattern = like_pattern(query);
    let products: Vec<ProductRow> = sqlx::query_as(
        r#"
        SELECT * FROM products
        WHERE code LIKE ? ESCAPE '\'
           OR name LIKE ? ESCAPE '\'
           OR description LIKE ? ESCAPE '\'
        ORDER BY code
        LIMIT ?
        "#,
    )
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(products.iter().map(ProductRow::to_search_result).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::customers::tests::setup_test_db;
    use uuid::Uuid;

    async fn insert_product(pool: &SqlitePool, code: &str, name: &str, description: Option<&str>) {
        sqlx::query("INSERT INTO products (id, code, name, description) VALUES (?, ?, ?, ?)")
            .bind(Uuid::new_v4().to_string())
            .bind(code)
            .bind(name)
            .bind(description)
            .execute(pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_search_products() {
        let pool = setup_test_db().await;
        insert_product(&pool, "HYG001", "Toilet Rolls (12 pack)", None).await;
        insert_product(&pool, "HYG002", "Hand Soap Refill", Some("Antibacterial")).await;
        insert_product(&pool, "CAT001", "Disposable Plates", None).await;

        assert!(search_products(&pool, "", 20).await.unwrap().is_empty());
        assert!(search_products(&pool, "h", 20).await.unwrap().is_empty());

        let hygiene = search_products(&pool, "hyg", 20).await.unwrap();
        assert_eq!(hygiene.len(), 2);
        assert_eq!(hygiene[0].code, "HYG001");

        let by_description = search_products(&pool, "antibac", 20).await.unwrap();
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].name, "Hand Soap Refill");

        assert_eq!(search_products(&pool, "hyg", 1).await.unwrap().len(), 1);
    }
}
