use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use shared::ProductSearchResult;

/// Database model for catalog products
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ProductRow {
    pub id: String,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

impl ProductRow {
    pub fn to_search_result(&self) -> ProductSearchResult {
        ProductSearchResult {
            id: Uuid::parse_str(&self.id).ok(),
            code: self.code.clone(),
            name: self.name.clone(),
        }
    }
}
