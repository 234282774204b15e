use shared::Product;

use crate::storage::{read_or, write, KeyValueStore, PRODUCT_DB_KEY};

/// Product catalog persisted under `productDatabase`.
#[derive(Debug, Clone, Default)]
pub struct ProductRepository<S> {
    store: S,
}

impl<S: KeyValueStore> ProductRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn all(&self) -> Vec<Product> {
        read_or(&self.store, PRODUCT_DB_KEY, Vec::new())
    }

    pub fn replace_all(&self, products: &[Product]) -> bool {
        write(&self.store, PRODUCT_DB_KEY, &products)
    }

    /// Case-insensitive substring match on name or code. An empty query
    /// returns nothing rather than the whole catalog.
    pub fn search(&self, query: &str) -> Vec<Product> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        self.all().into_iter().filter(|p| p.matches(query)).collect()
    }

    pub fn find_by_code(&self, code: &str) -> Option<Product> {
        if code.is_empty() {
            return None;
        }
        self.all().into_iter().find(|p| p.code == code)
    }

    pub fn find_by_name(&self, name: &str) -> Option<Product> {
        if name.is_empty() {
            return None;
        }
        self.all().into_iter().find(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn repo() -> ProductRepository<MemoryStore> {
        let repo = ProductRepository::new(MemoryStore::new());
        repo.replace_all(&[
            Product::new("Toilet Rolls (12 pack)", "HYG001"),
            Product::new("Hand Soap Refill", "HYG002"),
            Product::new("Disposable Plates", "CAT001"),
        ]);
        repo
    }

    #[test]
    fn test_search_empty_query_returns_nothing() {
        let repo = repo();
        assert!(repo.search("").is_empty());
        assert!(repo.search("   ").is_empty());
    }

    #[test]
    fn test_search_matches_name_or_code() {
        let repo = repo();
        assert_eq!(repo.search("hyg").len(), 2);
        assert_eq!(repo.search("PLATES")[0].code, "CAT001");
        assert!(repo.search("cutlery").is_empty());
    }

    #[test]
    fn test_find_exact() {
        let repo = repo();
        assert_eq!(repo.find_by_code("HYG002").unwrap().name, "Hand Soap Refill");
        assert!(repo.find_by_code("hyg002").is_none());
        assert!(repo.find_by_code("").is_none());

        assert_eq!(repo.find_by_name("Disposable Plates").unwrap().code, "CAT001");
        assert!(repo.find_by_name("").is_none());
    }

    #[test]
    fn test_empty_store() {
        let repo = ProductRepository::new(MemoryStore::new());
        assert!(repo.all().is_empty());
        assert!(repo.search("hyg").is_empty());
    }
}
