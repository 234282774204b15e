use shared::Customer;

use crate::storage::{read_for_update, read_or, write, KeyValueStore, CUSTOMER_DB_KEY};

/// Customer list persisted under `customerDatabase`, keyed by exact name.
#[derive(Debug, Clone, Default)]
pub struct CustomerRepository<S> {
    store: S,
}

impl<S: KeyValueStore> CustomerRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Every customer, normalized to the multi-address shape.
    pub fn all(&self) -> Vec<Customer> {
        self.load_raw().into_iter().map(Customer::normalize).collect()
    }

    fn load_raw(&self) -> Vec<Customer> {
        read_or(&self.store, CUSTOMER_DB_KEY, Vec::new())
    }

    /// Exact, case-sensitive name lookup.
    pub fn find_by_name(&self, name: &str) -> Option<Customer> {
        self.load_raw()
            .into_iter()
            .find(|c| c.name == name)
            .map(Customer::normalize)
    }

    /// Insert or replace by name. Rewrites the whole list, so two writers
    /// racing on the same store lose one update. An unreadable list is left
    /// untouched and the save reports `false`.
    pub fn save(&self, customer: Customer) -> bool {
        let Some(mut customers) = read_for_update(&self.store, CUSTOMER_DB_KEY, Vec::<Customer>::new()) else {
            return false;
        };
        match customers.iter_mut().find(|c| c.name == customer.name) {
            Some(existing) => *existing = customer,
            None => customers.push(customer),
        }
        write(&self.store, CUSTOMER_DB_KEY, &customers)
    }

    /// Returns `true` if a customer with that name was removed.
    pub fn remove(&self, name: &str) -> bool {
        let Some(mut customers) = read_for_update(&self.store, CUSTOMER_DB_KEY, Vec::<Customer>::new()) else {
            return false;
        };
        let before = customers.len();
        customers.retain(|c| c.name != name);
        if customers.len() == before {
            return false;
        }
        write(&self.store, CUSTOMER_DB_KEY, &customers)
    }
}
