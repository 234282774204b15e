pub mod customers;
pub mod products;
