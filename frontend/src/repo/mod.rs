pub mod callsheets;
pub mod customers;
pub mod products;

pub use callsheets::CallsheetRepository;
pub use customers::CustomerRepository;
pub use products::ProductRepository;
