pub mod address_selector;
pub mod autocomplete;
pub mod customer_search;
pub mod form_errors;
pub mod labeled_field;
pub mod product_search;
