pub mod callsheet;
pub mod order_form;
