pub mod address;
pub mod autocomplete;
pub mod callsheet;
pub mod format;
pub mod types;
pub mod validation;
pub mod week;

pub use types::*;
