pub mod clock;

pub use clock::{current_week, relative_label, today, week_heading};
