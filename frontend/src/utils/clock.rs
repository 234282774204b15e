use chrono::{Local, NaiveDate};
use shared::week::{format_date_display, week_identifier, WeekId};

/// Today's date from the browser's local calendar.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn current_week() -> WeekId {
    week_identifier(today())
}

/// Heading for a callsheet week, e.g. `Week 1 (01/01/2024 - 07/01/2024)`
pub fn week_heading(week: &WeekId) -> String {
    format!(
        "Week {} ({} - {})",
        week.week(),
        format_date_display(week.monday()),
        format_date_display(week.sunday())
    )
}

/// Relative label for a date against `today`: "Today", "Tomorrow",
/// "Yesterday", or the display date.
pub fn relative_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => format_date_display(date),
    }
}
