//! iCalendar export.

mod generate;

pub use generate::{event_to_ics, events_feed};
