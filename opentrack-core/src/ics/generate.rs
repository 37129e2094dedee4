//! Turn events into iCalendar documents.

use chrono::NaiveDate;
use icalendar::{Calendar, Component, EventLike, Property, ValueType};

use crate::event::Event;

const PRODID: &str = "-//OpenTrack//opentrack.dev//";
const UID_DOMAIN: &str = "opentrack.dev";
const FEED_NAME: &str = "OpenTrack.dev Events";

/// A single-event .ics document.
pub fn event_to_ics(event: &Event) -> String {
    let mut calendar = Calendar::new();
    calendar.push(vevent(event));
    finalize(&calendar.done(), None)
}

/// The all-events feed, with the calendar name subscribers see.
pub fn events_feed(events: &[Event]) -> String {
    let mut calendar = Calendar::new();
    for event in events {
        calendar.push(vevent(event));
    }
    finalize(&calendar.done(), Some(FEED_NAME))
}

/// Build the VEVENT component for one event.
fn vevent(event: &Event) -> icalendar::Event {
    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&format!("{}@{}", event.id, UID_DOMAIN));
    ics_event.summary(event.summary());

    add_date_property(&mut ics_event, "DTSTART", event.date);
    if let Some(end_date) = event.end_date {
        add_date_property(&mut ics_event, "DTEND", end_date);
    }

    let location = event.location.text();
    if !location.is_empty() {
        ics_event.location(&location);
    }

    ics_event.description(&description_text(event));

    if let Some(url) = &event.url {
        ics_event.add_property("URL", url);
    }
    if let Some(organizer) = &event.organizer {
        ics_event.add_property("ORGANIZER", organizer);
    }

    ics_event.done()
}

/// All-day date property (VALUE=DATE); events here carry no time of day.
fn add_date_property(ics_event: &mut icalendar::Event, name: &str, date: NaiveDate) {
    let mut property = Property::new(name, date.format("%Y%m%d").to_string());
    property.append_parameter(ValueType::Date);
    ics_event.append_property(property);
}

/// The DESCRIPTION body: the free-form text, a blank line, then labeled
/// fields in a fixed order. Empty fields are dropped, except Online which
/// always renders as Yes or No.
fn description_text(event: &Event) -> String {
    let mut lines: Vec<String> = Vec::new();
    if let Some(text) = &event.description {
        if !text.is_empty() {
            lines.push(text.clone());
            lines.push(String::new());
        }
    }

    let labeled = [
        ("Organizer", event.organizer.clone()),
        ("Type", event.kind.clone()),
        ("Online", Some(if event.online { "Yes" } else { "No" }.to_string())),
        ("Language", event.language.clone()),
        ("Speakers", Some(event.speakers.join(", "))),
        ("URL", event.url.clone()),
        ("Tags", Some(event.tags.join(", "))),
    ];
    for (label, value) in labeled {
        if let Some(value) = value.filter(|value| !value.is_empty()) {
            lines.push(format!("{label}: {value}"));
        }
    }

    if let Some(price) = &event.price {
        let rendered = price.to_string();
        if !rendered.is_empty() {
            lines.push(format!("Price: {rendered}"));
        }
    }

    lines.join("\n")
}

/// Normalize the icalendar crate's output: claim the PRODID, drop the
/// default CALSCALE, and name the calendar when rendering the full feed.
fn finalize(calendar: &Calendar, feed_name: Option<&str>) -> String {
    let rendered = calendar.to_string();
    let mut output = String::with_capacity(rendered.len());
    for line in rendered.lines() {
        if line.starts_with("PRODID:") {
            output.push_str("PRODID:");
            output.push_str(PRODID);
            output.push_str("\r\n");
            if let Some(name) = feed_name {
                output.push_str("X-WR-CALNAME:");
                output.push_str(name);
                output.push_str("\r\n");
            }
            continue;
        }
        if line == "CALSCALE:GREGORIAN" {
            continue;
        }
        output.push_str(line);
        output.push_str("\r\n");
    }
    output
}
