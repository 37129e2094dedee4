//! HTML pages, rendered with maud.

use axum::{Router, extract::State, response::Html, routing::get};
use chrono::Local;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};

use opentrack_core::event::Event;

use crate::state::AppState;

const STYLES: &str = include_str!("../../static/style.css");

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

/// GET / - the event listing.
async fn index(State(state): State<AppState>) -> Html<String> {
    let events = state.load_events();
    Html(index_page(&events).into_string())
}

fn index_page(events: &[Event]) -> Markup {
    let today = Local::now().date_naive();
    let upcoming = events.iter().filter(|event| event.date >= today).count();

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "OpenTrack.dev - Events" }
                style { (STYLES) }
            }
            body {
                header.site-header {
                    h1 { "OpenTrack.dev" }
                    p.tagline {
                        (upcoming) " upcoming events"
                        " · "
                        a href="/events.ics" { "Subscribe to the calendar" }
                    }
                }
                main {
                    @if events.is_empty() {
                        p.empty { "No events yet." }
                    }
                    @for event in events {
                        (event_card(event))
                    }
                }
            }
        }
    }
}

fn event_card(event: &Event) -> Markup {
    let organizer_name = event
        .organizer_details
        .as_ref()
        .and_then(|details| details.name.as_deref())
        .or(event.organizer.as_deref());
    let organizer_logo =
        event.organizer_details.as_ref().and_then(|details| details.image_url.as_deref());
    let location = event.location.text();
    let when = match event.end_date {
        Some(end_date) => {
            format!("{} to {}", event.date.format("%-d %b %Y"), end_date.format("%-d %b %Y"))
        }
        None => event.date.format("%-d %b %Y").to_string(),
    };
    let price = event.price.as_ref().map(|price| price.to_string());

    html! {
        article.event id={ "event-" (event.id) } {
            div.event-head {
                h2 { (event.summary()) }
                @if let Some(kind) = &event.kind {
                    span.badge.kind { (kind) }
                }
                @if event.online {
                    span.badge.online { "Online" }
                }
            }
            p.event-when { (when) }
            @if !location.is_empty() {
                p.event-where { (location) }
            }
            @if let Some(name) = organizer_name {
                p.event-organizer {
                    @if let Some(logo) = organizer_logo {
                        img.organizer-logo src=(logo) alt=(name);
                    }
                    "Organized by " (name)
                }
            }
            @if let Some(price) = &price {
                p.event-price { "Price: " (price) }
            }
            @if !event.tags.is_empty() {
                p.event-tags {
                    @for tag in &event.tags {
                        span.tag { (tag) }
                    }
                }
            }
            @if let Some(description) = &event.description {
                div.event-description { (markdown(description)) }
            }
            p.event-links {
                @if let Some(url) = &event.url {
                    a href=(url) { "Website" }
                    " · "
                }
                a href={ "/event/" (event.id) ".ics" } { "Add to calendar" }
            }
        }
    }
}

/// Convert Markdown to HTML markup.
fn markdown(text: &str) -> Markup {
    let parser = Parser::new(text);
    let mut rendered = String::new();
    md_html::push_html(&mut rendered, parser);
    PreEscaped(rendered)
}
