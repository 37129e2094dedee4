//! Core types and services for the opentrack event site.
//!
//! Everything the HTTP layer serves lives here: the typed event and
//! reference records, the directory loaders that read them from the content
//! tree, the geocoding service with its file-backed cache, and iCalendar
//! generation.

pub mod error;
pub mod event;
pub mod geocode;
pub mod ics;
pub mod loader;
pub mod reference;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{OpenTrackError, OpenTrackResult};
pub use event::{Event, Location, Price};
pub use reference::{Country, Currency, Language, Organizer};
