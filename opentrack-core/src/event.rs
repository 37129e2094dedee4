//! The event record and its embedded value types.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::reference::{Country, Currency, Language, Organizer};

/// A single event, loaded from `<dir>/event.yaml`.
///
/// The `id` is the name of the directory the descriptor was found in and is
/// never taken from the file itself. The `*_details` fields are filled in
/// after parsing by linking against the reference records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, skip_deserializing)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Start date; a descriptor without a valid ISO 8601 date fails to load.
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub location: Location,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub speakers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub online: bool,
    /// Long-form Markdown text from `description.md`, overriding any
    /// `description` key in the descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub organizer_details: Option<Organizer>,
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub language_details: Option<Language>,
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub currency_details: Option<Currency>,
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub country_details: Option<Country>,
}

impl Event {
    /// Human-readable name: `name`, falling back to `title`, then the id.
    pub fn summary(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| self.title.as_deref().filter(|title| !title.trim().is_empty()))
            .unwrap_or(&self.id)
    }
}

/// Where an event takes place. All fields are optional; online-only events
/// typically leave everything empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Location {
    /// Address, city and country joined with `", "`, skipping empty parts.
    pub fn text(&self) -> String {
        [self.address.as_deref(), self.city.as_deref(), self.country.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// Event pricing, in the three shapes descriptors use: a min/max range, a
/// single amount, or free-form text such as "Free".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Range {
        min_amount: i64,
        max_amount: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        currency: Option<String>,
    },
    Fixed {
        amount: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        currency: Option<String>,
    },
    Text(String),
}

impl Price {
    /// The currency code carried by structured prices.
    pub fn currency(&self) -> Option<&str> {
        match self {
            Price::Range { currency, .. } | Price::Fixed { currency, .. } => currency.as_deref(),
            Price::Text(_) => None,
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Range { min_amount, max_amount, currency } => {
                write!(f, "{} - {}", group_thousands(*min_amount), group_thousands(*max_amount))?;
                if let Some(currency) = currency {
                    write!(f, " {currency}")?;
                }
                Ok(())
            }
            Price::Fixed { amount, currency } => {
                write!(f, "{}", group_thousands(*amount))?;
                if let Some(currency) = currency {
                    write!(f, " {currency}")?;
                }
                Ok(())
            }
            Price::Text(text) => write!(f, "{text}"),
        }
    }
}

/// Render an amount with spaces between thousands groups (`1500` → `1 500`).
fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }
    if value < 0 { format!("-{grouped}") } else { grouped }
}
