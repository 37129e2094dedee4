//! Loaders for organizer, language, currency and country records.

use std::collections::HashMap;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::loader::{dir_name, parse_descriptor, read_description, subdirectories};
use crate::reference::{Country, Currency, Language, Organizer};
use crate::settings::Settings;

/// A record kind stored as `<root>/<id>/<DESCRIPTOR>`.
trait ReferenceRecord: DeserializeOwned {
    const DESCRIPTOR: &'static str;

    fn set_id(&mut self, id: &str);
    fn set_description(&mut self, text: String);
    /// Hook for extras found next to the descriptor.
    fn inspect_dir(&mut self, _dir: &Path) {}
}

impl ReferenceRecord for Organizer {
    const DESCRIPTOR: &'static str = "organizer.yaml";

    fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
    }

    fn set_description(&mut self, text: String) {
        self.description = Some(text);
    }

    fn inspect_dir(&mut self, dir: &Path) {
        if dir.join("image.png").exists() {
            self.image_url = Some(format!("/organizer/{}/image.png", self.id));
        }
        self.directory = Some(dir.to_path_buf());
    }
}

impl ReferenceRecord for Language {
    const DESCRIPTOR: &'static str = "language.yaml";

    fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
    }

    fn set_description(&mut self, text: String) {
        self.description = Some(text);
    }
}

impl ReferenceRecord for Currency {
    const DESCRIPTOR: &'static str = "currency.yaml";

    fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
    }

    fn set_description(&mut self, text: String) {
        self.description = Some(text);
    }
}

impl ReferenceRecord for Country {
    const DESCRIPTOR: &'static str = "country.yaml";

    fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
    }

    fn set_description(&mut self, text: String) {
        self.description = Some(text);
    }
}

/// Scan `root` for records, keyed by the lowercased directory name. The
/// record itself keeps the directory name as-is for its id.
fn load_reference<T: ReferenceRecord>(root: &Path) -> HashMap<String, T> {
    let mut records = HashMap::new();
    for dir in subdirectories(root) {
        let descriptor = dir.join(T::DESCRIPTOR);
        if !descriptor.exists() {
            continue;
        }
        let Some(mut record) = parse_descriptor::<T>(&descriptor) else {
            continue;
        };
        let id = dir_name(&dir);
        record.set_id(&id);
        if let Some(text) = read_description(&dir) {
            record.set_description(text);
        }
        record.inspect_dir(&dir);
        records.insert(id.to_lowercase(), record);
    }
    records
}

pub fn load_organizers(root: &Path) -> HashMap<String, Organizer> {
    load_reference(root)
}

pub fn load_languages(root: &Path) -> HashMap<String, Language> {
    load_reference(root)
}

pub fn load_currencies(root: &Path) -> HashMap<String, Currency> {
    load_reference(root)
}

pub fn load_countries(root: &Path) -> HashMap<String, Country> {
    load_reference(root)
}

/// All four reference mappings, loaded fresh from the data directory.
#[derive(Debug, Default)]
pub struct ReferenceData {
    pub organizers: HashMap<String, Organizer>,
    pub languages: HashMap<String, Language>,
    pub currencies: HashMap<String, Currency>,
    pub countries: HashMap<String, Country>,
}

impl ReferenceData {
    pub fn load(settings: &Settings) -> ReferenceData {
        ReferenceData {
            organizers: load_organizers(&settings.organizers_dir()),
            languages: load_languages(&settings.languages_dir()),
            currencies: load_currencies(&settings.currencies_dir()),
            countries: load_countries(&settings.countries_dir()),
        }
    }
}
