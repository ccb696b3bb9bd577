use std::fmt::{Display, Formatter};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use crate::domain::{CatalogHeader, EventCatalog};

const RECORDS_MARKER: &str = "\n=== EVENTS ===\n";

#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    TomlDecode(toml::de::Error),
    TomlEncode(toml::ser::Error),
    JsonDecode(serde_json::Error),
    JsonEncode(serde_json::Error),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(err) => write!(f, "io error: {err}"),
            StorageError::TomlDecode(err) => write!(f, "failed to parse TOML header: {err}"),
            StorageError::TomlEncode(err) => write!(f, "failed to encode TOML header: {err}"),
            StorageError::JsonDecode(err) => write!(f, "failed to parse JSONL event record: {err}"),
            StorageError::JsonEncode(err) => write!(f, "failed to encode JSONL event record: {err}"),
        }
    }
}

impl std::error::Error for StorageError {}

pub fn load_catalog(path: &Path) -> Result<EventCatalog, StorageError> {
    let raw = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(EventCatalog::new()),
        Err(err) => return Err(StorageError::Io(err)),
    };

    if raw.trim().is_empty() {
        return Ok(EventCatalog::new());
    }

    let (header_blob, records_blob) = if let Some((header, records)) = raw.split_once(RECORDS_MARKER) {
        (header, records)
    } else {
        (raw.as_str(), "")
    };

    let header: CatalogHeader = toml::from_str(header_blob).map_err(StorageError::TomlDecode)?;
    let mut events = Vec::new();
    for line in records_blob.lines() {
        if line.trim().is_empty() {
            continue;
        }
        events.push(serde_json::from_str(line).map_err(StorageError::JsonDecode)?);
    }

    Ok(EventCatalog { header, events })
}

pub fn save_catalog(path: &Path, catalog: &EventCatalog) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(StorageError::Io)?;
        }
    }

    let header = toml::to_string_pretty(&catalog.header).map_err(StorageError::TomlEncode)?;
    let mut file = fs::File::create(path).map_err(StorageError::Io)?;
    file.write_all(header.as_bytes())
        .map_err(StorageError::Io)?;
    file.write_all(RECORDS_MARKER.as_bytes())
        .map_err(StorageError::Io)?;

    for event in &catalog.events {
        let line = serde_json::to_string(event).map_err(StorageError::JsonEncode)?;
        file.write_all(line.as_bytes()).map_err(StorageError::Io)?;
        file.write_all(b"\n").map_err(StorageError::Io)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use crate::card::{TemplateRouter, compose};
    use crate::domain::{EventCatalog, EventDraft};

    use super::{load_catalog, save_catalog};

    #[test]
    fn round_trips_toml_and_jsonl() {
        let mut catalog = EventCatalog::new();
        catalog.add_event(EventDraft {
            title: "Launch Party".to_string(),
            description: "Mainnet launch celebration".to_string(),
            date: "2026-03-15T00:00:00Z".to_string(),
            location: "Jakarta".to_string(),
            image: None,
            organizer: Some("Acme".to_string()),
            price: 0.0,
            quota: 100,
            attendees: Some(vec!["a1".to_string(), "a2".to_string()]),
        });
        catalog.add_event(EventDraft {
            title: "Builders Workshop".to_string(),
            description: String::new(),
            date: "2026-04-02".to_string(),
            location: "Bandung".to_string(),
            image: Some("https://cdn.example.net/workshop.png".to_string()),
            organizer: None,
            price: 25.0,
            quota: 40,
            attendees: None,
        });

        let path = temp_file("eventdeck_storage_roundtrip.catalog");
        save_catalog(&path, &catalog).expect("save should succeed");
        let loaded = load_catalog(&path).expect("load should succeed");

        assert_eq!(loaded.events.len(), 2);
        assert_eq!(loaded.events[0].attendee_count(), 2);
        assert_eq!(loaded.events[1].image.as_deref(), Some("https://cdn.example.net/workshop.png"));
        assert!(loaded.events[1].organizer.is_none());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn sparse_records_load_with_defaults_and_compose_degraded_cards() {
        let path = temp_file("eventdeck_storage_sparse.catalog");
        let blob = r#"schema_version = 1
created_at = "2026-01-01T00:00:00Z"
name = "Events"

=== EVENTS ===
{"id":"e1"}
"#;
        fs::write(&path, blob).expect("write should succeed");

        let loaded = load_catalog(&path).expect("sparse record should load");
        assert_eq!(loaded.events.len(), 1);
        let record = &loaded.events[0];
        assert_eq!(record.title, "");
        assert_eq!(record.location, "");
        assert_eq!(record.description, "");
        assert_eq!(record.price, 0.0);
        assert_eq!(record.quota, 0);
        assert_eq!(record.attendee_count(), 0);

        let card = compose(record, &TemplateRouter::default());
        assert!(card.date.is_none());
        assert_eq!(card.organizer, "RPN");
        assert_eq!(card.attendance, "0 / 0");
        assert_eq!(card.price.label(), "FREE");
        assert_eq!(card.detail_link.href, "/events/e1");
        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_loads_as_fresh_catalog() {
        let path = temp_file("eventdeck_storage_missing.catalog");
        let _ = fs::remove_file(&path);
        let loaded = load_catalog(&path).expect("missing file should load empty");
        assert!(loaded.events.is_empty());
    }

    fn temp_file(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("{}_{}", name, std::process::id()));
        path
    }
}
