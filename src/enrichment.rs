//! Lookups applied to accepted records after processing.
//!
//! - [`WriterRegistry`]: known writers. Each accepted record gets a `writers` field listing its
//!   writer names with a `valid` flag.
//! - [`GenreLookup`]: extra genres keyed by movie id, attached as `extra_genres` (an empty
//!   array when the id is unknown).
//!
//! Both are loaded from JSON documents. They only annotate records; they never skip one.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::MovieRecord;

/// Set of known writer identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriterRegistry {
    known: HashSet<String>,
}

impl WriterRegistry {
    pub fn new<I, S>(writers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            known: writers
                .into_iter()
                .map(|w| w.as_ref().trim().to_owned())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> IngestionResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&serde_json::from_str(&text)?)
    }

    /// Accepts an array whose entries are writer strings, or objects whose `id` and `name`
    /// values are both registered.
    pub fn from_json(doc: &serde_json::Value) -> IngestionResult<Self> {
        let entries = doc.as_array().ok_or_else(|| IngestionError::SchemaMismatch {
            message: "writer registry must be a json array".to_string(),
        })?;

        let mut keys = Vec::new();
        for entry in entries {
            match entry {
                serde_json::Value::Object(obj) => {
                    keys.extend(["id", "name"].iter().filter_map(|k| obj.get(*k).and_then(key_text)))
                }
                other => keys.extend(key_text(other)),
            }
        }
        Ok(Self::new(keys))
    }

    pub fn contains(&self, writer: &str) -> bool {
        self.known.contains(writer.trim())
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    /// Set `writers` to `[{"name": .., "valid": ..}]`, one entry per writer name.
    pub fn flag(&self, record: &mut MovieRecord) {
        let writers = record
            .writer_names
            .iter()
            .flatten()
            .map(|name| serde_json::json!({ "name": name, "valid": self.contains(name) }))
            .collect();
        record
            .extra
            .insert("writers".to_string(), serde_json::Value::Array(writers));
    }
}

/// Extra genres per movie id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenreLookup {
    by_id: HashMap<String, serde_json::Value>,
}

impl GenreLookup {
    pub fn from_path(path: impl AsRef<Path>) -> IngestionResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&serde_json::from_str(&text)?)
    }

    /// Reads an array of objects carrying `id` and `extra_genres`; entries missing either are
    /// ignored. A later entry for the same id wins.
    pub fn from_json(doc: &serde_json::Value) -> IngestionResult<Self> {
        let entries = doc.as_array().ok_or_else(|| IngestionError::SchemaMismatch {
            message: "extra genres must be a json array of records".to_string(),
        })?;

        let by_id = entries
            .iter()
            .filter_map(|entry| {
                let id = entry.get("id").and_then(key_text)?;
                let genres = entry.get("extra_genres")?;
                Some((id, genres.clone()))
            })
            .collect();
        Ok(Self { by_id })
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Set `extra_genres` from the lookup, or to `[]` when the record's id is unknown.
    pub fn attach(&self, record: &mut MovieRecord) {
        let genres = record
            .id
            .as_ref()
            .and_then(|id| self.by_id.get(&id.to_string()))
            .cloned()
            .unwrap_or_else(|| serde_json::Value::Array(Vec::new()));
        record.extra.insert("extra_genres".to_string(), genres);
    }
}

/// The lookups configured for a run.
#[derive(Debug, Clone, Default)]
pub struct Enrichment {
    pub writers: Option<WriterRegistry>,
    pub genres: Option<GenreLookup>,
}

impl Enrichment {
    /// Load whichever lookups have a path.
    pub fn load(writers: Option<&Path>, genres: Option<&Path>) -> IngestionResult<Self> {
        Ok(Self {
            writers: writers.map(|p| WriterRegistry::from_path(p)).transpose()?,
            genres: genres.map(|p| GenreLookup::from_path(p)).transpose()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.writers.is_none() && self.genres.is_none()
    }

    /// Annotate every record in place.
    pub fn apply(&self, records: &mut [MovieRecord]) {
        for record in records {
            if let Some(registry) = &self.writers {
                registry.flag(record);
            }
            if let Some(lookup) = &self.genres {
                lookup.attach(record);
            }
        }
    }
}

fn key_text(v: &serde_json::Value) -> Option<String> {
    match v {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
