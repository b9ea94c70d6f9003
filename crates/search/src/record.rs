//! Diagnostic records and the read-only store that holds them.
//!
//! The on-disk document looks like:
//!
//! ```json
//! {
//!   "version": "2.0",
//!   "diagnostics": {
//!     "voyant_moteur": {
//!       "titre": "Voyant moteur allumé",
//!       "urgence": "moyenne",
//!       "keywords": ["voyant moteur", "check engine"],
//!       "causes": ["Capteur d'oxygène défectueux"],
//!       "solutions": ["Effectuer un diagnostic OBD2"],
//!       "cout_estime": "30-1500€",
//!       "contributeur": "système"
//!     }
//!   },
//!   "metadata": { "total_keywords": 2 }
//! }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, SearchError};
use crate::normalize::normalize;

/// Severity of a diagnosed condition.
///
/// Stored values are French (`critique`, `elevee`, `moyenne`, `faible`);
/// the English names are accepted as well. Anything else is kept verbatim
/// and weighs like [`Urgency::Low`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Urgency {
    /// Stop driving
    Critical,
    /// Needs attention soon
    High,
    /// Plan a repair
    Medium,
    /// Informational
    #[default]
    Low,
    /// Level not known to this engine
    Unrecognized(String),
}

impl Urgency {
    /// Parse a stored urgency label. Never fails.
    pub fn parse(raw: &str) -> Self {
        match normalize(raw).as_str() {
            "critique" | "critical" => Urgency::Critical,
            "elevee" | "high" => Urgency::High,
            "moyenne" | "medium" => Urgency::Medium,
            "faible" | "low" => Urgency::Low,
            _ => Urgency::Unrecognized(raw.to_string()),
        }
    }

    /// Numeric severity used for scoring and tie-breaks.
    #[inline]
    pub fn weight(&self) -> u8 {
        match self {
            Urgency::Critical => 9,
            Urgency::High => 7,
            Urgency::Medium => 4,
            Urgency::Low | Urgency::Unrecognized(_) => 1,
        }
    }

    /// Label as written in the store.
    pub fn label(&self) -> &str {
        match self {
            Urgency::Critical => "critique",
            Urgency::High => "elevee",
            Urgency::Medium => "moyenne",
            Urgency::Low => "faible",
            Urgency::Unrecognized(raw) => raw,
        }
    }

    /// English name for user-facing text. Unrecognized labels stay verbatim.
    pub fn display_name(&self) -> &str {
        match self {
            Urgency::Critical => "critical",
            Urgency::High => "high",
            Urgency::Medium => "medium",
            Urgency::Low => "low",
            Urgency::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for Urgency {
    fn from(raw: String) -> Self {
        Urgency::parse(&raw)
    }
}

impl From<Urgency> for String {
    fn from(urgency: Urgency) -> Self {
        urgency.label().to_string()
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One diagnosable condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Key of the record in the store
    #[serde(skip)]
    pub id: String,
    /// Human-readable title
    #[serde(rename = "titre")]
    pub title: String,
    /// Severity level
    #[serde(rename = "urgence", default)]
    pub urgency: Urgency,
    /// Keyword phrases, in priority order
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Likely causes
    #[serde(default)]
    pub causes: Vec<String>,
    /// Suggested fixes
    #[serde(default)]
    pub solutions: Vec<String>,
    /// Estimated repair cost, free-form
    #[serde(rename = "cout_estime", default, skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<String>,
    /// Who contributed the entry
    #[serde(rename = "contributeur", default, skip_serializing_if = "Option::is_none")]
    pub contributor: Option<String>,
}

impl Record {
    /// Creates a record with no keywords, causes or solutions.
    pub fn new(id: impl Into<String>, title: impl Into<String>, urgency: Urgency) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            urgency,
            keywords: Vec::new(),
            causes: Vec::new(),
            solutions: Vec::new(),
            estimated_cost: None,
            contributor: None,
        }
    }

    /// Replaces the keyword list.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }
}

/// Optional metadata block of a store document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreMetadata {
    /// Declared number of keywords across all records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_keywords: Option<usize>,
    /// Any other metadata fields, kept as-is
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Immutable collection of records, iterated in document order.
///
/// Built once and shared by reference; nothing mutates it after construction.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    version: Option<String>,
    records: Vec<Record>,
    by_id: HashMap<String, usize>,
    metadata: Option<StoreMetadata>,
}

#[derive(Deserialize)]
struct StoreDocument {
    #[serde(default)]
    version: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "records_in_order")]
    diagnostics: Vec<Record>,
    #[serde(default)]
    metadata: Option<StoreMetadata>,
}

impl RecordStore {
    /// Builds a store from records. A repeated id keeps its first position
    /// and takes the later record's contents.
    pub fn from_records<I>(version: Option<String>, records: I) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        let mut store = Self {
            version,
            ..Self::default()
        };
        for record in records {
            match store.by_id.get(&record.id) {
                Some(&pos) => store.records[pos] = record,
                None => {
                    store.by_id.insert(record.id.clone(), store.records.len());
                    store.records.push(record);
                }
            }
        }
        store
    }

    /// Attaches a metadata block.
    pub fn with_metadata(mut self, metadata: StoreMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Parses a store document from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: StoreDocument = serde_json::from_str(json)?;
        Ok(Self::from_document(doc))
    }

    /// Parses a store document from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let doc: StoreDocument = serde_json::from_reader(reader)?;
        Ok(Self::from_document(doc))
    }

    /// Reads and parses a store document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SearchError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let store = Self::from_json_str(&content)?;

        tracing::info!(
            path = %path.display(),
            records = store.len(),
            keywords = store.keyword_count(),
            version = store.version(),
            "Record store loaded"
        );

        Ok(store)
    }

    fn from_document(doc: StoreDocument) -> Self {
        let version = doc.version.map(|v| match v {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        });
        let store = Self::from_records(version, doc.diagnostics);
        match doc.metadata {
            Some(metadata) => store.with_metadata(metadata),
            None => store,
        }
    }

    /// Number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if no record is loaded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Records as a slice, in document order.
    pub fn as_slice(&self) -> &[Record] {
        &self.records
    }

    /// Looks up a record by id.
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.by_id.get(id).map(|&pos| &self.records[pos])
    }

    /// Store version, or `"unknown"` when the document has none.
    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or("unknown")
    }

    /// Metadata block, if the document had one.
    pub fn metadata(&self) -> Option<&StoreMetadata> {
        self.metadata.as_ref()
    }

    /// Declared keyword total, falling back to counting the records' keywords.
    pub fn keyword_count(&self) -> usize {
        self.metadata
            .as_ref()
            .and_then(|m| m.total_keywords)
            .unwrap_or_else(|| self.records.iter().map(|r| r.keywords.len()).sum())
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Reads the `diagnostics` object keeping its key order and stamping each
/// record with its key.
fn records_in_order<'de, D>(deserializer: D) -> std::result::Result<Vec<Record>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedRecords;

    impl<'de> Visitor<'de> for OrderedRecords {
        type Value = Vec<Record>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object mapping diagnostic ids to records")
        }

        fn visit_map<M>(self, mut map: M) -> std::result::Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            let mut records = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((id, mut record)) = map.next_entry::<String, Record>()? {
                record.id = id;
                records.push(record);
            }
            Ok(records)
        }
    }

    deserializer.deserialize_map(OrderedRecords)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "version": "2.0",
        "diagnostics": {
            "voyant_moteur": {
                "titre": "Voyant moteur allumé",
                "urgence": "moyenne",
                "keywords": ["voyant moteur", "témoin moteur", "check engine"],
                "causes": ["Capteur d'oxygène défectueux"],
                "solutions": ["Effectuer un diagnostic OBD2"],
                "cout_estime": "30-1500€",
                "contributeur": "système"
            },
            "freins": {
                "titre": "Freins qui grincent",
                "urgence": "elevee",
                "keywords": ["freins grincent"]
            },
            "antigel": {
                "titre": "Niveau d'antigel bas",
                "keywords": []
            }
        },
        "metadata": { "total_keywords": 42, "source": "community" }
    }"#;

    #[test]
    fn test_urgency_weights() {
        assert_eq!(Urgency::Critical.weight(), 9);
        assert_eq!(Urgency::High.weight(), 7);
        assert_eq!(Urgency::Medium.weight(), 4);
        assert_eq!(Urgency::Low.weight(), 1);
        assert_eq!(Urgency::Unrecognized("bizarre".into()).weight(), 1);
    }

    #[test]
    fn test_urgency_parse() {
        assert_eq!(Urgency::parse("critique"), Urgency::Critical);
        assert_eq!(Urgency::parse("Élevée"), Urgency::High);
        assert_eq!(Urgency::parse("medium"), Urgency::Medium);
        assert_eq!(Urgency::parse(" FAIBLE "), Urgency::Low);
        assert_eq!(Urgency::parse("urgent!"), Urgency::Unrecognized("urgent!".into()));
    }

    #[test]
    fn test_urgency_display_name() {
        assert_eq!(Urgency::parse("critique").display_name(), "critical");
        assert_eq!(Urgency::parse("moyenne").display_name(), "medium");
        assert_eq!(Urgency::Unrecognized("variable".into()).display_name(), "variable");
    }

    #[test]
    fn test_urgency_serde_roundtrip_label() {
        let json = serde_json::to_string(&Urgency::High).unwrap();
        assert_eq!(json, "\"elevee\"");
        let parsed: Urgency = serde_json::from_str("\"whatever\"").unwrap();
        assert_eq!(parsed.label(), "whatever");
    }

    #[test]
    fn test_parse_store_keeps_document_order() {
        let store = RecordStore::from_json_str(SAMPLE).unwrap();
        let ids: Vec<&str> = store.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["voyant_moteur", "freins", "antigel"]);
        assert_eq!(store.version(), "2.0");
    }

    #[test]
    fn test_parse_store_fields_and_defaults() {
        let store = RecordStore::from_json_str(SAMPLE).unwrap();

        let voyant = store.get("voyant_moteur").unwrap();
        assert_eq!(voyant.title, "Voyant moteur allumé");
        assert_eq!(voyant.urgency, Urgency::Medium);
        assert_eq!(voyant.keywords.len(), 3);
        assert_eq!(voyant.estimated_cost.as_deref(), Some("30-1500€"));
        assert_eq!(voyant.contributor.as_deref(), Some("système"));

        let antigel = store.get("antigel").unwrap();
        assert_eq!(antigel.urgency, Urgency::Low);
        assert!(antigel.causes.is_empty());
        assert!(antigel.estimated_cost.is_none());
    }

    #[test]
    fn test_metadata() {
        let store = RecordStore::from_json_str(SAMPLE).unwrap();
        assert_eq!(store.keyword_count(), 42);
        let meta = store.metadata().unwrap();
        assert_eq!(meta.extra.get("source").and_then(|v| v.as_str()), Some("community"));
    }

    #[test]
    fn test_keyword_count_fallback() {
        let store = RecordStore::from_json_str(r#"{"diagnostics": {
            "a": {"titre": "A", "keywords": ["x", "y"]},
            "b": {"titre": "B", "keywords": ["z"]}
        }}"#)
        .unwrap();
        assert_eq!(store.keyword_count(), 3);
        assert_eq!(store.version(), "unknown");
    }

    #[test]
    fn test_numeric_version() {
        let store = RecordStore::from_json_str(r#"{"version": 3, "diagnostics": {}}"#).unwrap();
        assert_eq!(store.version(), "3");
        assert!(store.is_empty());
    }

    #[test]
    fn test_missing_diagnostics_is_empty_store() {
        let store = RecordStore::from_json_str(r#"{"version": "1"}"#).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_malformed() {
        let err = RecordStore::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, SearchError::Malformed(_)));

        let err = RecordStore::from_json_str(r#"{"diagnostics": {"a": {"keywords": []}}}"#)
            .unwrap_err();
        assert!(matches!(err, SearchError::Malformed(_)));
    }

    #[test]
    fn test_duplicate_ids_keep_first_position() {
        let store = RecordStore::from_records(
            None,
            vec![
                Record::new("a", "First A", Urgency::Low),
                Record::new("b", "B", Urgency::Low),
                Record::new("a", "Second A", Urgency::High),
            ],
        );
        assert_eq!(store.len(), 2);
        let first = store.iter().next().unwrap();
        assert_eq!(first.id, "a");
        assert_eq!(first.title, "Second A");
    }

    #[test]
    fn test_from_reader() {
        let store = RecordStore::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let err = RecordStore::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SearchError::Io { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diagnostics.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let store = RecordStore::load(&path).unwrap();
        assert_eq!(store.len(), 3);
        assert!(store.get("freins").is_some());
    }
}
