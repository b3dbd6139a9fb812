//! # Domain Model: Entries and Values
//!
//! This module defines the in-memory shape of an account record: [`Entry`] and
//! its attribute [`Value`]s, plus [`EntryRecord`], the structured export form.
//!
//! ## Plain vs. Confidential
//!
//! Every attribute value carries its own [`ValueKind`]. The kind is decided
//! once, from the canonical field name, when the value is created:
//!
//! - `pass` and every field starting with `!` hold **confidential** values.
//! - Everything else is **plain**.
//!
//! Formatting dispatches on the kind. `Display` (and `Debug`) of a
//! confidential value yields a redacted placeholder carrying only the
//! character count, e.g. `<private[12]>`. The real text is only reachable
//! through [`Value::reveal`].
//!
//! ## Entry Identity
//!
//! - `uuid`: assigned by the database on first insertion, never changed after.
//! - `itemno`: 1-based insertion sequence number, assigned by the database.
//! - `lineno`: where the entry started in its source file (diagnostics only).
//!
//! ## Tombstones
//!
//! An entry is deleted when it carries the reserved [`DELETED_TAG`]. Deleted
//! entries keep their slot and item number; they are only hidden from display.

use crate::fields::{self, OATH_PSK_FIELD};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use uuid::Uuid;

/// Reserved tag marking an entry as deleted.
pub const DELETED_TAG: &str = "\\deleted";

/// Name given to entries whose block had no name header.
pub const UNNAMED: &str = "(Unnamed)";

/// Sentinel stored in place of a confidential value that could not be recovered.
pub const LOST_DATA: &str = "<private[data lost]>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Plain,
    Confidential,
}

/// A single attribute value.
#[derive(Clone, PartialEq, Eq)]
pub struct Value {
    kind: ValueKind,
    text: String,
}

impl Value {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            kind: ValueKind::Plain,
            text: text.into(),
        }
    }

    pub fn confidential(text: impl Into<String>) -> Self {
        Self {
            kind: ValueKind::Confidential,
            text: text.into(),
        }
    }

    /// Creates a value whose kind follows the canonical field name.
    pub fn for_field(field: &str, text: impl Into<String>) -> Self {
        if fields::is_confidential_field(field) {
            Self::confidential(text)
        } else {
            Self::plain(text)
        }
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn is_confidential(&self) -> bool {
        self.kind == ValueKind::Confidential
    }

    /// The real text, regardless of kind.
    pub fn reveal(&self) -> &str {
        &self.text
    }

    /// Whether this is the sentinel left behind by an unrecoverable parse.
    pub fn is_lost(&self) -> bool {
        self.text == LOST_DATA
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ValueKind::Plain => f.write_str(&self.text),
            ValueKind::Confidential if self.is_lost() => f.write_str(&self.text),
            ValueKind::Confidential => write!(f, "<private[{}]>", self.text.chars().count()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ValueKind::Plain => f.debug_tuple("Plain").field(&self.text).finish(),
            ValueKind::Confidential => f
                .debug_tuple("Confidential")
                .field(&format_args!("{}", self))
                .finish(),
        }
    }
}

/// One account record.
#[derive(Debug, Clone, Default)]
pub struct Entry {
    pub uuid: Option<Uuid>,
    pub name: String,
    pub tags: BTreeSet<String>,
    /// Canonical field name to its values, in the order they were read.
    pub attributes: BTreeMap<String, Vec<Value>>,
    /// Free text, one `\n`-terminated line per comment line.
    pub comment: String,
    pub itemno: Option<usize>,
    pub lineno: Option<usize>,
    /// Set when parsing lost confidential data irrecoverably.
    pub broken: bool,
}

impl Entry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Appends a value under the canonical spelling of `field`.
    ///
    /// The value's kind follows the canonical name.
    pub fn add_attribute(&mut self, field: &str, text: impl Into<String>) {
        let field = fields::translate_field(field);
        let value = Value::for_field(field, text);
        self.push_value(field, value);
    }

    /// Appends an already-built value under an already-canonical field name.
    pub fn push_value(&mut self, field: &str, value: Value) {
        self.attributes
            .entry(field.to_string())
            .or_default()
            .push(value);
    }

    /// Values stored for `field`, looked up by canonical name.
    pub fn values(&self, field: &str) -> Option<&[Value]> {
        self.attributes
            .get(fields::translate_field(field))
            .map(Vec::as_slice)
    }

    /// Tags are case-insensitive and stored lowercased.
    pub fn add_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags
            .extend(tags.into_iter().map(|tag| tag.as_ref().to_lowercase()));
    }

    pub fn is_deleted(&self) -> bool {
        self.tags
            .iter()
            .any(|tag| tag.eq_ignore_ascii_case(DELETED_TAG))
    }

    /// Marks the entry deleted without touching anything else.
    pub fn tombstone(&mut self) {
        self.tags.insert(DELETED_TAG.to_string());
    }

    /// Sort key: the name from its first alphanumeric character on, lowercased.
    pub fn normalized_name(&self) -> String {
        let start = self.name.find(char::is_alphanumeric).unwrap_or(0);
        self.name[start..]
            .lines()
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }

    /// True when the block carried nothing worth keeping.
    pub fn is_empty(&self) -> bool {
        (self.name.is_empty() || self.name == UNNAMED)
            && self.attributes.is_empty()
            && self.tags.is_empty()
            && self.comment.is_empty()
    }

    /// The OATH preshared key with spaces removed, if the entry has one.
    pub fn oath_psk(&self) -> Option<String> {
        self.attributes
            .get(OATH_PSK_FIELD)
            .and_then(|values| values.first())
            .map(|value| value.reveal().replace(' ', ""))
    }

    /// Structured export form. Values are revealed.
    pub fn to_record(&self) -> EntryRecord {
        let data = fields::sort_fields(self.attributes.keys().map(String::as_str), false)
            .into_iter()
            .map(|field| {
                let values = self.attributes[field]
                    .iter()
                    .map(|value| value.reveal().to_string())
                    .collect();
                (field.to_string(), values)
            })
            .collect();

        EntryRecord {
            name: self.name.clone(),
            comment: self.comment.clone(),
            data: FieldValues(data),
            lineno: self.lineno,
            tags: self.tags.iter().cloned().collect(),
            uuid: self.uuid,
        }
    }
}

/// Interchange-neutral view of an entry, for JSON/YAML adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryRecord {
    pub name: String,
    pub comment: String,
    pub data: FieldValues,
    pub lineno: Option<usize>,
    pub tags: Vec<String>,
    pub uuid: Option<Uuid>,
}

/// Field to values, kept in emission order when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues(pub Vec<(String, Vec<String>)>);

impl Serialize for FieldValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, values) in &self.0 {
            map.serialize_entry(field, values)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidential_value_displays_length_only() {
        let value = Value::confidential("hunter2");
        assert_eq!(value.to_string(), "<private[7]>");
        assert_eq!(value.reveal(), "hunter2");
    }

    #[test]
    fn confidential_length_counts_characters() {
        let value = Value::confidential("päss");
        assert_eq!(value.to_string(), "<private[4]>");
    }

    #[test]
    fn debug_does_not_leak_confidential_text() {
        let value = Value::confidential("hunter2");
        let debug = format!("{:?}", value);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<private[7]>"));
    }

    #[test]
    fn lost_sentinel_displays_verbatim() {
        let value = Value::confidential(LOST_DATA);
        assert!(value.is_lost());
        assert_eq!(value.to_string(), LOST_DATA);
    }

    #[test]
    fn plain_value_displays_text() {
        let value = Value::plain("alice");
        assert_eq!(value.to_string(), "alice");
        assert_eq!(value.kind(), ValueKind::Plain);
    }

    #[test]
    fn kind_follows_canonical_field() {
        assert!(Value::for_field("pass", "x").is_confidential());
        assert!(Value::for_field("!pin", "x").is_confidential());
        assert!(!Value::for_field("login", "x").is_confidential());
    }

    #[test]
    fn add_attribute_canonicalizes_and_accumulates() {
        let mut entry = Entry::new("example");
        entry.add_attribute("hostname", "x");
        entry.add_attribute("host", "y");
        entry.add_attribute("password", "secret");

        let hosts: Vec<&str> = entry.values("host").unwrap().iter().map(Value::reveal).collect();
        assert_eq!(hosts, vec!["x", "y"]);
        assert!(!entry.attributes.contains_key("hostname"));
        assert!(entry.values("pass").unwrap()[0].is_confidential());
        // lookups go through the alias table too
        assert_eq!(entry.values("machine").unwrap().len(), 2);
    }

    #[test]
    fn normalized_name_strips_leading_punctuation() {
        assert_eq!(Entry::new("_Zebra").normalized_name(), "zebra");
        assert_eq!(Entry::new("--Zebra Co").normalized_name(), "zebra co");
        assert_eq!(Entry::new("Apple").normalized_name(), "apple");
        assert_eq!(Entry::new("!!!").normalized_name(), "!!!");
    }

    #[test]
    fn tags_fold_case() {
        let mut entry = Entry::new("site");
        entry.add_tags(["Work", "work", "WORK", "Home"]);
        let tags: Vec<&str> = entry.tags.iter().map(String::as_str).collect();
        assert_eq!(tags, vec!["home", "work"]);
    }

    #[test]
    fn tombstone_marks_deleted() {
        let mut entry = Entry::new("old");
        assert!(!entry.is_deleted());
        entry.tombstone();
        assert!(entry.is_deleted());
    }

    #[test]
    fn deleted_tag_is_case_insensitive() {
        let mut entry = Entry::new("old");
        entry.add_tags(["\\Deleted"]);
        assert!(entry.is_deleted());
    }

    #[test]
    fn empty_entry_detection() {
        assert!(Entry::new(UNNAMED).is_empty());
        assert!(Entry::default().is_empty());

        let mut commented = Entry::new(UNNAMED);
        commented.comment.push_str("note\n");
        assert!(!commented.is_empty());

        assert!(!Entry::new("named").is_empty());
    }

    #[test]
    fn oath_psk_strips_spaces() {
        let mut entry = Entry::new("2fa");
        entry.add_attribute(OATH_PSK_FIELD, "ABCD EFGH");
        assert_eq!(entry.oath_psk(), Some("ABCDEFGH".to_string()));
        assert_eq!(Entry::new("none").oath_psk(), None);
    }

    #[test]
    fn record_keeps_field_order_and_reveals() {
        let mut entry = Entry::new("site");
        entry.add_attribute("zeta", "z");
        entry.add_attribute("pass", "secret");
        entry.add_attribute("login", "alice");
        entry.add_tags(["b", "a"]);

        let record = entry.to_record();
        let fields: Vec<&str> = record.data.0.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(fields, vec!["login", "pass", "zeta"]);
        assert_eq!(record.data.0[1].1, vec!["secret".to_string()]);
        assert_eq!(record.tags, vec!["a", "b"]);

        let json = serde_json::to_string(&record).unwrap();
        let login_at = json.find("\"login\"").unwrap();
        let zeta_at = json.find("\"zeta\"").unwrap();
        assert!(login_at < zeta_at);
    }
}
