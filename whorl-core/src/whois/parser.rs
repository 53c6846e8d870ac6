use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::mem;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opening word of a registry's refusal, e.g. `ERROR:101: no entries found`.
const ERROR_MARKER: &str = "error";

/// Value RIRs give resources they do not hold.
const UNALLOCATED_MARKER: &str = "not allocated";

/// A cleaned WHOIS payload and the server that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub server: String,
    pub body: String,
}

impl RawResponse {
    pub fn new(server: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            body: body.into(),
        }
    }

    pub fn from_payload(server: &str, payload: &str) -> Self {
        Self::new(server, clean_payload(payload))
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Trim every line and drop blanks and `#`/`%` comment lines.
///
/// Error replies and unallocated-resource answers yield an empty body.
pub fn clean_payload(payload: &str) -> String {
    let mut body = String::with_capacity(payload.len());

    for line in payload.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('%') {
            continue;
        }
        body.push_str(line);
        body.push('\n');
    }

    if is_rejection(&body) {
        return String::new();
    }

    body
}

/// True when the first line opens with an error marker, or when some line
/// (or its field value) opens with the unallocated marker. Markers inside
/// names, values or remarks don't count.
fn is_rejection(body: &str) -> bool {
    let mut lines = body.lines();

    if let Some(first) = lines.next() {
        if starts_with_word(first, ERROR_MARKER) || is_unallocated(first) {
            return true;
        }
    }

    lines.any(is_unallocated)
}

fn is_unallocated(line: &str) -> bool {
    if starts_with_word(line, UNALLOCATED_MARKER) {
        return true;
    }
    line.split_once(':')
        .map(|(_, value)| starts_with_word(value.trim_start(), UNALLOCATED_MARKER))
        .unwrap_or(false)
}

/// Case-insensitive prefix match that ends on a word boundary, so `error`
/// matches `ERROR:101` but not `errors-to`.
fn starts_with_word(text: &str, word: &str) -> bool {
    let Some(head) = text.get(..word.len()) else {
        return false;
    };
    if !head.eq_ignore_ascii_case(word) {
        return false;
    }
    text[word.len()..]
        .chars()
        .next()
        .map_or(true, |c| !c.is_alphanumeric() && c != '-' && c != '_')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Domain,
    Ip,
    Asn,
    Unparsed,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecordKind::Domain => "domain",
            RecordKind::Ip => "ip",
            RecordKind::Asn => "asn",
            RecordKind::Unparsed => "unparsed",
        };
        f.write_str(s)
    }
}

/// A field seen once, or every value of a field that repeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    List(Vec<String>),
}

impl FieldValue {
    fn push(&mut self, value: String) {
        match self {
            FieldValue::Single(first) => {
                *self = FieldValue::List(vec![mem::take(first), value]);
            }
            FieldValue::List(values) => values.push(value),
        }
    }

    pub fn as_single(&self) -> Option<&str> {
        match self {
            FieldValue::Single(value) => Some(value),
            FieldValue::List(_) => None,
        }
    }

    pub fn first(&self) -> Option<&str> {
        match self {
            FieldValue::Single(value) => Some(value),
            FieldValue::List(values) => values.first().map(String::as_str),
        }
    }

    pub fn values(&self) -> Vec<&str> {
        match self {
            FieldValue::Single(value) => vec![value.as_str()],
            FieldValue::List(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Single(value.to_string())
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        FieldValue::List(values.into_iter().map(String::from).collect())
    }
}

/// Field names in first-seen order, each with its value(s).
#[derive(Debug, Clone, Default)]
pub struct Fields {
    entries: Vec<(String, FieldValue)>,
    index: HashMap<String, usize>,
}

impl PartialEq for Fields {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for Fields {}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `name`. Repeats turn the value into a list.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        match self.index.get(&name) {
            Some(&slot) => self.entries[slot].1.push(value),
            None => self.push_entry(name, FieldValue::Single(value)),
        }
    }

    fn push_entry(&mut self, name: String, value: FieldValue) {
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, value));
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.index.get(name).map(|&slot| &self.entries[slot].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Fields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = Fields;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to a string or a list of strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Fields, A::Error> {
                let mut fields = Fields::new();
                while let Some((name, value)) = access.next_entry::<String, FieldValue>()? {
                    match fields.index.get(&name) {
                        Some(&slot) => fields.entries[slot].1 = value,
                        None => fields.push_entry(name, value),
                    }
                }
                Ok(fields)
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

/// One parsed WHOIS answer from one server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub search: String,
    pub server: String,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub rawdata: String,
    #[serde(default, skip_serializing_if = "Fields::is_empty")]
    pub fields: Fields,
}

impl Record {
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

/// Records from a regional-registry sweep, keyed and ordered by server name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    pub search: String,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub records: BTreeMap<String, Record>,
}

impl ResultSet {
    pub fn new(search: impl Into<String>, kind: RecordKind) -> Self {
        Self {
            search: search.into(),
            kind,
            records: BTreeMap::new(),
        }
    }

    /// Add a record unless its server already contributed one.
    pub fn insert(&mut self, record: Record) {
        self.records.entry(record.server.clone()).or_insert(record);
    }

    pub fn get(&self, server: &str) -> Option<&Record> {
        self.records.get(server)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn servers(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.records
            .iter()
            .map(|(server, record)| (server.as_str(), record))
    }

    /// Collapse the sweep into a single text record, one section per server.
    pub fn summary(&self) -> Record {
        let mut rawdata = format!("RESULTS FOUND: {}\n", self.len());
        for (server, record) in self.iter() {
            rawdata.push_str(&format!(
                "Lookup results for {} from {} server:\n{}",
                self.search, server, record.rawdata
            ));
        }

        Record {
            search: self.search.clone(),
            server: self.servers().collect::<Vec<_>>().join(", "),
            kind: self.kind,
            rawdata,
            fields: Fields::new(),
        }
    }
}
