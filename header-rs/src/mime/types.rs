use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Header fields keyed by lower-cased name, in order of first appearance.
///
/// Repeated fields (`Received`, `Authentication-Results`, ...) keep every
/// value in the order they were seen.
///
/// Values are the raw header text with folding removed. RFC 2047 encoded
/// words are left encoded so that authentication headers reach the
/// analyzer byte-for-byte; the decoded forms of `Subject`, `From`, `To`
/// and `Date` are on [`HeaderBlock`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderFields {
    fields: Vec<(String, Vec<String>)>,
}

impl HeaderFields {
    pub fn new() -> Self {
        HeaderFields::default()
    }

    /// Append a value; `name` is lower-cased
    pub fn push(&mut self, name: &str, value: String) {
        let name = name.to_lowercase();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, values)) => values.push(value),
            None => self.fields.push((name, vec![value])),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        let name = name.to_lowercase();
        self.fields
            .iter()
            .find(|(existing, _)| *existing == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Number of distinct field names
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

impl Serialize for HeaderFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, values) in &self.fields {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

/// Decoded header block
#[derive(Debug, Clone, Default, Serialize)]
pub struct HeaderBlock {
    /// Every header field, raw (unfolded) values
    pub header: HeaderFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// First `From` address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub to: Vec<String>,
    /// RFC 3339, UTC
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Parser output, double-wrapped as `{header: {header: {...}}}`
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParsedHeaders {
    pub header: HeaderBlock,
}

impl ParsedHeaders {
    pub fn fields(&self) -> &HeaderFields {
        &self.header.header
    }

    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
