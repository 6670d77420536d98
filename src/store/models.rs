use std::fmt;
use std::str::FromStr;

use bson::{Bson, Document};
use serde_json::Value;

use super::error::StoreError;

/// Maximum size in bytes of a single BSON document accepted by MongoDB.
pub const MAX_DOCUMENT_SIZE: usize = 16 * 1024 * 1024;

/// Payload for an insert: either a single document or a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Documents {
    One(Document),
    Many(Vec<Document>),
}

impl Documents {
    pub fn len(&self) -> usize {
        match self {
            Documents::One(_) => 1,
            Documents::Many(docs) => docs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Document> for Documents {
    fn from(doc: Document) -> Self {
        Documents::One(doc)
    }
}

impl From<Vec<Document>> for Documents {
    fn from(docs: Vec<Document>) -> Self {
        Documents::Many(docs)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// JSON objects become a single document, arrays must contain only
// objects. Anything else is rejected before reaching the driver.
impl TryFrom<Value> for Documents {
    type Error = StoreError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(_) => Ok(Documents::One(bson::to_document(&value)?)),
            Value::Array(items) => {
                let mut docs = Vec::with_capacity(items.len());
                for (idx, item) in items.iter().enumerate() {
                    if !item.is_object() {
                        return Err(StoreError::InvalidPayload(format!(
                            "{} at index {}",
                            json_kind(item),
                            idx
                        )));
                    }
                    docs.push(bson::to_document(item)?);
                }
                Ok(Documents::Many(docs))
            }
            other => Err(StoreError::InvalidPayload(json_kind(&other).to_string())),
        }
    }
}

/// Ids assigned to inserted documents, in the same order as the
/// input payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertOutcome {
    pub inserted_ids: Vec<Bson>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_i32(&self) -> i32 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "asc"),
            SortDirection::Descending => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" | "1" => Ok(SortDirection::Ascending),
            "desc" | "descending" | "-1" => Ok(SortDirection::Descending),
            _ => Err(format!("Invalid sort direction: {}", s)),
        }
    }
}

/// Options for `DocumentStore::get_documents`.
///
/// `Default` builds fresh empty containers on every call so nothing
/// is shared between queries.
#[derive(Debug, Clone)]
pub struct FindOptions {
    /// Fields to include or exclude. Empty returns every field.
    pub projection: Document,
    /// Ordered `(field, direction)` pairs applied before the limit.
    pub sort: Vec<(String, SortDirection)>,
    /// Maximum number of documents returned. A limit of 1 behaves
    /// like `find_one`.
    pub limit: u32,
    /// Emit the BSON size of each returned document.
    pub report_size: bool,
    /// Emit each returned document.
    pub echo: bool,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            projection: Document::new(),
            sort: Vec::new(),
            limit: 1,
            report_size: false,
            echo: false,
        }
    }
}

impl FindOptions {
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn projection(mut self, projection: Document) -> Self {
        self.projection = projection;
        self
    }

    pub fn sort_by(mut self, field: &str, direction: SortDirection) -> Self {
        self.sort.push((field.to_string(), direction));
        self
    }

    /// The sort pairs folded into an ordered sort document.
    pub fn sort_document(&self) -> Document {
        let mut sort = Document::new();
        for (field, direction) in &self.sort {
            sort.insert(field.clone(), direction.as_i32());
        }
        sort
    }

    // The driver treats a limit of 0 as unbounded, which would let a
    // caller scan the whole collection by accident.
    pub(crate) fn effective_limit(&self) -> i64 {
        i64::from(self.limit.max(1))
    }
}

/// Which documents a delete removes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteScope {
    /// At most one document matching the query.
    #[default]
    One,
    /// Every document matching a non-empty query.
    Many,
    /// Every document in the collection; the query is ignored.
    All,
}
