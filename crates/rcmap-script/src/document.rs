//! A whole map: ordered entity records plus the bounds directive.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::EntityRecord;

/// The directive line that disables the small map bounds.
pub const DISABLE_BOUNDS_DIRECTIVE: &str = "map,disablebounds;";

/// An ordered sequence of records and the document-level bounds flag.
///
/// The directive is not an entity and never appears in `records`; it is
/// written first when `bounds_disabled` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub bounds_disabled: bool,
    pub records: Vec<EntityRecord>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Export the object model as JSON for external tooling.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ScriptWriter::new(self.bounds_disabled, &self.records).fmt(f)
    }
}

/// Writes records as map script text, one `;`-terminated line each.
#[derive(Debug, Clone, Copy)]
pub struct ScriptWriter<'a, R = EntityRecord> {
    bounds_disabled: bool,
    records: &'a [R],
}

impl<'a, R> ScriptWriter<'a, R> {
    pub fn new(bounds_disabled: bool, records: &'a [R]) -> Self {
        Self {
            bounds_disabled,
            records,
        }
    }
}

impl<R: fmt::Display> fmt::Display for ScriptWriter<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bounds_disabled {
            writeln!(f, "{DISABLE_BOUNDS_DIRECTIVE}")?;
        }
        for record in self.records {
            writeln!(f, "{record}")?;
        }
        Ok(())
    }
}
