//! Field definition: a named, typed column slot.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::types::DataType;

/// Schema entry for a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Column name.
    pub name: String,
    /// Declared data type.
    pub data_type: DataType,
    /// Whether null values are permitted.
    pub nullable: bool,
    /// Free-form metadata carried along with the field.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub metadata: IndexMap<String, String>,
}

impl Field {
    /// Create a nullable field without metadata.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            metadata: IndexMap::new(),
        }
    }

    /// Set nullability.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Clone this field's type and metadata under another name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}
