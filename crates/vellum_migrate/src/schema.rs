// SPDX-License-Identifier: MIT OR Apache-2.0
//! Stored-schema snapshot and the struct membership oracle.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One field of a record type as it existed on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name
    pub name: String,
    /// Field type name
    pub type_name: String,
}

/// One record type as it existed on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructDef {
    /// Record type name
    pub name: String,
    /// Fields, in stored order
    pub fields: Vec<FieldDef>,
}

impl StructDef {
    /// Create a record type with no fields
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field
    pub fn field(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            type_name: type_name.into(),
        });
        self
    }
}

/// Description of every record type exactly as written on disk.
///
/// Supplied by the deserializer; this describes the historical layout of
/// the file being loaded, not the current in-memory layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    /// Record types, in stored order
    pub structs: Vec<StructDef>,
}

impl SchemaSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record type
    pub fn with_struct(mut self, def: StructDef) -> Self {
        self.structs.push(def);
        self
    }
}

/// O(1) lookup over the stored schema, built once per load.
///
/// Used when a version-number check alone cannot decide whether a transform
/// applies, e.g. when a field landed without a matching version bump.
#[derive(Debug)]
pub struct StructOracle {
    fields: HashMap<String, HashSet<String>>,
}

impl StructOracle {
    /// Precompute the membership table from a schema snapshot
    pub fn new(snapshot: &SchemaSnapshot) -> Self {
        let mut fields: HashMap<String, HashSet<String>> = HashMap::new();
        for def in &snapshot.structs {
            let entry = fields.entry(def.name.clone()).or_default();
            for field in &def.fields {
                entry.insert(field.name.clone());
            }
        }
        Self { fields }
    }

    /// Whether the record type existed on disk at all
    pub fn struct_exists(&self, record_type: &str) -> bool {
        self.fields.contains_key(record_type)
    }

    /// Whether the named field existed in the named record type on disk.
    ///
    /// False when the record type itself is absent.
    pub fn field_exists(&self, record_type: &str, field_name: &str) -> bool {
        self.fields
            .get(record_type)
            .is_some_and(|f| f.contains(field_name))
    }
}
