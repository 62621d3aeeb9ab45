//! Nodes and value descriptions.

use std::collections::BTreeMap;

use crate::attribute::AttributeValue;

/// Raw-value to label mapping, ordered by raw value.
///
/// Used for global value tables (`VAL_TABLE_`), per-signal value
/// descriptions (`VAL_ <id> <signal>`) and per-environment-variable
/// value descriptions (`VAL_ <envvar>`).
pub type ValueDescriptions = BTreeMap<u32, String>;

/// A network node (`BU_`), i.e. an ECU on the bus.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Node {
    /// Node name, unique across the whole database.
    pub name: String,

    /// Free-text comments attached via `CM_ BU_`.
    pub comments: Vec<String>,

    /// Attribute values attached via `BA_ ... BU_`.
    pub attributes: Vec<AttributeValue>,
}

impl Node {
    /// Create a node with the given name and no metadata.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comments: Vec::new(),
            attributes: Vec::new(),
        }
    }
}
