//! Environment variables.

use crate::attribute::AttributeValue;
use crate::node::ValueDescriptions;

/// Value kind of an environment variable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EnvVarKind {
    /// Integer variable (kind code 0).
    #[default]
    Integer,
    /// Floating point variable (kind code 1).
    Float,
    /// String variable (kind code 2).
    String,
    /// Opaque data variable (promoted by `ENVVAR_DATA_`).
    Data,
}

/// Access mode of an environment variable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AccessKind {
    /// Unrestricted access (`DUMMY_NODE_VECTOR0`).
    #[default]
    Unrestricted,
    /// Read access (`DUMMY_NODE_VECTOR1`).
    Read,
    /// Write access (`DUMMY_NODE_VECTOR2`).
    Write,
    /// Read and write access (`DUMMY_NODE_VECTOR3`).
    ReadWrite,
}

/// An environment variable (`EV_`).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EnvVar {
    /// Variable name, unique across the whole database.
    pub name: String,

    /// Value kind.
    pub kind: EnvVarKind,

    /// Minimum value.
    pub minimum: f64,

    /// Maximum value.
    pub maximum: f64,

    /// Unit string.
    pub unit: String,

    /// Initial value.
    pub initial_value: f64,

    /// Legacy numeric id (obsolete in the format, still carried).
    pub legacy_id: u32,

    /// Access mode.
    pub access: AccessKind,

    /// Nodes with access to the variable.
    pub nodes: Vec<String>,

    /// Raw-value labels attached via `VAL_`.
    pub value_descriptions: ValueDescriptions,

    /// Data size in bytes; meaningful only when `kind` is
    /// [`EnvVarKind::Data`].
    pub data_size: u32,

    /// Free-text comments attached via `CM_ EV_`.
    pub comments: Vec<String>,

    /// Attribute values attached via `BA_ ... EV_`.
    pub attributes: Vec<AttributeValue>,
}
