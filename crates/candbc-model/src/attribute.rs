//! Attribute definitions and attribute values.
//!
//! Attributes are named, typed metadata fields attachable to the
//! database itself or to nodes, messages, signals and environment
//! variables. A definition fixes the value kind at construction time;
//! values are bound to their definition through a stable arena handle so
//! the kind is always recoverable.

/// Object scope an attribute definition applies to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AttributeScope {
    /// Database-global attribute.
    #[default]
    Global,
    /// Node attribute (`BU_`).
    Node,
    /// Message attribute (`BO_`).
    Message,
    /// Signal attribute (`SG_`).
    Signal,
    /// Environment variable attribute (`EV_`).
    EnvVar,
}

/// Kind-specific payload of an attribute definition. The active variant
/// is fixed when the definition is constructed and never changes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum AttributeDefValue {
    /// `INT <min> <max>` definition with a signed default.
    Integer { minimum: i32, maximum: i32, default: i32 },
    /// `HEX <min> <max>` definition with an unsigned default.
    Hex { minimum: u32, maximum: u32, default: u32 },
    /// `FLOAT <min> <max>` definition.
    Float { minimum: f64, maximum: f64, default: f64 },
    /// `STRING` definition.
    String { default: String },
    /// `ENUM "a","b",...` definition; the default is one of the labels.
    Enumerator { values: Vec<String>, default: String },
}

/// An attribute definition (`BA_DEF_`).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AttributeDef {
    /// Attribute name, the global key of the definition.
    pub name: String,

    /// Scope of the objects the attribute may be attached to.
    pub scope: AttributeScope,

    /// Kind-tagged payload (ranges, defaults, enumerator labels).
    pub value: AttributeDefValue,
}

/// Stable handle of an attribute definition within the parser's
/// definition arena.
///
/// Redefining an attribute pushes a fresh arena entry and repoints the
/// name lookup; values recorded against the previous definition keep
/// their old handle and continue to resolve against it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AttrDefHandle(pub usize);

/// A concrete attribute value, matching its definition's kind.
/// Enumerator choices are stored as the chosen label string.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum AttrValue {
    /// Value of an integer attribute.
    Integer(i32),
    /// Value of a hex attribute.
    Hex(u32),
    /// Value of a float attribute.
    Float(f64),
    /// Value of a string or enumerator attribute.
    String(String),
}

/// An attribute value (`BA_`) bound to its definition.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AttributeValue {
    /// Handle of the definition this value was parsed against.
    pub def: AttrDefHandle,

    /// The value itself.
    pub value: AttrValue,
}
