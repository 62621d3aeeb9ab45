//! Signals, their layout shape and multiplexing state.

use crate::attribute::AttributeValue;
use crate::node::ValueDescriptions;

/// Byte order of a signal within the message payload.
///
/// Big-endian ("Motorola") signals name the most significant bit of
/// their first byte and invert bit numbering across byte boundaries;
/// little-endian ("Intel") signals occupy a plain contiguous bit range.
/// See [`crate::layout`] for the exact semantics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ByteOrder {
    /// Motorola byte order (`@0` in the signal definition).
    #[default]
    BigEndian,
    /// Intel byte order (`@1`).
    LittleEndian,
}

/// Interpretation of the raw bits of a signal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ValueKind {
    /// Signed integer (`-`).
    #[default]
    Signed,
    /// Unsigned integer (`+`).
    Unsigned,
    /// IEEE 754 single precision (via `SIG_VALTYPE_ ... 1`).
    Float,
    /// IEEE 754 double precision (via `SIG_VALTYPE_ ... 2`).
    Double,
}

/// The reusable layout/scaling bundle shared by signals and signal type
/// definitions: `physical = raw * factor + offset`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SignalShape {
    /// Size in bits.
    pub size: u32,
    /// Byte order of the raw bits.
    pub byte_order: ByteOrder,
    /// Interpretation of the raw bits.
    pub value_kind: ValueKind,
    /// Linear scaling factor.
    pub factor: f64,
    /// Linear scaling offset.
    pub offset: f64,
    /// Physical minimum.
    pub minimum: f64,
    /// Physical maximum.
    pub maximum: f64,
    /// Unit string (free text, may be empty).
    pub unit: String,
}

impl Default for SignalShape {
    fn default() -> Self {
        Self {
            size: 0,
            byte_order: ByteOrder::default(),
            value_kind: ValueKind::default(),
            factor: 1.0,
            offset: 0.0,
            minimum: 0.0,
            maximum: 0.0,
            unit: String::new(),
        }
    }
}

/// Multiplexing state of a signal.
///
/// A signal can be the multiplexor switch (`M`), a multiplexed value
/// (`m<case>`), or both at once; extended multiplex declarations
/// (`SG_MUL_VAL_`) may set the switch flag retroactively on a signal
/// referenced as a multiplexor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Multiplexing {
    /// The signal selects which multiplexed signals are active.
    pub switch: bool,
    /// The signal is only active under a specific switch case.
    pub muxed: bool,
    /// Case value; meaningful only when `muxed` is set.
    pub case_value: i32,
}

impl Multiplexing {
    /// Is this signal a multiplexor switch?
    pub fn is_switch(&self) -> bool {
        self.switch
    }

    /// Is this signal a multiplexed value?
    pub fn is_muxed(&self) -> bool {
        self.muxed
    }
}

/// Extended multiplex entry: the referenced multiplexor signal and the
/// inclusive `[low, high]` raw-value ranges that activate the owner.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExtendedMultiplex {
    /// Name of the multiplexor signal (within the same message).
    pub multiplexor: String,
    /// Inclusive activation ranges of the multiplexor's raw value.
    pub ranges: Vec<(u32, u32)>,
}

/// A signal (`SG_`) within a message.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Signal {
    /// Raw id of the owning message.
    pub message_raw_id: u32,

    /// Signal name, unique within the owning message.
    pub name: String,

    /// Start bit within the message payload. For big-endian signals
    /// this is the most significant bit of the first occupied byte.
    pub start_bit: u32,

    /// Layout and scaling.
    pub shape: SignalShape,

    /// Multiplexing state.
    pub multiplexing: Multiplexing,

    /// Receiving node names (or `Vector__XXX` when unspecified).
    pub receivers: Vec<String>,

    /// Raw-value labels attached via `VAL_`.
    pub value_descriptions: ValueDescriptions,

    /// Name of a signal type definition overriding the inline shape,
    /// attached via the id form of `SGTYPE_`.
    pub signal_type_ref: Option<String>,

    /// Free-text comments attached via `CM_ SG_`.
    pub comments: Vec<String>,

    /// Attribute values attached via `BA_ ... SG_`.
    pub attributes: Vec<AttributeValue>,

    /// Extended multiplex entries attached via `SG_MUL_VAL_`.
    pub extended_multiplex: Vec<ExtendedMultiplex>,
}

/// A reusable named signal type definition (`SGTYPE_`, name form).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SignalTypeDef {
    /// Definition name, unique across the whole database.
    pub name: String,

    /// Layout and scaling.
    pub shape: SignalShape,

    /// Default raw value.
    pub default_value: f64,

    /// Referenced value table name, or `Vector__XXX` when none.
    pub value_table: String,
}
