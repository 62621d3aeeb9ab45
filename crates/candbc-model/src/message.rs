//! Messages and signal groups.

use std::collections::BTreeMap;

use crate::attribute::AttributeValue;
use crate::signal::Signal;

/// A group of signals within a message that are updated together
/// (`SIG_GROUP_`).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SignalGroup {
    /// Group name, unique within the owning message.
    pub name: String,
    /// Repetition count.
    pub repetitions: u32,
    /// Member signal names; each must exist on the owning message.
    pub signals: Vec<String>,
}

/// A message (`BO_`), i.e. a CAN frame definition.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    /// Message name, unique across the whole database.
    pub name: String,

    /// Raw id: numeric id plus the extended flag in the top bit. The
    /// placeholder message for independent signals uses
    /// [`crate::ids::INDEPENDENT_MSG_RAW_ID`] regardless of its declared id.
    pub raw_id: u32,

    /// Payload size in bytes.
    pub size: u32,

    /// Transmitter node names (or `Vector__XXX`).
    pub transmitters: Vec<String>,

    /// Signals in declaration order.
    pub signals: Vec<Signal>,

    /// Signal groups keyed by name.
    pub signal_groups: BTreeMap<String, SignalGroup>,

    /// Free-text comments attached via `CM_ BO_`.
    pub comments: Vec<String>,

    /// Attribute values attached via `BA_ ... BO_`.
    pub attributes: Vec<AttributeValue>,
}

impl Message {
    /// Find a signal by name.
    pub fn signal(&self, name: &str) -> Option<&Signal> {
        self.signals.iter().find(|signal| signal.name == name)
    }
}
