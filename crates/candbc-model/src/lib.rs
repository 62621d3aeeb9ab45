// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! In-memory data model for CAN DBC databases.
//!
//! This crate defines the entities a parsed DBC file decomposes into
//! (nodes, messages, signals, value tables, environment variables,
//! attributes) plus the two pieces of pure math the format needs:
//!
//! - raw-id composition/extraction ([`ids`])
//! - byte-order dependent bit layout and payload extraction ([`layout`])
//!
//! The model is deliberately dumb: flat serde-derived records with no
//! parsing logic. The grammar engine lives in `candbc-parser` and is the
//! single writer; once a parse completes the model is only read.

pub mod attribute;
pub mod env;
pub mod ids;
pub mod layout;
pub mod message;
pub mod node;
pub mod signal;

pub use attribute::{
    AttrDefHandle, AttrValue, AttributeDef, AttributeDefValue, AttributeScope, AttributeValue,
};
pub use env::{AccessKind, EnvVar, EnvVarKind};
pub use ids::{
    compose_raw_id, extract_msg_id, EXT_ID_LIMIT, INDEPENDENT_MSG_NAME, INDEPENDENT_MSG_RAW_ID,
    RAW_ID_EXTENDED_FLAG, STD_ID_LIMIT,
};
pub use message::{Message, SignalGroup};
pub use node::{Node, ValueDescriptions};
pub use signal::{ByteOrder, ExtendedMultiplex, Multiplexing, Signal, SignalShape, SignalTypeDef, ValueKind};
