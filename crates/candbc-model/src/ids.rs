//! Raw message-id helpers.
//!
//! A DBC message id is stored as a single 32-bit word: the low 31 bits
//! carry the numeric id, the top bit flags extended (29-bit) addressing
//! versus standard (11-bit) addressing.

/// Top bit of a raw id: set when the id is extended (29 bits).
pub const RAW_ID_EXTENDED_FLAG: u32 = 0x8000_0000;

/// Exclusive upper bound for standard (11-bit) message ids.
pub const STD_ID_LIMIT: u32 = 1 << 11;

/// Exclusive upper bound for extended (29-bit) message ids.
pub const EXT_ID_LIMIT: u32 = 1 << 29;

/// Reserved raw id for signals not bound to any concrete message (the
/// vendor's "independent signal message" placeholder).
pub const INDEPENDENT_MSG_RAW_ID: u32 = 0xffff_ffff;

/// Name of the placeholder message holding independent signals.
pub const INDEPENDENT_MSG_NAME: &str = "VECTOR__INDEPENDENT_SIG_MSG";

/// Split a raw id into its numeric id and the extended flag.
pub fn extract_msg_id(raw_id: u32) -> (u32, bool) {
    (raw_id & !RAW_ID_EXTENDED_FLAG, raw_id & RAW_ID_EXTENDED_FLAG != 0)
}

/// Combine a numeric message id and the extended flag into a raw id.
pub fn compose_raw_id(msg_id: u32, extended: bool) -> u32 {
    if extended {
        msg_id | RAW_ID_EXTENDED_FLAG
    } else {
        msg_id
    }
}
