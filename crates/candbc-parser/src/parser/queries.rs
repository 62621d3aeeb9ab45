//! Read-only access to the parsed database.
//!
//! Everything here takes `&self`; a fully parsed [`DbcParser`] can be
//! shared across threads for concurrent lookups.

use candbc_model::{
    compose_raw_id, AttrDefHandle, AttributeDef, AttributeValue, EnvVar, Message, Node, Signal,
    SignalGroup, SignalTypeDef, ValueDescriptions, EXT_ID_LIMIT, STD_ID_LIMIT,
};

use super::DbcParser;
use crate::source::Source;

impl DbcParser {
    /// Every source fed into [`parse`](Self::parse), in order,
    /// including the embedded standard attribute definitions when the
    /// parser was built with [`new`](Self::new).
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// `VERSION` strings in parse order.
    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    /// Is a node with the given name declared?
    pub fn has_node(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Look up a node by name.
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    /// Declared node names in declaration order.
    pub fn node_names(&self) -> Vec<&str> {
        self.nodes.keys().map(String::as_str).collect()
    }

    /// Is a value table with the given name declared?
    pub fn has_value_table(&self, name: &str) -> bool {
        self.value_tables.contains_key(name)
    }

    /// Look up a value table by name.
    pub fn value_table(&self, name: &str) -> Option<&ValueDescriptions> {
        self.value_tables.get(name)
    }

    /// Declared value table names in declaration order.
    pub fn value_table_names(&self) -> Vec<&str> {
        self.value_tables.keys().map(String::as_str).collect()
    }

    /// Does the table map the given raw value?
    pub fn has_value(&self, table: &str, value: u32) -> bool {
        self.value_label(table, value).is_some()
    }

    /// The label a table maps a raw value to.
    pub fn value_label(&self, table: &str, value: u32) -> Option<&str> {
        self.value_tables
            .get(table)?
            .get(&value)
            .map(String::as_str)
    }

    /// Raw ids of all messages, ascending.
    pub fn message_ids(&self) -> Vec<u32> {
        self.msg_by_id.keys().copied().collect()
    }

    /// Look up a message by name.
    pub fn message_by_name(&self, name: &str) -> Option<&Message> {
        self.msg_by_name.get(name).map(|&index| &self.messages[index])
    }

    /// Look up a message by raw id (extended flag included).
    pub fn message_by_raw_id(&self, raw_id: u32) -> Option<&Message> {
        self.msg_by_id.get(&raw_id).map(|&index| &self.messages[index])
    }

    /// Look up a message by standard (11-bit) id.
    pub fn message_by_std_id(&self, std_id: u32) -> Option<&Message> {
        if std_id >= STD_ID_LIMIT {
            return None;
        }
        self.message_by_raw_id(std_id)
    }

    /// Look up a message by extended (29-bit) id.
    pub fn message_by_ext_id(&self, ext_id: u32) -> Option<&Message> {
        if ext_id >= EXT_ID_LIMIT {
            return None;
        }
        self.message_by_raw_id(compose_raw_id(ext_id, true))
    }

    /// Is a message with the given name declared?
    pub fn has_message(&self, name: &str) -> bool {
        self.msg_by_name.contains_key(name)
    }

    /// Is a message with the given raw id declared?
    pub fn has_message_raw_id(&self, raw_id: u32) -> bool {
        self.msg_by_id.contains_key(&raw_id)
    }

    /// Is a message with the given standard id declared?
    pub fn has_message_std_id(&self, std_id: u32) -> bool {
        self.message_by_std_id(std_id).is_some()
    }

    /// Is a message with the given extended id declared?
    pub fn has_message_ext_id(&self, ext_id: u32) -> bool {
        self.message_by_ext_id(ext_id).is_some()
    }

    /// Look up a signal by message name and signal name.
    pub fn signal(&self, message: &str, signal: &str) -> Option<&Signal> {
        self.message_by_name(message)?.signal(signal)
    }

    /// Look up a signal by raw message id and signal name.
    pub fn signal_by_raw_id(&self, raw_id: u32, signal: &str) -> Option<&Signal> {
        self.message_by_raw_id(raw_id)?.signal(signal)
    }

    /// Look up a signal by standard message id and signal name.
    pub fn signal_by_std_id(&self, std_id: u32, signal: &str) -> Option<&Signal> {
        self.message_by_std_id(std_id)?.signal(signal)
    }

    /// Look up a signal by extended message id and signal name.
    pub fn signal_by_ext_id(&self, ext_id: u32, signal: &str) -> Option<&Signal> {
        self.message_by_ext_id(ext_id)?.signal(signal)
    }

    /// Names of a message's signals in declaration order.
    pub fn signal_names(&self, raw_id: u32) -> Vec<&str> {
        self.message_by_raw_id(raw_id)
            .map(|message| {
                message
                    .signals
                    .iter()
                    .map(|signal| signal.name.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Look up an environment variable by name.
    pub fn env_var(&self, name: &str) -> Option<&EnvVar> {
        self.env_vars.get(name)
    }

    /// Declared environment variable names in declaration order.
    pub fn env_var_names(&self) -> Vec<&str> {
        self.env_vars.keys().map(String::as_str).collect()
    }

    /// Look up a signal type definition by name.
    pub fn signal_type(&self, name: &str) -> Option<&SignalTypeDef> {
        self.signal_types.get(name)
    }

    /// Declared signal type definition names in declaration order.
    pub fn signal_type_names(&self) -> Vec<&str> {
        self.signal_types.keys().map(String::as_str).collect()
    }

    /// Look up a signal group by raw message id and group name.
    pub fn signal_group(&self, raw_id: u32, name: &str) -> Option<&SignalGroup> {
        self.message_by_raw_id(raw_id)?.signal_groups.get(name)
    }

    /// Names of a message's signal groups, ordered by name.
    pub fn signal_group_names(&self, raw_id: u32) -> Vec<&str> {
        self.message_by_raw_id(raw_id)
            .map(|message| message.signal_groups.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Global comments (`CM_` without an entity) in parse order.
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// The current attribute definition registered under a name.
    pub fn attribute_def(&self, name: &str) -> Option<&AttributeDef> {
        let handle = self.attr_def_index.get(name)?;
        Some(&self.attr_defs[handle.0])
    }

    /// Registered attribute definition names in registration order.
    pub fn attribute_def_names(&self) -> Vec<&str> {
        self.attr_def_index.keys().map(String::as_str).collect()
    }

    /// Global attribute values (`BA_` without an entity) in parse
    /// order.
    pub fn attributes(&self) -> &[AttributeValue] {
        &self.attributes
    }

    /// The definition an attribute value was parsed against. This is
    /// the definition that was current at parse time, even when the
    /// name has since been redefined.
    ///
    /// # Panics
    ///
    /// Panics if the handle did not come from this parser.
    pub fn resolve_attribute_def(&self, handle: AttrDefHandle) -> &AttributeDef {
        &self.attr_defs[handle.0]
    }
}
