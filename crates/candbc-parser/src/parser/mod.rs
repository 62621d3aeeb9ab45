//! The DBC grammar engine.
//!
//! [`DbcParser`] accumulates state across any number of [`parse`]
//! calls, so a database split over several files (a common vendor
//! practice: nodes and messages in one file, attributes in another) is
//! parsed by feeding the files in order into the same parser.
//!
//! [`parse`]: DbcParser::parse

use std::collections::BTreeMap;

use indexmap::IndexMap;
use tracing::{debug, trace};

use candbc_model::{
    AttrDefHandle, AttributeDef, AttributeValue, EnvVar, Message, Node, SignalTypeDef,
    ValueDescriptions, INDEPENDENT_MSG_RAW_ID,
};

use crate::error::DbcError;
use crate::source::Source;

mod env;
mod header;
mod lexeme;
mod message;
mod meta;
mod queries;

/// Attribute definitions the format's reference tooling ships with.
/// Parsed by [`DbcParser::new`] so files relying on the standard
/// `GenMsg*`/`GenSig*`/`VFrameFormat` attributes load without declaring
/// them first.
const DEFAULT_ATTRIBUTE_DEFS: &str = r#"
BA_DEF_ BO_ "VFrameFormat" ENUM "StandardCAN","ExtendedCAN","StandardFD","ExtendedFD";
BA_DEF_ BO_ "GenMsgSendType" ENUM "cyclic","triggered","cyclicIfActive","cyclicAndTriggered","cyclicIfActiveAndTriggered","none";
BA_DEF_ BO_ "GenMsgCycleTime" INT 0 10000;
BA_DEF_ BO_ "GenMsgStartDelayTime" INT 0 10000;
BA_DEF_ BO_ "GenMsgDelayTime" INT 0 0;
BA_DEF_ SG_ "GenSigSendType" ENUM "none","Cyclic","OnWrite","OnChange";
BA_DEF_ SG_ "GenSigCycleTime" INT 0 10000;
BA_DEF_ SG_ "GenSigDelayTime" INT 0 10000;
BA_DEF_ SG_ "GenSigStartDelayTime" INT 0 10000;
BA_DEF_ SG_ "GenSigStartValue" INT 0 0;
BA_DEF_DEF_ "VFrameFormat" "StandardCAN";
BA_DEF_DEF_ "GenMsgSendType" "none";
BA_DEF_DEF_ "GenMsgCycleTime" 0;
BA_DEF_DEF_ "GenMsgStartDelayTime" 0;
BA_DEF_DEF_ "GenMsgDelayTime" 0;
BA_DEF_DEF_ "GenSigSendType" "none";
BA_DEF_DEF_ "GenSigDelayTime" 0;
BA_DEF_DEF_ "GenSigCycleTime" 0;
BA_DEF_DEF_ "GenSigStartDelayTime" 0;
BA_DEF_DEF_ "GenSigStartValue" 0;
"#;

/// Recursive-descent DBC parser and the database it builds.
///
/// Construction parses the embedded standard attribute definitions
/// unless [`bare`](Self::bare) is used. After parsing, the database is
/// read through the `&self` query surface; there is no mutable access,
/// so a populated parser can be shared freely between threads.
pub struct DbcParser {
    pub(crate) sources: Vec<Source>,
    pub(crate) versions: Vec<String>,
    pub(crate) nodes: IndexMap<String, Node>,
    pub(crate) value_tables: IndexMap<String, ValueDescriptions>,

    /// Message arena. Name and id registries index into it, so a
    /// message reachable under both keys is stored once.
    pub(crate) messages: Vec<Message>,
    pub(crate) msg_by_name: IndexMap<String, usize>,
    pub(crate) msg_by_id: BTreeMap<u32, usize>,

    pub(crate) env_vars: IndexMap<String, EnvVar>,
    pub(crate) signal_types: IndexMap<String, SignalTypeDef>,
    pub(crate) comments: Vec<String>,
    pub(crate) attributes: Vec<AttributeValue>,

    /// Attribute definition arena. Redefining a name pushes a fresh
    /// entry and repoints the name index; values bound earlier keep
    /// their handle into the old entry.
    pub(crate) attr_defs: Vec<AttributeDef>,
    pub(crate) attr_def_index: IndexMap<String, AttrDefHandle>,

    /// Declared id of the independent-signal placeholder message, valid
    /// within one `parse` call. Id references equal to it are
    /// redirected to [`INDEPENDENT_MSG_RAW_ID`].
    pub(crate) indep_msg_id: u32,
}

impl DbcParser {
    /// Parser seeded with the standard attribute definitions.
    pub fn new() -> Self {
        let mut parser = Self::bare();
        let mut source = Source::from_str(DEFAULT_ATTRIBUTE_DEFS);
        parser
            .parse(&mut source)
            .expect("BUG: embedded attribute definitions must parse");
        parser
    }

    /// Parser without the standard attribute definitions.
    pub fn bare() -> Self {
        Self {
            sources: Vec::new(),
            versions: Vec::new(),
            nodes: IndexMap::new(),
            value_tables: IndexMap::new(),
            messages: Vec::new(),
            msg_by_name: IndexMap::new(),
            msg_by_id: BTreeMap::new(),
            env_vars: IndexMap::new(),
            signal_types: IndexMap::new(),
            comments: Vec::new(),
            attributes: Vec::new(),
            attr_defs: Vec::new(),
            attr_def_index: IndexMap::new(),
            indep_msg_id: INDEPENDENT_MSG_RAW_ID,
        }
    }

    /// Parse one source into the database.
    ///
    /// There is no recovery: the first grammar or consistency violation
    /// aborts the call with the source position attached, and state
    /// populated up to that point remains. Callers needing all-or-
    /// nothing behavior parse into a scratch parser first.
    pub fn parse(&mut self, source: &mut Source) -> Result<(), DbcError> {
        debug!(path = ?source.path(), bytes = source.content().len(), "parsing DBC source");
        self.sources.push(source.clone());
        self.indep_msg_id = INDEPENDENT_MSG_RAW_ID;

        let result = self.parse_constructs(source);
        match result {
            Ok(()) => {
                debug!(
                    messages = self.messages.len(),
                    nodes = self.nodes.len(),
                    "DBC source parsed"
                );
                Ok(())
            }
            Err(error) => Err(error.with_source(source)),
        }
    }

    fn parse_constructs(&mut self, source: &mut Source) -> Result<(), DbcError> {
        lexeme::skip_whitespace(source);
        while !source.is_eof() {
            let keyword = lexeme::identifier(source);
            if keyword.is_empty() {
                return Err(DbcError::new("Keyword expected"));
            }
            trace!(keyword = %keyword, pos = source.pos(), "dispatching construct");

            match keyword.as_str() {
                "VERSION" => self.read_version(source)?,
                "NS_" => self.read_new_symbols(source)?,
                "BS_" => self.read_bit_timing(source)?,
                "BU_" => self.read_nodes(source)?,
                "VAL_TABLE_" => self.read_value_table(source)?,
                "BO_" => self.read_message(source)?,
                "SIG_VALTYPE_" => self.read_signal_value_type(source)?,
                "BO_TX_BU_" => self.read_message_transmitters(source)?,
                "VAL_" => self.read_value_descriptions(source)?,
                "EV_" => self.read_env_var(source)?,
                "ENVVAR_DATA_" => self.read_env_var_data(source)?,
                "SGTYPE_" => self.read_signal_type(source)?,
                "SIG_GROUP_" => self.read_signal_group(source)?,
                "CM_" => self.read_comment(source)?,
                "BA_DEF_" => self.read_attribute_def(source)?,
                "BA_DEF_DEF_" => self.read_attribute_default(source)?,
                "BA_" => self.read_attribute_value(source)?,
                "SG_MUL_VAL_" => self.read_extended_multiplex(source)?,
                _ => {
                    return Err(DbcError::with_args("Unknown keyword '%1'.", &[&keyword]));
                }
            }

            lexeme::skip_whitespace(source);
        }
        Ok(())
    }

    /// Drop all parsed state except the attribute definitions (so the
    /// seeded standard definitions survive) and the recorded sources.
    pub fn clear(&mut self) {
        self.versions.clear();
        self.nodes.clear();
        self.value_tables.clear();
        self.messages.clear();
        self.msg_by_name.clear();
        self.msg_by_id.clear();
        self.env_vars.clear();
        self.signal_types.clear();
        self.comments.clear();
        self.attributes.clear();
        self.indep_msg_id = INDEPENDENT_MSG_RAW_ID;
    }

    /// Map an id reference onto the placeholder message's raw id when
    /// it matches the placeholder's declared id from this parse call.
    pub(crate) fn redirect_id(&self, raw_id: u32) -> u32 {
        if raw_id == self.indep_msg_id {
            INDEPENDENT_MSG_RAW_ID
        } else {
            raw_id
        }
    }

    /// Arena index of the message an id reference points at.
    pub(crate) fn message_index_by_id(&self, raw_id: u32) -> Result<usize, DbcError> {
        self.msg_by_id
            .get(&self.redirect_id(raw_id))
            .copied()
            .ok_or_else(|| DbcError::new("Could not find message with supplied ID."))
    }

    /// Index of a signal within the message at `msg_index`.
    pub(crate) fn signal_index(&self, msg_index: usize, name: &str) -> Result<usize, DbcError> {
        self.messages[msg_index]
            .signals
            .iter()
            .position(|signal| signal.name == name)
            .ok_or_else(|| DbcError::new("Could not find signal with supplied name."))
    }

    /// Is the name the "unassigned" pseudo node? Both spellings occur
    /// in exported files.
    pub(crate) fn is_unassigned_node(name: &str) -> bool {
        name == "Vector__XXX" || name == "Vector_XXX"
    }
}

impl Default for DbcParser {
    fn default() -> Self {
        Self::new()
    }
}
