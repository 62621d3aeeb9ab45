//! Metadata constructs: `VAL_`, `CM_`, `SGTYPE_`, `BA_DEF_`,
//! `BA_DEF_DEF_`, `BA_`.

use candbc_model::{
    AttrDefHandle, AttrValue, AttributeDef, AttributeDefValue, AttributeScope, AttributeValue,
    SignalTypeDef,
};

use super::header::read_value_label_pairs;
use super::message::read_signal_shape;
use super::{lexeme, DbcParser};
use crate::error::DbcError;
use crate::source::Source;

/// Where a `BA_` value (or `CM_` comment) lands.
enum Target {
    Global,
    Node(String),
    Message(usize),
    Signal(usize, usize),
    EnvVar(String),
}

impl DbcParser {
    /// `VAL_ <id> <signal> (<value> "<label>")* ;` or
    /// `VAL_ <env var> (<value> "<label>")* ;`; a leading number picks
    /// the signal form.
    pub(crate) fn read_value_descriptions(&mut self, source: &mut Source) -> Result<(), DbcError> {
        let target = if let Some(raw_id) = lexeme::uint(source) {
            let msg_index = self.message_index_by_id(raw_id)?;
            let name = lexeme::identifier(source);
            let sig_index = self.signal_index(msg_index, &name)?;
            if !self.messages[msg_index].signals[sig_index]
                .value_descriptions
                .is_empty()
            {
                return Err(DbcError::new("Duplicate value assignment."));
            }
            Target::Signal(msg_index, sig_index)
        } else {
            let name = lexeme::identifier(source);
            if name.is_empty() {
                return Err(DbcError::new(
                    "Could not find message or environment variable.",
                ));
            }
            if !self.env_vars.contains_key(&name) {
                return Err(DbcError::new(
                    "Could not find environment variable with supplied name.",
                ));
            }
            Target::EnvVar(name)
        };

        let values = read_value_label_pairs(source)?;

        if !lexeme::expect_char(source, ';') {
            return Err(DbcError::new(
                "Semi-colon ';' expected finalizing the definition of the 'VAL_'",
            ));
        }

        match target {
            Target::Signal(msg_index, sig_index) => {
                self.messages[msg_index].signals[sig_index].value_descriptions = values;
            }
            Target::EnvVar(name) => {
                self.env_vars
                    .get_mut(&name)
                    .expect("BUG: environment variable existence checked above")
                    .value_descriptions = values;
            }
            _ => unreachable!("value descriptions target only signals and environment variables"),
        }
        Ok(())
    }

    /// `CM_ [BU_ <node> | BO_ <id> | SG_ <id> <signal> | EV_ <var>]
    /// "<comment>" ;`; without an entity the comment is global.
    pub(crate) fn read_comment(&mut self, source: &mut Source) -> Result<(), DbcError> {
        let entity = lexeme::identifier(source);
        let target = match entity.as_str() {
            "BU_" => {
                let name = lexeme::identifier(source);
                if !self.nodes.contains_key(&name) {
                    return Err(DbcError::new("Invalid node name."));
                }
                Target::Node(name)
            }
            "BO_" => {
                let raw_id = lexeme::uint(source)
                    .ok_or_else(|| DbcError::new("Expecting the message ID."))?;
                Target::Message(self.message_index_by_id(raw_id)?)
            }
            "SG_" => {
                let raw_id = lexeme::uint(source)
                    .ok_or_else(|| DbcError::new("Expecting the message ID."))?;
                let msg_index = self.message_index_by_id(raw_id)?;
                let name = lexeme::identifier(source);
                Target::Signal(msg_index, self.signal_index(msg_index, &name)?)
            }
            "EV_" => {
                let name = lexeme::identifier(source);
                if name.is_empty() {
                    return Err(DbcError::new(
                        "Could not find message or environment variable.",
                    ));
                }
                if !self.env_vars.contains_key(&name) {
                    return Err(DbcError::new(
                        "Could not find environment variable with supplied name.",
                    ));
                }
                Target::EnvVar(name)
            }
            // Anything else is a global comment. A stray identifier
            // before the string is consumed and dropped.
            _ => Target::Global,
        };

        let comment =
            lexeme::string(source).ok_or_else(|| DbcError::new("Missing comment string."))?;

        match target {
            Target::Global => self.comments.push(comment),
            Target::Node(name) => self
                .nodes
                .get_mut(&name)
                .expect("BUG: node existence checked above")
                .comments
                .push(comment),
            Target::Message(msg_index) => self.messages[msg_index].comments.push(comment),
            Target::Signal(msg_index, sig_index) => {
                self.messages[msg_index].signals[sig_index]
                    .comments
                    .push(comment);
            }
            Target::EnvVar(name) => self
                .env_vars
                .get_mut(&name)
                .expect("BUG: environment variable existence checked above")
                .comments
                .push(comment),
        }

        if !lexeme::expect_char(source, ';') {
            return Err(DbcError::new(
                "Semi-colon ';' expected finalizing the comment 'CM_'",
            ));
        }
        Ok(())
    }

    /// `SGTYPE_ <id> <signal> : <type name> ;` (type reference
    /// assignment) or `SGTYPE_ <name> : <shape> <default>,
    /// <value table> ;` (full definition); a leading number picks the
    /// reference form.
    pub(crate) fn read_signal_type(&mut self, source: &mut Source) -> Result<(), DbcError> {
        if let Some(raw_id) = lexeme::uint(source) {
            let msg_index = self.message_index_by_id(raw_id)?;
            let name = lexeme::identifier(source);
            let sig_index = self.signal_index(msg_index, &name)?;
            if self.messages[msg_index].signals[sig_index]
                .signal_type_ref
                .is_some()
            {
                return Err(DbcError::new("Duplicate signal type definition assignment."));
            }

            if !lexeme::expect_char(source, ':') {
                return Err(DbcError::new(
                    "Colon ':' expected following 'SGTYPE_' signal type definition",
                ));
            }

            let type_name = lexeme::identifier(source);
            if !self.signal_types.contains_key(&type_name) {
                return Err(DbcError::new(
                    "Could not find signal type definition with supplied name.",
                ));
            }
            self.messages[msg_index].signals[sig_index].signal_type_ref = Some(type_name);
        } else {
            let name = lexeme::identifier(source);
            if name.is_empty() {
                return Err(DbcError::new("Could not find signal type definition name."));
            }
            if self.signal_types.contains_key(&name) {
                return Err(DbcError::new(
                    "Duplicate signal type definition with supplied name.",
                ));
            }

            if !lexeme::expect_char(source, ':') {
                return Err(DbcError::new(
                    "Colon ':' expected following 'SGTYPE_' signal type definition",
                ));
            }

            let shape = read_signal_shape(source)?;

            let default_value = lexeme::double(source)
                .ok_or_else(|| DbcError::new("Expecting the default value."))?;

            if !lexeme::expect_char(source, ',') {
                return Err(DbcError::new(
                    "Comma ',' expected following default value in signal type definition",
                ));
            }

            let value_table = lexeme::identifier(source);
            if !Self::is_unassigned_node(&value_table) {
                if value_table.is_empty() {
                    return Err(DbcError::new("Expecting a value table name."));
                }
                if !self.value_tables.contains_key(&value_table) {
                    return Err(DbcError::new("Value table not found."));
                }
            }

            self.signal_types.insert(
                name.clone(),
                SignalTypeDef {
                    name,
                    shape,
                    default_value,
                    value_table,
                },
            );
        }

        if !lexeme::expect_char(source, ';') {
            return Err(DbcError::new("Semi-colon ';' expected."));
        }
        Ok(())
    }

    /// `BA_DEF_ [BU_|BO_|SG_|EV_] "<name>" <INT|HEX|FLOAT|STRING|ENUM>
    /// ... ;`; registering under an existing name repoints the name to
    /// the new definition; values already bound keep the old one.
    pub(crate) fn read_attribute_def(&mut self, source: &mut Source) -> Result<(), DbcError> {
        let entity = lexeme::identifier(source);
        let scope = match entity.as_str() {
            "" => AttributeScope::Global,
            "BU_" => AttributeScope::Node,
            "BO_" => AttributeScope::Message,
            "SG_" => AttributeScope::Signal,
            "EV_" => AttributeScope::EnvVar,
            _ => return Err(DbcError::new("Invalid object type.")),
        };

        if !lexeme::expect_char(source, '"') {
            return Err(DbcError::new(
                "Quote '\"' expected preceding attribute definition name",
            ));
        }
        let name = lexeme::identifier(source);
        if name.is_empty() || lexeme::is_keyword(&name) {
            return Err(DbcError::new(
                "Expecting a name for the attribute definition.",
            ));
        }
        if !lexeme::expect_char(source, '"') {
            return Err(DbcError::new(
                "Quote '\"' expected following attribute definition name",
            ));
        }

        let kind = lexeme::identifier(source);
        let value = match kind.as_str() {
            "INT" => {
                let minimum = lexeme::int(source).ok_or_else(|| {
                    DbcError::new("Expecting minimum value for integer attribute definition.")
                })?;
                let maximum = lexeme::int(source).ok_or_else(|| {
                    DbcError::new("Expecting maximum value for integer attribute definition.")
                })?;
                AttributeDefValue::Integer {
                    minimum,
                    maximum,
                    default: 0,
                }
            }
            "HEX" => {
                let minimum = lexeme::uint(source).ok_or_else(|| {
                    DbcError::new("Expecting minimum value for hexadecimal attribute definition.")
                })?;
                let maximum = lexeme::uint(source).ok_or_else(|| {
                    DbcError::new("Expecting maximum value for hexadecimal attribute definition.")
                })?;
                AttributeDefValue::Hex {
                    minimum,
                    maximum,
                    default: 0,
                }
            }
            "FLOAT" => {
                let minimum = lexeme::double(source).ok_or_else(|| {
                    DbcError::new(
                        "Expecting minimum value for floating point attribute definition.",
                    )
                })?;
                let maximum = lexeme::double(source).ok_or_else(|| {
                    DbcError::new(
                        "Expecting maximum value for floating point attribute definition.",
                    )
                })?;
                AttributeDefValue::Float {
                    minimum,
                    maximum,
                    default: 0.0,
                }
            }
            "STRING" => AttributeDefValue::String {
                default: String::new(),
            },
            "ENUM" => {
                let mut values: Vec<String> = Vec::new();
                let mut initial = true;
                loop {
                    let entry = lexeme::string(source);
                    if !initial && entry.is_none() {
                        return Err(DbcError::new("Expecting an enumerator entry string."));
                    }
                    initial = false;
                    let entry = entry.unwrap_or_default();

                    // "not-used" and "n/a" placeholders may repeat; all
                    // other labels must be unique.
                    if entry != "not-used" && entry != "n/a" && values.contains(&entry) {
                        return Err(DbcError::new("Duplicate enumerator entry string."));
                    }
                    values.push(entry);

                    if !lexeme::expect_char(source, ',') {
                        break;
                    }
                }
                AttributeDefValue::Enumerator {
                    values,
                    default: String::new(),
                }
            }
            _ => return Err(DbcError::new("Invalid attribute definition value type.")),
        };

        let handle = AttrDefHandle(self.attr_defs.len());
        self.attr_defs.push(AttributeDef {
            name: name.clone(),
            scope,
            value,
        });
        self.attr_def_index.insert(name, handle);

        if !lexeme::expect_char(source, ';') {
            return Err(DbcError::new(
                "Semi-colon ';' expected finalizing the attribute definition 'BA_DEF_'",
            ));
        }
        Ok(())
    }

    /// `BA_DEF_DEF_ "<name>" <default> ;`; sets the default of the
    /// current definition under that name.
    pub(crate) fn read_attribute_default(&mut self, source: &mut Source) -> Result<(), DbcError> {
        if !lexeme::expect_char(source, '"') {
            return Err(DbcError::new(
                "Quote '\"' expected preceding attribute definition name",
            ));
        }
        let name = lexeme::identifier(source);
        let handle = *self.attr_def_index.get(&name).ok_or_else(|| {
            DbcError::new("Cannot find attribute definition with supplied name.")
        })?;
        if !lexeme::expect_char(source, '"') {
            return Err(DbcError::new(
                "Quote '\"' expected following attribute definition name",
            ));
        }

        match &mut self.attr_defs[handle.0].value {
            AttributeDefValue::Integer { default, .. } => {
                // Exports regularly write integer defaults as floats.
                let value = lexeme::double(source).ok_or_else(|| {
                    DbcError::new(
                        "Expecting an integer value for the default value of the attribute definition",
                    )
                })?;
                *default = value as i32;
            }
            AttributeDefValue::Hex { default, .. } => {
                let value = lexeme::double(source).ok_or_else(|| {
                    DbcError::new(
                        "Expecting an unsigned integer value for the default value of the attribute definition",
                    )
                })?;
                if value < 0.0 {
                    return Err(DbcError::new(
                        "Expecting an unsigned integer value for the default value of the attribute definition",
                    ));
                }
                *default = value as u32;
            }
            AttributeDefValue::Float { default, .. } => {
                *default = lexeme::double(source).ok_or_else(|| {
                    DbcError::new(
                        "Expecting a floating point value for the default value of the attribute definition",
                    )
                })?;
            }
            AttributeDefValue::String { default } => {
                *default = lexeme::string(source).ok_or_else(|| {
                    DbcError::new(
                        "Expecting a string value for the default value of the attribute definition",
                    )
                })?;
            }
            AttributeDefValue::Enumerator { values, default } => {
                match lexeme::string(source) {
                    Some(label) => {
                        // Tooling is sloppy about the default's case;
                        // accept a case-insensitive label match here.
                        if !values
                            .iter()
                            .any(|value| value.eq_ignore_ascii_case(&label))
                        {
                            return Err(DbcError::new(
                                "The enum value doesn't fit the list of the predefined values.",
                            ));
                        }
                        *default = label;
                    }
                    None => {
                        let index = lexeme::uint(source).ok_or_else(|| {
                            DbcError::new(
                                "Expecting a string value for the default value of the attribute definition",
                            )
                        })?;
                        let label = values.get(index as usize).ok_or_else(|| {
                            DbcError::new("Default value out of range for the attribute definition")
                        })?;
                        *default = label.clone();
                    }
                }
            }
        }

        if !lexeme::expect_char(source, ';') {
            return Err(DbcError::new(
                "Semi-colon ';' expected finalizing the attribute definition 'BA_DEF_DEF_'",
            ));
        }
        Ok(())
    }

    /// `BA_ "<name>" [BU_ <node> | BO_ <id> | SG_ <id> <signal> |
    /// EV_ <var>] <value> ;`; the target's kind must match the
    /// definition's scope.
    pub(crate) fn read_attribute_value(&mut self, source: &mut Source) -> Result<(), DbcError> {
        if !lexeme::expect_char(source, '"') {
            return Err(DbcError::new(
                "Quote '\"' expected preceding attribute definition name",
            ));
        }
        let name = lexeme::identifier(source);
        let handle = *self.attr_def_index.get(&name).ok_or_else(|| {
            DbcError::new("Cannot find attribute definition with supplied name.")
        })?;
        if !lexeme::expect_char(source, '"') {
            return Err(DbcError::new(
                "Quote '\"' expected following attribute definition name",
            ));
        }

        let entity = lexeme::identifier(source);
        let (scope, target) = match entity.as_str() {
            "" => (AttributeScope::Global, Target::Global),
            "BU_" => {
                let node = lexeme::identifier(source);
                if !self.nodes.contains_key(&node) {
                    return Err(DbcError::new("Cannot find node with supplied name."));
                }
                (AttributeScope::Node, Target::Node(node))
            }
            "BO_" => {
                let raw_id = lexeme::uint(source)
                    .ok_or_else(|| DbcError::new("Expecting the message ID."))?;
                (
                    AttributeScope::Message,
                    Target::Message(self.message_index_by_id(raw_id)?),
                )
            }
            "SG_" => {
                let raw_id = lexeme::uint(source)
                    .ok_or_else(|| DbcError::new("Expecting the message ID."))?;
                let msg_index = self.message_index_by_id(raw_id)?;
                let signal = lexeme::identifier(source);
                (
                    AttributeScope::Signal,
                    Target::Signal(msg_index, self.signal_index(msg_index, &signal)?),
                )
            }
            "EV_" => {
                let var = lexeme::identifier(source);
                if !self.env_vars.contains_key(&var) {
                    return Err(DbcError::new(
                        "Cannot find environment variable definition with supplied name.",
                    ));
                }
                (AttributeScope::EnvVar, Target::EnvVar(var))
            }
            _ => {
                return Err(DbcError::new(
                    "Object type of attribute value is not fitting the object type of the attribute definition.",
                ))
            }
        };

        if self.attr_defs[handle.0].scope != scope {
            return Err(DbcError::new(
                "Object type of attribute value is not fitting the object type of the attribute definition.",
            ));
        }

        let value = match &self.attr_defs[handle.0].value {
            AttributeDefValue::Integer { .. } => {
                let value = lexeme::double(source).ok_or_else(|| {
                    DbcError::new(
                        "Expecting an integer value for the default value of the attribute definition",
                    )
                })?;
                AttrValue::Integer(value as i32)
            }
            AttributeDefValue::Hex { .. } => {
                let value = lexeme::double(source).ok_or_else(|| {
                    DbcError::new(
                        "Expecting an unsigned integer value for the default value of the attribute definition",
                    )
                })?;
                if value < 0.0 {
                    return Err(DbcError::new(
                        "Expecting an unsigned integer value for the default value of the attribute definition",
                    ));
                }
                AttrValue::Hex(value as u32)
            }
            AttributeDefValue::Float { .. } => {
                let value = lexeme::double(source).ok_or_else(|| {
                    DbcError::new(
                        "Expecting a floating point value for the default value of the attribute definition",
                    )
                })?;
                AttrValue::Float(value)
            }
            AttributeDefValue::String { .. } => {
                let value = lexeme::string(source).ok_or_else(|| {
                    DbcError::new(
                        "Expecting a string value for the default value of the attribute definition",
                    )
                })?;
                AttrValue::String(value)
            }
            AttributeDefValue::Enumerator { values, .. } => match lexeme::string(source) {
                // Unlike the default in `BA_DEF_DEF_`, the label here
                // must match the declared case.
                Some(label) => {
                    if !values.contains(&label) {
                        return Err(DbcError::new(
                            "The enum value doesn't fit the list of the predefined values.",
                        ));
                    }
                    AttrValue::String(label)
                }
                None => {
                    let index = lexeme::uint(source).ok_or_else(|| {
                        DbcError::new(
                            "Expecting a string value for the default value of the attribute definition",
                        )
                    })?;
                    let label = values.get(index as usize).ok_or_else(|| {
                        DbcError::new("Default value out of range for the attribute definition")
                    })?;
                    AttrValue::String(label.clone())
                }
            },
        };

        let attribute = AttributeValue {
            def: handle,
            value,
        };
        match target {
            Target::Global => self.attributes.push(attribute),
            Target::Node(node) => self
                .nodes
                .get_mut(&node)
                .expect("BUG: node existence checked above")
                .attributes
                .push(attribute),
            Target::Message(msg_index) => self.messages[msg_index].attributes.push(attribute),
            Target::Signal(msg_index, sig_index) => {
                self.messages[msg_index].signals[sig_index]
                    .attributes
                    .push(attribute);
            }
            Target::EnvVar(var) => self
                .env_vars
                .get_mut(&var)
                .expect("BUG: environment variable existence checked above")
                .attributes
                .push(attribute),
        }

        if !lexeme::expect_char(source, ';') {
            return Err(DbcError::new(
                "Semi-colon ';' expected finalizing the attribute value 'BA_'",
            ));
        }
        Ok(())
    }
}
