//! Header constructs: `VERSION`, `NS_`, `BS_`, `BU_`, `VAL_TABLE_`.

use candbc_model::{Node, ValueDescriptions};
use indexmap::IndexMap;

use super::{lexeme, DbcParser};
use crate::error::DbcError;
use crate::source::Source;

impl DbcParser {
    /// `VERSION "<text>"`; versions accumulate across sources.
    pub(crate) fn read_version(&mut self, source: &mut Source) -> Result<(), DbcError> {
        let version = lexeme::string(source)
            .ok_or_else(|| DbcError::new("String expected following 'VERSION' keyword"))?;
        self.versions.push(version);
        Ok(())
    }

    /// `NS_ : <symbol>*`; the symbol list is validated against the
    /// fixed set and otherwise discarded. The first identifier outside
    /// the set belongs to the next construct and is left unconsumed.
    pub(crate) fn read_new_symbols(&mut self, source: &mut Source) -> Result<(), DbcError> {
        if !lexeme::expect_char(source, ':') {
            return Err(DbcError::new("Colon ':' expected following 'NS_' keyword"));
        }

        while !source.is_eof() {
            let mark = source.mark();
            let symbol = lexeme::identifier(source);
            if symbol.is_empty() {
                break;
            }
            if !lexeme::NEW_SYMBOLS.contains(&symbol.as_str()) {
                source.reset(mark);
                break;
            }
        }
        Ok(())
    }

    /// `BS_ : [<baud> : <btr1>, <btr2>]`; the section is obsolete; the
    /// values are validated and dropped.
    pub(crate) fn read_bit_timing(&mut self, source: &mut Source) -> Result<(), DbcError> {
        if !lexeme::expect_char(source, ':') {
            return Err(DbcError::new("Colon ':' expected following 'BS_' keyword"));
        }

        if let Some(_baudrate) = lexeme::uint(source) {
            if !lexeme::expect_char(source, ':') {
                return Err(DbcError::new("Colon ':' expected following baudrate value."));
            }
            lexeme::uint(source).ok_or_else(|| DbcError::new("BTR1 register value expected."))?;
            if !lexeme::expect_char(source, ',') {
                return Err(DbcError::new(
                    "Comma ',' expected following BTR1 register value",
                ));
            }
            lexeme::uint(source).ok_or_else(|| DbcError::new("BTR2 register value expected."))?;
        }
        Ok(())
    }

    /// `BU_ : <node>*`; a duplicate within one list is an error; nodes
    /// already known from an earlier source are kept as they are, so
    /// repeated lists merge without losing attached metadata.
    pub(crate) fn read_nodes(&mut self, source: &mut Source) -> Result<(), DbcError> {
        if !lexeme::expect_char(source, ':') {
            return Err(DbcError::new("Colon ':' expected following 'BU_' keyword."));
        }

        let mut declared: IndexMap<String, Node> = IndexMap::new();
        while !source.is_eof() {
            let mark = source.mark();
            let name = lexeme::identifier(source);
            if name.is_empty() {
                break;
            }
            if lexeme::is_keyword(&name) {
                source.reset(mark);
                break;
            }
            if declared.contains_key(&name) {
                return Err(DbcError::new("Duplicate nodes defined."));
            }
            declared.insert(name.clone(), Node::new(name));
        }

        for (name, node) in declared {
            self.nodes.entry(name).or_insert(node);
        }
        Ok(())
    }

    /// `VAL_TABLE_ <name> (<value> "<label>")* ;`
    pub(crate) fn read_value_table(&mut self, source: &mut Source) -> Result<(), DbcError> {
        let name = lexeme::identifier(source);
        if name.is_empty() || lexeme::is_keyword(&name) {
            return Err(DbcError::new("Expecting a name for the value table."));
        }
        if self.value_tables.contains_key(&name) {
            return Err(DbcError::new("Duplicate value table definition."));
        }

        let values = read_value_label_pairs(source)?;

        if !lexeme::expect_char(source, ';') {
            return Err(DbcError::new(
                "Semi-colon ';' expected finalizing the definition of the 'VAL_TABLE_'",
            ));
        }

        self.value_tables.insert(name, values);
        Ok(())
    }
}

/// Read the `<value> "<label>"` pairs shared by `VAL_TABLE_` and
/// `VAL_`. Stops at the first token that is not an unsigned integer.
pub(crate) fn read_value_label_pairs(source: &mut Source) -> Result<ValueDescriptions, DbcError> {
    let mut values = ValueDescriptions::new();
    while !source.is_eof() {
        let Some(value) = lexeme::uint(source) else {
            break;
        };
        let label = lexeme::string(source)
            .ok_or_else(|| DbcError::new("Expecting a string following the value."))?;
        if values.contains_key(&value) {
            return Err(DbcError::new("Duplicate value definition."));
        }
        values.insert(value, label);
    }
    Ok(values)
}
