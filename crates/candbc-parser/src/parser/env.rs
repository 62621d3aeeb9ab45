//! Environment variable constructs: `EV_`, `ENVVAR_DATA_`.

use candbc_model::{AccessKind, EnvVar, EnvVarKind};

use super::{lexeme, DbcParser};
use crate::error::DbcError;
use crate::source::Source;

impl DbcParser {
    /// `EV_ <name> : <kind> [<min>|<max>] "<unit>" <initial> <id>
    /// <access> <node>,* ;`
    pub(crate) fn read_env_var(&mut self, source: &mut Source) -> Result<(), DbcError> {
        let mut var = EnvVar::default();

        var.name = lexeme::identifier(source);
        if var.name.is_empty() || lexeme::is_keyword(&var.name) {
            return Err(DbcError::new(
                "Expecting a name for the environment variable.",
            ));
        }
        if self.env_vars.contains_key(&var.name) {
            return Err(DbcError::new("Duplicate environment variable defined."));
        }

        if !lexeme::expect_char(source, ':') {
            return Err(DbcError::new(
                "Colon ':' expected following 'EV_' environment variable definition",
            ));
        }

        let kind = lexeme::uint(source)
            .ok_or_else(|| DbcError::new("Expecting the byte order indicator."))?;
        var.kind = match kind {
            0 => EnvVarKind::Integer,
            1 => EnvVarKind::Float,
            2 => EnvVarKind::String,
            _ => {
                return Err(DbcError::new(
                    "Invalid type defined for environment variable definition (0=integer, 1=float and 2=string are allowed).",
                ))
            }
        };

        if !lexeme::expect_char(source, '[') {
            return Err(DbcError::new(
                "Left square-bracket '[' expected following the variable type in the environment variable definition",
            ));
        }

        var.minimum =
            lexeme::double(source).ok_or_else(|| DbcError::new("Expecting the minimum value."))?;

        if !lexeme::expect_char(source, '|') {
            return Err(DbcError::new(
                "Pipe '|' expected following the minimum in the environment variable definition",
            ));
        }

        var.maximum =
            lexeme::double(source).ok_or_else(|| DbcError::new("Expecting the maximum value."))?;

        if !lexeme::expect_char(source, ']') {
            return Err(DbcError::new(
                "Right square-bracket ']' expected following the maximum in the environment variable definition",
            ));
        }

        var.unit = lexeme::string(source).ok_or_else(|| {
            DbcError::new(
                "String expected following the minimum and maximum in the environment variable definition",
            )
        })?;

        var.initial_value =
            lexeme::double(source).ok_or_else(|| DbcError::new("Expecting the initial value."))?;

        var.legacy_id = lexeme::uint(source)
            .ok_or_else(|| DbcError::new("Expecting the environment variable ID."))?;

        // The 8000-series access codes are emitted for string
        // variables only.
        let access = lexeme::identifier(source);
        let (access, string_only) = match access.as_str() {
            "DUMMY_NODE_VECTOR0" => (AccessKind::Unrestricted, false),
            "DUMMY_NODE_VECTOR1" => (AccessKind::Read, false),
            "DUMMY_NODE_VECTOR2" => (AccessKind::Write, false),
            "DUMMY_NODE_VECTOR3" => (AccessKind::ReadWrite, false),
            "DUMMY_NODE_VECTOR8000" => (AccessKind::Unrestricted, true),
            "DUMMY_NODE_VECTOR8001" => (AccessKind::Read, true),
            "DUMMY_NODE_VECTOR8002" => (AccessKind::Write, true),
            "DUMMY_NODE_VECTOR8003" => (AccessKind::ReadWrite, true),
            _ => {
                return Err(DbcError::new(
                    "Invalid access type for the environment variable.",
                ))
            }
        };
        if string_only && var.kind != EnvVarKind::String {
            return Err(DbcError::new(
                "The access type expects the environment variable to be a string.",
            ));
        }
        var.access = access;

        loop {
            let node = lexeme::identifier(source);
            if node.is_empty() || lexeme::is_keyword(&node) {
                return Err(DbcError::new(
                    "Expecting an access node for the environment variable.",
                ));
            }
            if !Self::is_unassigned_node(&node) && !self.nodes.contains_key(&node) {
                return Err(DbcError::new(
                    "Expecting a valid pre-defined access node name for the environment variable.",
                ));
            }
            if var.nodes.contains(&node) {
                return Err(DbcError::new(
                    "Duplicate access node name defined for the environment variable.",
                ));
            }
            var.nodes.push(node);

            if !lexeme::expect_char(source, ',') {
                break;
            }
        }

        if !lexeme::expect_char(source, ';') {
            return Err(DbcError::new("Semi-colon ';' expected."));
        }

        self.env_vars.insert(var.name.clone(), var);
        Ok(())
    }

    /// `ENVVAR_DATA_ <name> : <size> ;`; promotes an existing variable
    /// to the opaque data kind.
    pub(crate) fn read_env_var_data(&mut self, source: &mut Source) -> Result<(), DbcError> {
        let name = lexeme::identifier(source);
        if name.is_empty() {
            return Err(DbcError::new("Expected environment variable name."));
        }
        if !self.env_vars.contains_key(&name) {
            return Err(DbcError::new(
                "Could not find environment variable with supplied name.",
            ));
        }

        if !lexeme::expect_char(source, ':') {
            return Err(DbcError::new(
                "Colon ':' expected following 'ENVVAR_DATA_' environment variable data definition",
            ));
        }

        let size =
            lexeme::uint(source).ok_or_else(|| DbcError::new("Expecting the data size."))?;

        if !lexeme::expect_char(source, ';') {
            return Err(DbcError::new("Semi-colon ';' expected."));
        }

        let var = self
            .env_vars
            .get_mut(&name)
            .expect("BUG: environment variable existence checked above");
        var.kind = EnvVarKind::Data;
        var.data_size = size;
        Ok(())
    }
}
