//! Environment variable constructs.

use candbc_model::{AccessKind, EnvVarKind};
use candbc_parser::{DbcParser, Source};

fn parse(content: &str) -> DbcParser {
    let mut parser = DbcParser::bare();
    parser
        .parse(&mut Source::from_str(content))
        .expect("content should parse");
    parser
}

#[test]
fn environment_variable_fields() {
    let parser = parse(
        "BU_: Tester Gateway\n\
         EV_ EngineSpeed : 0 [0|8000] \"rpm\" 500 42 DUMMY_NODE_VECTOR1 Tester,Gateway;",
    );
    let var = parser.env_var("EngineSpeed").unwrap();
    assert_eq!(var.kind, EnvVarKind::Integer);
    assert_eq!(var.minimum, 0.0);
    assert_eq!(var.maximum, 8000.0);
    assert_eq!(var.unit, "rpm");
    assert_eq!(var.initial_value, 500.0);
    assert_eq!(var.legacy_id, 42);
    assert_eq!(var.access, AccessKind::Read);
    assert_eq!(var.nodes, ["Tester", "Gateway"]);
    assert_eq!(parser.env_var_names(), ["EngineSpeed"]);
}

#[test]
fn string_variable_with_high_access_code() {
    let parser = parse(
        "EV_ VinString : 2 [0|0] \"\" 0 1 DUMMY_NODE_VECTOR8003 Vector__XXX;",
    );
    let var = parser.env_var("VinString").unwrap();
    assert_eq!(var.kind, EnvVarKind::String);
    assert_eq!(var.access, AccessKind::ReadWrite);
}

#[test]
fn high_access_code_requires_string_kind() {
    let mut parser = DbcParser::bare();
    let error = parser
        .parse(&mut Source::from_str(
            "EV_ Speed : 0 [0|100] \"\" 0 1 DUMMY_NODE_VECTOR8000 Vector__XXX;",
        ))
        .unwrap_err();
    assert_eq!(
        error.message,
        "The access type expects the environment variable to be a string."
    );
}

#[test]
fn data_declaration_promotes_the_kind() {
    let parser = parse(
        "EV_ Blob : 0 [0|0] \"\" 0 1 DUMMY_NODE_VECTOR0 Vector__XXX;\n\
         ENVVAR_DATA_ Blob : 16;",
    );
    let var = parser.env_var("Blob").unwrap();
    assert_eq!(var.kind, EnvVarKind::Data);
    assert_eq!(var.data_size, 16);
}

#[test]
fn data_declaration_requires_an_existing_variable() {
    let mut parser = DbcParser::bare();
    let error = parser
        .parse(&mut Source::from_str("ENVVAR_DATA_ Ghost : 16;"))
        .unwrap_err();
    assert_eq!(
        error.message,
        "Could not find environment variable with supplied name."
    );
}

#[test]
fn duplicate_environment_variable_fails() {
    let mut parser = DbcParser::bare();
    let error = parser
        .parse(&mut Source::from_str(
            "EV_ X : 0 [0|1] \"\" 0 1 DUMMY_NODE_VECTOR0 Vector__XXX;\n\
             EV_ X : 0 [0|1] \"\" 0 1 DUMMY_NODE_VECTOR0 Vector__XXX;",
        ))
        .unwrap_err();
    assert_eq!(error.message, "Duplicate environment variable defined.");
}

#[test]
fn value_descriptions_and_comments_attach_to_variables() {
    let parser = parse(
        "EV_ Mode : 0 [0|3] \"\" 0 1 DUMMY_NODE_VECTOR0 Vector__XXX;\n\
         VAL_ Mode 0 \"off\" 1 \"standby\" 2 \"active\";\n\
         CM_ EV_ Mode \"operating mode\";",
    );
    let var = parser.env_var("Mode").unwrap();
    assert_eq!(var.value_descriptions.get(&1).map(String::as_str), Some("standby"));
    assert_eq!(var.value_descriptions.len(), 3);
    assert_eq!(var.comments, ["operating mode"]);
}

#[test]
fn access_nodes_must_be_declared() {
    let mut parser = DbcParser::bare();
    let error = parser
        .parse(&mut Source::from_str(
            "EV_ X : 0 [0|1] \"\" 0 1 DUMMY_NODE_VECTOR0 Nowhere;",
        ))
        .unwrap_err();
    assert_eq!(
        error.message,
        "Expecting a valid pre-defined access node name for the environment variable.",
    );
}
