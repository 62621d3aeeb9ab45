//! Attribute definitions, defaults and value assignments.

use candbc_model::{AttrValue, AttributeDefValue, AttributeScope};
use candbc_parser::{DbcParser, Source};

fn parse(content: &str) -> DbcParser {
    let mut parser = DbcParser::bare();
    parser
        .parse(&mut Source::from_str(content))
        .expect("content should parse");
    parser
}

const MESSAGE: &str = "\
BO_ 1 M: 8 Vector__XXX
 SG_ S : 7|8@0+ (1,0) [0|255] \"\" Vector__XXX
";

#[test]
fn seeded_parser_carries_standard_definitions() {
    let parser = DbcParser::new();

    let frame_format = parser.attribute_def("VFrameFormat").unwrap();
    assert_eq!(frame_format.scope, AttributeScope::Message);
    match &frame_format.value {
        AttributeDefValue::Enumerator { values, default } => {
            assert_eq!(values[0], "StandardCAN");
            assert_eq!(values.len(), 4);
            assert_eq!(default, "StandardCAN");
        }
        other => panic!("unexpected definition value: {other:?}"),
    }

    let cycle_time = parser.attribute_def("GenMsgCycleTime").unwrap();
    assert_eq!(
        cycle_time.value,
        AttributeDefValue::Integer {
            minimum: 0,
            maximum: 10000,
            default: 0,
        }
    );
    assert!(parser.attribute_def_names().contains(&"GenSigStartValue"));
}

#[test]
fn enum_default_by_label_and_by_index() {
    let parser = parse(
        "BA_DEF_ SG_ \"a\" ENUM \"x\",\"y\",\"z\";\nBA_DEF_DEF_ \"a\" 1;",
    );
    match &parser.attribute_def("a").unwrap().value {
        AttributeDefValue::Enumerator { default, .. } => assert_eq!(default, "y"),
        other => panic!("unexpected definition value: {other:?}"),
    }

    // The default label match is case-insensitive; the label is stored
    // as written.
    let parser = parse(
        "BA_DEF_ SG_ \"a\" ENUM \"x\",\"y\",\"z\";\nBA_DEF_DEF_ \"a\" \"Y\";",
    );
    match &parser.attribute_def("a").unwrap().value {
        AttributeDefValue::Enumerator { default, .. } => assert_eq!(default, "Y"),
        other => panic!("unexpected definition value: {other:?}"),
    }
}

#[test]
fn enum_default_index_out_of_range_fails() {
    let mut parser = DbcParser::bare();
    let error = parser
        .parse(&mut Source::from_str(
            "BA_DEF_ SG_ \"a\" ENUM \"x\",\"y\";\nBA_DEF_DEF_ \"a\" 2;",
        ))
        .unwrap_err();
    assert_eq!(
        error.message,
        "Default value out of range for the attribute definition"
    );
}

#[test]
fn signal_attribute_value_by_enum_index() {
    let mut content = String::from(MESSAGE);
    content.push_str("BA_DEF_ SG_ \"a\" ENUM \"x\",\"y\",\"z\";\nBA_ \"a\" SG_ 1 S 2;");
    let parser = parse(&content);

    let signal = parser.signal("M", "S").unwrap();
    assert_eq!(signal.attributes.len(), 1);
    assert_eq!(signal.attributes[0].value, AttrValue::String("z".into()));
    let def = parser.resolve_attribute_def(signal.attributes[0].def);
    assert_eq!(def.name, "a");
}

#[test]
fn attribute_value_enum_label_is_case_sensitive() {
    let mut content = String::from(MESSAGE);
    content.push_str("BA_DEF_ SG_ \"a\" ENUM \"x\",\"y\",\"z\";\nBA_ \"a\" SG_ 1 S \"Y\";");
    let mut parser = DbcParser::bare();
    let error = parser
        .parse(&mut Source::from_str(&content))
        .unwrap_err();
    assert_eq!(
        error.message,
        "The enum value doesn't fit the list of the predefined values."
    );
}

#[test]
fn attribute_scope_must_match() {
    let mut content = String::from(MESSAGE);
    content.push_str("BA_DEF_ \"g\" INT 0 10;\nBA_ \"g\" BO_ 1 5;");
    let mut parser = DbcParser::bare();
    let error = parser
        .parse(&mut Source::from_str(&content))
        .unwrap_err();
    assert_eq!(
        error.message,
        "Object type of attribute value is not fitting the object type of the attribute definition."
    );
}

#[test]
fn global_node_and_message_attribute_targets() {
    let parser = parse(
        "BU_: Gateway\n\
         BO_ 1 M: 8 Gateway\n\
         BA_DEF_ \"Bus\" STRING;\n\
         BA_DEF_ BU_ \"Station\" STRING;\n\
         BA_DEF_ BO_ \"Cycle\" INT 0 10000;\n\
         BA_ \"Bus\" \"powertrain\";\n\
         BA_ \"Station\" BU_ Gateway \"front\";\n\
         BA_ \"Cycle\" BO_ 1 100;",
    );

    assert_eq!(parser.attributes().len(), 1);
    assert_eq!(
        parser.attributes()[0].value,
        AttrValue::String("powertrain".into())
    );

    let node = parser.node("Gateway").unwrap();
    assert_eq!(node.attributes[0].value, AttrValue::String("front".into()));

    let message = parser.message_by_raw_id(1).unwrap();
    assert_eq!(message.attributes[0].value, AttrValue::Integer(100));
}

#[test]
fn integer_attribute_value_accepts_float_notation() {
    let parser = parse(
        "BO_ 1 M: 8 Vector__XXX\n\
         BA_DEF_ BO_ \"Cycle\" INT 0 10000;\n\
         BA_ \"Cycle\" BO_ 1 12.75;",
    );
    let message = parser.message_by_raw_id(1).unwrap();
    assert_eq!(message.attributes[0].value, AttrValue::Integer(12));
}

#[test]
fn hex_default_rejects_negative_values() {
    let mut parser = DbcParser::bare();
    let error = parser
        .parse(&mut Source::from_str(
            "BA_DEF_ \"h\" HEX 0 255;\nBA_DEF_DEF_ \"h\" -1;",
        ))
        .unwrap_err();
    assert_eq!(
        error.message,
        "Expecting an unsigned integer value for the default value of the attribute definition"
    );
}

#[test]
fn duplicate_enumerator_labels_fail_except_placeholders() {
    let mut parser = DbcParser::bare();
    let error = parser
        .parse(&mut Source::from_str(
            "BA_DEF_ SG_ \"a\" ENUM \"x\",\"x\";",
        ))
        .unwrap_err();
    assert_eq!(error.message, "Duplicate enumerator entry string.");

    // The placeholder labels used by generator tooling may repeat.
    let parser = parse("BA_DEF_ SG_ \"a\" ENUM \"not-used\",\"not-used\",\"n/a\",\"n/a\";");
    match &parser.attribute_def("a").unwrap().value {
        AttributeDefValue::Enumerator { values, .. } => assert_eq!(values.len(), 4),
        other => panic!("unexpected definition value: {other:?}"),
    }
}

#[test]
fn redefinition_keeps_old_values_valid() {
    let mut content = String::from(MESSAGE);
    content.push_str(
        "BA_DEF_ BO_ \"n\" INT 0 100;\n\
         BA_ \"n\" BO_ 1 5;\n\
         BA_DEF_ BO_ \"n\" STRING;",
    );
    let parser = parse(&content);

    // The name now resolves to the string redefinition.
    assert!(matches!(
        parser.attribute_def("n").unwrap().value,
        AttributeDefValue::String { .. }
    ));

    // The value bound before the redefinition still resolves to the
    // integer definition through its handle.
    let message = parser.message_by_raw_id(1).unwrap();
    assert_eq!(message.attributes[0].value, AttrValue::Integer(5));
    let old_def = parser.resolve_attribute_def(message.attributes[0].def);
    assert!(matches!(
        old_def.value,
        AttributeDefValue::Integer { minimum: 0, maximum: 100, .. }
    ));
}
