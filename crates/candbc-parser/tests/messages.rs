//! Message and signal constructs, including the independent-signal
//! placeholder message.

use candbc_model::{ByteOrder, ValueKind, INDEPENDENT_MSG_RAW_ID};
use candbc_parser::{DbcParser, Source};

fn parse(content: &str) -> DbcParser {
    let mut parser = DbcParser::bare();
    parser
        .parse(&mut Source::from_str(content))
        .expect("content should parse");
    parser
}

const NETWORK: &str = "\
BU_: Gateway Motor Sensor

BO_ 1 Status: 8 Gateway
 SG_ Speed : 7|16@0+ (0.01,0) [0|655.35] \"km/h\" Motor,Sensor
 SG_ Temp : 23|8@0- (1,-40) [-40|215] \"degC\" Motor

BO_ 2147483904 Diag: 8 Motor
 SG_ Code : 0|8@1+ (1,0) [0|255] \"\" Vector__XXX
";

#[test]
fn structural_round_trip_by_name_and_ids() {
    let parser = parse(NETWORK);

    let by_name = parser.message_by_name("Status").unwrap();
    let by_raw = parser.message_by_raw_id(1).unwrap();
    let by_std = parser.message_by_std_id(1).unwrap();
    assert_eq!(by_name, by_raw);
    assert_eq!(by_name, by_std);

    assert_eq!(by_name.name, "Status");
    assert_eq!(by_name.raw_id, 1);
    assert_eq!(by_name.size, 8);
    assert_eq!(by_name.transmitters, ["Gateway"]);
    assert_eq!(parser.signal_names(1), ["Speed", "Temp"]);

    let speed = parser.signal("Status", "Speed").unwrap();
    assert_eq!(speed, parser.signal_by_raw_id(1, "Speed").unwrap());
    assert_eq!(speed, parser.signal_by_std_id(1, "Speed").unwrap());
    assert_eq!(speed.message_raw_id, 1);
    assert_eq!(speed.start_bit, 7);
    assert_eq!(speed.shape.size, 16);
    assert_eq!(speed.shape.byte_order, ByteOrder::BigEndian);
    assert_eq!(speed.shape.value_kind, ValueKind::Unsigned);
    assert_eq!(speed.shape.factor, 0.01);
    assert_eq!(speed.shape.offset, 0.0);
    assert_eq!(speed.shape.minimum, 0.0);
    assert_eq!(speed.shape.maximum, 655.35);
    assert_eq!(speed.shape.unit, "km/h");
    assert_eq!(speed.receivers, ["Motor", "Sensor"]);

    let temp = parser.signal("Status", "Temp").unwrap();
    assert_eq!(temp.shape.value_kind, ValueKind::Signed);
    assert_eq!(temp.shape.offset, -40.0);
}

#[test]
fn extended_id_lookup() {
    let parser = parse(NETWORK);

    // 2147483904 == 0x8000_0100: extended frame with id 0x100.
    let diag = parser.message_by_ext_id(0x100).unwrap();
    assert_eq!(diag.name, "Diag");
    assert!(parser.has_message_ext_id(0x100));
    assert!(!parser.has_message_std_id(0x100));
    assert_eq!(parser.message_ids(), [1, 0x8000_0100]);

    // Out-of-range ids never match, raw value aside.
    assert!(parser.message_by_std_id(1 << 11).is_none());
    assert!(parser.message_by_ext_id(1 << 29).is_none());
}

#[test]
fn duplicate_message_fails() {
    let mut parser = DbcParser::bare();
    let error = parser
        .parse(&mut Source::from_str(
            "BO_ 1 A: 8 Vector__XXX\nBO_ 2 A: 8 Vector__XXX",
        ))
        .unwrap_err();
    assert_eq!(error.message, "Duplicate message definition for ID 'A' and ID 2.");

    let mut parser = DbcParser::bare();
    let error = parser
        .parse(&mut Source::from_str(
            "BO_ 1 A: 8 Vector__XXX\nBO_ 1 B: 8 Vector__XXX",
        ))
        .unwrap_err();
    assert_eq!(
        error.message,
        "Failed to construct message definition for 'B' and ID 1."
    );
    // The rolled-back name must not be reachable.
    assert!(!parser.has_message("B"));
    assert!(parser.has_message("A"));
}

#[test]
fn independent_message_merges_and_redirects() {
    let parser = parse(
        "BO_ 3 VECTOR__INDEPENDENT_SIG_MSG: 1 Vector__XXX\n \
         SG_ Orphan1 : 0|8@1+ (1,0) [0|255] \"\" Vector__XXX\n\
         BO_ 3 VECTOR__INDEPENDENT_SIG_MSG: 2 Vector__XXX\n \
         SG_ Orphan2 : 0|8@1+ (1,0) [0|255] \"\" Vector__XXX\n\
         CM_ SG_ 3 Orphan1 \"first orphan\";",
    );

    let message = parser
        .message_by_raw_id(INDEPENDENT_MSG_RAW_ID)
        .expect("placeholder stored under the reserved raw id");
    assert_eq!(message.raw_id, INDEPENDENT_MSG_RAW_ID);
    assert_eq!(message.size, 3); // 1 + 2, accumulated
    assert_eq!(message.transmitters, ["Vector__XXX", "Vector__XXX"]);
    assert_eq!(
        parser.signal_names(INDEPENDENT_MSG_RAW_ID),
        ["Orphan1", "Orphan2"]
    );

    // The declared id 3 redirected to the placeholder for the comment.
    let orphan = parser
        .signal_by_raw_id(INDEPENDENT_MSG_RAW_ID, "Orphan1")
        .unwrap();
    assert_eq!(orphan.comments, ["first orphan"]);
    assert_eq!(orphan.message_raw_id, INDEPENDENT_MSG_RAW_ID);
    assert!(parser.message_by_raw_id(3).is_none());
}

#[test]
fn message_transmitters_append() {
    let parser = parse(
        "BU_: A B C\nBO_ 1 M: 8 A\nBO_TX_BU_ 1 : B, C;",
    );
    let message = parser.message_by_raw_id(1).unwrap();
    assert_eq!(message.transmitters, ["A", "B", "C"]);
}

#[test]
fn duplicate_transmitter_fails() {
    let mut parser = DbcParser::bare();
    let error = parser
        .parse(&mut Source::from_str("BU_: A\nBO_ 1 M: 8 A\nBO_TX_BU_ 1 : A;"))
        .unwrap_err();
    assert_eq!(error.message, "Duplicate transmitter defined for the message.");
}

#[test]
fn signal_value_type_promotion() {
    let parser = parse(
        "BO_ 1 M: 8 Vector__XXX\n \
         SG_ F : 7|32@0+ (1,0) [0|0] \"\" Vector__XXX\n \
         SG_ D : 39|32@0+ (1,0) [0|0] \"\" Vector__XXX\n\
         SIG_VALTYPE_ 1 F : 1;\n\
         SIG_VALTYPE_ 1 D 2;",
    );
    assert_eq!(
        parser.signal("M", "F").unwrap().shape.value_kind,
        ValueKind::Float
    );
    assert_eq!(
        parser.signal("M", "D").unwrap().shape.value_kind,
        ValueKind::Double
    );
}

#[test]
fn signal_value_descriptions() {
    let parser = parse(
        "BO_ 1 M: 8 Vector__XXX\n \
         SG_ Gear : 7|3@0+ (1,0) [0|7] \"\" Vector__XXX\n\
         VAL_ 1 Gear 0 \"neutral\" 1 \"drive\";",
    );
    let gear = parser.signal("M", "Gear").unwrap();
    assert_eq!(gear.value_descriptions.get(&0).map(String::as_str), Some("neutral"));
    assert_eq!(gear.value_descriptions.len(), 2);
}

#[test]
fn repeated_signal_value_descriptions_fail() {
    let mut parser = DbcParser::bare();
    let error = parser
        .parse(&mut Source::from_str(
            "BO_ 1 M: 8 Vector__XXX\n \
             SG_ G : 7|3@0+ (1,0) [0|7] \"\" Vector__XXX\n\
             VAL_ 1 G 0 \"a\";\nVAL_ 1 G 1 \"b\";",
        ))
        .unwrap_err();
    assert_eq!(error.message, "Duplicate value assignment.");
}

#[test]
fn signal_groups() {
    let parser = parse(
        "BO_ 1 M: 8 Vector__XXX\n \
         SG_ A : 7|8@0+ (1,0) [0|255] \"\" Vector__XXX\n \
         SG_ B : 15|8@0+ (1,0) [0|255] \"\" Vector__XXX\n\
         SIG_GROUP_ 1 Grp 1 : A, B;",
    );
    let group = parser.signal_group(1, "Grp").unwrap();
    assert_eq!(group.repetitions, 1);
    assert_eq!(group.signals, ["A", "B"]);
    assert_eq!(parser.signal_group_names(1), ["Grp"]);
}

#[test]
fn signal_group_member_must_exist() {
    let mut parser = DbcParser::bare();
    let error = parser
        .parse(&mut Source::from_str(
            "BO_ 1 M: 8 Vector__XXX\n \
             SG_ A : 7|8@0+ (1,0) [0|255] \"\" Vector__XXX\n\
             SIG_GROUP_ 1 Grp 1 : Nope;",
        ))
        .unwrap_err();
    assert_eq!(error.message, "Could not find signal with supplied name.");
}

#[test]
fn signal_type_definition_and_reference() {
    let parser = parse(
        "VAL_TABLE_ Gears 0 \"N\" 1 \"D\";\n\
         SGTYPE_ GearType : 8@1+ (1,0) [0|7] \"\" 0, Gears;\n\
         BO_ 1 M: 8 Vector__XXX\n \
         SG_ G : 7|8@0+ (1,0) [0|255] \"\" Vector__XXX\n\
         SGTYPE_ 1 G : GearType;",
    );
    let gear_type = parser.signal_type("GearType").unwrap();
    assert_eq!(gear_type.shape.size, 8);
    assert_eq!(gear_type.shape.byte_order, ByteOrder::LittleEndian);
    assert_eq!(gear_type.default_value, 0.0);
    assert_eq!(gear_type.value_table, "Gears");
    assert_eq!(parser.signal_type_names(), ["GearType"]);

    let signal = parser.signal("M", "G").unwrap();
    assert_eq!(signal.signal_type_ref.as_deref(), Some("GearType"));
}

#[test]
fn message_and_signal_comments() {
    let parser = parse(
        "BO_ 1 M: 8 Vector__XXX\n \
         SG_ S : 7|8@0+ (1,0) [0|255] \"\" Vector__XXX\n\
         CM_ BO_ 1 \"the message\";\n\
         CM_ SG_ 1 S \"the signal\";",
    );
    assert_eq!(parser.message_by_raw_id(1).unwrap().comments, ["the message"]);
    assert_eq!(parser.signal("M", "S").unwrap().comments, ["the signal"]);
}

#[test]
fn serde_round_trip_of_a_parsed_message() {
    let parser = parse(NETWORK);
    let message = parser.message_by_name("Status").unwrap();
    let json = serde_json::to_string(message).unwrap();
    let back: candbc_model::Message = serde_json::from_str(&json).unwrap();
    assert_eq!(&back, message);
}
