//! jCard end to end.

use serde_json::{Value, json};
use tessen_rfc::rfc::vcard::core::{
    Gender, Sex, VCard, VCardDataType, VCardProperty, VCardValue, names,
};
use tessen_rfc::rfc::vcard::{JCardReader, JCardWriter, ScribeRegistry, WriteOptions, parse_json};

/// RFC 7095 appendix B.1, trimmed.
const DOCUMENT: &str = r#"["vcard",
  [
    ["version", {}, "text", "4.0"],
    ["fn", {}, "text", "Simon Perreault"],
    ["n", {}, "text", ["Perreault", "Simon", "", "", ["ing. jr", "M.Sc."]]],
    ["bday", {}, "date-and-or-time", "--02-03"],
    ["anniversary", {}, "date-and-or-time", "2009-08-08T14:30:00-05:00"],
    ["gender", {}, "text", "M"],
    ["lang", {"pref": "1"}, "language-tag", "fr"],
    ["org", {"type": "work"}, "text", "Viagenie"],
    ["adr", {"type": "work"}, "text",
      ["", "Suite D2-630", "2875 Laurier", "Quebec", "QC", "G1V 2M2", "Canada"]],
    ["tel", {"type": ["work", "voice"], "pref": "1"}, "uri", "tel:+1-418-656-9254;ext=102"],
    ["email", {"type": "work"}, "text", "simon.perreault@viagenie.ca"],
    ["geo", {"type": "work"}, "uri", "geo:46.772673,-71.282945"],
    ["tz", {}, "utc-offset", "-05:00"],
    ["url", {"type": "home"}, "uri", "http://nomis80.org"],
    ["x-karma", {}, "integer", 42]
  ]
]"#;

#[test_log::test]
fn parses_full_card() {
    let parsed = parse_json(DOCUMENT).expect("valid jCard");
    assert_eq!(parsed.len(), 1);
    assert!(parsed[0].warnings.is_empty(), "{:?}", parsed[0].warnings.messages());

    let card = &parsed[0].card;
    assert_eq!(card.formatted_name(), Some("Simon Perreault"));
    assert_eq!(card.name().unwrap().suffixes.len(), 2);
    assert_eq!(
        card.get_property(names::GENDER).unwrap().value,
        VCardValue::Gender(Gender::sex(Sex::Male))
    );
    assert_eq!(card.addresses()[0].locality, vec!["Quebec"]);
    assert_eq!(card.get_property(names::TEL).unwrap().pref(), Some(1));

    let karma = card.get_property("X-KARMA").unwrap();
    assert_eq!(karma.value, VCardValue::Extended("42".to_string()));
    assert_eq!(karma.params.value_type(), Some(VCardDataType::Integer));
}

#[test_log::test]
fn rewrites_to_the_same_shape() {
    let card = parse_json(DOCUMENT).unwrap().remove(0).card;
    let registry = ScribeRegistry::new();
    let written = JCardWriter::new(&registry, WriteOptions::default())
        .write(std::slice::from_ref(&card))
        .unwrap();
    assert!(written.is_clean(), "{:?}", written.warnings);

    let document: Value = serde_json::from_str(&written.output).unwrap();
    let properties = document[1].as_array().unwrap();
    let find = |name: &str| {
        properties
            .iter()
            .find(|p| p[0] == name)
            .cloned()
            .unwrap_or(Value::Null)
    };

    assert_eq!(find("version"), json!(["version", {}, "text", "4.0"]));
    assert_eq!(
        find("tel"),
        json!(["tel", {"type": ["work", "voice"], "pref": "1"}, "uri", "tel:+1-418-656-9254;ext=102"])
    );
    assert_eq!(find("gender"), json!(["gender", {}, "text", "M"]));
    assert_eq!(find("x-karma"), json!(["x-karma", {}, "integer", "42"]));
    assert_eq!(find("adr")[3].as_array().unwrap().len(), 7);
    assert_eq!(find("n")[3].as_array().unwrap().len(), 5);
}

#[test_log::test]
fn several_cards_round_trip() {
    let mut first = VCard::new();
    first.add_property(VCardProperty::text(names::FN, "One"));
    let mut second = VCard::new();
    second.add_property(VCardProperty::text(names::FN, "Two"));

    let registry = ScribeRegistry::new();
    let written = JCardWriter::new(&registry, WriteOptions::default().pretty(true))
        .write(&[first, second])
        .unwrap();
    let names: Vec<_> = JCardReader::new(&written.output, &registry)
        .unwrap()
        .map(|p| p.unwrap().card.formatted_name().map(str::to_string))
        .collect();
    assert_eq!(names, vec![Some("One".to_string()), Some("Two".to_string())]);
}

#[test_log::test]
fn non_jcard_json_is_an_error() {
    assert!(parse_json(r#"{"fn": "nope"}"#).is_err());
    assert!(parse_json("not json").is_err());
}
