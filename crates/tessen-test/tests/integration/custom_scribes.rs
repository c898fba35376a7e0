//! Registering scribes beyond the built-in catalog.

use serde_json::{Value, json};
use tessen_rfc::rfc::vcard::core::{VCard, VCardDataType, VCardProperty, VCardValue, VCardVersion, names};
use tessen_rfc::rfc::vcard::text::escape::{escape_text, unescape_text};
use tessen_rfc::rfc::vcard::{
    JCardWriter, ParseContext, ReadOptions, ScribeError, ScribeRegistry, ScribeResult, TextReader,
    TextWriter, VCardPropertyScribe, WriteContext, WriteOptions, XCardReader, XCardWriter,
};

#[derive(Debug)]
struct SalaryScribe;

impl VCardPropertyScribe for SalaryScribe {
    fn property_name(&self) -> &str {
        "X-SALARY"
    }

    fn default_data_type(&self, _version: VCardVersion) -> Option<VCardDataType> {
        Some(VCardDataType::Integer)
    }

    fn write_text(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<String> {
        match value {
            VCardValue::Integer(amount) => Ok(amount.to_string()),
            other => Err(ScribeError::mismatch(self.property_name(), other)),
        }
    }

    fn parse_text(
        &self,
        raw: &str,
        _data_type: Option<&VCardDataType>,
        _ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        raw.trim()
            .parse()
            .map(VCardValue::Integer)
            .map_err(|e| ScribeError::unparseable(format!("invalid salary \"{raw}\": {e}")))
    }
}

/// Replaces the built-in FN scribe: written upper case, read lower case.
#[derive(Debug)]
struct ShoutingNameScribe;

impl VCardPropertyScribe for ShoutingNameScribe {
    fn property_name(&self) -> &str {
        names::FN
    }

    fn default_data_type(&self, _version: VCardVersion) -> Option<VCardDataType> {
        Some(VCardDataType::Text)
    }

    fn write_text(&self, value: &VCardValue, _ctx: &mut WriteContext) -> ScribeResult<String> {
        value
            .as_text()
            .map(|text| escape_text(&text.to_uppercase()))
            .ok_or_else(|| ScribeError::mismatch(names::FN, value))
    }

    fn parse_text(
        &self,
        raw: &str,
        _data_type: Option<&VCardDataType>,
        _ctx: &mut ParseContext,
    ) -> ScribeResult<VCardValue> {
        Ok(VCardValue::Text(unescape_text(raw).to_lowercase()))
    }
}

fn registry() -> ScribeRegistry {
    let mut registry = ScribeRegistry::new();
    registry.register(SalaryScribe);
    registry.register(ShoutingNameScribe);
    registry
}

fn read_text(input: &str, registry: &ScribeRegistry) -> Vec<tessen_rfc::rfc::vcard::ParsedVCard> {
    TextReader::new(input, registry, ReadOptions::default())
        .collect::<Result<_, _>>()
        .expect("text input")
}

const INPUT: &str = "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Jane Doe\r\nX-SALARY:85000\r\nX-SALARY:lots\r\nEND:VCARD\r\n";

#[test_log::test]
fn custom_scribes_parse() {
    let registry = registry();
    let parsed = read_text(INPUT, &registry);
    let card = &parsed[0].card;

    assert_eq!(card.formatted_name(), Some("jane doe"));
    let salaries = card.get_properties("X-SALARY");
    assert_eq!(salaries.len(), 1);
    assert_eq!(salaries[0].value, VCardValue::Integer(85_000));
    assert_eq!(parsed[0].warnings.for_property("X-SALARY").count(), 1);
}

#[test_log::test]
fn custom_scribes_write_every_syntax() {
    let registry = registry();
    let mut card = VCard::new();
    card.add_property(VCardProperty::text(names::FN, "Jane Doe"));
    card.add_property(VCardProperty::new("X-SALARY", VCardValue::Integer(85_000)));
    let cards = [card];

    let text = TextWriter::new(&registry, WriteOptions::default().without_prodid()).write(&cards);
    assert!(text.is_clean());
    assert!(text.output.contains("\r\nFN:JANE DOE\r\n"));
    assert!(text.output.contains("\r\nX-SALARY:85000\r\n"));

    let xml = XCardWriter::new(&registry, WriteOptions::default())
        .write(&cards)
        .unwrap();
    assert!(xml.output.contains("<fn><text>JANE DOE</text></fn>"));
    assert!(xml.output.contains("<x-salary><integer>85000</integer></x-salary>"));
    let read_back = XCardReader::new(&xml.output, &registry)
        .unwrap()
        .next()
        .unwrap()
        .unwrap();
    assert_eq!(
        read_back.card.get_property("X-SALARY").unwrap().value,
        VCardValue::Integer(85_000)
    );

    let json = JCardWriter::new(&registry, WriteOptions::default())
        .write(&cards)
        .unwrap();
    let document: Value = serde_json::from_str(&json.output).unwrap();
    assert_eq!(document[1][2], json!(["x-salary", {}, "integer", "85000"]));
}

#[test_log::test]
fn unregistered_names_pass_through() {
    let mut registry = registry();
    assert!(registry.unregister("x-salary").is_some());
    assert!(!registry.contains("X-SALARY"));

    let parsed = read_text(INPUT, &registry);
    let salaries = parsed[0].card.get_properties("X-SALARY");
    assert_eq!(salaries.len(), 2);
    assert_eq!(salaries[1].value, VCardValue::Extended("lots".to_string()));
    assert!(parsed[0].warnings.is_empty());
}
