//! Text syntax end to end: multi-card documents, version conversion,
//! warnings and streaming.

use tessen_rfc::rfc::vcard::core::{Telephone, VCardProperty, VCardValue, VCardVersion, names};
use tessen_rfc::rfc::vcard::{
    ReadOptions, ScribeRegistry, TextReader, TextWriter, WriteOptions, parse_text, write_text,
};

const DOCUMENT: &str = "\
BEGIN:VCARD\r\n\
VERSION:3.0\r\n\
FN:Ada Lovelace\r\n\
N:Lovelace;Ada;;;\r\n\
TEL;TYPE=home,voice:+44 20 7946 0000\r\n\
BDAY:1815-12-10\r\n\
NOTE:Wrote the first program\\, arguably.\r\n\
END:VCARD\r\n\
BEGIN:VCARD\r\n\
VERSION:4.0\r\n\
FN:Alan Turing\r\n\
TEL;VALUE=uri;TYPE=work:tel:+44-161-555-0100;ext=7\r\n\
BDAY:--0623\r\n\
END:VCARD\r\n";

#[test_log::test]
fn reads_every_card() {
    let parsed = parse_text(DOCUMENT).expect("document should parse");
    assert_eq!(parsed.len(), 2);

    let ada = &parsed[0].card;
    assert_eq!(ada.version, VCardVersion::V3_0);
    assert_eq!(
        ada.get_property(names::NOTE).and_then(VCardProperty::as_text),
        Some("Wrote the first program, arguably.")
    );
    assert!(ada.get_property(names::TEL).unwrap().has_type("voice"));

    let alan = &parsed[1].card;
    assert!(matches!(
        alan.get_property(names::TEL).unwrap().value,
        VCardValue::Telephone(Telephone::Uri(_))
    ));
    assert!(parsed.iter().all(|p| p.warnings.is_empty()));
}

#[test_log::test]
fn downgrade_to_v3_skips_partial_dates() {
    let cards: Vec<_> = parse_text(DOCUMENT)
        .unwrap()
        .into_iter()
        .map(|p| p.card)
        .collect();
    let registry = ScribeRegistry::new();
    let written = TextWriter::new(
        &registry,
        WriteOptions::default().with_version(VCardVersion::V3_0),
    )
    .write(&cards);

    let alan = written.output.split("END:VCARD").nth(1).unwrap();
    assert!(alan.contains("VERSION:3.0"));
    assert!(!alan.contains("BDAY"));
    assert!(alan.contains("TEL;TYPE=work:+44-161-555-0100 x7"), "{alan}");

    assert!(written.warnings[0].is_empty());
    assert_eq!(written.warnings[1].for_property(names::BDAY).count(), 1);
    assert_eq!(written.warnings[1].for_property(names::TEL).count(), 1);
    assert!(!written.is_clean());
}

#[test_log::test]
fn malformed_lines_do_not_abort() {
    let input = "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Ok\r\nthis line has no colon\r\nGEO:nonsense\r\nNOTE:still here\r\nEND:VCARD\r\n";
    let parsed = parse_text(input).unwrap();
    let card = &parsed[0].card;
    assert_eq!(card.formatted_name(), Some("Ok"));
    assert!(card.get_property(names::GEO).is_none());
    assert!(card.get_property(names::NOTE).is_some());
    assert_eq!(parsed[0].warnings.document.len(), 1);
    assert_eq!(parsed[0].warnings.for_property(names::GEO).count(), 1);
}

#[test_log::test]
fn missing_version_and_end_are_warnings() {
    let registry = ScribeRegistry::new();
    let options = ReadOptions {
        default_version: VCardVersion::V3_0,
    };
    let parsed: Vec<_> = TextReader::new("BEGIN:VCARD\r\nFN:Loose\r\n", &registry, options)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].card.version, VCardVersion::V3_0);
    assert_eq!(parsed[0].card.formatted_name(), Some("Loose"));
    assert_eq!(parsed[0].warnings.document.len(), 2);
}

#[test_log::test]
fn streams_from_and_to_io() {
    let registry = ScribeRegistry::new();
    let reader = TextReader::from_reader(DOCUMENT.as_bytes(), &registry, ReadOptions::default())
        .expect("in-memory stream");
    let cards: Vec<_> = reader.map(|r| r.unwrap().card).collect();

    let mut sink = Vec::new();
    let warnings = TextWriter::new(&registry, WriteOptions::default())
        .write_to(&cards, &mut sink)
        .unwrap();
    assert_eq!(warnings.len(), 2);

    let output = String::from_utf8(sink).unwrap();
    assert_eq!(output, write_text(&cards).unwrap().output);
    assert_eq!(output.matches("PRODID:").count(), 2);
}

#[test_log::test]
fn suspicious_values_are_reported_per_property() {
    let input = "\
BEGIN:VCARD\r\n\
VERSION:3.0\r\n\
FN:Grace Hopper\r\n\
N:Hopper;Grace;Brewster;Rear Admiral;;spare;extra\r\n\
ADR:1;2;3;4;5;6;7;8;9\r\n\
GEO:nan;inf\r\n\
END:VCARD\r\n";
    let parsed = parse_text(input).expect("document should parse");
    let card = &parsed[0].card;
    let warnings = &parsed[0].warnings;

    assert_eq!(card.addresses()[0].country, vec!["7"]);
    assert_eq!(warnings.for_property("ADR").count(), 1);
    assert_eq!(card.name().expect("N kept").prefixes, vec!["Rear Admiral"]);
    assert_eq!(warnings.for_property("N").count(), 1);

    assert!(card.get_property(names::GEO).is_none());
    assert_eq!(warnings.for_property("GEO").count(), 1);

    let written = write_text(std::slice::from_ref(card)).expect("writing succeeds");
    assert!(!written.output.contains("NaN"));
}
