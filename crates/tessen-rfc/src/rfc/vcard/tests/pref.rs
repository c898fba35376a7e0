//! PREF and `TYPE=pref` rewriting between versions.

use crate::rfc::vcard::core::{VCard, VCardProperty, VCardVersion, names};
use crate::rfc::vcard::{ScribeRegistry, TextWriter, WriteOptions, parse_text_single};

fn tel(number: &str, pref: Option<u32>) -> VCardProperty {
    let mut property = VCardProperty::telephone(number);
    property.params.set_pref(pref);
    property
}

fn card() -> VCard {
    let mut card = VCard::new();
    card.add_property(VCardProperty::text(names::FN, "Pat"));
    card.add_property(tel("555-0102", Some(2)));
    card.add_property(tel("555-0101", Some(1)));
    card.add_property(tel("555-0103", None));
    card
}

fn write_at(card: &VCard, version: VCardVersion) -> String {
    let registry = ScribeRegistry::new();
    let options = WriteOptions::default()
        .with_version(version)
        .without_prodid();
    TextWriter::new(&registry, options)
        .write(std::slice::from_ref(card))
        .output
}

#[test_log::test]
fn lowest_pref_wins_below_v4() {
    for version in [VCardVersion::V3_0, VCardVersion::V2_1] {
        let output = write_at(&card(), version);
        assert!(!output.contains("PREF="), "{output}");

        let parsed = parse_text_single(&output).unwrap();
        let tels = parsed.card.get_properties(names::TEL);
        assert_eq!(tels.len(), 3);
        let preferred: Vec<bool> = tels.iter().map(|t| t.has_type("pref")).collect();
        assert_eq!(preferred, vec![false, true, false], "{output}");
    }
}

#[test_log::test]
fn pref_values_kept_at_v4() {
    let output = write_at(&card(), VCardVersion::V4_0);
    assert!(output.contains("\r\nTEL;PREF=2:555-0102\r\n"), "{output}");
    assert!(output.contains("\r\nTEL;PREF=1:555-0101\r\n"), "{output}");
    assert!(output.contains("\r\nTEL:555-0103\r\n"), "{output}");
    assert!(!output.contains("TYPE=pref"));
}

#[test_log::test]
fn type_pref_becomes_pref_one_at_v4() {
    let input = "BEGIN:VCARD\r\nVERSION:3.0\r\nFN:Pat\r\nEMAIL;TYPE=internet,pref:pat@example.com\r\nEND:VCARD\r\n";
    let card = parse_text_single(input).unwrap().card;
    let output = write_at(&card, VCardVersion::V4_0);
    assert!(output.contains("EMAIL;TYPE=internet;PREF=1:pat@example.com"), "{output}");
}

#[test_log::test]
fn writing_never_mutates_the_card() {
    let original = card();
    let copy = original.clone();
    let first = write_at(&original, VCardVersion::V3_0);
    let second = write_at(&original, VCardVersion::V3_0);
    assert_eq!(first, second);
    assert_eq!(original, copy);
    assert_eq!(original.properties[1].pref(), Some(2));
}
