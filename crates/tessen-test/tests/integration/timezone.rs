//! TZ across versions and syntaxes.

use tessen_rfc::rfc::vcard::core::{
    Timezone, VCard, VCardProperty, VCardUtcOffset, VCardValue, VCardVersion, names,
};
use tessen_rfc::rfc::vcard::{ScribeRegistry, TextWriter, WriteOptions, parse_text_single, write_json, write_xml};

fn card_with(tz: Timezone) -> VCard {
    let mut card = VCard::new();
    card.add_property(VCardProperty::text(names::FN, "Zoe"));
    card.add_property(VCardProperty::new(names::TZ, VCardValue::Timezone(tz)));
    card
}

fn tz_line(card: &VCard, version: VCardVersion) -> Option<String> {
    let registry = ScribeRegistry::new();
    let written = TextWriter::new(&registry, WriteOptions::default().with_version(version))
        .write(std::slice::from_ref(card));
    written
        .output
        .split("\r\n")
        .find(|line| line.starts_with("TZ"))
        .map(str::to_string)
}

fn offset() -> VCardUtcOffset {
    VCardUtcOffset::from_minutes(-330)
}

#[test_log::test]
fn offset_per_version() {
    let card = card_with(Timezone::offset(offset()));
    assert_eq!(tz_line(&card, VCardVersion::V2_1).as_deref(), Some("TZ:-0530"));
    assert_eq!(tz_line(&card, VCardVersion::V3_0).as_deref(), Some("TZ:-05:30"));
    assert_eq!(
        tz_line(&card, VCardVersion::V4_0).as_deref(),
        Some("TZ;VALUE=utc-offset:-0530")
    );
}

#[test_log::test]
fn text_per_version() {
    let card = card_with(Timezone::text("America/New_York"));
    assert_eq!(tz_line(&card, VCardVersion::V2_1).as_deref(), Some("TZ:-0500"));
    assert_eq!(
        tz_line(&card, VCardVersion::V3_0).as_deref(),
        Some("TZ;VALUE=text:America/New_York")
    );
    assert_eq!(
        tz_line(&card, VCardVersion::V4_0).as_deref(),
        Some("TZ:America/New_York")
    );
}

#[test_log::test]
fn unknown_zone_is_skipped_at_v21() {
    let card = card_with(Timezone::text("Nowhere/Special"));
    let registry = ScribeRegistry::new();
    let written = TextWriter::new(
        &registry,
        WriteOptions::default().with_version(VCardVersion::V2_1),
    )
    .write(std::slice::from_ref(&card));
    assert!(!written.output.contains("TZ"));
    assert_eq!(written.warnings[0].for_property(names::TZ).count(), 1);
}

#[test_log::test]
fn both_set_prefers_offset_below_v4() {
    let card = card_with(Timezone::both(offset(), "Asia/Kolkata"));
    assert_eq!(tz_line(&card, VCardVersion::V3_0).as_deref(), Some("TZ:-05:30"));
    assert_eq!(
        tz_line(&card, VCardVersion::V4_0).as_deref(),
        Some("TZ:Asia/Kolkata")
    );
}

#[test_log::test]
fn v3_unparseable_offset_falls_back_to_text() {
    let parsed =
        parse_text_single("BEGIN:VCARD\r\nVERSION:3.0\r\nTZ:Europe/Paris\r\nEND:VCARD\r\n").unwrap();
    assert_eq!(
        parsed.card.get_property(names::TZ).unwrap().value,
        VCardValue::Timezone(Timezone::text("Europe/Paris"))
    );
    assert_eq!(parsed.warnings.for_property(names::TZ).count(), 1);
}

#[test_log::test]
fn xml_and_json_forms() {
    let card = card_with(Timezone::offset(offset()));
    let xml = write_xml(std::slice::from_ref(&card)).unwrap().output;
    assert!(xml.contains("<tz><utc-offset>-0530</utc-offset></tz>"));
    let json = write_json(&[card]).unwrap().output;
    assert!(json.contains(r#"["tz",{},"utc-offset","-05:30"]"#));
}
