//! xCard end to end.

use tessen_rfc::rfc::vcard::core::{
    Address, Gender, Sex, StructuredName, VCard, VCardProperty, VCardValue, VCardVersion, names,
};
use tessen_rfc::rfc::vcard::{ScribeRegistry, WriteOptions, XCardReader, XCardWriter, parse_xml};

/// RFC 6351 §3 example, extended with a group and an extension element.
const DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<vcards xmlns="urn:ietf:params:xml:ns:vcard-4.0">
  <vcard>
    <fn><text>Simon Perreault</text></fn>
    <n>
      <surname>Perreault</surname>
      <given>Simon</given>
      <additional/>
      <prefix/>
      <suffix>ing. jr</suffix>
      <suffix>M.Sc.</suffix>
    </n>
    <bday><date>--0203</date></bday>
    <gender><sex>M</sex></gender>
    <lang>
      <parameters><pref><integer>1</integer></pref></parameters>
      <language-tag>fr</language-tag>
    </lang>
    <org>
      <parameters><type><text>work</text></type></parameters>
      <text>Viagenie</text>
    </org>
    <adr>
      <parameters>
        <type><text>work</text></type>
        <label><text>Simon Perreault
2875 boul. Laurier, suite D2-630
Quebec, Canada</text></label>
      </parameters>
      <pobox/>
      <ext>Suite D2-630</ext>
      <street>2875 Laurier</street>
      <locality>Quebec</locality>
      <region>QC</region>
      <code>G1V 2M2</code>
      <country>Canada</country>
    </adr>
    <tel>
      <parameters><type><text>work</text><text>voice</text></type></parameters>
      <uri>tel:+1-418-656-9254;ext=102</uri>
    </tel>
    <group name="contact">
      <email><text>simon.perreault@viagenie.ca</text></email>
    </group>
    <geo><uri>geo:46.766336,-71.28955</uri></geo>
    <tz><text>America/Montreal</text></tz>
    <x-favorite-color><unknown>blue</unknown></x-favorite-color>
  </vcard>
</vcards>"#;

#[test_log::test]
fn parses_full_card() {
    let parsed = parse_xml(DOCUMENT).expect("well-formed document");
    assert_eq!(parsed.len(), 1);
    assert!(parsed[0].warnings.is_empty(), "{:?}", parsed[0].warnings.messages());

    let card = &parsed[0].card;
    assert_eq!(card.version, VCardVersion::V4_0);
    assert_eq!(card.formatted_name(), Some("Simon Perreault"));
    assert_eq!(
        card.name().unwrap().suffixes,
        vec!["ing. jr".to_string(), "M.Sc.".to_string()]
    );
    assert_eq!(
        card.get_property(names::GENDER).unwrap().value,
        VCardValue::Gender(Gender::sex(Sex::Male))
    );
    assert_eq!(card.get_property(names::LANG).unwrap().pref(), Some(1));

    let adr_property = card.get_property(names::ADR).unwrap();
    assert!(adr_property.params.label().unwrap().contains("Laurier"));
    let adr = &card.addresses()[0];
    assert_eq!(adr.extended, vec!["Suite D2-630"]);
    assert_eq!(adr.postal_code, vec!["G1V 2M2"]);

    assert_eq!(
        card.get_property(names::EMAIL).unwrap().group.as_deref(),
        Some("contact")
    );
    assert_eq!(
        card.get_property("X-FAVORITE-COLOR").unwrap().value,
        VCardValue::Extended("blue".to_string())
    );
}

#[test_log::test]
fn writes_v4_regardless_of_card_version() {
    let mut card = VCard::with_version(VCardVersion::V3_0);
    card.add_property(VCardProperty::text(names::FN, "Legacy Card"));
    card.add_property(VCardProperty::new(
        names::N,
        StructuredName::simple("Card", "Legacy"),
    ));
    card.add_property(VCardProperty::new(
        names::ADR,
        VCardValue::Address(Address {
            street: vec!["1 Main St".into()],
            ..Address::default()
        }),
    ));

    let registry = ScribeRegistry::new();
    let written = XCardWriter::new(
        &registry,
        WriteOptions::default().with_version(VCardVersion::V2_1),
    )
    .write(&[card])
    .unwrap();
    assert!(written.is_clean());
    assert!(written.output.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(written.output.contains("urn:ietf:params:xml:ns:vcard-4.0"));
    assert!(written.output.contains("<street>1 Main St</street>"));

    let read = parse_xml(&written.output).unwrap().remove(0).card;
    assert_eq!(read.version, VCardVersion::V4_0);
    assert_eq!(read.formatted_name(), Some("Legacy Card"));
}

#[test_log::test]
fn reads_from_a_stream() {
    let registry = ScribeRegistry::new();
    let reader = XCardReader::from_reader(DOCUMENT.as_bytes(), &registry).unwrap();
    let cards: Vec<_> = reader.collect::<Result<_, _>>().unwrap();
    assert_eq!(cards.len(), 1);
}
