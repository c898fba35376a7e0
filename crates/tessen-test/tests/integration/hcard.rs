//! hCard end to end.

use tessen_rfc::rfc::vcard::core::{VCardVersion, names};
use tessen_rfc::rfc::vcard::{HCardReader, ScribeRegistry, parse_html};

const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Team</title>
</head>
<body>
  <ul>
    <li class="vcard">
      <img class="photo" src="https://example.com/grace.jpg" alt="Grace">
      <span class="fn">Grace Hopper</span>
      <span class="org">US Navy</span>
      <span class="title">Rear Admiral</span>
      <a class="email" href="mailto:grace@example.com">email</a>
      <span class="tel"><span class="type">cell</span> <span class="value">555-0142</span></span>
      <abbr class="bday" title="1906-12-09">December 9</abbr>
      <span class="tz">-05:00</span>
      <span class="note">First compiler&nbsp;author</span>
    </li>
    <li class="vcard">
      <span class="fn">Alan Kay</span>
      <span class="geo"><span class="latitude">37.38</span> <span class="longitude">-122.08</span></span>
      <span class="category">smalltalk</span> <span class="category">objects</span>
    </li>
  </ul>
</body>
</html>"#;

#[test_log::test]
fn reads_every_card_on_the_page() {
    let parsed = parse_html(PAGE).expect("page should tokenize");
    assert_eq!(parsed.len(), 2);
    assert!(parsed.iter().all(|p| p.card.version == VCardVersion::V3_0));

    let grace = &parsed[0].card;
    assert_eq!(grace.formatted_name(), Some("Grace Hopper"));
    assert_eq!(grace.emails(), vec!["grace@example.com"]);
    assert!(grace.get_property(names::TEL).unwrap().has_type("cell"));
    assert!(grace.get_property(names::PHOTO).is_some());
    assert!(grace.get_property(names::BDAY).is_some());
    assert!(grace.get_property(names::TZ).is_some());
    assert_eq!(
        grace.get_property(names::NOTE).unwrap().as_text(),
        Some("First compiler author")
    );
    assert_eq!(grace.organization().unwrap().name, "US Navy");

    let alan = &parsed[1].card;
    assert!(alan.get_property(names::GEO).is_some());
    assert_eq!(alan.get_properties(names::CATEGORIES).len(), 2);
}

#[test_log::test]
fn reader_is_lazy_per_card() {
    let registry = ScribeRegistry::new();
    let mut reader = HCardReader::new(PAGE, &registry).unwrap();
    let first = reader.next().unwrap().unwrap();
    assert_eq!(first.card.formatted_name(), Some("Grace Hopper"));
    assert!(reader.next().is_some());
    assert!(reader.next().is_none());
}
