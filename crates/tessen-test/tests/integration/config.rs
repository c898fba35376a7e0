//! Codec options built from configuration.

use tessen_rfc::rfc::vcard::core::VCardVersion;
use tessen_rfc::rfc::vcard::{ReadOptions, WriteOptions};
use tessen_test::config::{ReaderConfig, WriterConfig};
use tessen_test::constants::PRODID;

#[test_log::test]
fn defaults_load_without_sources() {
    let (read, write) = tessen_test::load_options().expect("defaults should load");
    assert_eq!(read.default_version, VCardVersion::V4_0);
    assert_eq!(write, WriteOptions::default());
}

#[test_log::test]
fn writer_config_sets_target_version() {
    let config = WriterConfig {
        target_version: Some("2.1".to_string()),
        strict: true,
        ..WriterConfig::default()
    };
    let options = WriteOptions::try_from(&config).expect("valid config");
    assert_eq!(options.version, Some(VCardVersion::V2_1));
    assert!(options.strict);
}

#[test_log::test]
fn reader_config_rejects_unknown_versions() {
    let config = ReaderConfig {
        default_version: "9.9".to_string(),
    };
    assert!(ReadOptions::try_from(&config).is_err());
}

#[test_log::test]
fn prodid_names_the_product() {
    assert!(PRODID.starts_with("-//tessen//tessen "));
    assert!(PRODID.ends_with("//EN"));
}
