//! XML config is parsed and checked without touching user state.

use std::fs;
use std::time::Duration;
use tempfile::tempdir;

use inbox_sorter::{load_config_from_xml_path, AgeBasis, LogLevel, SortError};

#[test]
fn reads_config_xml_and_applies_values() {
    let td = tempdir().expect("create tempdir");
    let cfg_path = td.path().join("config.xml");
    let inbox = td.path().join("inbox");
    let images = td.path().join("images");
    let log_file = td.path().join("inbox_sorter.log");

    let xml = format!(
        r#"
<config>
  <source_dir>{}</source_dir>
  <image_dir>{}</image_dir>
  <log_level>info</log_level>
  <log_file>{}</log_file>
  <age_basis>modified</age_basis>
  <debounce_ms>125</debounce_ms>
  <dry_run>true</dry_run>
</config>
"#,
        inbox.display(),
        images.display(),
        log_file.display()
    );
    fs::write(&cfg_path, xml).expect("write config.xml");

    let cfg = load_config_from_xml_path(&cfg_path).expect("load_config_from_xml_path");
    assert_eq!(cfg.source_dir, inbox);
    assert_eq!(cfg.destinations.image, images);
    assert_eq!(cfg.destinations.image_old(), images.join("old"));
    assert_eq!(cfg.log_file.as_deref(), Some(log_file.as_path()));
    assert_eq!(cfg.log_level, LogLevel::Info);
    assert_eq!(cfg.age_basis, AgeBasis::Modified);
    assert_eq!(cfg.debounce, Duration::from_millis(125));
    assert!(cfg.dry_run);
}

#[test]
fn malformed_xml_is_an_error() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    fs::write(&cfg_path, "<config><source_dir>/x</config>").unwrap();
    assert!(load_config_from_xml_path(&cfg_path).is_err());
}

#[test]
fn missing_directories_are_reported_not_fatal() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    let inbox = td.path().join("inbox");
    fs::create_dir(&inbox).unwrap();
    fs::write(
        &cfg_path,
        format!(
            "<config><source_dir>{}</source_dir><video_dir>{}</video_dir></config>",
            inbox.display(),
            td.path().join("missing-videos").display()
        ),
    )
    .unwrap();

    let cfg = load_config_from_xml_path(&cfg_path).unwrap();
    let problems = cfg.check_directories();
    assert!(problems.iter().any(|p| matches!(
        p,
        SortError::InvalidDirectory { label: "video_dir", .. }
    )));
    assert!(cfg.validate().is_ok());
}

#[test]
fn destination_equal_to_source_is_rejected() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    let inbox = td.path().join("inbox");
    fs::create_dir(&inbox).unwrap();
    fs::write(
        &cfg_path,
        format!(
            "<config><source_dir>{0}</source_dir><document_dir>{0}</document_dir></config>",
            inbox.display()
        ),
    )
    .unwrap();

    let cfg = load_config_from_xml_path(&cfg_path).unwrap();
    let err = cfg.validate().unwrap_err();
    assert_eq!(err.code(), 40);
}
