use serial_test::serial;
use std::fs;
use tempfile::tempdir;

use inbox_sorter::config::{load_or_init, LoadResult};
use inbox_sorter::default_config_path;

#[test]
#[serial]
fn env_override_names_the_config_file() {
    let td = tempdir().unwrap();
    let base = fs::canonicalize(td.path()).unwrap();
    let cfg = base.join("custom_config.xml");
    let inbox = base.join("incoming");
    fs::create_dir_all(&inbox).unwrap();
    fs::write(
        &cfg,
        format!("<config><source_dir>{}</source_dir></config>", inbox.display()),
    )
    .unwrap();

    unsafe {
        std::env::set_var("INBOX_SORTER_CONFIG", &cfg);
    }

    let resolved = default_config_path().expect("default_config_path");
    assert_eq!(resolved, cfg);
    match load_or_init().expect("load_or_init") {
        LoadResult::Loaded(c, p) => {
            assert_eq!(p, cfg);
            assert_eq!(c.source_dir, inbox);
        }
        LoadResult::CreatedTemplate(p) => panic!("unexpected template at {}", p.display()),
    }

    unsafe {
        std::env::remove_var("INBOX_SORTER_CONFIG");
    }
}

#[test]
#[serial]
fn env_override_directory_gets_config_xml() {
    let td = tempdir().unwrap();
    unsafe {
        std::env::set_var("INBOX_SORTER_CONFIG", td.path());
    }
    let resolved = default_config_path().expect("default_config_path");
    assert_eq!(resolved, td.path().join("config.xml"));
    assert!(load_or_init().is_err(), "explicit config must exist");
    unsafe {
        std::env::remove_var("INBOX_SORTER_CONFIG");
    }
}
