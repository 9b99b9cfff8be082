//! Drive the built binary end to end.

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::tempdir;

use inbox_sorter::Destinations;

fn bin() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("inbox_sorter"))
}

fn write_config(root: &Path, extra: &str) -> std::path::PathBuf {
    let inbox = root.join("Downloads");
    fs::create_dir_all(&inbox).unwrap();
    let d = Destinations::under(root);
    for (_, dir) in d.labeled() {
        fs::create_dir_all(dir).unwrap();
    }
    let xml = format!(
        "<config>\n  <source_dir>{}</source_dir>\n  <sound_dir>{}</sound_dir>\n  <music_dir>{}</music_dir>\n  <video_dir>{}</video_dir>\n  <image_dir>{}</image_dir>\n  <document_dir>{}</document_dir>\n{extra}</config>\n",
        inbox.display(),
        d.sound.display(),
        d.music.display(),
        d.video.display(),
        d.image.display(),
        d.document.display(),
    );
    let path = root.join("config.xml");
    fs::write(&path, xml).unwrap();
    path
}

#[test]
fn print_config_succeeds() {
    let out = bin().arg("--print-config").output().expect("spawn binary");
    assert!(out.status.success(), "binary should succeed with --print-config");
}

#[test]
fn print_config_reports_env_override() {
    let td = tempdir().unwrap();
    let cfg = td.path().join("custom.xml");
    let out = bin()
        .env("INBOX_SORTER_CONFIG", &cfg)
        .arg("--print-config")
        .output()
        .expect("spawn binary");
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("custom.xml"), "stdout was: {stdout}");
}

#[test]
fn once_sorts_the_inbox_and_exits() {
    let td = tempdir().unwrap();
    let cfg = write_config(td.path(), "");
    let inbox = td.path().join("Downloads");
    fs::write(inbox.join("paper.pdf"), b"%PDF").unwrap();
    fs::write(inbox.join("notes.txt"), b"keep").unwrap();

    let out = bin()
        .env("INBOX_SORTER_CONFIG", &cfg)
        .arg("--once")
        .output()
        .expect("spawn binary");
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let d = Destinations::under(td.path());
    assert!(d.document.join("paper.pdf").is_file());
    assert!(inbox.join("notes.txt").is_file());
}

#[test]
fn dry_run_flag_leaves_files_alone() {
    let td = tempdir().unwrap();
    let cfg = write_config(td.path(), "");
    let inbox = td.path().join("Downloads");
    fs::write(inbox.join("clip.mp4"), b"v").unwrap();

    let out = bin()
        .env("INBOX_SORTER_CONFIG", &cfg)
        .args(["--once", "--dry-run"])
        .output()
        .expect("spawn binary");
    assert!(out.status.success());
    assert!(inbox.join("clip.mp4").is_file());
    assert!(!Destinations::under(td.path()).video.join("clip.mp4").exists());
}

#[test]
fn cli_directory_flag_overrides_config() {
    let td = tempdir().unwrap();
    let cfg = write_config(td.path(), "");
    let inbox = td.path().join("Downloads");
    let other = td.path().join("elsewhere");
    fs::create_dir(&other).unwrap();
    fs::write(inbox.join("clip.mp4"), b"v").unwrap();

    let out = bin()
        .env("INBOX_SORTER_CONFIG", &cfg)
        .arg("--once")
        .arg("--video-dir")
        .arg(&other)
        .output()
        .expect("spawn binary");
    assert!(out.status.success());
    assert!(other.join("clip.mp4").is_file());
}

#[test]
fn destination_equal_to_source_fails() {
    let td = tempdir().unwrap();
    let cfg = write_config(td.path(), "");
    let inbox = td.path().join("Downloads");

    let out = bin()
        .env("INBOX_SORTER_CONFIG", &cfg)
        .arg("--once")
        .arg("--music-dir")
        .arg(&inbox)
        .output()
        .expect("spawn binary");
    assert!(!out.status.success());
}

#[test]
fn missing_explicit_config_fails() {
    let td = tempdir().unwrap();
    let out = bin()
        .env("INBOX_SORTER_CONFIG", td.path().join("absent.xml"))
        .arg("--once")
        .output()
        .expect("spawn binary");
    assert!(!out.status.success());
}

#[test]
fn invalid_log_level_fails() {
    let td = tempdir().unwrap();
    let cfg = write_config(td.path(), "");
    let out = bin()
        .env("INBOX_SORTER_CONFIG", &cfg)
        .args(["--once", "--log-level", "loud"])
        .output()
        .expect("spawn binary");
    assert!(!out.status.success());
}

#[cfg(target_os = "linux")]
#[test]
fn first_run_writes_a_template() {
    let td = tempdir().unwrap();
    let xdg = td.path().join("xdg");
    let out = bin()
        .env_remove("INBOX_SORTER_CONFIG")
        .env("HOME", td.path())
        .env("XDG_CONFIG_HOME", &xdg)
        .arg("--once")
        .output()
        .expect("spawn binary");
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let template = xdg.join("inbox_sorter").join("config.xml");
    assert!(template.is_file());
    let body = fs::read_to_string(template).unwrap();
    assert!(body.contains("<source_dir>"));
}
