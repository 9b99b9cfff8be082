//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Creates a commented template at the default location on first run.
//!
//! Notes:
//! - This module only reads/writes the config file; directory checks happen in `validate`.
//! - Unknown XML fields are rejected so typos surface instead of silently using defaults.

use anyhow::{anyhow, bail, Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use super::paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
use super::types::{AgeBasis, Config, Destinations, LogLevel};
use super::{CONFIG_ENV, DEFAULT_DEBOUNCE};

use crate::platform::{set_dir_mode_0700, write_config_secure_new_0600};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    source_dir: Option<String>,
    sound_dir: Option<String>,
    music_dir: Option<String>,
    video_dir: Option<String>,
    image_dir: Option<String>,
    document_dir: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
    age_basis: Option<String>,
    dry_run: Option<bool>,
    #[serde(default, deserialize_with = "de_u64_trimmed_opt")]
    debounce_ms: Option<u64>,
}

/// Outcome of looking for the config file at startup.
#[derive(Debug)]
pub enum LoadResult {
    /// Parsed config and the file it came from.
    Loaded(Config, PathBuf),
    /// No config existed at the default location; a template was written there.
    CreatedTemplate(PathBuf),
}

// Custom deserializer that trims surrounding whitespace for optional u64
fn de_u64_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

fn non_empty_path(s: Option<&str>) -> Option<PathBuf> {
    s.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(PathBuf::from)
}

// Map XmlConfig -> Config; absent fields keep their defaults.
fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();
    let Destinations {
        sound,
        music,
        video,
        image,
        document,
    } = cfg.destinations.clone();

    if let Some(p) = non_empty_path(parsed.source_dir.as_deref()) {
        cfg.source_dir = p;
    }
    cfg.destinations = Destinations {
        sound: non_empty_path(parsed.sound_dir.as_deref()).unwrap_or(sound),
        music: non_empty_path(parsed.music_dir.as_deref()).unwrap_or(music),
        video: non_empty_path(parsed.video_dir.as_deref()).unwrap_or(video),
        image: non_empty_path(parsed.image_dir.as_deref()).unwrap_or(image),
        document: non_empty_path(parsed.document_dir.as_deref()).unwrap_or(document),
    };
    cfg.log_file = non_empty_path(parsed.log_file.as_deref());

    if let Some(s) = parsed.log_level.as_deref() {
        cfg.log_level = s.trim().parse::<LogLevel>().map_err(|e| anyhow!(e))?;
    }
    if let Some(s) = parsed.age_basis.as_deref() {
        cfg.age_basis = s.parse::<AgeBasis>().map_err(|e| anyhow!(e))?;
    }
    cfg.dry_run = parsed.dry_run.unwrap_or(false);
    cfg.debounce = parsed
        .debounce_ms
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_DEBOUNCE);

    Ok(cfg)
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("invalid value in '{}'", path.display()))
}

/// Locate and load the config file.
///
/// - `$INBOX_SORTER_CONFIG` set: the file must exist.
/// - Otherwise: the default path is used; if missing, a template is written there.
pub fn load_or_init() -> Result<LoadResult> {
    let env_set = env::var_os(CONFIG_ENV).is_some();
    let path = default_config_path()?;

    if !path.exists() {
        if env_set {
            bail!(
                "{CONFIG_ENV} points to '{}', which does not exist",
                path.display()
            );
        }
        create_template_config(&path)?;
        return Ok(LoadResult::CreatedTemplate(path));
    }

    let cfg = load_config_from_xml_path(&path)?;
    Ok(LoadResult::Loaded(cfg, path))
}

/// Create the default template config file and parent directory.
/// Refuses to write through a symlinked ancestor.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
        let _ = set_dir_mode_0700(parent);
    }

    let defaults = Config::default();
    let d = &defaults.destinations;
    let suggested_log = default_log_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "/path/to/inbox_sorter.log".into());

    let content = format!(
        "<!--\n  inbox_sorter configuration (XML)\n\n  source_dir     -> inbox directory to watch\n  sound_dir      -> audio under 10 MB or with SFX in the name\n  music_dir      -> other audio\n  video_dir      -> video files\n  image_dir      -> images; old/, small/ and large/ must exist beneath it\n  document_dir   -> documents\n  log_level      -> quiet | normal | info | debug\n  log_file       -> optional log file (stdout is always used)\n  age_basis      -> created | modified (timestamp used for the 2-day image rule)\n  debounce_ms    -> quiet period used to batch change notifications\n  dry_run        -> true to only log what would be moved\n\n  CLI flags override XML values.\n-->\n<config>\n  <source_dir>{}</source_dir>\n  <sound_dir>{}</sound_dir>\n  <music_dir>{}</music_dir>\n  <video_dir>{}</video_dir>\n  <image_dir>{}</image_dir>\n  <document_dir>{}</document_dir>\n  <log_level>normal</log_level>\n  <!-- <log_file>{}</log_file> -->\n  <age_basis>created</age_basis>\n  <debounce_ms>{}</debounce_ms>\n  <dry_run>false</dry_run>\n</config>\n",
        defaults.source_dir.display(),
        d.sound.display(),
        d.music.display(),
        d.video.display(),
        d.image.display(),
        d.document.display(),
        suggested_log,
        DEFAULT_DEBOUNCE.as_millis(),
    );

    write_config_secure_new_0600(path, content.as_bytes())?;
    info!("Created template config at {}", path.display());
    Ok(())
}
