//! Default path helpers and symlink checks.
//! Determines OS-appropriate config/log paths and detects symlinked ancestors for safety.

use anyhow::{anyhow, Result};
use dirs::{config_dir, data_dir, home_dir};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::CONFIG_ENV;

/// Config file location: `$INBOX_SORTER_CONFIG` if set, else the OS config dir.
///
/// A relative env value is resolved against the current directory; a value naming
/// an existing directory gets `config.xml` appended.
pub fn default_config_path() -> Result<PathBuf> {
    if let Some(raw) = env::var_os(CONFIG_ENV) {
        let mut p = PathBuf::from(raw);
        if p.is_relative() {
            p = env::current_dir()?.join(p);
        }
        if p.is_dir() {
            p.push("config.xml");
        }
        return Ok(p);
    }
    let base = config_dir()
        .or_else(|| home_dir().map(|h| h.join(".config")))
        .ok_or_else(|| anyhow!("cannot determine a config directory (no HOME)"))?;
    Ok(base.join("inbox_sorter").join("config.xml"))
}

/// OS-appropriate default log file path (data dir). Only suggested in the template.
pub fn default_log_path() -> Result<PathBuf> {
    let base = data_dir()
        .or_else(|| home_dir().map(|h| h.join(".local").join("share")))
        .ok_or_else(|| anyhow!("cannot determine a data directory (no HOME)"))?;
    Ok(base.join("inbox_sorter").join("inbox_sorter.log"))
}

/// Home directory, or the current directory when HOME is unknown.
pub(crate) fn home_or_current() -> PathBuf {
    home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    let mut p = path.parent();
    while let Some(anc) = p {
        if anc.exists() {
            let meta = fs::symlink_metadata(anc)?;
            if meta.file_type().is_symlink() {
                return Ok(true);
            }
        }
        p = anc.parent();
    }
    Ok(false)
}
