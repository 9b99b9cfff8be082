//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - Destinations holds the fixed category -> directory layout.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use super::paths::home_or_current;
use super::DEFAULT_DEBOUNCE;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Which timestamp stands in for a file's "creation time" in the image age rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgeBasis {
    /// Birth time where the platform records one, else modification time.
    #[default]
    Created,
    /// Always the modification time.
    Modified,
}

impl FromStr for AgeBasis {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "created" | "birth" | "ctime" => Ok(AgeBasis::Created),
            "modified" | "mtime" => Ok(AgeBasis::Modified),
            _ => Err(format!("invalid age basis: '{s}' (expected created|modified)")),
        }
    }
}

/// Destination directories per category. Image sub-directories hang off `image`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destinations {
    pub sound: PathBuf,
    pub music: PathBuf,
    pub video: PathBuf,
    pub image: PathBuf,
    pub document: PathBuf,
}

impl Destinations {
    /// Layout rooted at `root`, mirroring the desktop folders the tool was built around.
    pub fn under(root: &Path) -> Self {
        let desktop = root.join("Desktop");
        Self {
            sound: desktop.join("Sound"),
            music: desktop.join("Sound").join("music"),
            video: desktop.join("Video downloads"),
            image: desktop.join("Image downloads"),
            document: desktop.join("Documents downloads"),
        }
    }

    pub fn image_old(&self) -> PathBuf {
        self.image.join("old")
    }

    pub fn image_small(&self) -> PathBuf {
        self.image.join("small")
    }

    pub fn image_large(&self) -> PathBuf {
        self.image.join("large")
    }

    /// Every destination directory with its config label, sub-directories included.
    pub fn labeled(&self) -> Vec<(&'static str, PathBuf)> {
        vec![
            ("sound_dir", self.sound.clone()),
            ("music_dir", self.music.clone()),
            ("video_dir", self.video.clone()),
            ("image_dir", self.image.clone()),
            ("image_dir/old", self.image_old()),
            ("image_dir/small", self.image_small()),
            ("image_dir/large", self.image_large()),
            ("document_dir", self.document.clone()),
        ]
    }
}

impl Default for Destinations {
    fn default() -> Self {
        Self::under(&home_or_current())
    }
}

/// Runtime configuration, built once at startup and passed by reference.
#[derive(Debug, Clone)]
pub struct Config {
    /// Inbox directory being watched
    pub source_dir: PathBuf,
    /// Where each category is placed
    pub destinations: Destinations,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// If true, log placements but do not modify the filesystem
    pub dry_run: bool,
    /// Timestamp used by the image age rule
    pub age_basis: AgeBasis,
    /// Quiet period used to coalesce bursts of change notifications
    pub debounce: Duration,
}

impl Default for Config {
    fn default() -> Self {
        let home = home_or_current();
        Self {
            source_dir: home.join("Downloads"),
            destinations: Destinations::under(&home),
            log_level: LogLevel::Normal,
            log_file: None,
            dry_run: false,
            age_basis: AgeBasis::Created,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl Config {
    /// Construct a Config with explicit directories; other fields use defaults.
    pub fn new(source_dir: impl Into<PathBuf>, destinations: Destinations) -> Self {
        Self {
            source_dir: source_dir.into(),
            destinations,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_parse_aliases() {
        assert_eq!(LogLevel::parse("ERROR"), Some(LogLevel::Quiet));
        assert_eq!(LogLevel::parse("verbose"), Some(LogLevel::Info));
        assert_eq!(LogLevel::parse("trace"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("loud"), None);
        assert!("bogus".parse::<LogLevel>().is_err());
    }

    #[test]
    fn age_basis_parse() {
        assert_eq!(" Modified ".parse::<AgeBasis>(), Ok(AgeBasis::Modified));
        assert_eq!("created".parse::<AgeBasis>(), Ok(AgeBasis::Created));
        assert!("yesterday".parse::<AgeBasis>().is_err());
    }

    #[test]
    fn image_subdirs_hang_off_base() {
        let d = Destinations::under(Path::new("/home/u"));
        assert_eq!(d.image_old(), d.image.join("old"));
        assert_eq!(d.image_small(), d.image.join("small"));
        assert_eq!(d.image_large(), d.image.join("large"));
        assert_eq!(d.labeled().len(), 8);
        assert!(d.music.starts_with(&d.sound));
    }
}
