//! CLI definition and parsing.
//!
//! Notes:
//! - Directory flags override the XML config, which overrides built-in defaults.
//! - --debug is a shorthand for --log-level debug.

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{AgeBasis, Config, LogLevel};

/// Watch an inbox directory and sort arriving files by type, size and age.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Sort files arriving in an inbox directory")]
pub struct Args {
    /// Inbox directory to watch.
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub source_dir: Option<PathBuf>,

    /// Destination for sound effects (small audio or names containing SFX).
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub sound_dir: Option<PathBuf>,

    /// Destination for other audio.
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub music_dir: Option<PathBuf>,

    /// Destination for video.
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub video_dir: Option<PathBuf>,

    /// Base destination for images (expects old/, small/ and large/ inside).
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub image_dir: Option<PathBuf>,

    /// Destination for documents.
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub document_dir: Option<PathBuf>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(short = 'd', long, help = "Enable debug logging (shorthand for --log-level debug)")]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Timestamp used by the 2-day image rule: created or modified.
    #[arg(long)]
    pub age_basis: Option<String>,

    /// Print the config file location and exit.
    #[arg(long, help = "Print the config file location used by inbox_sorter and exit")]
    pub print_config: bool,

    /// Log what would be placed where, without touching any file.
    #[arg(long)]
    pub dry_run: bool,

    /// Sort the inbox once and exit instead of watching.
    #[arg(long)]
    pub once: bool,

    /// Emit logs in structured JSON.
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config value).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) -> Result<(), String> {
        if let Some(p) = &self.source_dir {
            cfg.source_dir = p.clone();
        }
        let d = &mut cfg.destinations;
        for (flag, slot) in [
            (&self.sound_dir, &mut d.sound),
            (&self.music_dir, &mut d.music),
            (&self.video_dir, &mut d.video),
            (&self.image_dir, &mut d.image),
            (&self.document_dir, &mut d.document),
        ] {
            if let Some(p) = flag {
                *slot = p.clone();
            }
        }
        if let Some(s) = &self.log_level
            && LogLevel::parse(s).is_none()
        {
            return Err(format!("invalid log level: '{s}'"));
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(s) = &self.age_basis {
            cfg.age_basis = s.parse::<AgeBasis>()?;
        }
        if self.dry_run {
            cfg.dry_run = true;
        }
        Ok(())
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn overrides_replace_only_given_values() {
        let args = Args::parse_from([
            "inbox_sorter",
            "--source-dir",
            "/in",
            "--video-dir",
            "/v",
            "--dry-run",
            "--age-basis",
            "modified",
        ]);
        let mut cfg = Config::new("/orig", crate::config::Destinations::under(Path::new("/h")));
        let music_before = cfg.destinations.music.clone();
        args.apply_overrides(&mut cfg).unwrap();
        assert_eq!(cfg.source_dir, PathBuf::from("/in"));
        assert_eq!(cfg.destinations.video, PathBuf::from("/v"));
        assert_eq!(cfg.destinations.music, music_before);
        assert!(cfg.dry_run);
        assert_eq!(cfg.age_basis, AgeBasis::Modified);
    }

    #[test]
    fn debug_wins_over_log_level() {
        let args = Args::parse_from(["inbox_sorter", "--log-level", "quiet", "-d"]);
        assert_eq!(args.effective_log_level(), Some(LogLevel::Debug));
    }

    #[test]
    fn bad_values_are_reported() {
        let mut cfg = Config::default();
        let args = Args::parse_from(["inbox_sorter", "--log-level", "shouty"]);
        assert!(args.apply_overrides(&mut cfg).is_err());
        let args = Args::parse_from(["inbox_sorter", "--age-basis", "yesterday"]);
        assert!(args.apply_overrides(&mut cfg).is_err());
    }
}
