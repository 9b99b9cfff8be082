//! Typed error definitions for inbox_sorter.
//! Provides a small set of well-known failure modes for better logs and tests.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SortError {
    #[error("{label} is not a valid directory: {}", path.display())]
    InvalidDirectory { label: &'static str, path: PathBuf },

    #[error("No free name for '{name}' in {} after {attempts} attempts", dir.display())]
    NameExhaustion {
        dir: PathBuf,
        name: String,
        attempts: u32,
    },

    #[error("Move failed {} -> {}: {reason}", src.display(), dest.display())]
    MoveFailed {
        src: PathBuf,
        dest: PathBuf,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Cannot watch source directory: {0}")]
    Watch(String),
}

impl SortError {
    /// Stable numeric code, emitted as a structured log field.
    pub fn code(&self) -> u16 {
        match self {
            SortError::InvalidDirectory { .. } => 10,
            SortError::NameExhaustion { .. } => 20,
            SortError::MoveFailed { .. } => 30,
            SortError::Config(_) => 40,
            SortError::Watch(_) => 50,
        }
    }

    /// Short machine-friendly kind used alongside `code` in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SortError::InvalidDirectory { .. } => "invalid_directory",
            SortError::NameExhaustion { .. } => "name_exhaustion",
            SortError::MoveFailed { .. } => "move_failed",
            SortError::Config(_) => "config",
            SortError::Watch(_) => "watch",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let errs = [
            SortError::InvalidDirectory {
                label: "source_dir",
                path: PathBuf::from("/nope"),
            },
            SortError::NameExhaustion {
                dir: PathBuf::from("/d"),
                name: "a.txt".into(),
                attempts: 3,
            },
            SortError::MoveFailed {
                src: PathBuf::from("/a"),
                dest: PathBuf::from("/b"),
                reason: "gone".into(),
            },
            SortError::Config("x".into()),
            SortError::Watch("y".into()),
        ];
        let mut codes: Vec<u16> = errs.iter().map(SortError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errs.len());
    }

    #[test]
    fn invalid_directory_message_names_label() {
        let e = SortError::InvalidDirectory {
            label: "video_dir",
            path: PathBuf::from("/missing/video"),
        };
        let msg = e.to_string();
        assert!(msg.contains("video_dir"));
        assert!(msg.contains("/missing/video"));
    }
}
