//! Startup validation.
//! Missing directories only degrade the run (warnings); a destination that
//! resolves to the inbox itself is rejected outright.

use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::errors::SortError;

use super::types::Config;

impl Config {
    /// Every configured directory that is missing or not a directory.
    /// Each problem is logged once as a warning; the caller decides whether to continue.
    pub fn check_directories(&self) -> Vec<SortError> {
        let mut problems = Vec::new();
        let all = std::iter::once(("source_dir", self.source_dir.clone()))
            .chain(self.destinations.labeled());
        for (label, path) in all {
            if path.is_dir() {
                debug!(label, path = %path.display(), "directory ok");
                continue;
            }
            let err = SortError::InvalidDirectory { label, path };
            warn!(code = err.code(), kind = err.kind(), "{err}");
            problems.push(err);
        }
        problems
    }

    /// Reject layouts that would feed the watcher its own output.
    pub fn validate(&self) -> Result<(), SortError> {
        let src_real = real_path(&self.source_dir);
        for (label, path) in self.destinations.labeled() {
            if real_path(&path) == src_real {
                return Err(SortError::Config(format!(
                    "{label} '{}' is the source directory",
                    path.display()
                )));
            }
        }
        info!(
            source = %self.source_dir.display(),
            dry_run = self.dry_run,
            log_file = %self
                .log_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<none>".into()),
            "Config validated"
        );
        Ok(())
    }
}

fn real_path(p: &Path) -> std::path::PathBuf {
    fs::canonicalize(p).unwrap_or_else(|_| p.to_path_buf())
}
