//! Collision-safe placement of a file into a destination directory.
//!
//! The incoming file always takes the requested name. If that name is already
//! taken, the existing occupant is renumbered first (see `resolve_unique_name`),
//! so nothing is ever overwritten.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::classify::Transfer;
use crate::errors::SortError;

use super::atomic::{copy_into, relocate};
use super::helpers::describe_io_error;
use super::resolve::{occupied, resolve_unique_name};

/// One planned transfer: source, destination directory and final file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOperation {
    pub source: PathBuf,
    pub dest_dir: PathBuf,
    pub name: OsString,
    pub transfer: Transfer,
}

/// What a successful operation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placed {
    /// Where the incoming file now lives.
    pub dest: PathBuf,
    /// New name of a previous occupant that was renumbered to make room.
    pub displaced: Option<PathBuf>,
}

impl MoveOperation {
    pub fn new(source: &Path, dest_dir: &Path, name: &OsStr, transfer: Transfer) -> Self {
        Self {
            source: source.to_path_buf(),
            dest_dir: dest_dir.to_path_buf(),
            name: name.to_os_string(),
            transfer,
        }
    }

    pub fn target(&self) -> PathBuf {
        self.dest_dir.join(&self.name)
    }

    /// Run the operation. Consumes it; operations are not retried.
    pub fn execute(self) -> Result<Placed, SortError> {
        let target = self.target();
        let fail = |reason: String| SortError::MoveFailed {
            src: self.source.clone(),
            dest: target.clone(),
            reason,
        };

        // A previous placement in the same pass may already have taken the file.
        if let Err(e) = fs::symlink_metadata(&self.source) {
            return Err(fail(describe_io_error("source no longer present", &self.source, &e)));
        }
        match fs::metadata(&self.dest_dir) {
            Ok(m) if m.is_dir() => {}
            Ok(_) => return Err(fail(format!("'{}' is not a directory", self.dest_dir.display()))),
            Err(e) => return Err(fail(describe_io_error("destination", &self.dest_dir, &e))),
        }

        let displaced = if occupied(&target) {
            let free = resolve_unique_name(&self.dest_dir, &self.name)?;
            let renamed = self.dest_dir.join(free);
            fs::rename(&target, &renamed)
                .map_err(|e| fail(describe_io_error("renumber existing", &target, &e)))?;
            debug!(from = %target.display(), to = %renamed.display(), "renumbered existing file");
            Some(renamed)
        } else {
            None
        };

        let result = match self.transfer {
            Transfer::Move => relocate(&self.source, &target),
            Transfer::Copy => copy_into(&self.source, &target),
        };

        if let Err(e) = result {
            // Put the previous occupant back under its own name.
            if let Some(renamed) = &displaced
                && !occupied(&target)
                && let Err(undo) = fs::rename(renamed, &target)
            {
                warn!(error = %undo, path = %renamed.display(), "could not restore renumbered file");
            }
            return Err(fail(describe_io_error("transfer", &self.source, &e)));
        }

        Ok(Placed {
            dest: target,
            displaced,
        })
    }
}

/// Move `source` into `dest_dir` under `name`, renumbering any existing occupant.
pub fn move_safely(source: &Path, dest_dir: &Path, name: &OsStr) -> Result<Placed, SortError> {
    MoveOperation::new(source, dest_dir, name, Transfer::Move).execute()
}

/// Like `move_safely`, but the source stays where it is.
pub fn copy_safely(source: &Path, dest_dir: &Path, name: &OsStr) -> Result<Placed, SortError> {
    MoveOperation::new(source, dest_dir, name, Transfer::Copy).execute()
}
