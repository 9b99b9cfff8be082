//! Low-level relocation primitives.
//! - `relocate`: rename, falling back to copy + remove across filesystems.
//! - `copy_into`: copy via a hidden temp sibling, then rename into place.
//! - On Unix, the destination directory is fsynced after the final rename (best-effort).

use std::fs::{self, File};
use std::io;
use std::path::Path;
use tracing::warn;

use crate::platform::{is_cross_device, tmp_sibling_name};

/// Move `src` to `dst`. Caller guarantees `dst` is free.
pub fn relocate(src: &Path, dst: &Path) -> io::Result<()> {
    match fs::rename(src, dst) {
        Ok(()) => {
            fsync_parent(dst);
            Ok(())
        }
        Err(e) if is_cross_device(&e) => {
            warn!(src = %src.display(), dst = %dst.display(), "cross-filesystem move; copying instead");
            copy_into(src, dst)?;
            fs::remove_file(src)
        }
        Err(e) => Err(e),
    }
}

/// Copy `src` to `dst` without ever exposing a partial file at `dst`.
pub fn copy_into(src: &Path, dst: &Path) -> io::Result<()> {
    let tmp = tmp_sibling_name(dst, "copy");
    let result = fs::copy(src, &tmp)
        .and_then(|_| File::open(&tmp)?.sync_all())
        .and_then(|_| fs::rename(&tmp, dst));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    } else {
        fsync_parent(dst);
    }
    result
}

#[cfg(unix)]
fn fsync_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        // Ignore fsync errors to avoid turning a successful rename into a failure.
        let _ = File::open(parent).and_then(|d| d.sync_all());
    }
}

#[cfg(not(unix))]
fn fsync_parent(_path: &Path) {}
