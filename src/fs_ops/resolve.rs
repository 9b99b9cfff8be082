//! Collision-free name resolution.
//!
//! Policy: keep the requested name when it is free, otherwise append "(k)"
//! before the extension for the smallest free k >= 1.
//!
//! Examples:
//! - "movie.mkv" -> "movie(1).mkv", "movie(2).mkv", ...
//! - ".env" -> ".env(1)"
//! - "archive.tar.gz" -> "archive.tar(1).gz"

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::Path;
use tracing::trace;

use crate::errors::SortError;

/// Upper bound on numbered candidates probed before giving up.
pub const MAX_UNIQUE_ATTEMPTS: u32 = 10_000;

/// Return `candidate` if free under `dir`, else the first free `stem(k)ext`.
///
/// Read-only: only probes the destination directory.
pub fn resolve_unique_name(dir: &Path, candidate: &OsStr) -> Result<OsString, SortError> {
    resolve_unique_name_within(dir, candidate, MAX_UNIQUE_ATTEMPTS)
}

pub(crate) fn resolve_unique_name_within(
    dir: &Path,
    candidate: &OsStr,
    max_attempts: u32,
) -> Result<OsString, SortError> {
    if !occupied(&dir.join(candidate)) {
        return Ok(candidate.to_os_string());
    }

    let base = Path::new(candidate);
    let stem: OsString = base
        .file_stem()
        .map(OsStr::to_os_string)
        .unwrap_or_else(|| candidate.to_os_string());
    let ext: Option<&OsStr> = base.extension();

    for k in 1..=max_attempts {
        let name = numbered_name(&stem, ext, k);
        if !occupied(&dir.join(&name)) {
            if k > 3 {
                trace!(dir = %dir.display(), name = ?name, attempts = k, "resolved after several collisions");
            }
            return Ok(name);
        }
    }

    Err(SortError::NameExhaustion {
        dir: dir.to_path_buf(),
        name: candidate.to_string_lossy().into_owned(),
        attempts: max_attempts,
    })
}

/// Build "stem(k).ext", preserving non-UTF-8 bytes.
fn numbered_name(stem: &OsStr, ext: Option<&OsStr>, k: u32) -> OsString {
    let mut name = stem.to_os_string();
    name.push(format!("({k})"));
    if let Some(e) = ext {
        name.push(".");
        name.push(e);
    }
    name
}

/// Occupied means any entry at all, dangling symlinks included.
pub(crate) fn occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn free_name_is_returned_unchanged() {
        let td = tempdir().unwrap();
        let n = resolve_unique_name(td.path(), OsStr::new("a.txt")).unwrap();
        assert_eq!(n, OsString::from("a.txt"));
    }

    #[test]
    fn first_collision_gets_one() {
        let td = tempdir().unwrap();
        fs::write(td.path().join("a.txt"), b"x").unwrap();
        let n = resolve_unique_name(td.path(), OsStr::new("a.txt")).unwrap();
        assert_eq!(n, OsString::from("a(1).txt"));
    }

    #[test]
    fn smallest_free_index_wins() {
        let td = tempdir().unwrap();
        for n in ["a.txt", "a(1).txt", "a(3).txt"] {
            fs::write(td.path().join(n), b"x").unwrap();
        }
        let n = resolve_unique_name(td.path(), OsStr::new("a.txt")).unwrap();
        assert_eq!(n, OsString::from("a(2).txt"));
    }

    #[test]
    fn dotfile_and_multi_extension() {
        let td = tempdir().unwrap();
        fs::write(td.path().join(".env"), b"x").unwrap();
        fs::write(td.path().join("archive.tar.gz"), b"x").unwrap();
        assert_eq!(
            resolve_unique_name(td.path(), OsStr::new(".env")).unwrap(),
            OsString::from(".env(1)")
        );
        assert_eq!(
            resolve_unique_name(td.path(), OsStr::new("archive.tar.gz")).unwrap(),
            OsString::from("archive.tar(1).gz")
        );
    }

    #[test]
    fn directories_count_as_collisions() {
        let td = tempdir().unwrap();
        fs::create_dir(td.path().join("clip.mp4")).unwrap();
        let n = resolve_unique_name(td.path(), OsStr::new("clip.mp4")).unwrap();
        assert_eq!(n, OsString::from("clip(1).mp4"));
    }

    #[test]
    fn dense_run_exhausts_bounded_search() {
        let td = tempdir().unwrap();
        fs::write(td.path().join("x.bin"), b"x").unwrap();
        for k in 1..=5 {
            fs::write(td.path().join(format!("x({k}).bin")), b"x").unwrap();
        }
        let err = resolve_unique_name_within(td.path(), OsStr::new("x.bin"), 5).unwrap_err();
        assert!(matches!(err, SortError::NameExhaustion { attempts: 5, .. }));
        // one more slot is enough
        let ok = resolve_unique_name_within(td.path(), OsStr::new("x.bin"), 6).unwrap();
        assert_eq!(ok, OsString::from("x(6).bin"));
    }
}
