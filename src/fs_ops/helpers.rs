//! I/O error helpers.
//!
//! Turns a raw io::Error into a one-line reason with an actionable hint,
//! suitable for the `reason` field of `SortError::MoveFailed`.
//!
//! Usage:
//!   fs::rename(a, b).map_err(|e| describe_io_error("rename", a, &e))?;

use std::io;
use std::path::Path;

/// Format "<op> '<path>': <error>; <hint> [os code: N]".
pub fn describe_io_error(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);

    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            match code {
                libc::EACCES | libc::EPERM => {
                    msg.push_str("; permission denied; check ownership and write permissions.");
                }
                libc::EXDEV => {
                    msg.push_str("; cross-filesystem; atomic rename not possible.");
                }
                libc::EBUSY => {
                    msg.push_str("; resource busy; ensure no other process is writing.");
                }
                libc::ENOENT => {
                    msg.push_str("; path not found; it may have been moved or deleted.");
                }
                libc::ENOTDIR => {
                    msg.push_str("; a path component is not a directory.");
                }
                libc::ENOSPC => {
                    msg.push_str("; insufficient space on device.");
                }
                libc::EROFS => {
                    msg.push_str("; read-only filesystem; cannot write here.");
                }
                libc::ENAMETOOLONG => {
                    msg.push_str("; filename or path too long; shorten path segments.");
                }
                _ => {}
            }
        }
        #[cfg(windows)]
        {
            match code {
                5 => msg.push_str("; access denied; check permissions."),
                17 => msg.push_str("; not same device; cross-filesystem move."),
                32 => msg.push_str("; sharing violation; file is in use."),
                2 | 3 => msg.push_str("; path not found; it may have been moved or deleted."),
                112 => msg.push_str("; insufficient disk space."),
                206 => msg.push_str("; filename or path too long (MAX_PATH exceeded)."),
                _ => {}
            }
        }
        msg.push_str(&format!(" [os code: {}]", code));
    } else {
        match e.kind() {
            io::ErrorKind::PermissionDenied => {
                msg.push_str("; permission denied; check ownership and write permissions.");
            }
            io::ErrorKind::NotFound => {
                msg.push_str("; path not found; it may have been moved or deleted.");
            }
            io::ErrorKind::AlreadyExists => {
                msg.push_str("; already exists.");
            }
            _ => {}
        }
    }

    msg
}
