//! Platform-specific helpers.
//! Hides OS differences (Unix/Windows) behind a uniform API so the config,
//! logging and move code can stay platform-agnostic.

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{
    is_cross_device, open_log_file_secure_append, set_dir_mode_0700, write_config_secure_new_0600,
};

#[cfg(not(unix))]
pub use windows::{
    is_cross_device, open_log_file_secure_append, set_dir_mode_0700, write_config_secure_new_0600,
};

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Hidden sibling name used for temp-then-rename writes.
/// Pattern: .inbox_sorter.<tag>.<pid>.<nanos>.<seq>
pub(crate) fn tmp_sibling_name(target: &Path, tag: &str) -> PathBuf {
    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    let name = format!(".inbox_sorter.{tag}.{pid}.{nanos}.{seq}");
    target.parent().unwrap_or_else(|| Path::new(".")).join(name)
}
