//! Fixed extension tables and routing thresholds.
//!
//! Rules are compiled in; only the destination directories are configurable.

use std::fmt;
use std::time::Duration;

/// Audio below this size (bytes) is treated as a sound effect.
pub const SOUND_EFFECT_MAX_SIZE: u64 = 10_000_000;
/// Audio whose file name contains this marker is a sound effect regardless of size.
pub const SOUND_EFFECT_MARKER: &str = "SFX";
/// Images below this size (bytes) go to `small/`, others to `large/`.
pub const SMALL_IMAGE_MAX_SIZE: u64 = 1_000_000;
/// Images created longer ago than this go to `old/`.
pub const OLD_IMAGE_AGE: Duration = Duration::from_secs(2 * 24 * 60 * 60);

pub const AUDIO_EXTENSIONS: &[&str] = &[".m4a", ".flac", ".mp3", ".wav", ".wma", ".aac"];

pub const VIDEO_EXTENSIONS: &[&str] = &[
    ".webm", ".mpg", ".mp2", ".mpeg", ".mpe", ".mpv", ".ogg", ".mp4", ".mp4v", ".m4v", ".avi",
    ".wmv", ".mov", ".qt", ".flv", ".swf", ".avchd",
];

pub const IMAGE_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".jpe", ".jif", ".jfif", ".jfi", ".png", ".gif", ".webp", ".tiff", ".tif",
    ".psd", ".raw", ".arw", ".cr2", ".nrw", ".k25", ".bmp", ".dib", ".heif", ".heic", ".ind",
    ".indd", ".indt", ".jp2", ".j2k", ".jpf", ".jpx", ".jpm", ".mj2", ".svg", ".svgz", ".ai",
    ".eps", ".ico",
];

pub const DOCUMENT_EXTENSIONS: &[&str] = &[
    ".doc", ".docx", ".odt", ".pdf", ".xls", ".xlsx", ".ppt", ".pptx",
];

/// Top-level classification of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Audio,
    Video,
    Image,
    Document,
    Unrecognized,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Audio => "audio",
            Category::Video => "video",
            Category::Image => "image",
            Category::Document => "document",
            Category::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category -> recognized extensions, checked in a fixed order.
///
/// Matching is a case-insensitive suffix match on the file name, so
/// `Track.MP3` and `track.mp3` are both audio.
#[derive(Debug, Clone)]
pub struct ExtensionTable {
    entries: Vec<(Category, Vec<String>)>,
}

impl ExtensionTable {
    /// The built-in table: audio, video, image, document.
    pub fn standard() -> Self {
        let lower = |exts: &[&str]| exts.iter().map(|e| e.to_ascii_lowercase()).collect();
        Self {
            entries: vec![
                (Category::Audio, lower(AUDIO_EXTENSIONS)),
                (Category::Video, lower(VIDEO_EXTENSIONS)),
                (Category::Image, lower(IMAGE_EXTENSIONS)),
                (Category::Document, lower(DOCUMENT_EXTENSIONS)),
            ],
        }
    }

    /// Single dispatch from a file name to its category.
    pub fn category_of(&self, name: &str) -> Category {
        let name = name.to_lowercase();
        self.entries
            .iter()
            .find(|(_, exts)| exts.iter().any(|ext| name.ends_with(ext.as_str())))
            .map(|(cat, _)| *cat)
            .unwrap_or(Category::Unrecognized)
    }

    /// Extensions recognized for `category` (empty for Unrecognized).
    pub fn extensions(&self, category: Category) -> &[String] {
        self.entries
            .iter()
            .find(|(cat, _)| *cat == category)
            .map(|(_, exts)| exts.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for ExtensionTable {
    fn default() -> Self {
        Self::standard()
    }
}
