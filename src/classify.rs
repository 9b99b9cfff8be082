//! Classification: file observation -> category and placement plan.
//!
//! Classification is pure. It never touches the filesystem; the watch loop
//! hands the resulting placements to the safe mover.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::config::{AgeBasis, Destinations};
use crate::rules::{
    Category, ExtensionTable, OLD_IMAGE_AGE, SMALL_IMAGE_MAX_SIZE, SOUND_EFFECT_MARKER,
    SOUND_EFFECT_MAX_SIZE,
};

/// Snapshot of one inbox entry taken at classification time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileObservation {
    name: String,
    extension: Option<String>,
    size: u64,
    created: SystemTime,
    path: PathBuf,
}

impl FileObservation {
    /// Build an observation from already-known metadata.
    pub fn new(path: impl Into<PathBuf>, size: u64, created: SystemTime) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = Path::new(&name)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()));
        Self {
            name,
            extension,
            size,
            created,
            path,
        }
    }

    /// Stat `path` (without following symlinks) and build an observation.
    pub fn from_path(path: &Path, basis: AgeBasis) -> io::Result<Self> {
        let meta = fs::symlink_metadata(path)?;
        Ok(Self::from_metadata(path, &meta, basis))
    }

    pub(crate) fn from_metadata(path: &Path, meta: &fs::Metadata, basis: AgeBasis) -> Self {
        let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        let created = match basis {
            AgeBasis::Created => meta.created().unwrap_or(modified),
            AgeBasis::Modified => modified,
        };
        Self::new(path, meta.len(), created)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lower-cased extension including the leading dot, if any.
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn created(&self) -> SystemTime {
        self.created
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Secondary routing decision inside a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubCategory {
    Sound,
    Music,
    Old,
    Small,
    Large,
}

impl SubCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubCategory::Sound => "sound",
            SubCategory::Music => "music",
            SubCategory::Old => "old",
            SubCategory::Small => "small",
            SubCategory::Large => "large",
        }
    }
}

/// How a placement transfers the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    /// Leave the source in place and put a copy in the destination.
    Copy,
    /// Relocate the source.
    Move,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub dir: PathBuf,
    pub transfer: Transfer,
}

impl Placement {
    fn moved(dir: PathBuf) -> Self {
        Self {
            dir,
            transfer: Transfer::Move,
        }
    }

    fn copied(dir: PathBuf) -> Self {
        Self {
            dir,
            transfer: Transfer::Copy,
        }
    }
}

/// Result of classifying one observation.
///
/// `placements` is ordered; only the last one is a move, so the source stays
/// available for every earlier copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    pub sub_category: Option<SubCategory>,
    pub placements: Vec<Placement>,
}

impl Classification {
    /// Final resting directory of the source file.
    pub fn primary_dir(&self) -> Option<&Path> {
        self.placements.last().map(|p| p.dir.as_path())
    }
}

/// Decision table over a fixed extension table and destination layout.
#[derive(Debug, Clone)]
pub struct Classifier {
    table: ExtensionTable,
    destinations: Destinations,
}

impl Classifier {
    pub fn new(table: ExtensionTable, destinations: Destinations) -> Self {
        Self {
            table,
            destinations,
        }
    }

    pub fn destinations(&self) -> &Destinations {
        &self.destinations
    }

    pub fn category_of(&self, obs: &FileObservation) -> Category {
        self.table.category_of(obs.name())
    }

    /// Classify `obs` relative to `now`. `None` when no rule matches.
    pub fn classify(&self, obs: &FileObservation, now: SystemTime) -> Option<Classification> {
        let d = &self.destinations;
        let category = self.category_of(obs);
        let (sub_category, placements) = match category {
            Category::Unrecognized => return None,
            Category::Audio => {
                if obs.size() < SOUND_EFFECT_MAX_SIZE || obs.name().contains(SOUND_EFFECT_MARKER) {
                    (Some(SubCategory::Sound), vec![Placement::moved(d.sound.clone())])
                } else {
                    (Some(SubCategory::Music), vec![Placement::moved(d.music.clone())])
                }
            }
            Category::Video => (None, vec![Placement::moved(d.video.clone())]),
            Category::Document => (None, vec![Placement::moved(d.document.clone())]),
            Category::Image => {
                let (sub, dir) = if is_older_than(obs.created(), now, OLD_IMAGE_AGE) {
                    (SubCategory::Old, d.image_old())
                } else if obs.size() < SMALL_IMAGE_MAX_SIZE {
                    (SubCategory::Small, d.image_small())
                } else {
                    (SubCategory::Large, d.image_large())
                };
                // Every image also lands in the base image directory.
                (
                    Some(sub),
                    vec![Placement::copied(dir), Placement::moved(d.image.clone())],
                )
            }
        };
        Some(Classification {
            category,
            sub_category,
            placements,
        })
    }
}

/// Timestamps in the future are never "old".
fn is_older_than(created: SystemTime, now: SystemTime, age: std::time::Duration) -> bool {
    now.duration_since(created)
        .map(|elapsed| elapsed > age)
        .unwrap_or(false)
}

/// Classify with the built-in extension table.
pub fn classify(
    obs: &FileObservation,
    destinations: &Destinations,
    now: SystemTime,
) -> Option<Classification> {
    Classifier::new(ExtensionTable::standard(), destinations.clone()).classify(obs, now)
}
