//! Inbox watching and the per-entry placement pipeline.
//!
//! Change notifications from `notify` arrive on their own thread and are
//! funnelled through an mpsc channel into a single consumer, so scans and
//! moves never run concurrently. Every notification triggers a full listing
//! of the inbox, which also picks up entries a previous pass failed on.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant, SystemTime};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, error, info, warn};

use crate::classify::{Classification, Classifier, FileObservation, Transfer};
use crate::config::Config;
use crate::errors::SortError;
use crate::fs_ops::{describe_io_error, MoveOperation};
use crate::rules::ExtensionTable;
use crate::shutdown;

/// How often the idle loop wakes up to check for a shutdown request.
const POLL_INTERVAL: Duration = Duration::from_millis(250);
/// A burst of notifications is never held back longer than this many debounce periods.
const MAX_SETTLE_PERIODS: u32 = 10;
/// Extensions of files that are still being downloaded.
const INCOMPLETE_EXTENSIONS: &[&str] = &["part", "crdownload", "tmp", "download", "aria2"];

/// Watch loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Scanning,
}

/// What happened to one inbox entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Classified and placed; holds the final location of the source file.
    Placed(PathBuf),
    /// Dry-run: classified, nothing touched.
    Planned(PathBuf),
    /// No rule matched; left in place.
    Unrecognized,
    /// Not a candidate (directory, symlink, partial download, already gone).
    Skipped,
}

/// Tally of one or more scans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub seen: usize,
    pub placed: usize,
    pub unrecognized: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ScanReport {
    fn record(&mut self, outcome: &Result<EntryOutcome, SortError>) {
        self.seen += 1;
        match outcome {
            Ok(EntryOutcome::Placed(_)) | Ok(EntryOutcome::Planned(_)) => self.placed += 1,
            Ok(EntryOutcome::Unrecognized) => self.unrecognized += 1,
            Ok(EntryOutcome::Skipped) => self.skipped += 1,
            Err(_) => self.failed += 1,
        }
    }

    pub fn absorb(&mut self, other: ScanReport) {
        self.seen += other.seen;
        self.placed += other.placed;
        self.unrecognized += other.unrecognized;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Classifier plus mover, bound to one configuration.
#[derive(Debug)]
pub struct Sorter<'a> {
    config: &'a Config,
    classifier: Classifier,
}

impl<'a> Sorter<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            classifier: Classifier::new(ExtensionTable::standard(), config.destinations.clone()),
        }
    }

    /// One full pass over the inbox. Per-entry failures are logged and counted.
    pub fn scan(&self, now: SystemTime) -> ScanReport {
        let mut report = ScanReport::default();
        let entries = match list_entries(&self.config.source_dir) {
            Ok(v) => v,
            Err(e) => {
                error!(
                    dir = %self.config.source_dir.display(),
                    "{}",
                    describe_io_error("list inbox", &self.config.source_dir, &e)
                );
                return report;
            }
        };

        for path in entries {
            let outcome = self.process_entry(&path, now);
            if let Err(e) = &outcome {
                error!(code = e.code(), kind = e.kind(), path = %path.display(), "{e}");
            }
            report.record(&outcome);
        }
        debug!(?report, "scan finished");
        report
    }

    /// Classify and place a single inbox entry.
    pub fn process_entry(&self, path: &Path, now: SystemTime) -> Result<EntryOutcome, SortError> {
        let meta = match fs::symlink_metadata(path) {
            Ok(m) => m,
            Err(_) => {
                debug!(path = %path.display(), "entry vanished before processing");
                return Ok(EntryOutcome::Skipped);
            }
        };
        if !meta.file_type().is_file() || is_incomplete(path) {
            debug!(path = %path.display(), "not a finished regular file; skipping");
            return Ok(EntryOutcome::Skipped);
        }

        let obs = FileObservation::from_metadata(path, &meta, self.config.age_basis);
        let Some(class) = self.classifier.classify(&obs, now) else {
            debug!(file = obs.name(), "no rule matched");
            return Ok(EntryOutcome::Unrecognized);
        };
        let Some(name) = path.file_name() else {
            return Ok(EntryOutcome::Skipped);
        };

        if self.config.dry_run {
            return Ok(self.plan(&obs, &class));
        }
        self.place(&obs, &class, name)
    }

    fn plan(&self, obs: &FileObservation, class: &Classification) -> EntryOutcome {
        for p in &class.placements {
            info!(
                category = %class.category,
                sub = class.sub_category.map(|s| s.as_str()),
                file = obs.name(),
                dest = %p.dir.display(),
                transfer = ?p.transfer,
                "dry-run: would place file"
            );
        }
        match class.primary_dir() {
            Some(dir) => EntryOutcome::Planned(dir.join(obs.name())),
            None => EntryOutcome::Skipped,
        }
    }

    fn place(
        &self,
        obs: &FileObservation,
        class: &Classification,
        name: &OsStr,
    ) -> Result<EntryOutcome, SortError> {
        let mut last = None;
        for p in &class.placements {
            let placed = MoveOperation::new(obs.path(), &p.dir, name, p.transfer).execute()?;
            if let Some(prev) = &placed.displaced {
                info!(renamed = %prev.display(), "existing file renumbered");
            }
            let verb = match p.transfer {
                Transfer::Move => "Moved",
                Transfer::Copy => "Copied",
            };
            info!(
                category = %class.category,
                sub = class.sub_category.map(|s| s.as_str()),
                file = obs.name(),
                dest = %placed.dest.display(),
                "{verb} {} file: {}",
                class.category,
                obs.name()
            );
            last = Some(placed.dest);
        }
        Ok(last.map_or(EntryOutcome::Skipped, EntryOutcome::Placed))
    }
}

/// Inbox entries sorted by name so passes are deterministic.
fn list_entries(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .collect();
    entries.sort();
    Ok(entries)
}

fn is_incomplete(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            INCOMPLETE_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

/// Notifications worth a rescan: anything that can add or rename an entry.
fn is_relevant(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Any | EventKind::Other
    )
}

/// Single-consumer event loop.
#[derive(Debug)]
pub struct WatchLoop<'a> {
    sorter: Sorter<'a>,
    debounce: Duration,
    state: LoopState,
}

impl<'a> WatchLoop<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            sorter: Sorter::new(config),
            debounce: config.debounce,
            state: LoopState::Idle,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Consume notifications until shutdown is requested or the sender goes away.
    /// An in-flight scan always runs to completion.
    pub fn run(&mut self, events: &Receiver<notify::Result<Event>>) -> ScanReport {
        let mut total = ScanReport::default();
        while !shutdown::is_requested() {
            match events.recv_timeout(POLL_INTERVAL) {
                Ok(Ok(event)) if is_relevant(&event) => {
                    debug!(kind = ?event.kind, paths = ?event.paths, "change notification");
                    let open = self.settle(events);
                    total.absorb(self.scan_once());
                    if !open {
                        break;
                    }
                }
                Ok(Ok(_)) => {}
                Ok(Err(e)) => warn!(error = %e, "watcher reported an error"),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        total
    }

    /// Run one Idle -> Scanning -> Idle cycle.
    pub fn scan_once(&mut self) -> ScanReport {
        self.state = LoopState::Scanning;
        let report = self.sorter.scan(SystemTime::now());
        self.state = LoopState::Idle;
        report
    }

    /// Swallow notifications until the inbox has been quiet for one debounce period.
    /// Returns false if the channel closed meanwhile.
    fn settle(&self, events: &Receiver<notify::Result<Event>>) -> bool {
        if self.debounce.is_zero() {
            return true;
        }
        let deadline = Instant::now() + self.debounce * MAX_SETTLE_PERIODS;
        while Instant::now() < deadline {
            match events.recv_timeout(self.debounce) {
                Ok(_) => continue,
                Err(RecvTimeoutError::Timeout) => return true,
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
        true
    }
}

/// One pass over the inbox with the current time.
pub fn scan_inbox(config: &Config) -> ScanReport {
    Sorter::new(config).scan(SystemTime::now())
}

/// Subscribe to the inbox, sweep it once, then sort on every change until shutdown.
///
/// Failing to subscribe is the only fatal error; everything after that is
/// logged per entry.
pub fn watch_inbox(config: &Config) -> Result<ScanReport, SortError> {
    let (tx, rx) = mpsc::channel();
    let mut watcher: RecommendedWatcher =
        notify::recommended_watcher(tx).map_err(|e| SortError::Watch(e.to_string()))?;
    watcher
        .watch(&config.source_dir, RecursiveMode::NonRecursive)
        .map_err(|e| SortError::Watch(format!("{}: {e}", config.source_dir.display())))?;
    info!(dir = %config.source_dir.display(), "Watching inbox");

    let mut lp = WatchLoop::new(config);
    let mut total = lp.scan_once();
    total.absorb(lp.run(&rx));

    if let Err(e) = watcher.unwatch(&config.source_dir) {
        debug!(error = %e, "unwatch failed");
    }
    drop(watcher);
    info!(
        placed = total.placed,
        failed = total.failed,
        "Stopped watching inbox"
    );
    Ok(total)
}
