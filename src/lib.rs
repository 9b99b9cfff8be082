//! Core library for `inbox_sorter`.
//!
//! Watches an inbox directory and sorts new files into category folders:
//! - `rules` / `classify`: fixed extension tables and the routing decision table
//! - `fs_ops`: collision-free naming and safe placement
//! - `watch`: change notifications -> full inbox scan -> placement
//! - `config`: XML config, defaults and startup checks

pub mod classify;
pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;
pub mod rules;
pub mod shutdown;
pub mod watch;

pub use classify::{classify, Classification, Classifier, FileObservation, SubCategory, Transfer};
pub use config::{
    default_config_path, default_log_path, load_config_from_xml_path, path_has_symlink_ancestor,
    AgeBasis, Config, Destinations, LogLevel,
};
pub use errors::SortError;
pub use fs_ops::{copy_safely, move_safely, resolve_unique_name, MoveOperation, Placed};
pub use rules::{Category, ExtensionTable};
pub use watch::{scan_inbox, watch_inbox, EntryOutcome, LoopState, ScanReport, Sorter, WatchLoop};
