//! Application orchestrator.
//! Loads the config, applies CLI overrides, initializes logging, installs the
//! interrupt handler, checks the directory layout and runs the sorter.

use anyhow::{anyhow, Result};
use std::sync::{Arc, Mutex};
use tracing::{debug, error};

use inbox_sorter::cli::Args;
use inbox_sorter::config::{load_or_init, LoadResult, CONFIG_ENV};
use inbox_sorter::output as out;
use inbox_sorter::{default_config_path, scan_inbox, shutdown, watch_inbox};

use crate::logging::init_tracing;

fn print_config_location() {
    if let Ok(raw) = std::env::var(CONFIG_ENV) {
        out::print_info(&format!("Using {CONFIG_ENV} (explicit):\n  {raw}\n"));
        out::print_info(&format!("To override, unset {CONFIG_ENV} or point it at another file."));
        return;
    }
    match default_config_path() {
        Ok(p) => {
            out::print_info(&format!("Default inbox_sorter config path:\n  {}\n", p.display()));
            if p.exists() {
                out::print_info("A config file already exists at that location.");
            } else {
                out::print_info("No config file exists there yet. Run without --print-config to create a template.");
            }
        }
        Err(e) => out::print_error(&format!("Could not determine a default config path: {e}")),
    }
}

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    if args.print_config {
        print_config_location();
        return Ok(());
    }

    // First run: write a template and let the user fill it in.
    let mut cfg = match load_or_init()? {
        LoadResult::CreatedTemplate(path) => {
            out::print_success(&format!(
                "A template inbox_sorter config was written to: {}",
                path.display()
            ));
            out::print_info(
                "Edit `source_dir` and the destination directories, create them, then re-run.",
            );
            out::print_info(&format!("To use a different location set {CONFIG_ENV}."));
            return Ok(());
        }
        LoadResult::Loaded(cfg, _) => cfg,
    };

    args.apply_overrides(&mut cfg).map_err(|e| {
        out::print_error(&e);
        anyhow!(e)
    })?;

    let guard_opt = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
        e
    })?;

    // Dropping the guard flushes the file appender; the interrupt handler does it early.
    let guard_slot = Arc::new(Mutex::new(guard_opt));
    {
        let guard_slot = Arc::clone(&guard_slot);
        ctrlc::set_handler(move || {
            shutdown::request();
            out::print_warn("Received interrupt; finishing the current scan and stopping...");
            if let Ok(mut g) = guard_slot.lock() {
                let _ = g.take();
            }
        })
        .map_err(|e| anyhow!("failed to install signal handler: {e}"))?;
    }

    debug!(?args, "Starting inbox_sorter");

    let result = (|| -> Result<()> {
        // Missing directories are warned about once and then tolerated per entry.
        let _ = cfg.check_directories();
        if let Err(e) = cfg.validate() {
            error!(code = e.code(), kind = e.kind(), "{e}");
            return Err(e.into());
        }

        if args.once {
            let report = scan_inbox(&cfg);
            out::print_summary(&report, cfg.dry_run);
            return Ok(());
        }

        match watch_inbox(&cfg) {
            Ok(_) => Ok(()),
            Err(e) => {
                error!(code = e.code(), kind = e.kind(), "{e}");
                Err(e.into())
            }
        }
    })();

    if let Ok(mut g) = guard_slot.lock() {
        let _ = g.take();
    }

    result
}
