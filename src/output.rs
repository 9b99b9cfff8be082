//! Colored user-facing messages for the terminal.
//! Colors are enabled only when stdout is a TTY; logs go through `tracing` instead.

use owo_colors::OwoColorize;

use crate::watch::ScanReport;

fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

fn emit(tag: &str, paint: fn(&str) -> String, msg: &str, to_stderr: bool) {
    let line = if is_tty() {
        format!("{} {}", paint(tag), msg)
    } else {
        format!("{tag} {msg}")
    };
    if to_stderr {
        eprintln!("{line}");
    } else {
        println!("{line}");
    }
}

pub fn print_info(msg: &str) {
    emit("info:", |t| t.cyan().bold().to_string(), msg, false);
}

pub fn print_warn(msg: &str) {
    emit("warn:", |t| t.yellow().bold().to_string(), msg, true);
}

pub fn print_error(msg: &str) {
    emit("error:", |t| t.red().bold().to_string(), msg, true);
}

pub fn print_success(msg: &str) {
    emit("ok:", |t| t.green().bold().to_string(), msg, false);
}

/// One-line summary of a finished scan, e.g. for `--once`.
pub fn print_summary(report: &ScanReport, dry_run: bool) {
    let msg = summary_line(report, dry_run);
    if report.failed > 0 {
        print_warn(&msg);
    } else {
        print_success(&msg);
    }
}

fn summary_line(r: &ScanReport, dry_run: bool) -> String {
    let verb = if dry_run { "planned" } else { "placed" };
    format!(
        "{} entries seen: {} {verb}, {} unrecognized, {} skipped, {} failed",
        r.seen, r.placed, r.unrecognized, r.skipped, r.failed
    )
}
