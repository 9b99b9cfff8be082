use anyhow::Result;

mod app;
mod logging;

fn main() -> Result<()> {
    app::run(inbox_sorter::cli::parse())
}
