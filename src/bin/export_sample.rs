use std::path::PathBuf;

use anyhow::{Context, Result};
use park_eats::Config;

/// Write the configured table (the built-in list by default) as CSV with the
/// canonical header, ready to paste into a spreadsheet.
fn main() -> Result<()> {
    env_logger::init();

    let output_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_menu.csv"));

    let config = Config::from_env()?;
    let mut cache = config.cache(config.http_fetcher()?)?;
    let table = cache.load()?;

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;
    for item in &table.items {
        writer.serialize(item).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV output")?;

    println!(
        "Wrote {} items from {} to {}",
        table.len(),
        cache.source(),
        output_path.display()
    );
    Ok(())
}
