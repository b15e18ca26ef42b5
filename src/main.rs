use std::path::Path;

use anyhow::{Context, Result};

use motorlens::{artifact_name, write_csv, DashboardState, DatasetCache};

/// Widest bar in the text histogram.
const BAR_WIDTH: usize = 40;

/// Text-mode stand-in for the rendering layer: load a listings CSV, apply
/// the default selection, print the KPIs and the four aggregate views, and
/// write the filtered export artifact.
fn main() -> Result<()> {
    env_logger::init();

    let arg = std::env::args().nth(1).unwrap_or_else(|| "bmw.csv".to_string());
    let path = Path::new(&arg);

    let mut cache = DatasetCache::new();
    let dataset = cache.load(path)?;
    let state = DashboardState::new(dataset);

    println!("Marketplace analysis — {}", path.display());
    println!();
    println!("Listings        {}", state.summary.count);
    println!("Median price    {}", currency(state.summary.median_price));
    println!("Median mileage  {}", plain(state.summary.median_mileage, " mi"));
    println!("Median MPG      {}", plain(state.summary.median_mpg, ""));

    if !state.has_results() {
        println!();
        println!("No listings match the selected filters.");
        return Ok(());
    }

    println!();
    println!("Median price by year");
    for point in &state.price_by_year {
        println!("  {}  {}", point.year, currency(Some(point.median_price)));
    }

    println!();
    println!("Top models (count)");
    for entry in &state.top_models {
        println!("  {:<12} {}", entry.model, entry.count);
    }

    println!();
    println!("Price distribution");
    let tallest = state
        .price_histogram
        .iter()
        .map(|b| b.count)
        .max()
        .unwrap_or(1)
        .max(1);
    for bin in &state.price_histogram {
        let bar = "#".repeat(bin.count * BAR_WIDTH / tallest);
        println!("  {:>13}  {:>5}  {}", bin.label(), bin.count, bar);
    }

    println!();
    println!("Median price by mileage bucket");
    for bucket in &state.price_by_mileage {
        println!(
            "  {:>7.0}-{:<7.0}  {}",
            bucket.lower,
            bucket.upper,
            currency(Some(bucket.median_price))
        );
    }

    let export_name = artifact_name(path);
    let file = std::fs::File::create(&export_name)
        .with_context(|| format!("creating {export_name}"))?;
    write_csv(&state.filtered, file)?;
    println!();
    println!("Wrote {} ({} rows)", export_name, state.filtered.len());

    Ok(())
}

fn currency(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("£{v:.0}"),
        None => "n/a".to_string(),
    }
}

fn plain(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v:.1}{unit}"),
        None => "n/a".to_string(),
    }
}
