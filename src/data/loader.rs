use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::Context;
use csv::StringRecord;
use thiserror::Error;

use super::model::{Dataset, Listing};

/// Columns the dashboard understands. Anything else is carried per-row as
/// an extra column and round-trips through export untouched.
const DECLARED_COLUMNS: &[&str] = &[
    "model",
    "year",
    "price",
    "transmission",
    "mileage",
    "fuelType",
    "tax",
    "mpg",
    "engineSize",
];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors surfaced by [`load`].
///
/// Unparseable numeric cells are *not* errors (they become missing values);
/// only an unreadable path or broken CSV structure fails the load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot read CSV: {0}")]
    Csv(#[from] csv::Error),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a listings dataset from a delimited file.
///
/// Cleaning rules:
/// * string fields are trimmed of surrounding whitespace
/// * numeric columns (year, price, mileage, tax, mpg, engineSize) are
///   coerced; cells that fail to parse become missing
/// * a declared column absent from the header leaves that field missing on
///   every row
/// * an empty file yields an empty-but-valid [`Dataset`]
pub fn load(path: &Path) -> Result<Dataset, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let col = |name: &str| headers.iter().position(|h| h == name);

    let model_col = col("model");
    let year_col = col("year");
    let price_col = col("price");
    let transmission_col = col("transmission");
    let mileage_col = col("mileage");
    let fuel_col = col("fuelType");
    let tax_col = col("tax");
    let mpg_col = col("mpg");
    let engine_col = col("engineSize");
    let extra_cols: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !DECLARED_COLUMNS.contains(&h.as_str()))
        .map(|(i, h)| (i, h.clone()))
        .collect();

    let mut listings = Vec::new();
    for result in reader.records() {
        let record = result?;

        let mut extra = BTreeMap::new();
        for (i, name) in &extra_cols {
            extra.insert(name.clone(), record.get(*i).unwrap_or("").to_string());
        }

        listings.push(Listing {
            model: string_field(&record, model_col),
            year: integer_field(&record, year_col),
            price: numeric_field(&record, price_col),
            mileage: numeric_field(&record, mileage_col),
            transmission: string_field(&record, transmission_col),
            fuel_type: string_field(&record, fuel_col),
            mpg: numeric_field(&record, mpg_col),
            engine_size: numeric_field(&record, engine_col),
            tax: numeric_field(&record, tax_col),
            extra,
        });
    }

    log::info!("loaded {} listings from {}", listings.len(), path.display());
    Ok(Dataset::from_listings(listings, headers))
}

fn string_field(record: &StringRecord, col: Option<usize>) -> String {
    col.and_then(|i| record.get(i)).unwrap_or("").to_string()
}

/// Numeric coercion: anything that does not parse to a finite number is
/// treated as missing rather than an error.
fn numeric_field(record: &StringRecord, col: Option<usize>) -> Option<f64> {
    let raw = col.and_then(|i| record.get(i))?;
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn integer_field(record: &StringRecord, col: Option<usize>) -> Option<i64> {
    numeric_field(record, col).map(|v| v as i64)
}

// ---------------------------------------------------------------------------
// Dataset cache
// ---------------------------------------------------------------------------

/// Memoizes [`load`] per path, invalidated when the file's modification
/// time changes. The source is treated as immutable for the dashboard's
/// lifetime, so repeated interactions share one `Arc<Dataset>`.
///
/// A preloaded dataset can be injected with [`DatasetCache::insert`],
/// bypassing the file system entirely.
#[derive(Default)]
pub struct DatasetCache {
    entries: BTreeMap<PathBuf, CacheEntry>,
}

struct CacheEntry {
    modified: Option<SystemTime>,
    dataset: Arc<Dataset>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load through the cache. A hit requires an unchanged modification time.
    pub fn load(&mut self, path: &Path) -> anyhow::Result<Arc<Dataset>> {
        let modified = std::fs::metadata(path).and_then(|m| m.modified()).ok();
        if let Some(entry) = self.entries.get(path) {
            if entry.modified == modified {
                log::debug!("dataset cache hit for {}", path.display());
                return Ok(Arc::clone(&entry.dataset));
            }
        }

        let dataset =
            Arc::new(load(path).with_context(|| format!("loading {}", path.display()))?);
        self.entries.insert(
            path.to_path_buf(),
            CacheEntry {
                modified,
                dataset: Arc::clone(&dataset),
            },
        );
        Ok(dataset)
    }

    /// Install a preloaded dataset for a path.
    pub fn insert(&mut self, path: impl Into<PathBuf>, dataset: Arc<Dataset>) {
        self.entries.insert(
            path.into(),
            CacheEntry {
                modified: None,
                dataset,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file.flush().unwrap();
        file
    }

    const HEADER: &str = "model,year,price,transmission,mileage,fuelType,tax,mpg,engineSize";

    #[test]
    fn malformed_numerics_become_missing() {
        let file = write_csv(&format!(
            "{HEADER}\n X1 ,2018,15000,Manual,23000,Diesel,145,55.4,2.0\nX3,2020,N/A,Automatic,oops,Petrol,,49.6,2.0\n"
        ));
        let ds = load(file.path()).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.listings[0].model, "X1");
        assert_eq!(ds.listings[0].price, Some(15_000.0));
        assert_eq!(ds.listings[1].price, None);
        assert_eq!(ds.listings[1].mileage, None);
        assert_eq!(ds.listings[1].tax, None);
        assert_eq!(ds.listings[1].year, Some(2020));
    }

    #[test]
    fn missing_declared_column_is_tolerated() {
        let file = write_csv("model,year,price\nX5,2019,31000\n");
        let ds = load(file.path()).unwrap();

        assert_eq!(ds.len(), 1);
        assert_eq!(ds.listings[0].transmission, "");
        assert_eq!(ds.listings[0].mpg, None);
    }

    #[test]
    fn extra_columns_are_carried_through() {
        let file = write_csv("model,year,price,colour\nX1,2018,15000, Alpine White \n");
        let ds = load(file.path()).unwrap();

        assert_eq!(ds.headers.last().map(String::as_str), Some("colour"));
        assert_eq!(
            ds.listings[0].extra.get("colour").map(String::as_str),
            Some("Alpine White")
        );
    }

    #[test]
    fn empty_file_yields_empty_dataset() {
        let file = write_csv("");
        let ds = load(file.path()).unwrap();
        assert!(ds.is_empty());
        assert!(ds.headers.is_empty());
    }

    #[test]
    fn unreadable_path_is_an_error() {
        let err = load(Path::new("does-not-exist.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
    }

    #[test]
    fn cache_returns_shared_dataset_for_unchanged_file() {
        let file = write_csv(&format!("{HEADER}\nX1,2018,15000,Manual,23000,Diesel,145,55.4,2.0\n"));
        let mut cache = DatasetCache::new();

        let first = cache.load(file.path()).unwrap();
        let second = cache.load(file.path()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn cache_reloads_when_file_changes() {
        let file = write_csv(&format!("{HEADER}\nX1,2018,15000,Manual,23000,Diesel,145,55.4,2.0\n"));
        let mut cache = DatasetCache::new();
        let first = cache.load(file.path()).unwrap();
        assert_eq!(first.len(), 1);

        // Rewrite with one more row; the new mtime invalidates the entry.
        std::thread::sleep(std::time::Duration::from_millis(20));
        std::fs::write(
            file.path(),
            format!(
                "{HEADER}\nX1,2018,15000,Manual,23000,Diesel,145,55.4,2.0\nX3,2020,27000,Automatic,9000,Petrol,145,44.1,2.0\n"
            ),
        )
        .unwrap();

        let second = cache.load(file.path()).unwrap();
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn injected_dataset_bypasses_the_file_system() {
        let mut cache = DatasetCache::new();
        let dataset = Arc::new(Dataset::default());
        cache.insert("in-memory.csv", Arc::clone(&dataset));

        let got = cache.load(Path::new("in-memory.csv")).unwrap();
        assert!(Arc::ptr_eq(&dataset, &got));
    }
}
