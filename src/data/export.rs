use std::io::Write;
use std::path::Path;

use anyhow::Result;

use super::model::{Dataset, Listing};

// ---------------------------------------------------------------------------
// CSV export of a (filtered) dataset
// ---------------------------------------------------------------------------

/// Serialize the dataset back to UTF-8 CSV: header row included, columns in
/// source order, missing numerics as empty fields, extra columns passed
/// through untouched.
pub fn to_csv(dataset: &Dataset) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_records(dataset, &mut writer)?;
    Ok(writer.into_inner()?)
}

/// Stream the dataset as CSV into any writer.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    write_records(dataset, &mut writer)
}

fn write_records<W: Write>(dataset: &Dataset, writer: &mut csv::Writer<W>) -> Result<()> {
    if dataset.headers.is_empty() {
        return Ok(());
    }
    writer.write_record(&dataset.headers)?;
    for listing in &dataset.listings {
        let record: Vec<String> = dataset
            .headers
            .iter()
            .map(|column| field_value(listing, column))
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn field_value(listing: &Listing, column: &str) -> String {
    match column {
        "model" => listing.model.clone(),
        "year" => listing.year.map(|y| y.to_string()).unwrap_or_default(),
        "price" => format_number(listing.price),
        "transmission" => listing.transmission.clone(),
        "mileage" => format_number(listing.mileage),
        "fuelType" => listing.fuel_type.clone(),
        "tax" => format_number(listing.tax),
        "mpg" => format_number(listing.mpg),
        "engineSize" => format_number(listing.engine_size),
        other => listing.extra.get(other).cloned().unwrap_or_default(),
    }
}

/// Whole numbers print without a trailing `.0` so integer-typed source
/// columns survive a round trip unchanged.
fn format_number(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{v:.0}"),
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

/// Deterministic download name for a filtered export: `<stem>_filtered.csv`.
pub fn artifact_name(source: &Path) -> String {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset");
    format!("{stem}_filtered.csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    #[test]
    fn export_round_trips_rows_and_extra_columns() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "model,year,price,transmission,mileage,fuelType,tax,mpg,engineSize,colour\n\
             X1,2018,15000,Manual,23000,Diesel,145,55.4,2.0,Alpine White\n\
             X3,2020,N/A,Automatic,9000,Petrol,145,44.1,2.0,Black\n"
        )
        .unwrap();
        file.flush().unwrap();

        let ds = load(file.path()).unwrap();
        let bytes = to_csv(&ds).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("model,year,price,transmission,mileage,fuelType,tax,mpg,engineSize,colour")
        );
        // Whole-number floats print without a decimal point.
        assert_eq!(
            lines.next(),
            Some("X1,2018,15000,Manual,23000,Diesel,145,55.4,2,Alpine White")
        );
        // The unparseable price exports as an empty field.
        assert_eq!(
            lines.next(),
            Some("X3,2020,,Automatic,9000,Petrol,145,44.1,2,Black")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn empty_dataset_exports_no_bytes() {
        let ds = Dataset::default();
        assert!(to_csv(&ds).unwrap().is_empty());
    }

    #[test]
    fn artifact_name_derives_from_the_source_stem() {
        assert_eq!(artifact_name(Path::new("data/bmw.csv")), "bmw_filtered.csv");
        assert_eq!(artifact_name(Path::new("listings.csv")), "listings_filtered.csv");
        assert_eq!(artifact_name(Path::new("")), "dataset_filtered.csv");
    }
}
