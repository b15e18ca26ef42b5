//! Integration tests for the listings analytics core.

use std::io::Write;
use std::sync::Arc;

use motorlens::{apply, artifact_name, load, summarize, to_csv, DashboardState, DatasetCache};
use tempfile::NamedTempFile;

/// Create a small listings file: mixed models, one padded cell, one
/// unparseable price.
fn create_test_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "model,year,price,transmission,mileage,fuelType,tax,mpg,engineSize"
    )
    .unwrap();
    writeln!(file, " 1 Series ,2017,12500,Manual,41000,Diesel,145,60.1,2.0").unwrap();
    writeln!(file, "1 Series,2019,16800,Manual,18000,Diesel,145,58.9,2.0").unwrap();
    writeln!(file, "3 Series,2016,14250,Automatic,52000,Diesel,125,54.3,2.0").unwrap();
    writeln!(file, "3 Series,2020,27000,Automatic,7000,Petrol,145,39.8,2.0").unwrap();
    writeln!(file, "X1,2018,15000,Manual,23000,Diesel,145,55.4,2.0").unwrap();
    writeln!(file, "X3,2020,N/A,Automatic,9000,Petrol,145,44.1,2.0").unwrap();
    writeln!(file, "X5,2021,41999,Semi-Auto,5000,Hybrid,135,31.0,3.0").unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn end_to_end_dashboard_flow() {
    let file = create_test_csv();
    let dataset = load(file.path()).unwrap();

    // Loading: whitespace trimmed, malformed price coerced to missing.
    assert_eq!(dataset.len(), 7);
    assert_eq!(dataset.listings[0].model, "1 Series");
    assert_eq!(dataset.listings[5].price, None);
    assert_eq!(
        dataset.models,
        vec!["1 Series", "3 Series", "X1", "X3", "X5"]
    );
    assert_eq!(dataset.year_range, Some((2016, 2021)));

    // Default selection covers every model here (fewer than the cap).
    let state = DashboardState::new(Arc::new(dataset));

    // X3's missing price fails the price-range test; everything else passes.
    assert_eq!(state.summary.count, 6);
    assert_eq!(state.summary.median_price, Some(15_900.0));

    // Aggregate views are consistent with the filtered subset.
    assert_eq!(state.price_by_year.len(), 6);
    assert!(state
        .price_by_year
        .windows(2)
        .all(|w| w[0].year < w[1].year));
    assert_eq!(state.top_models[0].model, "1 Series");
    assert_eq!(state.top_models[0].count, 2);
    let binned: usize = state.price_histogram.iter().map(|b| b.count).sum();
    assert_eq!(binned, 6);
    assert!(!state.price_by_mileage.is_empty());

    // Export: header plus one line per filtered row, deterministic name.
    let bytes = to_csv(&state.filtered).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert_eq!(text.lines().count(), 1 + 6);
    assert!(text.starts_with("model,year,price,transmission"));
    assert!(artifact_name(file.path()).ends_with("_filtered.csv"));
}

#[test]
fn fuel_filter_narrows_to_matching_rows() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "model,year,price,transmission,mileage,fuelType,tax,mpg,engineSize"
    )
    .unwrap();
    writeln!(file, "X1,2018,15000,Manual,23000,Diesel,145,55.4,2.0").unwrap();
    writeln!(file, "X3,2020,N/A,Automatic,9000,Petrol,145,44.1,2.0").unwrap();
    file.flush().unwrap();

    let dataset = load(file.path()).unwrap();
    assert_eq!(dataset.listings[0].price, Some(15_000.0));
    assert_eq!(dataset.listings[1].price, None);

    let mut criteria = motorlens::FilterCriteria::default_for(&dataset);
    criteria.fuel_types = ["Diesel".to_string()].into_iter().collect();

    let filtered = apply(&dataset, &criteria);
    assert_eq!(filtered.len(), 1);

    let summary = summarize(&filtered);
    assert_eq!(summary.count, 1);
    assert_eq!(summary.median_price, Some(15_000.0));
}

#[test]
fn empty_result_keeps_the_session_well_formed() {
    let file = create_test_csv();
    let mut cache = DatasetCache::new();
    let mut state = DashboardState::new(cache.load(file.path()).unwrap());

    let mut criteria = state.criteria.clone();
    criteria.models.clear();
    state.set_criteria(criteria);

    assert!(!state.has_results());
    assert_eq!(state.summary.count, 0);
    assert_eq!(state.summary.median_price, None);
    assert_eq!(state.summary.median_mileage, None);
    assert_eq!(state.summary.median_mpg, None);
    assert!(state.price_by_year.is_empty());
    assert!(state.top_models.is_empty());
    assert!(state.price_histogram.is_empty());
    assert!(state.price_by_mileage.is_empty());

    // An empty export still carries the header row.
    let text = String::from_utf8(to_csv(&state.filtered).unwrap()).unwrap();
    assert_eq!(text.lines().count(), 1);
}

#[test]
fn sessions_share_one_cached_dataset() {
    let file = create_test_csv();
    let mut cache = DatasetCache::new();

    let first = cache.load(file.path()).unwrap();
    let second = cache.load(file.path()).unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let a = DashboardState::new(first);
    let b = DashboardState::new(second);
    assert_eq!(a.summary, b.summary);
}
