use std::collections::BTreeMap;

use serde::Serialize;

use super::model::Dataset;

/// Cap on the "top models" view.
const TOP_MODELS: usize = 15;
/// Equal-width bins for the price distribution.
const PRICE_BINS: usize = 20;
/// Equal-width buckets for the price-by-mileage view.
const MILEAGE_BUCKETS: usize = 10;

// ---------------------------------------------------------------------------
// Scalar summary
// ---------------------------------------------------------------------------

/// Headline figures for a filtered subset. Medians are `None` when the
/// column has zero non-missing values. Median is used instead of mean so a
/// handful of extreme listings do not skew the figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub median_price: Option<f64>,
    pub median_mileage: Option<f64>,
    pub median_mpg: Option<f64>,
}

/// Compute the headline figures for a dataset.
pub fn summarize(dataset: &Dataset) -> Summary {
    Summary {
        count: dataset.len(),
        median_price: median(dataset.listings.iter().filter_map(|l| l.price)),
        median_mileage: median(dataset.listings.iter().filter_map(|l| l.mileage)),
        median_mpg: median(dataset.listings.iter().filter_map(|l| l.mpg)),
    }
}

/// Median of the collected values; `None` for an empty input.
/// Even counts average the two middle values.
fn median(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut vals: Vec<f64> = values.collect();
    if vals.is_empty() {
        return None;
    }
    vals.sort_by(|a, b| a.total_cmp(b));
    let n = vals.len();
    Some(if n % 2 == 0 {
        (vals[n / 2 - 1] + vals[n / 2]) / 2.0
    } else {
        vals[n / 2]
    })
}

// ---------------------------------------------------------------------------
// Aggregate views
// ---------------------------------------------------------------------------

/// One point of the median-price-by-year line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearMedian {
    pub year: i64,
    pub median_price: f64,
}

/// Median price per registration year, ascending by year. Years where no
/// row carries a price are dropped.
pub fn price_by_year(dataset: &Dataset) -> Vec<YearMedian> {
    let mut by_year: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
    for listing in &dataset.listings {
        if let (Some(year), Some(price)) = (listing.year, listing.price) {
            by_year.entry(year).or_default().push(price);
        }
    }
    by_year
        .into_iter()
        .filter_map(|(year, prices)| {
            median(prices.into_iter()).map(|median_price| YearMedian { year, median_price })
        })
        .collect()
}

/// One bar of the top-models view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelCount {
    pub model: String,
    pub count: usize,
}

/// The most-listed models, descending by count, at most [`TOP_MODELS`]
/// entries. Ties keep first-encountered order.
pub fn top_models(dataset: &Dataset) -> Vec<ModelCount> {
    let mut counts: Vec<ModelCount> = Vec::new();
    for listing in &dataset.listings {
        if listing.model.is_empty() {
            continue;
        }
        match counts.iter_mut().find(|c| c.model == listing.model) {
            Some(entry) => entry.count += 1,
            None => counts.push(ModelCount {
                model: listing.model.clone(),
                count: 1,
            }),
        }
    }
    // Stable sort: equal counts stay in first-encountered order.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(TOP_MODELS);
    counts
}

/// One bar of the price distribution. The bin covers `[lower, upper)`,
/// except the last bin which also includes the upper edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl HistogramBin {
    /// Axis label in the `"15000-17500"` style.
    pub fn label(&self) -> String {
        format!("{}-{}", self.lower as i64, self.upper as i64)
    }
}

/// Price distribution over [`PRICE_BINS`] equal-width bins spanning the
/// observed non-missing price range. Empty input yields no bins; a single
/// distinct price collapses to one bin holding every row.
pub fn price_histogram(dataset: &Dataset) -> Vec<HistogramBin> {
    let prices: Vec<f64> = dataset.listings.iter().filter_map(|l| l.price).collect();
    histogram(&prices, PRICE_BINS)
}

fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let Some((min, max)) = value_range(values) else {
        return Vec::new();
    };
    let width = (max - min) / bins as f64;
    if width <= 0.0 {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: values.len(),
        }];
    }

    let mut counts = vec![0usize; bins];
    for &v in values {
        counts[bucket_index(v, min, width, bins)] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + i as f64 * width,
            upper: min + (i + 1) as f64 * width,
            count,
        })
        .collect()
}

/// One point of the price-by-mileage line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MileageBucket {
    pub lower: f64,
    pub upper: f64,
    pub median_price: f64,
}

/// Median price per mileage bucket ([`MILEAGE_BUCKETS`] equal-width buckets
/// over the observed mileage range), ascending by bucket lower bound.
/// Buckets with no priced rows are dropped.
pub fn price_by_mileage(dataset: &Dataset) -> Vec<MileageBucket> {
    let miles: Vec<f64> = dataset.listings.iter().filter_map(|l| l.mileage).collect();
    let Some((min, max)) = value_range(&miles) else {
        return Vec::new();
    };
    let width = (max - min) / MILEAGE_BUCKETS as f64;
    let buckets = if width <= 0.0 { 1 } else { MILEAGE_BUCKETS };

    let mut prices_per_bucket: Vec<Vec<f64>> = vec![Vec::new(); buckets];
    for listing in &dataset.listings {
        if let (Some(mileage), Some(price)) = (listing.mileage, listing.price) {
            let i = if width <= 0.0 {
                0
            } else {
                bucket_index(mileage, min, width, buckets)
            };
            prices_per_bucket[i].push(price);
        }
    }

    prices_per_bucket
        .into_iter()
        .enumerate()
        .filter_map(|(i, prices)| {
            median(prices.into_iter()).map(|median_price| MileageBucket {
                lower: min + i as f64 * width,
                upper: if width <= 0.0 {
                    max
                } else {
                    min + (i + 1) as f64 * width
                },
                median_price,
            })
        })
        .collect()
}

fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}

/// Equal-width bucket index with the top edge clamped into the last bucket.
fn bucket_index(value: f64, min: f64, width: f64, buckets: usize) -> usize {
    (((value - min) / width) as usize).min(buckets - 1)
}
