use std::collections::{BTreeMap, BTreeSet};

// ---------------------------------------------------------------------------
// Listing – one row of the source table
// ---------------------------------------------------------------------------

/// A single vehicle listing (one row of the source CSV).
///
/// Numeric fields are `Option` because the loader coerces unparseable cells
/// to missing instead of failing; missing values are excluded from numeric
/// aggregates downstream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    pub model: String,
    pub year: Option<i64>,
    pub price: Option<f64>,
    pub mileage: Option<f64>,
    pub transmission: String,
    pub fuel_type: String,
    pub mpg: Option<f64>,
    pub engine_size: Option<f64>,
    pub tax: Option<f64>,
    /// Columns beyond the declared schema: column name → raw trimmed value.
    /// Carried through untouched so export can round-trip them.
    pub extra: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed filter-option indices.
///
/// Immutable after construction: filtering derives a fresh `Dataset` rather
/// than mutating in place, so a cached instance can be shared freely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// All listings (rows), in source order.
    pub listings: Vec<Listing>,
    /// Source column layout (declared + extra columns, in file order).
    pub headers: Vec<String>,
    /// Sorted unique model names, blanks dropped.
    pub models: Vec<String>,
    /// Sorted unique transmission values, blanks dropped.
    pub transmissions: Vec<String>,
    /// Sorted unique fuel types, blanks dropped.
    pub fuel_types: Vec<String>,
    /// Observed (min, max) over non-missing years, if any.
    pub year_range: Option<(i64, i64)>,
    /// Observed (min, max) over non-missing prices, if any.
    pub price_range: Option<(f64, f64)>,
}

impl Dataset {
    /// Build the filter-option indices from the loaded listings.
    pub fn from_listings(listings: Vec<Listing>, headers: Vec<String>) -> Self {
        let mut models: BTreeSet<String> = BTreeSet::new();
        let mut transmissions: BTreeSet<String> = BTreeSet::new();
        let mut fuel_types: BTreeSet<String> = BTreeSet::new();
        let mut year_range: Option<(i64, i64)> = None;
        let mut price_range: Option<(f64, f64)> = None;

        for listing in &listings {
            if !listing.model.is_empty() {
                models.insert(listing.model.clone());
            }
            if !listing.transmission.is_empty() {
                transmissions.insert(listing.transmission.clone());
            }
            if !listing.fuel_type.is_empty() {
                fuel_types.insert(listing.fuel_type.clone());
            }
            if let Some(year) = listing.year {
                year_range = Some(match year_range {
                    Some((lo, hi)) => (lo.min(year), hi.max(year)),
                    None => (year, year),
                });
            }
            if let Some(price) = listing.price {
                price_range = Some(match price_range {
                    Some((lo, hi)) => (lo.min(price), hi.max(price)),
                    None => (price, price),
                });
            }
        }

        Dataset {
            listings,
            headers,
            models: models.into_iter().collect(),
            transmissions: transmissions.into_iter().collect(),
            fuel_types: fuel_types.into_iter().collect(),
            year_range,
            price_range,
        }
    }

    /// Number of listings.
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}
