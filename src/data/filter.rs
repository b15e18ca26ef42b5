use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::model::{Dataset, Listing};

/// How many models the default selection picks up (the first few of the
/// sorted unique list, the rest opt-in).
const DEFAULT_MODEL_SELECTION: usize = 6;

// ---------------------------------------------------------------------------
// Filter criteria: what the user selected in the control panel
// ---------------------------------------------------------------------------

/// User-selected constraints narrowing a [`Dataset`].
///
/// Recreated on every interaction; never persisted. Range bounds are
/// inclusive on both ends. A row with a missing value in any filtered
/// numeric field never matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub models: BTreeSet<String>,
    pub year_range: (i64, i64),
    pub price_range: (f64, f64),
    pub transmissions: BTreeSet<String>,
    pub fuel_types: BTreeSet<String>,
}

impl FilterCriteria {
    /// The selection a fresh dashboard starts from: the first
    /// `DEFAULT_MODEL_SELECTION` models, the full observed year and price
    /// ranges, and every transmission and fuel type.
    pub fn default_for(dataset: &Dataset) -> Self {
        FilterCriteria {
            models: dataset
                .models
                .iter()
                .take(DEFAULT_MODEL_SELECTION)
                .cloned()
                .collect(),
            year_range: dataset.year_range.unwrap_or((0, 0)),
            price_range: dataset.price_range.unwrap_or((0.0, 0.0)),
            transmissions: dataset.transmissions.iter().cloned().collect(),
            fuel_types: dataset.fuel_types.iter().cloned().collect(),
        }
    }

    /// Whether a single listing satisfies every constraint.
    pub fn matches(&self, listing: &Listing) -> bool {
        let (year_min, year_max) = self.year_range;
        let (price_min, price_max) = self.price_range;

        self.models.contains(&listing.model)
            && listing
                .year
                .is_some_and(|y| y >= year_min && y <= year_max)
            && listing
                .price
                .is_some_and(|p| p >= price_min && p <= price_max)
            && self.transmissions.contains(&listing.transmission)
            && self.fuel_types.contains(&listing.fuel_type)
    }
}

/// Apply the criteria, producing a fresh [`Dataset`] with its own
/// filter-option indices. The input is never mutated.
pub fn apply(dataset: &Dataset, criteria: &FilterCriteria) -> Dataset {
    let kept: Vec<Listing> = dataset
        .listings
        .iter()
        .filter(|l| criteria.matches(l))
        .cloned()
        .collect();
    Dataset::from_listings(kept, dataset.headers.clone())
}
