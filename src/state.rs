use std::sync::Arc;

use crate::data::filter::{self, FilterCriteria};
use crate::data::model::Dataset;
use crate::data::summary::{
    self, HistogramBin, MileageBucket, ModelCount, Summary, YearMedian,
};

// ---------------------------------------------------------------------------
// Dashboard session state
// ---------------------------------------------------------------------------

/// One dashboard session: the shared source dataset, the current selection,
/// and everything derived from it.
///
/// The source dataset is immutable; each criteria change recomputes the
/// filtered subset and the aggregates handed to the rendering layer.
pub struct DashboardState {
    /// The full loaded dataset (shared with the cache).
    pub dataset: Arc<Dataset>,
    /// Current user selection.
    pub criteria: FilterCriteria,
    /// Rows passing the current criteria.
    pub filtered: Dataset,
    /// Headline figures for the filtered subset.
    pub summary: Summary,
    pub price_by_year: Vec<YearMedian>,
    pub top_models: Vec<ModelCount>,
    pub price_histogram: Vec<HistogramBin>,
    pub price_by_mileage: Vec<MileageBucket>,
}

impl DashboardState {
    /// Start a session over a dataset with the default selection.
    pub fn new(dataset: Arc<Dataset>) -> Self {
        let criteria = FilterCriteria::default_for(&dataset);
        let mut state = DashboardState {
            dataset,
            criteria,
            filtered: Dataset::default(),
            summary: summary::summarize(&Dataset::default()),
            price_by_year: Vec::new(),
            top_models: Vec::new(),
            price_histogram: Vec::new(),
            price_by_mileage: Vec::new(),
        };
        state.refilter();
        state
    }

    /// Swap in a new dataset and reset the selection to its defaults.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.criteria = FilterCriteria::default_for(&dataset);
        self.dataset = dataset;
        self.refilter();
    }

    /// Replace the selection and recompute the derived snapshot.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.refilter();
    }

    /// Recompute the filtered subset and its aggregates after a criteria
    /// change.
    pub fn refilter(&mut self) {
        self.filtered = filter::apply(&self.dataset, &self.criteria);
        self.summary = summary::summarize(&self.filtered);
        self.price_by_year = summary::price_by_year(&self.filtered);
        self.top_models = summary::top_models(&self.filtered);
        self.price_histogram = summary::price_histogram(&self.filtered);
        self.price_by_mileage = summary::price_by_mileage(&self.filtered);
        log::debug!(
            "refilter: {} of {} listings match",
            self.filtered.len(),
            self.dataset.len()
        );
    }

    /// False when the display layer should show a "no results" indicator
    /// instead of charts.
    pub fn has_results(&self) -> bool {
        !self.filtered.is_empty()
    }
}
