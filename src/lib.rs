//! Analytics core for an interactive vehicle-listings dashboard.
//!
//! Loads a delimited listings file into an immutable in-memory [`Dataset`],
//! narrows it with user-supplied [`FilterCriteria`], and computes the
//! summary figures and aggregate views a rendering layer draws as KPIs and
//! charts. The widget framework itself is an external collaborator: it
//! reads the dataset's filter options to build its controls, hands back
//! criteria, and receives precomputed aggregates plus the filtered rows.

pub mod data;
pub mod state;

pub use data::export::{artifact_name, to_csv, write_csv};
pub use data::filter::{apply, FilterCriteria};
pub use data::loader::{load, DatasetCache, LoadError};
pub use data::model::{Dataset, Listing};
pub use data::summary::{
    price_by_mileage, price_by_year, price_histogram, summarize, top_models, HistogramBin,
    MileageBucket, ModelCount, Summary, YearMedian,
};
pub use state::DashboardState;
