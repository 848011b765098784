//! Census workforce analytics core.
//!
//! Loads a per-industry worker census upload (comma- or tab-separated), derives
//! per-row ratios and an industry category, and computes the aggregates and
//! insights a dashboard front end renders, including a regional view when the
//! upload carries a `Division` or `State` column. With the `python` feature the crate
//! builds as the `_core` extension module.

pub mod aggregation;
pub mod category;
pub mod config;
pub mod error;
pub mod geography;
pub mod ingest;
pub mod insight;
pub mod model;
pub mod schema;
pub mod transform;
pub mod validate;

#[cfg(test)]
mod test_support;

pub use aggregation::{
    GenderSplit, GroupKey, IndustryAggregate, LocationSplit, RankBy, WorkforceSummary,
};
pub use category::IndustryCategory;
pub use config::DashboardConfig;
pub use error::DashboardError;
pub use geography::{RegionalFacts, WorkforceFilter};
pub use insight::{generate_insights, InsightSummary};
pub use model::{fingerprint, process_upload, Dashboard, LoadState, WorkforceTable};

#[cfg(feature = "python")]
use pyo3::prelude::*;
#[cfg(feature = "python")]
use pyo3::types::PyModule;

/// Export schema constants as Python submodules
#[cfg(feature = "python")]
fn add_schema_exports(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Source
    let source = PyModule::new(m.py(), "source")?;
    source.add("NIC_NAME", schema::source::NIC_NAME)?;
    source.add("REQUIRED", schema::source::REQUIRED.to_vec())?;
    source.add("NUMERIC", schema::source::NUMERIC.to_vec())?;
    m.add_submodule(&source)?;

    // Derived
    let derived = PyModule::new(m.py(), "derived")?;
    derived.add("TOTAL_WORKERS", schema::derived::TOTAL_WORKERS)?;
    derived.add("FEMALE_RATIO", schema::derived::FEMALE_RATIO)?;
    derived.add("URBAN_RATIO", schema::derived::URBAN_RATIO)?;
    derived.add("INDUSTRY_CATEGORY", schema::derived::INDUSTRY_CATEGORY)?;
    m.add_submodule(&derived)?;

    // Aggregate
    let aggregate = PyModule::new(m.py(), "aggregate")?;
    aggregate.add("GROWTH_SCORE", schema::aggregate::GROWTH_SCORE)?;
    aggregate.add("SHARE", schema::aggregate::SHARE)?;
    m.add_submodule(&aggregate)?;

    // Geography
    let geography = PyModule::new(m.py(), "geography")?;
    geography.add("HINTS", schema::geography::HINTS.to_vec())?;
    m.add_submodule(&geography)?;

    // Category labels
    let category = PyModule::new(m.py(), "category")?;
    let labels: Vec<&str> = IndustryCategory::ALL.iter().map(|c| c.label()).collect();
    category.add("ALL", labels)?;
    m.add_submodule(&category)?;

    Ok(())
}

#[cfg(feature = "python")]
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Dashboard>()?;
    add_schema_exports(m)?;
    Ok(())
}
