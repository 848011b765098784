use std::collections::HashMap;
use std::path::Path;

use polars::prelude::*;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

#[cfg(feature = "python")]
use pyo3::prelude::*;
#[cfg(feature = "python")]
use pyo3::exceptions::PyValueError;
#[cfg(feature = "python")]
use pyo3::types::{PyBytes, PyDict};
#[cfg(feature = "python")]
use pyo3_polars::PyDataFrame;

use crate::aggregation::{self, GenderSplit, GroupKey, LocationSplit, RankBy, WorkforceSummary};
#[cfg(feature = "python")]
use crate::category::IndustryCategory;
use crate::config::DashboardConfig;
use crate::error::DashboardError;
use crate::geography::{self, RegionalFacts, WorkforceFilter};
use crate::ingest::read_upload;
use crate::insight::{generate_insights, InsightSummary};
use crate::transform::derive_workforce;
use crate::validate::require_columns;

/// Ingest, validate and derive one upload.
pub fn process_upload(bytes: &[u8]) -> Result<DataFrame, DashboardError> {
    let raw = read_upload(bytes)?;
    require_columns(&raw)?;
    derive_workforce(raw)
}

/// Hex SHA-256 of the upload bytes, used as the memoization key.
pub fn fingerprint(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// A derived workforce table together with the fingerprint of its upload.
#[derive(Debug, Clone)]
pub struct WorkforceTable {
    fingerprint: String,
    frame: DataFrame,
}

impl WorkforceTable {
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// Outcome of the most recent upload.
#[derive(Debug)]
pub enum LoadState {
    NotLoaded,
    Invalid(DashboardError),
    Ready(WorkforceTable),
}

impl LoadState {
    pub fn status(&self) -> &'static str {
        match self {
            Self::NotLoaded => "not_loaded",
            Self::Invalid(_) => "invalid",
            Self::Ready(_) => "ready",
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn error(&self) -> Option<&DashboardError> {
        match self {
            Self::Invalid(err) => Some(err),
            _ => None,
        }
    }

    pub fn table(&self) -> Option<&WorkforceTable> {
        match self {
            Self::Ready(table) => Some(table),
            _ => None,
        }
    }
}

#[cfg_attr(feature = "python", pyclass)]
pub struct Dashboard {
    config: DashboardConfig,
    state: LoadState,
    cache: HashMap<String, DataFrame>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            state: LoadState::NotLoaded,
            cache: HashMap::new(),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Number of memoized derived tables.
    pub fn cached_uploads(&self) -> usize {
        self.cache.len()
    }

    // ── Data loading ────────────────────────────────────────────────────────

    /// Replace the current table with the result of processing `bytes`.
    ///
    /// Failures are kept as `LoadState::Invalid`; they never leave a partial
    /// table behind.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> &LoadState {
        let fingerprint = fingerprint(bytes);

        let cached = if self.config.cache {
            self.cache.get(&fingerprint).cloned()
        } else {
            None
        };

        let result = match cached {
            Some(frame) => {
                debug!(fingerprint = %fingerprint, "reusing derived table");
                Ok(frame)
            }
            None => {
                debug!(fingerprint = %fingerprint, "processing upload");
                let result = process_upload(bytes);
                if let (true, Ok(frame)) = (self.config.cache, &result) {
                    self.cache.insert(fingerprint.clone(), frame.clone());
                }
                result
            }
        };

        self.state = match result {
            Ok(frame) => LoadState::Ready(WorkforceTable { fingerprint, frame }),
            Err(err) => {
                warn!(error = %err, "upload rejected");
                LoadState::Invalid(err)
            }
        };
        &self.state
    }

    /// Read an upload from disk and load it.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> &LoadState {
        match std::fs::read(path.as_ref()) {
            Ok(bytes) => self.load_bytes(&bytes),
            Err(err) => {
                warn!(path = %path.as_ref().display(), error = %err, "could not read upload");
                self.state = LoadState::Invalid(err.into());
                &self.state
            }
        }
    }

    /// Forget the current table. Memoized tables are kept.
    pub fn clear(&mut self) {
        self.state = LoadState::NotLoaded;
    }

    // ── Accessors ───────────────────────────────────────────────────────────

    pub fn table(&self) -> Result<&WorkforceTable, DashboardError> {
        match &self.state {
            LoadState::Ready(table) => Ok(table),
            LoadState::NotLoaded => Err(DashboardError::NoData("no file uploaded".to_string())),
            LoadState::Invalid(err) => Err(DashboardError::NoData(format!(
                "last upload was rejected: {err}"
            ))),
        }
    }

    pub fn derived(&self) -> Result<&DataFrame, DashboardError> {
        Ok(self.table()?.frame())
    }

    pub fn insights(&self) -> Result<InsightSummary, DashboardError> {
        generate_insights(self.derived()?)
    }

    pub fn summary(&self) -> Result<WorkforceSummary, DashboardError> {
        aggregation::summary(self.derived()?)
    }

    pub fn category_aggregate(&self) -> Result<DataFrame, DashboardError> {
        aggregation::aggregate_by(self.derived()?, GroupKey::Category)
    }

    pub fn industry_aggregate(&self) -> Result<DataFrame, DashboardError> {
        aggregation::aggregate_by(self.derived()?, GroupKey::Industry)
    }

    /// Categories with the most workers.
    pub fn top_categories(&self) -> Result<DataFrame, DashboardError> {
        let agg = self.category_aggregate()?;
        aggregation::top_n(&agg, RankBy::TotalWorkers, self.config.top_categories)
    }

    /// Categories with the highest Growth Score.
    pub fn top_growth(&self) -> Result<DataFrame, DashboardError> {
        let agg = self.category_aggregate()?;
        aggregation::top_n(&agg, RankBy::GrowthScore, self.config.top_growth)
    }

    /// Individual industries (`NIC_Name`) with the most workers.
    pub fn top_industries(&self) -> Result<DataFrame, DashboardError> {
        let agg = self.industry_aggregate()?;
        aggregation::top_n(&agg, RankBy::TotalWorkers, self.config.top_industries)
    }

    pub fn gender_by_category(&self) -> Result<DataFrame, DashboardError> {
        aggregation::gender_by_category(self.derived()?, self.config.gender_breakdown)
    }

    pub fn gender_split(&self) -> Result<GenderSplit, DashboardError> {
        aggregation::gender_split(self.derived()?)
    }

    pub fn location_split(&self) -> Result<LocationSplit, DashboardError> {
        aggregation::location_split(self.derived()?)
    }

    /// First rows of the derived table for the raw-data viewer.
    pub fn preview(&self) -> Result<DataFrame, DashboardError> {
        Ok(self.derived()?.head(Some(self.config.preview_rows)))
    }

    // ── Regional view ───────────────────────────────────────────────────────

    /// Name of the upload's geography column, if it has one.
    pub fn geography_column(&self) -> Result<Option<String>, DashboardError> {
        Ok(geography::geography_column(self.derived()?))
    }

    pub fn geography_options(&self) -> Result<Vec<String>, DashboardError> {
        geography::geography_options(self.derived()?)
    }

    pub fn category_options(&self) -> Result<Vec<String>, DashboardError> {
        geography::category_options(self.derived()?)
    }

    /// Derived rows matching `filter`.
    pub fn filtered(&self, filter: &WorkforceFilter) -> Result<DataFrame, DashboardError> {
        geography::filter_rows(self.derived()?, filter)
    }

    pub fn geography_by_category(
        &self,
        filter: &WorkforceFilter,
    ) -> Result<DataFrame, DashboardError> {
        geography::geography_by_category(&self.filtered(filter)?)
    }

    pub fn sector_share(&self, filter: &WorkforceFilter) -> Result<DataFrame, DashboardError> {
        geography::sector_share(&self.filtered(filter)?)
    }

    pub fn top_geography(&self, filter: &WorkforceFilter) -> Result<String, DashboardError> {
        geography::top_geography(&self.filtered(filter)?)
    }

    pub fn regional_facts(&self, filter: &WorkforceFilter) -> Result<RegionalFacts, DashboardError> {
        geography::regional_facts(&self.filtered(filter)?)
    }

    /// Filtered rows as CSV bytes for download.
    pub fn export_csv(&self, filter: &WorkforceFilter) -> Result<Vec<u8>, DashboardError> {
        geography::export_csv(&self.filtered(filter)?)
    }
}

#[cfg(feature = "python")]
fn py_filter(
    geographies: Option<Vec<String>>,
    categories: Option<Vec<String>>,
) -> PyResult<WorkforceFilter> {
    let categories = categories
        .map(|labels| {
            labels
                .iter()
                .map(|label| {
                    IndustryCategory::from_label(label).ok_or_else(|| {
                        PyValueError::new_err(format!("unknown industry category '{label}'"))
                    })
                })
                .collect::<PyResult<Vec<_>>>()
        })
        .transpose()?;
    Ok(WorkforceFilter {
        geographies,
        categories,
    })
}

// ── Python bindings ─────────────────────────────────────────────────────────

#[cfg(feature = "python")]
#[pymethods]
impl Dashboard {
    #[new]
    #[pyo3(signature = (
        top_categories = 10,
        top_growth = 8,
        top_industries = 15,
        gender_breakdown = 10,
        preview_rows = 100,
        cache = true,
    ))]
    fn py_new(
        top_categories: usize,
        top_growth: usize,
        top_industries: usize,
        gender_breakdown: usize,
        preview_rows: usize,
        cache: bool,
    ) -> Self {
        Self::new(DashboardConfig {
            top_categories,
            top_growth,
            top_industries,
            gender_breakdown,
            preview_rows,
            cache,
        })
    }

    /// Load an upload from raw bytes. Returns the resulting status.
    #[pyo3(name = "load_bytes")]
    fn py_load_bytes(&mut self, data: &[u8]) -> &'static str {
        self.load_bytes(data).status()
    }

    /// Load an upload from a file path. Returns the resulting status.
    #[pyo3(name = "load_file")]
    fn py_load_file(&mut self, path: std::path::PathBuf) -> &'static str {
        self.load_file(path).status()
    }

    #[pyo3(name = "clear")]
    fn py_clear(&mut self) {
        self.clear();
    }

    /// "not_loaded", "invalid" or "ready".
    #[getter(status)]
    fn py_status(&self) -> &'static str {
        self.state.status()
    }

    /// Reason the last upload was rejected, if it was.
    #[getter(error)]
    fn py_error(&self) -> Option<String> {
        self.state.error().map(|e| e.to_string())
    }

    #[getter(missing_columns)]
    fn py_missing_columns(&self) -> Vec<String> {
        self.state
            .error()
            .map(|e| e.missing_columns().to_vec())
            .unwrap_or_default()
    }

    #[getter(derived_df)]
    fn py_derived_df(&self) -> Option<PyDataFrame> {
        self.state.table().map(|t| PyDataFrame(t.frame().clone()))
    }

    #[pyo3(name = "category_aggregate")]
    fn py_category_aggregate(&self) -> PyResult<PyDataFrame> {
        Ok(PyDataFrame(self.category_aggregate()?))
    }

    #[pyo3(name = "industry_aggregate")]
    fn py_industry_aggregate(&self) -> PyResult<PyDataFrame> {
        Ok(PyDataFrame(self.industry_aggregate()?))
    }

    #[pyo3(name = "top_categories")]
    fn py_top_categories(&self) -> PyResult<PyDataFrame> {
        Ok(PyDataFrame(self.top_categories()?))
    }

    #[pyo3(name = "top_growth")]
    fn py_top_growth(&self) -> PyResult<PyDataFrame> {
        Ok(PyDataFrame(self.top_growth()?))
    }

    #[pyo3(name = "top_industries")]
    fn py_top_industries(&self) -> PyResult<PyDataFrame> {
        Ok(PyDataFrame(self.top_industries()?))
    }

    #[pyo3(name = "gender_by_category")]
    fn py_gender_by_category(&self) -> PyResult<PyDataFrame> {
        Ok(PyDataFrame(self.gender_by_category()?))
    }

    #[pyo3(name = "preview")]
    fn py_preview(&self) -> PyResult<PyDataFrame> {
        Ok(PyDataFrame(self.preview()?))
    }

    #[getter(geography_column)]
    fn py_geography_column(&self) -> PyResult<Option<String>> {
        Ok(self.geography_column()?)
    }

    #[pyo3(name = "geography_options")]
    fn py_geography_options(&self) -> PyResult<Vec<String>> {
        Ok(self.geography_options()?)
    }

    #[pyo3(name = "category_options")]
    fn py_category_options(&self) -> PyResult<Vec<String>> {
        Ok(self.category_options()?)
    }

    #[pyo3(name = "filtered", signature = (geographies = None, categories = None))]
    fn py_filtered(
        &self,
        geographies: Option<Vec<String>>,
        categories: Option<Vec<String>>,
    ) -> PyResult<PyDataFrame> {
        let filter = py_filter(geographies, categories)?;
        Ok(PyDataFrame(self.filtered(&filter)?))
    }

    #[pyo3(name = "geography_by_category", signature = (geographies = None, categories = None))]
    fn py_geography_by_category(
        &self,
        geographies: Option<Vec<String>>,
        categories: Option<Vec<String>>,
    ) -> PyResult<PyDataFrame> {
        let filter = py_filter(geographies, categories)?;
        Ok(PyDataFrame(self.geography_by_category(&filter)?))
    }

    #[pyo3(name = "sector_share", signature = (geographies = None, categories = None))]
    fn py_sector_share(
        &self,
        geographies: Option<Vec<String>>,
        categories: Option<Vec<String>>,
    ) -> PyResult<PyDataFrame> {
        let filter = py_filter(geographies, categories)?;
        Ok(PyDataFrame(self.sector_share(&filter)?))
    }

    #[pyo3(name = "regional_facts", signature = (geographies = None, categories = None))]
    fn py_regional_facts<'py>(
        &self,
        py: Python<'py>,
        geographies: Option<Vec<String>>,
        categories: Option<Vec<String>>,
    ) -> PyResult<Bound<'py, PyDict>> {
        let facts = self.regional_facts(&py_filter(geographies, categories)?)?;
        let dict = PyDict::new(py);
        dict.set_item("total_workers", facts.total_workers)?;
        dict.set_item("largest_sector", facts.largest_sector.label())?;
        dict.set_item("top_geography", facts.top_geography)?;
        Ok(dict)
    }

    #[pyo3(name = "export_csv", signature = (geographies = None, categories = None))]
    fn py_export_csv<'py>(
        &self,
        py: Python<'py>,
        geographies: Option<Vec<String>>,
        categories: Option<Vec<String>>,
    ) -> PyResult<Bound<'py, PyBytes>> {
        let bytes = self.export_csv(&py_filter(geographies, categories)?)?;
        Ok(PyBytes::new(py, &bytes))
    }

    #[pyo3(name = "insights")]
    fn py_insights<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let insights = self.insights()?;
        let dict = PyDict::new(py);
        dict.set_item("top_industry", insights.top_industry.label())?;
        dict.set_item("top_share", insights.top_share)?;
        dict.set_item("female_percent", insights.female_percent)?;
        dict.set_item("marginal_percent", insights.marginal_percent)?;
        dict.set_item("growth_industry", insights.growth_industry.label())?;
        Ok(dict)
    }

    #[pyo3(name = "summary")]
    fn py_summary<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let summary = self.summary()?;
        let dict = PyDict::new(py);
        dict.set_item("rows", summary.rows)?;
        dict.set_item("total_workers", summary.total_workers)?;
        dict.set_item("industries", summary.industries)?;
        dict.set_item("categories", summary.categories)?;
        Ok(dict)
    }

    #[pyo3(name = "gender_split")]
    fn py_gender_split<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let split = self.gender_split()?;
        let dict = PyDict::new(py);
        dict.set_item("Male", split.male)?;
        dict.set_item("Female", split.female)?;
        Ok(dict)
    }

    #[pyo3(name = "location_split")]
    fn py_location_split<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let split = self.location_split()?;
        let dict = PyDict::new(py);
        dict.set_item("Rural", split.rural)?;
        dict.set_item("Urban", split.urban)?;
        Ok(dict)
    }
}
