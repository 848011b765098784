use polars::prelude::*;
use tracing::debug;

use crate::aggregation::require_rows;
use crate::category::IndustryCategory;
use crate::error::DashboardError;
use crate::schema::{aggregate, derived, geography};

/// Row selection for the regional views. `None` keeps every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkforceFilter {
    pub geographies: Option<Vec<String>>,
    pub categories: Option<Vec<IndustryCategory>>,
}

impl WorkforceFilter {
    pub fn with_geographies<S: Into<String>>(mut self, values: impl IntoIterator<Item = S>) -> Self {
        self.geographies = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_categories(mut self, values: impl IntoIterator<Item = IndustryCategory>) -> Self {
        self.categories = Some(values.into_iter().collect());
        self
    }
}

/// Headline figures for the regional view.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionalFacts {
    /// Workers in rows that carry a geography.
    pub total_workers: f64,
    pub largest_sector: IndustryCategory,
    pub top_geography: String,
}

/// First column, in frame order, whose name mentions a geography hint.
pub fn geography_column(df: &DataFrame) -> Option<String> {
    df.get_column_names_str()
        .into_iter()
        .find(|name| geography::HINTS.iter().any(|hint| name.contains(hint)))
        .map(str::to_string)
}

fn require_geography(df: &DataFrame) -> Result<String, DashboardError> {
    geography_column(df).ok_or_else(|| {
        DashboardError::NoData(format!(
            "upload has no geography column (looked for {})",
            geography::HINTS.join(" or ")
        ))
    })
}

// ── Filtering ───────────────────────────────────────────────────────────────

/// Keep rows whose geography and category are both selected.
///
/// Rows without a geography never match a geography selection.
pub fn filter_rows(df: &DataFrame, filter: &WorkforceFilter) -> Result<DataFrame, DashboardError> {
    let mut lazy = df.clone().lazy();

    if let Some(geographies) = &filter.geographies {
        let geo = require_geography(df)?;
        let selected = Series::new("geographies".into(), geographies.as_slice());
        lazy = lazy.filter(col(geo.as_str()).is_in(lit(selected), false));
    }

    if let Some(categories) = &filter.categories {
        let labels: Vec<&str> = categories.iter().map(|c| c.label()).collect();
        let selected = Series::new("categories".into(), &labels);
        lazy = lazy.filter(col(derived::INDUSTRY_CATEGORY).is_in(lit(selected), false));
    }

    let result = lazy.collect()?;
    debug!(kept = result.height(), of = df.height(), "applied workforce filter");
    Ok(result)
}

/// Sorted distinct geographies, for building a selection.
pub fn geography_options(df: &DataFrame) -> Result<Vec<String>, DashboardError> {
    let geo = require_geography(df)?;
    sorted_distinct(df, &geo)
}

/// Sorted distinct category labels present in the table.
pub fn category_options(df: &DataFrame) -> Result<Vec<String>, DashboardError> {
    sorted_distinct(df, derived::INDUSTRY_CATEGORY)
}

fn sorted_distinct(df: &DataFrame, column: &str) -> Result<Vec<String>, DashboardError> {
    let values = df
        .column(column)?
        .as_materialized_series()
        .drop_nulls()
        .unique()?
        .sort(SortOptions::default())?;
    let values = values
        .str()?
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect();
    Ok(values)
}

// ── Regional aggregates ─────────────────────────────────────────────────────

/// `Total Workers` summed per (geography, category), sorted by both keys.
/// Rows without a geography are left out.
pub fn geography_by_category(df: &DataFrame) -> Result<DataFrame, DashboardError> {
    require_rows(df, "geography breakdown")?;
    let geo = require_geography(df)?;

    let result = df
        .clone()
        .lazy()
        .filter(col(geo.as_str()).is_not_null())
        .group_by([col(geo.as_str()), col(derived::INDUSTRY_CATEGORY)])
        .agg([col(derived::TOTAL_WORKERS).sum()])
        .sort(
            [geo.as_str(), derived::INDUSTRY_CATEGORY],
            SortMultipleOptions::default(),
        )
        .collect()?;
    Ok(result)
}

/// Per-category `Total Workers` and its percent `Share`, in key order.
pub fn sector_share(df: &DataFrame) -> Result<DataFrame, DashboardError> {
    require_rows(df, "sector share")?;

    let total = col(derived::TOTAL_WORKERS).sum();
    let result = df
        .clone()
        .lazy()
        .group_by([col(derived::INDUSTRY_CATEGORY)])
        .agg([col(derived::TOTAL_WORKERS).sum()])
        .sort([derived::INDUSTRY_CATEGORY], SortMultipleOptions::default())
        .with_column(
            when(total.clone().gt(lit(0.0)))
                .then(col(derived::TOTAL_WORKERS) / total * lit(100.0))
                .otherwise(lit(0.0))
                .alias(aggregate::SHARE),
        )
        .collect()?;
    Ok(result)
}

/// Geography with the most workers. Ties go to the first in key order.
pub fn top_geography(df: &DataFrame) -> Result<String, DashboardError> {
    let breakdown = geography_by_category(df)?;
    let geo = require_geography(df)?;
    first_max(totals_by(&breakdown, &geo)?)
        .map(|(key, _)| key)
        .ok_or_else(no_geography_rows)
}

pub fn regional_facts(df: &DataFrame) -> Result<RegionalFacts, DashboardError> {
    let breakdown = geography_by_category(df)?;
    let geo = require_geography(df)?;

    let by_geography = totals_by(&breakdown, &geo)?;
    let by_sector = totals_by(&breakdown, derived::INDUSTRY_CATEGORY)?;
    let total_workers: f64 = by_geography.iter().map(|(_, total)| total).sum();

    let (top_geography, _) = first_max(by_geography).ok_or_else(no_geography_rows)?;
    let (sector, _) = first_max(by_sector).ok_or_else(no_geography_rows)?;
    let largest_sector = IndustryCategory::from_label(&sector).ok_or_else(|| {
        DashboardError::from(PolarsError::ComputeError(
            format!("unknown industry category '{sector}'").into(),
        ))
    })?;

    Ok(RegionalFacts {
        total_workers,
        largest_sector,
        top_geography,
    })
}

/// `Total Workers` summed per `key`, in ascending key order.
fn totals_by(frame: &DataFrame, key: &str) -> Result<Vec<(String, f64)>, DashboardError> {
    let grouped = frame
        .clone()
        .lazy()
        .group_by([col(key)])
        .agg([col(derived::TOTAL_WORKERS).sum()])
        .sort([key], SortMultipleOptions::default())
        .collect()?;

    let keys = grouped.column(key)?.str()?;
    let totals = grouped.column(derived::TOTAL_WORKERS)?.f64()?;
    let rows = keys
        .into_iter()
        .zip(totals)
        .map(|(k, t)| (k.unwrap_or_default().to_string(), t.unwrap_or(0.0)))
        .collect();
    Ok(rows)
}

fn first_max(totals: Vec<(String, f64)>) -> Option<(String, f64)> {
    totals.into_iter().fold(None, |best, (key, total)| match best {
        Some((best_key, best_total)) if best_total >= total => Some((best_key, best_total)),
        _ => Some((key, total)),
    })
}

fn no_geography_rows() -> DashboardError {
    DashboardError::NoData("no rows carry a geography".to_string())
}

// ── Export ──────────────────────────────────────────────────────────────────

/// Serialize `df` as comma-separated text with a header row.
pub fn export_csv(df: &DataFrame) -> Result<Vec<u8>, DashboardError> {
    let mut frame = df.clone();
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .finish(&mut frame)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::read_upload;
    use crate::test_support::{derived_table, derived_table_with, f64_values, str_values};

    fn regional() -> DataFrame {
        derived_table_with(
            "State",
            &[
                "Crop Farming,100,0,0,0,0,0,0,0,0,0,Goa",
                "Steel Factory,200,0,0,0,0,0,0,0,0,0,Kerala",
                "Retail Shop,50,0,0,0,0,0,0,0,0,0,Goa",
                "Rice Farm,30,0,0,0,0,0,0,0,0,0,Kerala",
                "Coal Mining,10,0,0,0,0,0,0,0,0,0,",
            ],
        )
    }

    #[test]
    fn detects_geography_column_by_name() {
        assert_eq!(geography_column(&regional()).as_deref(), Some("State"));

        let df = derived_table_with("Sub_Division", &["Farm,1,0,0,0,0,0,0,0,0,0,North"]);
        assert_eq!(geography_column(&df).as_deref(), Some("Sub_Division"));

        let df = derived_table(&["Farm,1,0,0,0,0,0,0,0,0,0"]);
        assert_eq!(geography_column(&df), None);
    }

    #[test]
    fn breakdown_sums_per_geography_and_category() {
        let breakdown = geography_by_category(&regional()).unwrap();
        assert_eq!(str_values(&breakdown, "State"), vec!["Goa", "Goa", "Kerala", "Kerala"]);
        assert_eq!(
            str_values(&breakdown, derived::INDUSTRY_CATEGORY),
            vec!["Agriculture", "Retail & Trade", "Agriculture", "Manufacturing"]
        );
        assert_eq!(
            f64_values(&breakdown, derived::TOTAL_WORKERS),
            vec![100.0, 50.0, 30.0, 200.0]
        );
    }

    #[test]
    fn facts_skip_rows_without_geography() {
        let facts = regional_facts(&regional()).unwrap();
        assert_eq!(facts.top_geography, "Kerala");
        assert_eq!(facts.largest_sector, IndustryCategory::Manufacturing);
        assert_eq!(facts.total_workers, 380.0);
    }

    #[test]
    fn tied_geographies_go_to_first_in_key_order() {
        let df = derived_table_with(
            "State",
            &[
                "Shop,40,0,0,0,0,0,0,0,0,0,Kerala",
                "Farm,40,0,0,0,0,0,0,0,0,0,Goa",
            ],
        );
        assert_eq!(top_geography(&df).unwrap(), "Goa");
    }

    #[test]
    fn filters_by_geography_and_category() {
        let df = regional();

        let goa = filter_rows(&df, &WorkforceFilter::default().with_geographies(["Goa"])).unwrap();
        assert_eq!(
            str_values(&goa, derived::INDUSTRY_CATEGORY),
            vec!["Agriculture", "Retail & Trade"]
        );

        let farms = filter_rows(
            &df,
            &WorkforceFilter::default().with_categories([IndustryCategory::Agriculture]),
        )
        .unwrap();
        assert_eq!(f64_values(&farms, derived::TOTAL_WORKERS), vec![100.0, 30.0]);

        let everything = filter_rows(&df, &WorkforceFilter::default()).unwrap();
        assert_eq!(everything.height(), 5);
    }

    #[test]
    fn empty_selection_has_no_regional_data() {
        let none = filter_rows(
            &regional(),
            &WorkforceFilter::default()
                .with_geographies(["Goa"])
                .with_categories([IndustryCategory::Manufacturing]),
        )
        .unwrap();
        assert_eq!(none.height(), 0);
        assert!(matches!(
            regional_facts(&none),
            Err(DashboardError::NoData(_))
        ));
    }

    #[test]
    fn geography_selection_needs_a_geography_column() {
        let df = derived_table(&["Farm,1,0,0,0,0,0,0,0,0,0"]);
        let filter = WorkforceFilter::default().with_geographies(["Goa"]);
        assert!(matches!(filter_rows(&df, &filter), Err(DashboardError::NoData(_))));
        assert!(matches!(geography_options(&df), Err(DashboardError::NoData(_))));
    }

    #[test]
    fn options_are_sorted_and_distinct() {
        let df = regional();
        assert_eq!(geography_options(&df).unwrap(), vec!["Goa", "Kerala"]);
        assert_eq!(
            category_options(&df).unwrap(),
            vec!["Agriculture", "Manufacturing", "Mining", "Retail & Trade"]
        );
    }

    #[test]
    fn sector_shares_add_up_to_one_hundred() {
        let shares = sector_share(&regional()).unwrap();
        assert_eq!(
            f64_values(&shares, derived::TOTAL_WORKERS),
            vec![130.0, 200.0, 10.0, 50.0]
        );
        let percents = f64_values(&shares, aggregate::SHARE);
        assert!((percents[1] - 200.0 / 390.0 * 100.0).abs() < 1e-9);
        assert!((percents.iter().sum::<f64>() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_workforce_shares_are_zero() {
        let shares = sector_share(&derived_table(&["Farm,0,0,0,0,0,0,0,0,0,0"])).unwrap();
        assert_eq!(f64_values(&shares, aggregate::SHARE), vec![0.0]);
    }

    #[test]
    fn export_reads_back_as_the_same_rows() {
        let goa = filter_rows(
            &regional(),
            &WorkforceFilter::default().with_geographies(["Goa"]),
        )
        .unwrap();
        let csv = export_csv(&goa).unwrap();
        let back = read_upload(&csv).unwrap();
        assert_eq!(back.height(), 2);
        assert_eq!(back.get_column_names_str(), goa.get_column_names_str());
        assert_eq!(str_values(&back, "State"), vec!["Goa", "Goa"]);
    }
}
