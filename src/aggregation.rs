use polars::prelude::*;

use crate::error::DashboardError;
use crate::schema::{aggregate, derived, source};

/// Grouping dimension for workforce aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    /// `Industry Category`
    Category,
    /// Raw `NIC_Name`; rows without a name are left out.
    Industry,
}

impl GroupKey {
    pub fn column(self) -> &'static str {
        match self {
            Self::Category => derived::INDUSTRY_CATEGORY,
            Self::Industry => source::NIC_NAME,
        }
    }
}

/// Metric used for top-N selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankBy {
    TotalWorkers,
    GrowthScore,
}

impl RankBy {
    pub fn column(self) -> &'static str {
        match self {
            Self::TotalWorkers => derived::TOTAL_WORKERS,
            Self::GrowthScore => aggregate::GROWTH_SCORE,
        }
    }
}

/// One row of an aggregate frame.
#[derive(Debug, Clone, PartialEq)]
pub struct IndustryAggregate {
    pub key: String,
    pub total_workers: f64,
    pub female_ratio: f64,
    pub urban_ratio: f64,
    pub growth_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenderSplit {
    pub male: f64,
    pub female: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationSplit {
    pub rural: f64,
    pub urban: f64,
}

/// Headline figures for the whole table.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkforceSummary {
    pub rows: usize,
    pub total_workers: f64,
    /// Distinct non-null `NIC_Name` values.
    pub industries: usize,
    pub categories: usize,
}

// ── Grouped aggregates ──────────────────────────────────────────────────────

/// Group the derived table by `key`.
///
/// Output columns: key, `Total Workers` (sum), `Female Ratio` and `Urban Ratio`
/// (plain mean over member rows, not weighted by Total Workers) and
/// `Growth Score`. Groups are listed in ascending key order.
pub fn aggregate_by(df: &DataFrame, key: GroupKey) -> Result<DataFrame, DashboardError> {
    require_rows(df, "aggregate")?;

    let mut lazy = df.clone().lazy();
    if key == GroupKey::Industry {
        lazy = lazy.filter(col(key.column()).is_not_null());
    }

    let result = lazy
        .group_by([col(key.column())])
        .agg([
            col(derived::TOTAL_WORKERS).sum(),
            col(derived::FEMALE_RATIO).mean(),
            col(derived::URBAN_RATIO).mean(),
        ])
        .sort([key.column()], SortMultipleOptions::default())
        .with_column(growth_score())
        .collect()?;

    Ok(result)
}

fn growth_score() -> Expr {
    (col(derived::URBAN_RATIO) * lit(aggregate::URBAN_WEIGHT)
        + col(derived::FEMALE_RATIO) * lit(aggregate::FEMALE_WEIGHT))
    .alias(aggregate::GROWTH_SCORE)
}

/// Keep the `n` largest rows by `rank`. Ties keep their incoming order.
pub fn top_n(aggregated: &DataFrame, rank: RankBy, n: usize) -> Result<DataFrame, DashboardError> {
    let limit = IdxSize::try_from(n).unwrap_or(IdxSize::MAX);
    let result = aggregated
        .clone()
        .lazy()
        .sort(
            [rank.column()],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )
        .limit(limit)
        .collect()?;
    Ok(result)
}

/// Read an [`aggregate_by`] frame back into records.
pub fn records(
    aggregated: &DataFrame,
    key: GroupKey,
) -> Result<Vec<IndustryAggregate>, DashboardError> {
    let keys = aggregated.column(key.column())?.str()?;
    let totals = aggregated.column(derived::TOTAL_WORKERS)?.f64()?;
    let female = aggregated.column(derived::FEMALE_RATIO)?.f64()?;
    let urban = aggregated.column(derived::URBAN_RATIO)?.f64()?;
    let growth = aggregated.column(aggregate::GROWTH_SCORE)?.f64()?;

    let rows = (0..aggregated.height())
        .map(|i| IndustryAggregate {
            key: keys.get(i).unwrap_or_default().to_string(),
            total_workers: totals.get(i).unwrap_or(0.0),
            female_ratio: female.get(i).unwrap_or(0.0),
            urban_ratio: urban.get(i).unwrap_or(0.0),
            growth_score: growth.get(i).unwrap_or(0.0),
        })
        .collect();
    Ok(rows)
}

/// Per-category Total Workers with main male and female counts, `n` largest.
pub fn gender_by_category(df: &DataFrame, n: usize) -> Result<DataFrame, DashboardError> {
    require_rows(df, "gender breakdown")?;

    let grouped = df
        .clone()
        .lazy()
        .group_by([col(derived::INDUSTRY_CATEGORY)])
        .agg([
            col(derived::TOTAL_WORKERS).sum(),
            col(source::MAIN_TOTAL_MALES).sum(),
            col(source::MAIN_TOTAL_FEMALES).sum(),
        ])
        .sort([derived::INDUSTRY_CATEGORY], SortMultipleOptions::default())
        .collect()?;

    top_n(&grouped, RankBy::TotalWorkers, n)
}

// ── Whole-table figures ─────────────────────────────────────────────────────

pub fn gender_split(df: &DataFrame) -> Result<GenderSplit, DashboardError> {
    require_rows(df, "gender composition")?;
    Ok(GenderSplit {
        male: column_sum(df, source::MAIN_TOTAL_MALES)?
            + column_sum(df, source::MARGINAL_TOTAL_MALES)?,
        female: column_sum(df, source::MAIN_TOTAL_FEMALES)?
            + column_sum(df, source::MARGINAL_TOTAL_FEMALES)?,
    })
}

pub fn location_split(df: &DataFrame) -> Result<LocationSplit, DashboardError> {
    require_rows(df, "location composition")?;
    Ok(LocationSplit {
        rural: column_sum(df, source::MAIN_RURAL_PERSONS)?
            + column_sum(df, source::MARGINAL_RURAL_PERSONS)?,
        urban: column_sum(df, source::MAIN_URBAN_PERSONS)?
            + column_sum(df, source::MARGINAL_URBAN_PERSONS)?,
    })
}

pub fn summary(df: &DataFrame) -> Result<WorkforceSummary, DashboardError> {
    require_rows(df, "summary")?;

    Ok(WorkforceSummary {
        rows: df.height(),
        total_workers: column_sum(df, derived::TOTAL_WORKERS)?,
        industries: df.column(source::NIC_NAME)?.drop_nulls().n_unique()?,
        categories: df.column(derived::INDUSTRY_CATEGORY)?.drop_nulls().n_unique()?,
    })
}

pub(crate) fn column_sum(df: &DataFrame, column: &str) -> Result<f64, DashboardError> {
    Ok(df.column(column)?.f64()?.sum().unwrap_or(0.0))
}

pub(crate) fn require_rows(df: &DataFrame, what: &str) -> Result<(), DashboardError> {
    if df.height() == 0 {
        return Err(DashboardError::NoData(format!(
            "{what} requested for an empty table"
        )));
    }
    Ok(())
}
