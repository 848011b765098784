use polars::prelude::*;

use crate::aggregation::{
    aggregate_by, column_sum, records, require_rows, GroupKey, IndustryAggregate,
};
use crate::category::IndustryCategory;
use crate::error::DashboardError;
use crate::schema::{derived, source};

/// Scalar facts shown on the insights tab.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightSummary {
    /// Category employing the most workers.
    pub top_industry: IndustryCategory,
    /// Share of all workers in `top_industry`, in percent.
    pub top_share: f64,
    pub female_percent: f64,
    pub marginal_percent: f64,
    /// Category with the highest Growth Score.
    pub growth_industry: IndustryCategory,
}

/// Compute the insight summary over a derived workforce table.
///
/// Fails with `NoData` when the table has no rows or its total workforce is
/// not positive. Ties on either maximum go to the first category in key order.
pub fn generate_insights(df: &DataFrame) -> Result<InsightSummary, DashboardError> {
    require_rows(df, "insights")?;

    let total_workers = column_sum(df, derived::TOTAL_WORKERS)?;
    if total_workers <= 0.0 {
        return Err(DashboardError::NoData(
            "insights requested for a table with no workers".to_string(),
        ));
    }

    let by_category = records(&aggregate_by(df, GroupKey::Category)?, GroupKey::Category)?;
    let category_total: f64 = by_category.iter().map(|a| a.total_workers).sum();

    let top = first_max(&by_category, |a| a.total_workers)?;
    let growth = first_max(&by_category, |a| a.growth_score)?;

    let female_total = column_sum(df, source::MAIN_TOTAL_FEMALES)?
        + column_sum(df, source::MARGINAL_TOTAL_FEMALES)?;
    let marginal_total = column_sum(df, source::MARGINAL_TOTAL_PERSONS)?;

    Ok(InsightSummary {
        top_industry: category_of(top)?,
        top_share: top.total_workers / category_total * 100.0,
        female_percent: female_total / total_workers * 100.0,
        marginal_percent: marginal_total / total_workers * 100.0,
        growth_industry: category_of(growth)?,
    })
}

/// First aggregate holding the maximum of `metric`.
fn first_max(
    rows: &[IndustryAggregate],
    metric: impl Fn(&IndustryAggregate) -> f64,
) -> Result<&IndustryAggregate, DashboardError> {
    rows.iter()
        .fold(None, |best: Option<&IndustryAggregate>, row| match best {
            Some(b) if metric(b) >= metric(row) => Some(b),
            _ => Some(row),
        })
        .ok_or_else(|| DashboardError::NoData("no categories to rank".to_string()))
}

fn category_of(row: &IndustryAggregate) -> Result<IndustryCategory, DashboardError> {
    IndustryCategory::from_label(&row.key).ok_or_else(|| {
        PolarsError::ComputeError(format!("unknown industry category '{}'", row.key).into())
            .into()
    })
}
