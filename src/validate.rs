use polars::prelude::*;
use tracing::warn;

use crate::error::DashboardError;
use crate::schema::source;

/// Required columns absent from `df`, in the fixed required order.
pub fn missing_columns(df: &DataFrame) -> Vec<String> {
    let schema = df.schema();
    source::REQUIRED
        .iter()
        .filter(|name| !schema.contains(**name))
        .map(|name| name.to_string())
        .collect()
}

/// Reject the whole table if any required column is absent.
pub fn require_columns(df: &DataFrame) -> Result<(), DashboardError> {
    let missing = missing_columns(df);
    if missing.is_empty() {
        return Ok(());
    }
    warn!(missing = ?missing, "upload is missing required columns");
    Err(DashboardError::MissingColumns(missing))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with(columns: &[&str]) -> DataFrame {
        let cols: Vec<Column> = columns
            .iter()
            .map(|name| Column::new((*name).into(), &["0"]))
            .collect();
        DataFrame::new(cols).unwrap()
    }

    #[test]
    fn complete_header_passes() {
        let df = frame_with(&source::REQUIRED);
        assert!(missing_columns(&df).is_empty());
        assert!(require_columns(&df).is_ok());
    }

    #[test]
    fn reports_exactly_the_absent_column() {
        let present: Vec<&str> = source::REQUIRED
            .iter()
            .copied()
            .filter(|c| *c != source::MAIN_TOTAL_MALES)
            .collect();
        let err = require_columns(&frame_with(&present)).unwrap_err();
        assert_eq!(err.missing_columns(), ["Main_Workers_Total_Males".to_string()]);
    }

    #[test]
    fn missing_list_follows_required_order() {
        let df = frame_with(&[source::MAIN_TOTAL_PERSONS, "Unrelated"]);
        let missing = missing_columns(&df);
        assert_eq!(missing.len(), 10);
        assert_eq!(missing[0], source::NIC_NAME);
        assert_eq!(missing[1], source::MARGINAL_TOTAL_PERSONS);
        assert_eq!(missing[9], source::MARGINAL_TOTAL_MALES);
    }
}
