use polars::prelude::*;

use crate::category::IndustryCategory;
use crate::error::DashboardError;
use crate::schema::{derived, source};

/// Turn a validated, string-typed upload into the derived workforce table.
///
/// Every required count column becomes Float64 (unparseable, empty or non-finite
/// cells become 0), then `Total Workers`, `Female Ratio`, `Urban Ratio` and
/// `Industry Category` are appended. Extra columns pass through untouched.
pub fn derive_workforce(raw: DataFrame) -> Result<DataFrame, DashboardError> {
    let coerced: Vec<Expr> = source::NUMERIC.iter().map(|c| coerce_count(c)).collect();

    let female = col(source::MAIN_TOTAL_FEMALES) + col(source::MARGINAL_TOTAL_FEMALES);
    let urban = col(source::MAIN_URBAN_PERSONS) + col(source::MARGINAL_URBAN_PERSONS);

    let mut df = raw
        .lazy()
        .with_columns(coerced)
        .with_column(
            (col(source::MAIN_TOTAL_PERSONS) + col(source::MARGINAL_TOTAL_PERSONS))
                .alias(derived::TOTAL_WORKERS),
        )
        .with_columns([
            safe_ratio(female, col(derived::TOTAL_WORKERS)).alias(derived::FEMALE_RATIO),
            safe_ratio(urban, col(derived::TOTAL_WORKERS)).alias(derived::URBAN_RATIO),
        ])
        .collect()?;

    let categories = classify_column(&df)?;
    df.with_column(categories)?;
    Ok(df)
}

/// Parse a text count column to Float64, substituting 0 for anything unusable.
fn coerce_count(column: &str) -> Expr {
    let parsed = col(column)
        .cast(DataType::String)
        .str()
        .strip_chars(lit(" \t\r\n"))
        .cast(DataType::Float64);
    zero_unless_finite(parsed).alias(column)
}

/// `numerator / denominator`, or 0 when the quotient is infinite or NaN.
fn safe_ratio(numerator: Expr, denominator: Expr) -> Expr {
    zero_unless_finite(numerator / denominator)
}

fn zero_unless_finite(value: Expr) -> Expr {
    when(value.clone().is_finite())
        .then(value)
        .otherwise(lit(0.0))
}

fn classify_column(df: &DataFrame) -> Result<Column, DashboardError> {
    let names = df.column(source::NIC_NAME)?.str()?;
    let labels: Vec<&str> = names
        .into_iter()
        .map(|name| IndustryCategory::classify(name).label())
        .collect();
    Ok(Column::new(derived::INDUSTRY_CATEGORY.into(), &labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::read_upload;
    use crate::test_support::{derived_table, f64_values, str_values, HEADER};

    #[test]
    fn derives_totals_and_ratios() {
        let df = derived_table(&["Crop Farming,80,20,30,10,40,10,40,10,50,10"]);
        assert_eq!(f64_values(&df, derived::TOTAL_WORKERS), vec![100.0]);
        assert_eq!(f64_values(&df, derived::FEMALE_RATIO), vec![0.4]);
        assert_eq!(f64_values(&df, derived::URBAN_RATIO), vec![0.5]);
        assert_eq!(str_values(&df, derived::INDUSTRY_CATEGORY), vec!["Agriculture"]);
    }

    #[test]
    fn garbage_cells_become_zero() {
        let df = derived_table(&["Coal Mining,abc,25, ,n/a,inf,5,1,1,x,"]);
        assert_eq!(f64_values(&df, source::MAIN_TOTAL_PERSONS), vec![0.0]);
        assert_eq!(f64_values(&df, source::MAIN_TOTAL_FEMALES), vec![0.0]);
        assert_eq!(f64_values(&df, source::MAIN_URBAN_PERSONS), vec![0.0]);
        assert_eq!(f64_values(&df, source::MARGINAL_TOTAL_MALES), vec![0.0]);
        assert_eq!(f64_values(&df, derived::TOTAL_WORKERS), vec![25.0]);
        assert_eq!(f64_values(&df, derived::URBAN_RATIO), vec![0.2]);
    }

    #[test]
    fn zero_total_gives_zero_ratios() {
        let df = derived_table(&["Idle Shop,0,0,5,0,3,0,0,0,0,0"]);
        assert_eq!(f64_values(&df, derived::TOTAL_WORKERS), vec![0.0]);
        assert_eq!(f64_values(&df, derived::FEMALE_RATIO), vec![0.0]);
        assert_eq!(f64_values(&df, derived::URBAN_RATIO), vec![0.0]);
    }

    #[test]
    fn ratio_above_one_is_not_clamped() {
        let df = derived_table(&["Poultry unit,10,0,15,0,0,0,0,0,0,0"]);
        assert_eq!(f64_values(&df, derived::FEMALE_RATIO), vec![1.5]);
    }

    #[test]
    fn missing_name_is_classified_other() {
        let df = derived_table(&[",10,0,0,0,0,0,0,0,0,0"]);
        assert_eq!(str_values(&df, derived::INDUSTRY_CATEGORY), vec!["Other"]);
    }

    #[test]
    fn extra_columns_pass_through() {
        let csv = format!("{HEADER},State\nMining,1,0,0,0,0,0,0,0,0,0,Goa\n");
        let df = derive_workforce(read_upload(csv.as_bytes()).unwrap()).unwrap();
        assert_eq!(str_values(&df, "State"), vec!["Goa"]);
    }
}
