use polars::prelude::*;

use crate::ingest::read_upload;
use crate::transform::derive_workforce;

pub(crate) const HEADER: &str = "NIC_Name,Main_Workers_Total_Persons,Marginal_Workers_Total_Persons,\
Main_Workers_Total_Females,Marginal_Workers_Total_Females,\
Main_Workers_Urban_Persons,Marginal_Workers_Urban_Persons,\
Main_Workers_Rural_Persons,Marginal_Workers_Rural_Persons,\
Main_Workers_Total_Males,Marginal_Workers_Total_Males";

/// CSV upload with the full required header and the given data lines.
pub(crate) fn upload(rows: &[&str]) -> Vec<u8> {
    let mut csv = String::from(HEADER);
    for row in rows {
        csv.push('\n');
        csv.push_str(row);
    }
    csv.push('\n');
    csv.into_bytes()
}

pub(crate) fn derived_table(rows: &[&str]) -> DataFrame {
    derive_workforce(read_upload(&upload(rows)).unwrap()).unwrap()
}

/// Derived table whose upload carries one extra trailing column.
pub(crate) fn derived_table_with(extra: &str, rows: &[&str]) -> DataFrame {
    let mut csv = format!("{HEADER},{extra}");
    for row in rows {
        csv.push('\n');
        csv.push_str(row);
    }
    csv.push('\n');
    derive_workforce(read_upload(csv.as_bytes()).unwrap()).unwrap()
}

pub(crate) fn f64_values(df: &DataFrame, name: &str) -> Vec<f64> {
    df.column(name)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap())
        .collect()
}

pub(crate) fn str_values(df: &DataFrame, name: &str) -> Vec<String> {
    df.column(name)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect()
}
