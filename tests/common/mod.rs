#![allow(dead_code)]

use polars::prelude::*;

pub use _core::schema::source::REQUIRED;

/// Join `header` and `rows` with `sep` into upload bytes.
pub fn delimited(header: &[&str], rows: &[Vec<String>], sep: char) -> Vec<u8> {
    let sep = sep.to_string();
    let mut text = header.join(&sep);
    for row in rows {
        text.push('\n');
        text.push_str(&row.join(&sep));
    }
    text.push('\n');
    text.into_bytes()
}

/// Comma-separated upload with the full required header.
pub fn csv(rows: &[&str]) -> Vec<u8> {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|r| r.split(',').map(str::to_string).collect())
        .collect();
    delimited(&REQUIRED, &rows, ',')
}

pub fn f64_values(df: &DataFrame, name: &str) -> Vec<f64> {
    df.column(name)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap())
        .collect()
}

pub fn str_values(df: &DataFrame, name: &str) -> Vec<String> {
    df.column(name)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect()
}
