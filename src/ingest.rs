use std::io::Cursor;

use polars::prelude::*;
use tracing::{debug, info, warn};

use crate::error::DashboardError;

const COMMA: u8 = b',';
const TAB: u8 = b'\t';

/// Parse an uploaded delimited file into a DataFrame with all columns as strings.
///
/// Comma is tried first. If that parse fails, or it only recovers one header that
/// still contains tabs, the bytes are re-read as tab-separated and the tab
/// attempt's error is the one reported. Column names are trimmed and blank
/// lines are skipped.
pub fn read_upload(bytes: &[u8]) -> Result<DataFrame, DashboardError> {
    let bytes = without_blank_lines(bytes);
    let df = match read_delimited(&bytes, COMMA) {
        Ok(df) if !is_tab_joined_header(&df) => df,
        Ok(_) => {
            debug!("comma parse yielded a tab-joined header, retrying as tab-separated");
            read_delimited(&bytes, TAB).map_err(parse_failure)?
        }
        Err(err) => {
            debug!(error = %err, "comma parse failed, retrying as tab-separated");
            read_delimited(&bytes, TAB).map_err(parse_failure)?
        }
    };

    info!(rows = df.height(), columns = df.width(), "loaded upload");
    Ok(df)
}

/// Drop empty and whitespace-only lines. Left in, each one parses as an all-null row.
fn without_blank_lines(bytes: &[u8]) -> Vec<u8> {
    bytes
        .split_inclusive(|b| *b == b'\n')
        .filter(|line| !line.iter().all(u8::is_ascii_whitespace))
        .flatten()
        .copied()
        .collect()
}

fn parse_failure(err: PolarsError) -> DashboardError {
    warn!(error = %err, "upload could not be parsed");
    DashboardError::Parse(err)
}

fn read_delimited(bytes: &[u8], separator: u8) -> PolarsResult<DataFrame> {
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .with_parse_options(CsvParseOptions::default().with_separator(separator))
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()?;

    // Trim whitespace from column names
    let trimmed: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    df.set_column_names(trimmed.as_slice())?;

    Ok(df)
}

fn is_tab_joined_header(df: &DataFrame) -> bool {
    df.width() == 1
        && df
            .get_column_names_str()
            .first()
            .is_some_and(|name| name.contains('\t'))
}
