//! `name,sales,target` CSV.
//!
//! Export writes fields verbatim with no quoting, so a name containing a comma or a newline
//! produces a line that will not read back as three columns. This matches the exported
//! format consumers already rely on; callers that need safe names must reject such input.

use std::fs;
use std::path::Path;

use thiserror::Error;

use super::input::coerce_amount;
use super::roster::EmployeeRow;

pub const CSV_HEADER: [&str; 3] = ["name", "sales", "target"];

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush csv output: {0}")]
    Flush(String),
    #[error("csv output is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Header line, then one line per row in order. No trailing newline.
pub fn export_csv(rows: &[EmployeeRow]) -> Result<String, CsvError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for row in rows {
        writer.write_record([
            row.name.as_str(),
            row.sales.to_string().as_str(),
            row.target.to_string().as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| CsvError::Flush(err.to_string()))?;
    let mut text = String::from_utf8(bytes)?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Column positions looked up by header name, falling back to the export order.
struct RowColumns {
    name: usize,
    sales: usize,
    target: usize,
}

fn find_row_columns(header: &csv::StringRecord) -> RowColumns {
    let find = |name: &str, fallback: usize| {
        header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .unwrap_or(fallback)
    };
    RowColumns {
        name: find("name", 0),
        sales: find("sales", 1),
        target: find("target", 2),
    }
}

/// Reads rows with a header line. Missing or invalid numbers become 0; every row gets a new id.
pub fn import_csv(text: &str) -> Result<Vec<EmployeeRow>, CsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let columns = find_row_columns(reader.headers()?);
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cell = |index: usize| record.get(index).unwrap_or("");
        rows.push(EmployeeRow::new(
            cell(columns.name),
            coerce_amount(cell(columns.sales)),
            coerce_amount(cell(columns.target)),
        ));
    }
    Ok(rows)
}

pub fn load_rows_csv(path: &Path) -> Result<Vec<EmployeeRow>, CsvError> {
    let raw = fs::read_to_string(path).map_err(|source| CsvError::Io {
        path: path.display().to_string(),
        source,
    })?;
    import_csv(&raw)
}
