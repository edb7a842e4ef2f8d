//! Dataset ingest: `(z, D_V/r_d)` table plus covariance matrix.
//!
//! Design goals:
//! - **Strict shape checks** on the covariance (square, matched, symmetric, invertible)
//! - **Row-level validation** on the table (skip bad rows, but report what happened)
//! - **No inference logic here**

use std::fs::File;
use std::path::Path;

use nalgebra::DMatrix;

use crate::domain::BaoDataset;
use crate::error::{InferenceError, Result};

/// A row-level problem encountered while reading the table.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: u64,
    pub message: String,
}

/// Parsed table columns plus any rows that were skipped.
#[derive(Debug, Clone)]
pub struct TableData {
    pub z: Vec<f64>,
    pub dv_over_rd: Vec<f64>,
    pub row_errors: Vec<RowError>,
    pub header: Option<Vec<String>>,
}

/// Loaded dataset with ingest diagnostics.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub dataset: BaoDataset,
    pub row_errors: Vec<RowError>,
}

/// Load and validate a dataset from a table and a covariance file.
pub fn load_dataset(table_path: &Path, cov_path: &Path) -> Result<BaoDataset> {
    Ok(load_dataset_with_report(table_path, cov_path)?.dataset)
}

/// [`load_dataset`], also returning the rows that were skipped.
pub fn load_dataset_with_report(table_path: &Path, cov_path: &Path) -> Result<LoadedDataset> {
    ensure_exists(table_path)?;
    ensure_exists(cov_path)?;

    let table = read_table(table_path)?;
    for err in &table.row_errors {
        tracing::warn!(path = %table_path.display(), line = err.line, "skipped row: {}", err.message);
    }
    if table.z.len() < 2 {
        return Err(InferenceError::InsufficientData {
            what: "dataset table",
            needed: 2,
            found: table.z.len(),
        });
    }

    let cov = read_covariance(cov_path)?;
    let dataset = BaoDataset::new(table.z, table.dv_over_rd, cov)?;
    tracing::debug!(
        table = %table_path.display(),
        cov = %cov_path.display(),
        n = dataset.len(),
        skipped = table.row_errors.len(),
        "dataset loaded"
    );

    Ok(LoadedDataset {
        dataset,
        row_errors: table.row_errors,
    })
}

fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(InferenceError::NotFound(path.to_path_buf()))
    }
}

/// Read a two-column numeric table.
///
/// Blank lines and `#` comments are skipped. A leading non-numeric row is
/// treated as the header. Rows that do not have exactly two numeric columns
/// are recorded in `row_errors` and skipped.
pub fn read_table(path: &Path) -> Result<TableData> {
    let file = File::open(path).map_err(|source| InferenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut out = TableData {
        z: Vec::new(),
        dv_over_rd: Vec::new(),
        row_errors: Vec::new(),
        header: None,
    };
    let mut seen_data = false;

    for (idx, result) in reader.records().enumerate() {
        let fallback_line = idx as u64 + 1;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                out.row_errors.push(RowError {
                    line: e.position().map(|p| p.line()).unwrap_or(fallback_line),
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(fallback_line);

        // Whitespace-only lines and indented comments.
        if record.iter().all(|f| f.is_empty()) || record.get(0).is_some_and(|f| f.starts_with('#')) {
            continue;
        }

        let first = record.get(0).unwrap_or_default();
        if !seen_data && out.header.is_none() && !is_numeric_literal(first) {
            out.header = Some(record.iter().map(str::to_string).collect());
            continue;
        }
        seen_data = true;

        match parse_row(&record) {
            Ok((z, ratio)) => {
                out.z.push(z);
                out.dv_over_rd.push(ratio);
            }
            Err(message) => out.row_errors.push(RowError { line, message }),
        }
    }

    Ok(out)
}

/// A decimal literal: parses as `f64` and contains a digit (so `nan`/`inf` are labels).
fn is_numeric_literal(s: &str) -> bool {
    s.bytes().any(|b| b.is_ascii_digit()) && s.parse::<f64>().is_ok()
}

fn parse_row(record: &csv::StringRecord) -> std::result::Result<(f64, f64), String> {
    if record.len() != 2 {
        return Err(format!("expected 2 columns, found {}", record.len()));
    }
    let parse = |idx: usize, name: &str| -> std::result::Result<f64, String> {
        let raw = record.get(idx).unwrap_or_default();
        let value: f64 = raw
            .parse()
            .map_err(|_| format!("{name} is not a number: '{raw}'"))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(format!("{name} is not finite: '{raw}'"))
        }
    };
    Ok((parse(0, "z")?, parse(1, "dv_over_rd")?))
}

/// Read a whitespace-delimited numeric matrix (`#` comments and blank lines skipped).
pub fn read_covariance(path: &Path) -> Result<DMatrix<f64>> {
    let text = std::fs::read_to_string(path).map_err(|source| InferenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_matrix(&text).map_err(|e| match e {
        InferenceError::Parse(msg) => InferenceError::Parse(format!("{}: {msg}", path.display())),
        other => other,
    })
}

/// Parse the text form of a dense matrix. The result is not checked for squareness.
pub fn parse_matrix(text: &str) -> Result<DMatrix<f64>> {
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|tok| {
                tok.parse::<f64>().map_err(|_| {
                    InferenceError::Parse(format!("line {}: '{tok}' is not a number", idx + 1))
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }

    let Some(ncols) = rows.first().map(Vec::len) else {
        return Err(InferenceError::Shape("covariance file holds no rows".to_string()));
    };
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != ncols) {
        return Err(InferenceError::Shape(format!(
            "covariance row {} has {} columns, expected {ncols}",
            i + 1,
            row.len()
        )));
    }

    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Ok(DMatrix::from_row_slice(rows.len(), ncols, &flat))
}

/// Write a dataset in the format [`load_dataset`] reads.
pub fn write_dataset(
    table_path: &Path,
    cov_path: &Path,
    z: &[f64],
    dv_over_rd: &[f64],
    cov: &DMatrix<f64>,
) -> Result<()> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| InferenceError::Io { path, source }
    };

    for path in [table_path, cov_path] {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err(parent))?;
        }
    }

    let csv_err = |e: csv::Error| InferenceError::Io {
        path: table_path.to_path_buf(),
        source: e.into(),
    };
    let mut writer = csv::Writer::from_path(table_path).map_err(csv_err)?;
    let write = |w: &mut csv::Writer<File>, fields: [String; 2]| w.write_record(&fields).map_err(csv_err);
    write(&mut writer, ["z".to_string(), "dv_over_rd".to_string()])?;
    for (zi, yi) in z.iter().zip(dv_over_rd) {
        write(&mut writer, [format!("{zi}"), format!("{yi:.10}")])?;
    }
    writer.flush().map_err(io_err(table_path))?;

    let mut text = String::new();
    for row in cov.row_iter() {
        let line: Vec<String> = row.iter().map(|v| format!("{v:.10e}")).collect();
        text.push_str(&line.join(" "));
        text.push('\n');
    }
    std::fs::write(cov_path, text).map_err(io_err(cov_path))?;
    Ok(())
}
