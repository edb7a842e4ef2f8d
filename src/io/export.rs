//! JSON result export.
//!
//! Every command writes one pretty-printed JSON document. Parent directories
//! are created on demand so `--out results/run1/posterior.json` just works.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;

use crate::error::AppError;

/// Serialize `value` as pretty JSON to `path`.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            AppError::new(2, format!("Failed to create output directory '{}': {e}", parent.display()))
        })?;
    }

    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create output JSON '{}': {e}", path.display())))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, value)
        .map_err(|e| AppError::new(2, format!("Failed to write output JSON '{}': {e}", path.display())))?;

    use std::io::Write;
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush output JSON '{}': {e}", path.display())))?;

    tracing::info!(path = %path.display(), "wrote results");
    Ok(())
}
