//! CSV reports written into the output directory
//!
//! `features.csv` holds a header row of feature names and one row of values.
//! `runtime.csv` holds one row per format with its average time and the
//! selected format id. Formats that were never measured are reported with
//! `f64::MAX` so the file keeps a fixed shape.
//!
//! Both files are written to a temporary file in the target directory and
//! then renamed over the destination.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::constants::{FEATURES_FILENAME, RUNTIME_FILENAME};
use crate::error::ReportError;
use crate::features::FeatureVector;
use crate::tuning::Selection;

/// Creates `dir` if it does not exist yet
///
/// Only the last path component is created, the parent must already exist.
pub fn ensure_output_dir<P: AsRef<Path>>(dir: P) -> Result<(), ReportError> {
    let dir = dir.as_ref();
    if dir.is_dir() {
        return Ok(());
    }

    fs::create_dir(dir).map_err(|source| ReportError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    info!(path = %dir.display(), "created output directory");
    Ok(())
}

/// Writes `features.csv` into `dir`, returning its path
pub fn write_features_csv<P: AsRef<Path>>(dir: P, features: &FeatureVector) -> Result<PathBuf, ReportError> {
    let dir = dir.as_ref();
    let path = dir.join(FEATURES_FILENAME);

    let mut writer = csv::Writer::from_writer(temp_in(dir)?);
    writer.write_record(FeatureVector::names())?;
    writer.write_record(features.values().iter().map(|v| v.to_string()))?;

    persist(writer, &path)?;
    Ok(path)
}

/// Writes `runtime.csv` into `dir`, returning its path
pub fn write_runtime_csv<P: AsRef<Path>>(dir: P, selection: &Selection) -> Result<PathBuf, ReportError> {
    let dir = dir.as_ref();
    let path = dir.join(RUNTIME_FILENAME);

    let mut writer = csv::Writer::from_writer(temp_in(dir)?);
    writer.write_record(["Format", "Timings", "OptimumFormat"])?;
    let optimum = selection.format.index().to_string();
    for (fmt, avg) in selection.averages.iter() {
        writer.write_record([fmt.index().to_string(), format_seconds(avg), optimum.clone()])?;
    }

    persist(writer, &path)?;
    Ok(path)
}

/// Average seconds in scientific notation, `f64::MAX` when unmeasured
pub fn format_seconds(avg: Option<f64>) -> String {
    format!("{:e}", avg.unwrap_or(f64::MAX))
}

fn temp_in(dir: &Path) -> Result<NamedTempFile, ReportError> {
    NamedTempFile::new_in(dir).map_err(|source| ReportError::Write {
        path: dir.to_path_buf(),
        source,
    })
}

fn persist(writer: csv::Writer<NamedTempFile>, path: &Path) -> Result<(), ReportError> {
    let write_err = |source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = writer
        .into_inner()
        .map_err(|e| write_err(e.into_error()))?;
    file.flush().map_err(write_err)?;
    file.persist(path).map_err(|e| write_err(e.error))?;

    debug!(path = %path.display(), "wrote report");
    Ok(())
}
