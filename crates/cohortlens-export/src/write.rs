use std::path::{Path, PathBuf};

use tracing::info;

use cohortlens_core::models::export::ExportBundle;

use crate::error::ExportError;
use crate::{ExportFormat, default_file_name, serialize_bundle};

/// Write the bundle to `target`.
///
/// If `target` is an existing directory the default file name is appended.
/// The file is written to a temp sibling and renamed into place.
pub fn write_bundle(
    bundle: &ExportBundle,
    format: ExportFormat,
    target: &Path,
) -> Result<PathBuf, ExportError> {
    let path = if target.is_dir() {
        target.join(default_file_name(bundle, format))
    } else {
        target.to_path_buf()
    };

    let contents = serialize_bundle(bundle, format)?;

    let io_err = |source: std::io::Error| ExportError::Io {
        path: path.display().to_string(),
        source,
    };

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    std::fs::write(&tmp_path, contents.as_bytes()).map_err(io_err)?;
    std::fs::rename(&tmp_path, &path).map_err(io_err)?;

    info!(
        path = %path.display(),
        patient_id = %bundle.selected_patient_id,
        format = %format,
        "summary exported"
    );

    Ok(path)
}
