//! cohortlens-export
//!
//! Serializes a summary bundle to JSON or a rendered Markdown report and
//! writes it to disk.

pub mod error;
pub mod render;
pub mod write;

use std::fmt;
use std::str::FromStr;

use cohortlens_core::models::export::ExportBundle;

use crate::error::ExportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Markdown,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "md" | "markdown" => Ok(Self::Markdown),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

/// Serialize the bundle in the requested format.
pub fn serialize_bundle(
    bundle: &ExportBundle,
    format: ExportFormat,
) -> Result<String, ExportError> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(bundle)?),
        ExportFormat::Markdown => render::render_report(bundle),
    }
}

/// `cohort_summary_{patient_id}_{timestamp}.{ext}`, with anything outside
/// `[A-Za-z0-9_-]` in the patient ID replaced by `_`.
pub fn default_file_name(bundle: &ExportBundle, format: ExportFormat) -> String {
    let patient: String = bundle
        .selected_patient_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();

    format!(
        "cohort_summary_{}_{}.{}",
        patient,
        bundle.timestamp.strftime("%Y%m%dT%H%M%SZ"),
        format.extension()
    )
}
