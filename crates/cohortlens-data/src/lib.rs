//! cohortlens-data
//!
//! Loads the EHR extract. Columns are mapped by header name, so column order
//! in the file does not matter and extra columns are ignored.

pub mod error;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use cohortlens_core::models::patient::{PatientRecord, PatientStore};

use crate::error::DataError;

pub const COLUMN_ID: &str = "ID";
pub const COLUMN_AGE: &str = "Age";
pub const COLUMN_CATEGORY: &str = "Heart_Disease_Type";
pub const COLUMN_NOTE: &str = "Diagnoses_Note";

const REQUIRED_COLUMNS: [&str; 4] = [COLUMN_ID, COLUMN_AGE, COLUMN_CATEGORY, COLUMN_NOTE];

/// A CSV row as it appears in the extract.
#[derive(Debug, Deserialize)]
struct Row {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Age")]
    age: String,
    #[serde(rename = "Heart_Disease_Type")]
    diagnosis_category: String,
    #[serde(rename = "Diagnoses_Note")]
    diagnosis_note: String,
}

impl From<Row> for PatientRecord {
    fn from(row: Row) -> Self {
        PatientRecord {
            id: row.id,
            age: row.age,
            diagnosis_category: row.diagnosis_category,
            diagnosis_note: row.diagnosis_note,
        }
    }
}

/// The loaded record set plus the rows that could not be used.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub store: PatientStore,
    /// 1-based data row numbers (header excluded) that were skipped.
    pub skipped_rows: Vec<u64>,
}

/// Load patient records from a CSV file on disk.
pub fn load_patients(path: impl AsRef<Path>) -> Result<LoadReport, DataError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let report = load_patients_from_reader(file)?;

    info!(
        path = %path.display(),
        records = report.store.len(),
        skipped = report.skipped_rows.len(),
        "loaded patient records"
    );

    Ok(report)
}

/// Load patient records from any CSV source.
///
/// All four required columns must be present in the header. Rows with
/// missing fields are skipped and reported; the age field is kept verbatim
/// (after trimming) even if it is not a number.
pub fn load_patients_from_reader<R: Read>(reader: R) -> Result<LoadReport, DataError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DataError::MissingColumn(column));
        }
    }

    let mut records = Vec::new();
    let mut skipped_rows = Vec::new();

    for (index, result) in csv_reader.deserialize::<Row>().enumerate() {
        let row_number = index as u64 + 1;
        match result {
            Ok(row) => records.push(PatientRecord::from(row)),
            Err(e) => {
                warn!(row = row_number, error = %e, "skipping malformed row");
                skipped_rows.push(row_number);
            }
        }
    }

    Ok(LoadReport {
        store: PatientStore::new(records),
        skipped_rows,
    })
}
