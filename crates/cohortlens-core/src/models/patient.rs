use serde::{Deserialize, Serialize};

/// One row of the EHR extract.
///
/// `age` is kept as the raw source text. Use [`PatientRecord::age_years`] to
/// get the parsed value; records whose age does not parse are still valid
/// cohort members, they just never land in a histogram bin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: String,
    pub age: String,
    pub diagnosis_category: String,
    pub diagnosis_note: String,
}

impl PatientRecord {
    pub fn new(
        id: impl Into<String>,
        age: impl Into<String>,
        diagnosis_category: impl Into<String>,
        diagnosis_note: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            age: age.into(),
            diagnosis_category: diagnosis_category.into(),
            diagnosis_note: diagnosis_note.into(),
        }
    }

    /// Age in whole years, or `None` if the source text is not a
    /// non-negative integer.
    pub fn age_years(&self) -> Option<u32> {
        self.age.trim().parse().ok()
    }
}

/// The record set for one session. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientStore {
    records: Vec<PatientRecord>,
}

impl PatientStore {
    pub fn new(records: Vec<PatientRecord>) -> Self {
        Self { records }
    }

    /// All records in source order.
    pub fn records(&self) -> &[PatientRecord] {
        &self.records
    }

    /// First record with the given ID. IDs are assumed unique but this is
    /// not enforced.
    pub fn get(&self, id: &str) -> Option<&PatientRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<PatientRecord>> for PatientStore {
    fn from(records: Vec<PatientRecord>) -> Self {
        Self::new(records)
    }
}
