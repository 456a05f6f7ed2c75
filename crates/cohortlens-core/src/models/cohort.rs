use serde::{Deserialize, Serialize};

use super::patient::PatientRecord;

/// A focal patient and every other patient sharing its diagnosis category.
///
/// `peers` never contains the focal patient and keeps source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cohort {
    pub focal: PatientRecord,
    pub peers: Vec<PatientRecord>,
}

impl Cohort {
    pub fn diagnosis_category(&self) -> &str {
        &self.focal.diagnosis_category
    }

    /// Focal patient first, then peers in source order.
    pub fn members(&self) -> impl Iterator<Item = &PatientRecord> {
        std::iter::once(&self.focal).chain(self.peers.iter())
    }

    /// Number of members including the focal patient.
    pub fn size(&self) -> usize {
        self.peers.len() + 1
    }
}
