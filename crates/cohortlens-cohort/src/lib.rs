//! cohortlens-cohort
//!
//! Cohort derivation. Pure functions of the record set and a patient ID;
//! every call is a full recompute, nothing is cached between selections.

pub mod error;

use std::collections::BTreeMap;

use tracing::debug;

use cohortlens_core::models::age_bin::AgeBin;
use cohortlens_core::models::cohort::Cohort;
use cohortlens_core::models::patient::PatientRecord;

use crate::error::SelectionError;

/// A cohort together with the histogram derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derived {
    pub cohort: Cohort,
    pub age_bins: Vec<AgeBin>,
}

/// Find the focal patient and every other record with the same diagnosis
/// category.
///
/// Category matching is exact: case-sensitive, no trimming or other
/// normalization. Peers are matched by ID, so a record sharing the focal
/// patient's ID is never a peer. Peers keep source order.
pub fn select_cohort(
    records: &[PatientRecord],
    patient_id: &str,
) -> Result<Cohort, SelectionError> {
    if patient_id.is_empty() {
        return Err(SelectionError::NoSelection);
    }

    let focal = records
        .iter()
        .find(|r| r.id == patient_id)
        .ok_or_else(|| SelectionError::NotFound(patient_id.to_string()))?;

    let peers: Vec<PatientRecord> = records
        .iter()
        .filter(|r| r.id != focal.id && r.diagnosis_category == focal.diagnosis_category)
        .cloned()
        .collect();

    debug!(
        patient_id,
        category = %focal.diagnosis_category,
        peers = peers.len(),
        "cohort selected"
    );

    Ok(Cohort {
        focal: focal.clone(),
        peers,
    })
}

/// Bucket the cohort (focal patient included) into 5-year age bins.
///
/// Members whose age does not parse are left out. Empty bins are omitted and
/// the result is sorted ascending by bin start.
pub fn age_histogram(cohort: &Cohort) -> Vec<AgeBin> {
    let mut counts: BTreeMap<u32, u32> = BTreeMap::new();
    let mut unparsed = 0usize;

    for member in cohort.members() {
        match member.age_years() {
            Some(age) => *counts.entry(AgeBin::start_for(age)).or_default() += 1,
            None => unparsed += 1,
        }
    }

    if unparsed > 0 {
        debug!(
            patient_id = %cohort.focal.id,
            unparsed,
            "cohort members with unparseable age left out of histogram"
        );
    }

    counts
        .into_iter()
        .map(|(start, count)| AgeBin::new(start, count))
        .collect()
}

/// Select the cohort for `patient_id` and build its histogram in one step.
pub fn derive(records: &[PatientRecord], patient_id: &str) -> Result<Derived, SelectionError> {
    let cohort = select_cohort(records, patient_id)?;
    let age_bins = age_histogram(&cohort);
    Ok(Derived { cohort, age_bins })
}
