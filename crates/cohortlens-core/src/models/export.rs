use serde::{Deserialize, Serialize};

use super::summary::Summaries;

/// The document written by an export.
///
/// `system_prompt` and `user_prompt` are the patient-level prompts as sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportBundle {
    pub timestamp: jiff::Timestamp,
    pub selected_patient_id: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub patient_summary: String,
    pub population_summary: String,
    pub population_system_prompt: String,
    pub population_user_prompt: String,
}

impl ExportBundle {
    pub fn from_summaries(patient_id: &str, summaries: &Summaries) -> Self {
        Self {
            timestamp: jiff::Timestamp::now(),
            selected_patient_id: patient_id.to_string(),
            system_prompt: summaries.patient.prompt.system_text.clone(),
            user_prompt: summaries.patient.prompt.user_text.clone(),
            patient_summary: summaries.patient.text.clone(),
            population_summary: summaries.population.text.clone(),
            population_system_prompt: summaries.population.prompt.system_text.clone(),
            population_user_prompt: summaries.population.prompt.user_text.clone(),
        }
    }
}
