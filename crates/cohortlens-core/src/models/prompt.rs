use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const DEFAULT_PATIENT_SYSTEM: &str = "\
You are a clinical assistant. Summarize the diagnosis notes you are given \
into a short paragraph a cardiologist can read at a glance. Do not invent \
findings that are not in the notes.";

const DEFAULT_PATIENT_USER: &str =
    "Summarize the common findings in these diagnosis notes for patients with";

const DEFAULT_POPULATION_SYSTEM: &str = "\
You are a population health analyst. Describe trends in the age distribution \
you are given in two or three sentences.";

const DEFAULT_POPULATION_USER: &str =
    "Describe the age distribution of this patient cohort (age range: count):";

/// A system instruction and a user message sent together in one call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptPair {
    pub system_text: String,
    pub user_text: String,
}

impl PromptPair {
    pub fn new(system_text: impl Into<String>, user_text: impl Into<String>) -> Self {
        Self {
            system_text: system_text.into(),
            user_text: user_text.into(),
        }
    }
}

/// The user-editable templates for both summarization calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplates {
    pub patient: PromptPair,
    pub population: PromptPair,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            patient: PromptPair::new(DEFAULT_PATIENT_SYSTEM, DEFAULT_PATIENT_USER),
            population: PromptPair::new(DEFAULT_POPULATION_SYSTEM, DEFAULT_POPULATION_USER),
        }
    }
}

impl PromptTemplates {
    pub fn get(&self, field: PromptField) -> &str {
        match field {
            PromptField::PatientSystem => &self.patient.system_text,
            PromptField::PatientUser => &self.patient.user_text,
            PromptField::PopulationSystem => &self.population.system_text,
            PromptField::PopulationUser => &self.population.user_text,
        }
    }

    pub fn set(&mut self, field: PromptField, text: impl Into<String>) {
        let slot = match field {
            PromptField::PatientSystem => &mut self.patient.system_text,
            PromptField::PatientUser => &mut self.patient.user_text,
            PromptField::PopulationSystem => &mut self.population.system_text,
            PromptField::PopulationUser => &mut self.population.user_text,
        };
        *slot = text.into();
    }
}

/// Addresses one of the four editable template strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptField {
    PatientSystem,
    PatientUser,
    PopulationSystem,
    PopulationUser,
}

impl PromptField {
    pub const ALL: [PromptField; 4] = [
        PromptField::PatientSystem,
        PromptField::PatientUser,
        PromptField::PopulationSystem,
        PromptField::PopulationUser,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PatientSystem => "patient_system",
            Self::PatientUser => "patient_user",
            Self::PopulationSystem => "population_system",
            Self::PopulationUser => "population_user",
        }
    }
}

impl fmt::Display for PromptField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PromptField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| CoreError::UnknownPromptField(s.to_string()))
    }
}

/// Inference settings passed with every summarization call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            temperature: 0.7,
            top_p: None,
        }
    }
}
