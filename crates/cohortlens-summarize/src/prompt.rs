//! Turns the editable templates plus cohort data into concrete prompts.
//!
//! Pure string composition. The same inputs always give byte-identical
//! output.

use serde::{Deserialize, Serialize};

use cohortlens_core::models::age_bin::AgeBin;
use cohortlens_core::models::cohort::Cohort;
use cohortlens_core::models::prompt::{PromptPair, PromptTemplates};

/// The two prompts for one generate action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryPrompts {
    pub patient: PromptPair,
    pub population: PromptPair,
}

/// Patient-level prompt.
///
/// The user text is `"{template} {category}:\n"` followed by the peers'
/// diagnosis notes as a 1-based numbered list, one per line, in cohort order.
pub fn build_patient_prompt(template: &PromptPair, cohort: &Cohort) -> PromptPair {
    let notes = cohort
        .peers
        .iter()
        .enumerate()
        .map(|(i, peer)| format!("{}. {}", i + 1, peer.diagnosis_note))
        .collect::<Vec<_>>()
        .join("\n");

    PromptPair {
        system_text: template.system_text.clone(),
        user_text: format!(
            "{} {}:\n{}",
            template.user_text,
            cohort.diagnosis_category(),
            notes
        ),
    }
}

/// Population-level prompt: the template, then one `"{range}: {count}"` line
/// per bin in the order given.
pub fn build_population_prompt(template: &PromptPair, age_bins: &[AgeBin]) -> PromptPair {
    let lines = age_bins
        .iter()
        .map(|bin| format!("{}: {}", bin.range_label, bin.count))
        .collect::<Vec<_>>()
        .join("\n");

    PromptPair {
        system_text: template.system_text.clone(),
        user_text: format!("{}\n{}", template.user_text, lines),
    }
}

pub fn build_prompts(
    templates: &PromptTemplates,
    cohort: &Cohort,
    age_bins: &[AgeBin],
) -> SummaryPrompts {
    SummaryPrompts {
        patient: build_patient_prompt(&templates.patient, cohort),
        population: build_population_prompt(&templates.population, age_bins),
    }
}
