//! Session state and recompute wiring.
//!
//! Each mutation states exactly what it invalidates:
//!
//! | Mutation | Cohort / histogram | Summaries |
//! |---|---|---|
//! | `select_patient(id)` | recomputed | cleared if the patient changed |
//! | `select_patient("")` / `deselect()` | cleared | cleared |
//! | `replace_records(store)` | recomputed for the current selection | cleared if the patient is gone |
//! | `edit_prompt` / `restore_default_prompts` | untouched | untouched |
//! | `generate_summaries` | untouched | replaced as a pair |
//!
//! Nothing triggers summarization except `generate_summaries`.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use cohortlens_cohort::error::SelectionError;
use cohortlens_core::models::age_bin::AgeBin;
use cohortlens_core::models::cohort::Cohort;
use cohortlens_core::models::export::ExportBundle;
use cohortlens_core::models::patient::PatientStore;
use cohortlens_core::models::prompt::{PromptField, PromptTemplates};
use cohortlens_core::models::summary::Summaries;
use cohortlens_export::ExportFormat;
use cohortlens_export::error::ExportError;
use cohortlens_summarize::orchestrate::{GenerateOptions, generate_summaries};
use cohortlens_summarize::prompt::{SummaryPrompts, build_prompts};
use cohortlens_summarize::service::Summarizer;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no patient selected")]
    NoSelection,

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("nothing to export: generate summaries first")]
    NothingToExport,

    #[error(transparent)]
    Export(#[from] ExportError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Unselected,
    Selected {
        patient_id: String,
        cohort: Cohort,
        age_bins: Vec<AgeBin>,
    },
}

pub struct Session {
    store: PatientStore,
    templates: PromptTemplates,
    selection: Selection,
    summaries: Option<Summaries>,
}

impl Session {
    pub fn new(store: PatientStore, templates: PromptTemplates) -> Self {
        Self {
            store,
            templates,
            selection: Selection::Unselected,
            summaries: None,
        }
    }

    pub fn store(&self) -> &PatientStore {
        &self.store
    }

    pub fn templates(&self) -> &PromptTemplates {
        &self.templates
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_patient_id(&self) -> Option<&str> {
        match &self.selection {
            Selection::Selected { patient_id, .. } => Some(patient_id),
            Selection::Unselected => None,
        }
    }

    pub fn cohort(&self) -> Option<&Cohort> {
        match &self.selection {
            Selection::Selected { cohort, .. } => Some(cohort),
            Selection::Unselected => None,
        }
    }

    /// Histogram for the current cohort; empty when nothing is selected.
    pub fn age_bins(&self) -> &[AgeBin] {
        match &self.selection {
            Selection::Selected { age_bins, .. } => age_bins,
            Selection::Unselected => &[],
        }
    }

    pub fn summaries(&self) -> Option<&Summaries> {
        self.summaries.as_ref()
    }

    /// Select a patient and recompute its cohort and histogram.
    ///
    /// An empty ID deselects and returns `None`. An unknown ID leaves the
    /// session untouched and returns [`SelectionError::NotFound`].
    pub fn select_patient(&mut self, patient_id: &str) -> Result<Option<&Cohort>, SessionError> {
        if patient_id.is_empty() {
            self.deselect();
            return Ok(None);
        }

        let derived = cohortlens_cohort::derive(self.store.records(), patient_id)?;

        if self.selected_patient_id() != Some(patient_id) {
            self.summaries = None;
        }

        info!(
            patient_id,
            peers = derived.cohort.peers.len(),
            bins = derived.age_bins.len(),
            "patient selected"
        );

        self.selection = Selection::Selected {
            patient_id: patient_id.to_string(),
            cohort: derived.cohort,
            age_bins: derived.age_bins,
        };

        Ok(self.cohort())
    }

    /// Back to the initial state. Clears cohort, histogram, and summaries.
    pub fn deselect(&mut self) {
        if self.selected_patient_id().is_some() {
            info!("patient deselected");
        }
        self.selection = Selection::Unselected;
        self.summaries = None;
    }

    /// Swap in a new record set and recompute the current selection against it.
    pub fn replace_records(&mut self, store: PatientStore) {
        self.store = store;

        let Some(patient_id) = self.selected_patient_id().map(str::to_string) else {
            return;
        };

        match cohortlens_cohort::derive(self.store.records(), &patient_id) {
            Ok(derived) => {
                self.selection = Selection::Selected {
                    patient_id,
                    cohort: derived.cohort,
                    age_bins: derived.age_bins,
                };
            }
            Err(_) => {
                info!(patient_id = %patient_id, "selected patient missing from new records");
                self.deselect();
            }
        }
    }

    /// Change one template string. Derived data and summaries are kept.
    pub fn edit_prompt(&mut self, field: PromptField, text: impl Into<String>) {
        self.templates.set(field, text);
    }

    pub fn restore_default_prompts(&mut self) {
        self.templates = PromptTemplates::default();
    }

    /// The prompts a generate action would send right now.
    pub fn current_prompts(&self) -> Result<SummaryPrompts, SessionError> {
        match &self.selection {
            Selection::Selected {
                cohort, age_bins, ..
            } => Ok(build_prompts(&self.templates, cohort, age_bins)),
            Selection::Unselected => Err(SessionError::NoSelection),
        }
    }

    /// Run both summarization calls for the selected patient.
    ///
    /// Templates are read once, before the first call. The previous pair of
    /// results stays in place until both new calls have resolved, then both
    /// are replaced together.
    pub async fn generate_summaries<S: Summarizer>(
        &mut self,
        service: &S,
        options: &GenerateOptions,
    ) -> Result<&Summaries, SessionError> {
        let prompts = self.current_prompts()?;

        let summaries = generate_summaries(service, &prompts, options).await;

        Ok(self.summaries.insert(summaries))
    }

    /// Snapshot of the current results for export.
    pub fn export_bundle(&self) -> Result<ExportBundle, SessionError> {
        let patient_id = self.selected_patient_id().ok_or(SessionError::NoSelection)?;
        let summaries = self.summaries.as_ref().ok_or(SessionError::NothingToExport)?;
        Ok(ExportBundle::from_summaries(patient_id, summaries))
    }

    pub fn export(&self, format: ExportFormat, target: &Path) -> Result<PathBuf, SessionError> {
        let bundle = self.export_bundle()?;
        Ok(cohortlens_export::write::write_bundle(&bundle, format, target)?)
    }
}
