use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use cohortlens_core::models::prompt::{ModelParameters, PromptPair};
use cohortlens_core::models::summary::{SUMMARY_ERROR_TEXT, SummaryStatus};
use cohortlens_summarize::error::SummarizerError;
use cohortlens_summarize::orchestrate::{GenerateOptions, generate_summaries};
use cohortlens_summarize::prompt::SummaryPrompts;
use cohortlens_summarize::service::Summarizer;

enum Scripted {
    Text(&'static str),
    Fail,
    Hang,
}

/// Answers calls in order from a script and records what it was sent.
struct ScriptedSummarizer {
    script: RefCell<VecDeque<Scripted>>,
    received: RefCell<Vec<PromptPair>>,
}

impl ScriptedSummarizer {
    fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: RefCell::new(script.into()),
            received: RefCell::new(Vec::new()),
        }
    }
}

impl Summarizer for ScriptedSummarizer {
    async fn summarize(
        &self,
        prompt: &PromptPair,
        _params: &ModelParameters,
    ) -> Result<String, SummarizerError> {
        self.received.borrow_mut().push(prompt.clone());
        let next = self.script.borrow_mut().pop_front();
        match next {
            Some(Scripted::Text(text)) => Ok(text.to_string()),
            Some(Scripted::Fail) | None => {
                Err(SummarizerError::Invocation("service unavailable".to_string()))
            }
            Some(Scripted::Hang) => std::future::pending().await,
        }
    }
}

fn prompts() -> SummaryPrompts {
    SummaryPrompts {
        patient: PromptPair::new("patient sys", "patient user"),
        population: PromptPair::new("population sys", "population user"),
    }
}

#[tokio::test]
async fn patient_call_goes_first_then_population() {
    let service = ScriptedSummarizer::new(vec![
        Scripted::Text("patient summary"),
        Scripted::Text("population summary"),
    ]);

    let summaries = generate_summaries(&service, &prompts(), &GenerateOptions::default()).await;

    let received = service.received.borrow();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0], prompts().patient);
    assert_eq!(received[1], prompts().population);

    assert_eq!(summaries.patient.text, "patient summary");
    assert_eq!(summaries.patient.status, SummaryStatus::Complete);
    assert_eq!(summaries.population.text, "population summary");
    assert_eq!(summaries.patient.prompt, prompts().patient);
    assert_eq!(summaries.population.prompt, prompts().population);
    assert_ne!(summaries.patient.request_id, summaries.population.request_id);
}

#[tokio::test]
async fn population_failure_leaves_patient_result_intact() {
    let service = ScriptedSummarizer::new(vec![Scripted::Text("patient summary"), Scripted::Fail]);

    let summaries = generate_summaries(&service, &prompts(), &GenerateOptions::default()).await;

    assert_eq!(summaries.patient.text, "patient summary");
    assert!(summaries.patient.is_complete());
    assert_eq!(summaries.population.text, SUMMARY_ERROR_TEXT);
    assert_eq!(summaries.population.status, SummaryStatus::Failed);
}

#[tokio::test]
async fn patient_failure_does_not_stop_population_call() {
    let service = ScriptedSummarizer::new(vec![Scripted::Fail, Scripted::Text("trend")]);

    let summaries = generate_summaries(&service, &prompts(), &GenerateOptions::default()).await;

    assert_eq!(service.received.borrow().len(), 2);
    assert_eq!(summaries.patient.text, SUMMARY_ERROR_TEXT);
    assert_eq!(summaries.population.text, "trend");
}

#[tokio::test(start_paused = true)]
async fn hung_call_times_out_into_error_text() {
    let service = ScriptedSummarizer::new(vec![Scripted::Hang, Scripted::Text("trend")]);
    let options = GenerateOptions {
        timeout: Duration::from_secs(5),
        ..GenerateOptions::default()
    };

    let summaries = generate_summaries(&service, &prompts(), &options).await;

    assert_eq!(summaries.patient.status, SummaryStatus::Failed);
    assert_eq!(summaries.patient.text, SUMMARY_ERROR_TEXT);
    assert_eq!(summaries.population.text, "trend");
}

#[tokio::test]
async fn results_keep_prompt_snapshot() {
    let service = ScriptedSummarizer::new(vec![Scripted::Text("a"), Scripted::Text("b")]);
    let mut live = prompts();

    let summaries = generate_summaries(&service, &live, &GenerateOptions::default()).await;
    live.patient.user_text.push_str(" edited");

    assert_eq!(summaries.patient.prompt.user_text, "patient user");
}
