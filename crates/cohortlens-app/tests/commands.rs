use std::path::PathBuf;

use cohortlens_app::commands::{App, Command, CommandError, Flow, parse_command};
use cohortlens_app::config::AppConfig;
use cohortlens_app::session::Session;
use cohortlens_core::models::patient::{PatientRecord, PatientStore};
use cohortlens_core::models::prompt::{ModelParameters, PromptField, PromptPair, PromptTemplates};
use cohortlens_export::ExportFormat;
use cohortlens_summarize::error::SummarizerError;
use cohortlens_summarize::service::Summarizer;

struct EchoSummarizer;

impl Summarizer for EchoSummarizer {
    async fn summarize(
        &self,
        prompt: &PromptPair,
        _params: &ModelParameters,
    ) -> Result<String, SummarizerError> {
        Ok(format!("summary of: {}", prompt.system_text))
    }
}

fn app(config_path: PathBuf) -> App<EchoSummarizer> {
    let store = PatientStore::new(vec![
        PatientRecord::new("1", "62", "A", "Chest pain"),
        PatientRecord::new("2", "64", "A", "Dyspnea\u{00C2}\u{00A0}on exertion"),
        PatientRecord::new("3", "70", "B", "Palpitations"),
    ]);
    let session = Session::new(store, PromptTemplates::default());
    App::new(session, EchoSummarizer, AppConfig::default(), config_path)
}

async fn run(app: &mut App<EchoSummarizer>, line: &str) -> String {
    let command = parse_command(line).unwrap().unwrap();
    let mut out = Vec::new();
    app.execute(command, &mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn parses_commands_and_arguments() {
    assert_eq!(parse_command("   ").unwrap(), None);
    assert_eq!(parse_command("select P 01").unwrap(), Some(Command::Select("P 01".into())));
    assert_eq!(
        parse_command("edit patient_user Notes for\\npatients with").unwrap(),
        Some(Command::Edit {
            field: PromptField::PatientUser,
            text: "Notes for\npatients with".into(),
        })
    );
    assert_eq!(
        parse_command("export md out/report.md").unwrap(),
        Some(Command::Export {
            format: ExportFormat::Markdown,
            target: Some(PathBuf::from("out/report.md")),
        })
    );
    assert_eq!(
        parse_command("export results").unwrap(),
        Some(Command::Export {
            format: ExportFormat::Json,
            target: Some(PathBuf::from("results")),
        })
    );
    assert_eq!(parse_command("quit").unwrap(), Some(Command::Quit));
}

#[test]
fn rejects_bad_input() {
    assert_eq!(
        parse_command("frobnicate").unwrap_err(),
        CommandError::Unknown("frobnicate".into())
    );
    assert_eq!(
        parse_command("select").unwrap_err(),
        CommandError::MissingArgument("patient id")
    );
    assert!(matches!(
        parse_command("edit nonsense text").unwrap_err(),
        CommandError::InvalidArgument(_)
    ));
    assert!(matches!(
        parse_command("export json a b").unwrap_err(),
        CommandError::InvalidArgument(_)
    ));
}

#[tokio::test]
async fn select_shows_cohort_and_chart_with_clean_text() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(dir.path().join("config.json"));

    let output = run(&mut app, "select 1").await;

    assert!(output.contains("Cohort peers: 1"));
    assert!(output.contains("Dyspnea on exertion"));
    assert!(!output.contains('\u{00C2}'));
    assert!(output.contains("60-64 |"));
}

#[tokio::test]
async fn unknown_patient_is_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(dir.path().join("config.json"));

    let output = run(&mut app, "select 42").await;

    assert!(output.contains("patient not found: 42"));
    assert!(app.session.selected_patient_id().is_none());
}

#[tokio::test]
async fn generate_then_export_writes_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(dir.path().join("config.json"));

    run(&mut app, "select 1").await;
    let output = run(&mut app, "generate").await;
    assert!(output.contains("== Patient summary"));
    assert!(output.contains("== Population summary"));

    let target = dir.path().join("bundle.json");
    let output = run(&mut app, &format!("export json {}", target.display())).await;
    assert!(output.contains("Exported to"));
    assert!(target.exists());
}

#[tokio::test]
async fn generate_without_selection_prints_message() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(dir.path().join("config.json"));

    let output = run(&mut app, "generate").await;
    assert!(output.contains("no patient selected"));
    assert!(app.session.summaries().is_none());
}

#[tokio::test]
async fn save_prompts_persists_templates() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("nested").join("config.json");
    let mut app = app(config_path.clone());

    run(&mut app, "edit population_user Ages by bin:").await;
    run(&mut app, "save-prompts").await;

    let saved = cohortlens_app::config::load_config(&config_path).unwrap();
    assert_eq!(saved.prompt_templates().population.user_text, "Ages by bin:");
}

#[tokio::test]
async fn check_credentials_without_config_is_a_message() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(dir.path().join("config.json"));

    let output = run(&mut app, "check-credentials").await;
    assert!(output.contains("No AWS credential configured."));
}

#[tokio::test]
async fn quit_ends_the_loop() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(dir.path().join("config.json"));
    let mut out = Vec::new();

    let flow = app.execute(Command::Quit, &mut out).await.unwrap();
    assert_eq!(flow, Flow::Quit);
}
