use cohortlens_core::models::export::ExportBundle;
use cohortlens_export::render::{render_report, render_template};
use cohortlens_export::write::write_bundle;
use cohortlens_export::{ExportFormat, default_file_name, serialize_bundle};

fn bundle() -> ExportBundle {
    ExportBundle {
        timestamp: "2026-03-14T09:26:53Z".parse().unwrap(),
        selected_patient_id: "P/001".to_string(),
        system_prompt: "You are a clinical assistant.".to_string(),
        user_prompt: "Summarize notes for A:\n1. x".to_string(),
        patient_summary: "Peers mostly report angina & dyspnea.".to_string(),
        population_summary: "Most patients are in their sixties.".to_string(),
        population_system_prompt: "You are an analyst.".to_string(),
        population_user_prompt: "Ages:\n60-64: 2".to_string(),
    }
}

#[test]
fn json_export_carries_all_fields() {
    let json = serialize_bundle(&bundle(), ExportFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["selected_patient_id"], "P/001");
    assert_eq!(value["timestamp"], "2026-03-14T09:26:53Z");
    assert_eq!(value["system_prompt"], "You are a clinical assistant.");
    assert_eq!(value["user_prompt"], "Summarize notes for A:\n1. x");
    assert_eq!(value["patient_summary"], "Peers mostly report angina & dyspnea.");
    assert_eq!(value["population_summary"], "Most patients are in their sixties.");
}

#[test]
fn markdown_report_includes_summaries_unescaped() {
    let report = render_report(&bundle()).unwrap();

    assert!(report.starts_with("# Cohort Summary: Patient P/001"));
    assert!(report.contains("Peers mostly report angina & dyspnea."));
    assert!(report.contains("60-64: 2"));
}

#[test]
fn custom_template_sees_bundle_fields() {
    let rendered =
        render_template("t", "{{ selected_patient_id }}: {{ population_summary }}", &bundle())
            .unwrap();
    assert_eq!(rendered, "P/001: Most patients are in their sixties.");
}

#[test]
fn bad_template_is_a_parse_error() {
    let err = render_template("t", "{{ unclosed", &bundle()).unwrap_err();
    assert!(matches!(err, cohortlens_export::error::ExportError::TemplateParse(_)));
}

#[test]
fn default_file_name_is_filesystem_safe() {
    assert_eq!(
        default_file_name(&bundle(), ExportFormat::Json),
        "cohort_summary_P_001_20260314T092653Z.json"
    );
    assert!(default_file_name(&bundle(), ExportFormat::Markdown).ends_with(".md"));
}

#[test]
fn writing_into_directory_uses_default_name() {
    let dir = tempfile::tempdir().unwrap();

    let path = write_bundle(&bundle(), ExportFormat::Json, dir.path()).unwrap();

    assert_eq!(path.parent(), Some(dir.path()));
    let written: ExportBundle =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written, bundle());
    assert!(!dir.path().join(format!(
        "{}.tmp",
        path.file_name().unwrap().to_string_lossy()
    )).exists());
}

#[test]
fn writing_to_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out.md");

    let path = write_bundle(&bundle(), ExportFormat::Markdown, &target).unwrap();

    assert_eq!(path, target);
    assert!(std::fs::read_to_string(&path).unwrap().contains("## Population Summary"));
}

#[test]
fn format_names_parse() {
    assert_eq!("json".parse::<ExportFormat>(), Ok(ExportFormat::Json));
    assert_eq!("Markdown".parse::<ExportFormat>(), Ok(ExportFormat::Markdown));
    assert!("pdf".parse::<ExportFormat>().is_err());
}
