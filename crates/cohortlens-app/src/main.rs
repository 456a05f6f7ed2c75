use std::path::PathBuf;

use clap::Parser;
use eyre::Result;

use cohortlens_app::commands::{App, Command, Flow};
use cohortlens_app::config;
use cohortlens_app::session::Session;
use cohortlens_export::ExportFormat;

#[derive(Parser, Debug)]
#[command(
    name = "cohortlens",
    about = "Derive a diagnosis cohort for a patient and summarize it with a language model."
)]
struct Args {
    /// CSV extract with ID, Age, Heart_Disease_Type and Diagnoses_Note columns.
    #[arg(short, long)]
    data: PathBuf,

    /// Config file (defaults to the platform config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Select this patient and print the cohort, then exit.
    #[arg(short, long)]
    patient: Option<String>,

    /// With --patient: also generate both summaries.
    #[arg(long, requires = "patient")]
    generate: bool,

    /// With --generate: export the results to this file or directory.
    #[arg(long, requires = "generate")]
    export: Option<PathBuf>,

    /// Export format.
    #[arg(long, default_value = "json")]
    format: ExportFormat,

    /// Emit logs as JSON.
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_tracing(args.log_json);

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => config::default_config_path()?,
    };
    let mut app_config = config::load_config(&config_path)?;
    config::apply_env_overrides(&mut app_config, |key| std::env::var(key).ok());

    let report = cohortlens_data::load_patients(&args.data)?;
    if !report.skipped_rows.is_empty() {
        eprintln!(
            "warning: skipped {} malformed rows: {:?}",
            report.skipped_rows.len(),
            report.skipped_rows
        );
    }

    let sdk_config = cohortlens_app::aws::load_sdk_config(&app_config).await;
    let summarizer = cohortlens_app::aws::build_summarizer(&app_config, sdk_config.as_ref());
    let session = Session::new(report.store, app_config.prompt_templates());

    let mut app = App::new(session, summarizer, app_config, config_path)
        .with_data_path(args.data.clone())
        .with_sdk_config(sdk_config);

    match args.patient {
        Some(patient_id) => {
            let mut commands = vec![Command::Select(patient_id)];
            if args.generate {
                commands.push(Command::Generate);
            }
            if let Some(target) = args.export {
                commands.push(Command::Export {
                    format: args.format,
                    target: Some(target),
                });
            }

            let mut stdout = std::io::stdout();
            for command in commands {
                if app.execute(command, &mut stdout).await? == Flow::Quit {
                    break;
                }
            }
        }
        None => app.run_interactive().await?,
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
