//! Interactive command loop.
//!
//! Every command runs to completion before the next line is read. Failures
//! are printed in place of the output and never end the loop.

use std::io::Write;
use std::path::PathBuf;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use cohortlens_core::models::prompt::PromptField;
use cohortlens_core::models::summary::SummaryResult;
use cohortlens_export::ExportFormat;
use cohortlens_summarize::service::Summarizer;

use crate::chart::render_age_chart;
use crate::config::{self, AppConfig};
use crate::display::sanitize_display_text;
use crate::session::{Selection, Session};

const CHART_WIDTH: usize = 40;

const HELP: &str = "\
Commands:
  list                         list all patients
  select <id>                  select a patient and derive the cohort
  deselect                     clear the selection
  show                         show the current cohort and summaries
  chart                        draw the cohort age histogram
  prompts                      show templates and the prompts that would be sent
  edit <field> <text>          edit a template (\\n for newline)
                               fields: patient_system, patient_user,
                                       population_system, population_user
  restore                      restore the default templates
  save-prompts                 save the current templates to the config file
  generate                     generate patient and population summaries
  export [json|md] [path]      export the current summaries
  reload                       reload the patient data file
  config                       show the active configuration
  check-credentials            validate the AWS credential
  help                         show this help
  quit                         exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Select(String),
    Deselect,
    Show,
    Chart,
    Prompts,
    Edit { field: PromptField, text: String },
    Restore,
    SavePrompts,
    Generate,
    Export {
        format: ExportFormat,
        target: Option<PathBuf>,
    },
    Reload,
    Config,
    CheckCredentials,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Parse one input line. Blank lines parse to `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let command = match name {
        "list" | "ls" => Command::List,
        "select" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument("patient id"));
            }
            Command::Select(rest.to_string())
        }
        "deselect" => Command::Deselect,
        "show" => Command::Show,
        "chart" => Command::Chart,
        "prompts" => Command::Prompts,
        "edit" => {
            let (field, text) = rest
                .split_once(char::is_whitespace)
                .map(|(f, t)| (f, t.trim_start()))
                .unwrap_or((rest, ""));
            if field.is_empty() {
                return Err(CommandError::MissingArgument("field"));
            }
            let field: PromptField = field
                .parse()
                .map_err(|e: cohortlens_core::error::CoreError| {
                    CommandError::InvalidArgument(e.to_string())
                })?;
            Command::Edit {
                field,
                text: text.replace("\\n", "\n"),
            }
        }
        "restore" => Command::Restore,
        "save-prompts" => Command::SavePrompts,
        "generate" | "gen" => Command::Generate,
        "export" => parse_export(rest)?,
        "reload" => Command::Reload,
        "config" => Command::Config,
        "check-credentials" => Command::CheckCredentials,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(Some(command))
}

fn parse_export(rest: &str) -> Result<Command, CommandError> {
    let mut args = rest.split_whitespace();
    let mut format = ExportFormat::default();
    let mut target = None;

    if let Some(first) = args.next() {
        match first.parse::<ExportFormat>() {
            Ok(f) => {
                format = f;
                target = args.next().map(PathBuf::from);
            }
            Err(_) => target = Some(PathBuf::from(first)),
        }
    }

    if let Some(extra) = args.next() {
        return Err(CommandError::InvalidArgument(format!(
            "unexpected argument: {extra}"
        )));
    }

    Ok(Command::Export { format, target })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The session plus everything needed to act on it.
pub struct App<S> {
    pub session: Session,
    summarizer: S,
    config: AppConfig,
    config_path: PathBuf,
    data_path: Option<PathBuf>,
    sdk_config: Option<aws_config::SdkConfig>,
}

impl<S: Summarizer> App<S> {
    pub fn new(session: Session, summarizer: S, config: AppConfig, config_path: PathBuf) -> Self {
        Self {
            session,
            summarizer,
            config,
            config_path,
            data_path: None,
            sdk_config: None,
        }
    }

    pub fn with_data_path(mut self, path: PathBuf) -> Self {
        self.data_path = Some(path);
        self
    }

    pub fn with_sdk_config(mut self, sdk_config: Option<aws_config::SdkConfig>) -> Self {
        self.sdk_config = sdk_config;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Read commands from stdin until `quit` or end of input.
    pub async fn run_interactive(&mut self) -> eyre::Result<()> {
        let mut stdout = std::io::stdout();
        writeln!(
            stdout,
            "{} patients loaded. Type `help` for commands.",
            self.session.store().len()
        )?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            write!(stdout, "> ")?;
            stdout.flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match parse_command(&line) {
                Ok(Some(command)) => {
                    if self.execute(command, &mut stdout).await? == Flow::Quit {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => writeln!(stdout, "{e}")?,
            }
        }

        Ok(())
    }

    /// Run one command, writing its output to `out`.
    ///
    /// Only failures to write to `out` are returned as errors.
    pub async fn execute<W: Write>(
        &mut self,
        command: Command,
        out: &mut W,
    ) -> eyre::Result<Flow> {
        match command {
            Command::List => self.write_patient_list(out)?,
            Command::Select(id) => {
                let selected = self.session.select_patient(&id).map(|_| ());
                match selected {
                    Ok(()) => self.write_cohort(out)?,
                    Err(e) => writeln!(out, "{e}")?,
                }
            }
            Command::Deselect => {
                self.session.deselect();
                writeln!(out, "Selection cleared.")?;
            }
            Command::Show => {
                self.write_cohort(out)?;
                self.write_summaries(out)?;
            }
            Command::Chart => self.write_chart(out)?,
            Command::Prompts => self.write_prompts(out)?,
            Command::Edit { field, text } => {
                self.session.edit_prompt(field, text);
                writeln!(out, "Updated {field}.")?;
            }
            Command::Restore => {
                self.session.restore_default_prompts();
                writeln!(out, "Default prompts restored.")?;
            }
            Command::SavePrompts => {
                self.config.prompts = Some(self.session.templates().clone());
                match config::save_config(&self.config, &self.config_path) {
                    Ok(()) => writeln!(out, "Prompts saved to {}.", self.config_path.display())?,
                    Err(e) => writeln!(out, "Could not save prompts: {e}")?,
                }
            }
            Command::Generate => {
                writeln!(out, "Generating summaries...")?;
                let options = self.config.generate_options();
                let generated = self
                    .session
                    .generate_summaries(&self.summarizer, &options)
                    .await
                    .map(|_| ());
                match generated {
                    Ok(()) => self.write_summaries(out)?,
                    Err(e) => writeln!(out, "{e}")?,
                }
            }
            Command::Export { format, target } => {
                let target = target.unwrap_or_else(|| PathBuf::from("."));
                match self.session.export(format, &target) {
                    Ok(path) => writeln!(out, "Exported to {}.", path.display())?,
                    Err(e) => writeln!(out, "{e}")?,
                }
            }
            Command::Reload => self.reload(out)?,
            Command::Config => {
                let info = config::config_info(&self.config);
                writeln!(out, "{}", serde_json::to_string_pretty(&info)?)?;
            }
            Command::CheckCredentials => self.check_credentials(out).await?,
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn reload<W: Write>(&mut self, out: &mut W) -> eyre::Result<()> {
        let Some(path) = &self.data_path else {
            writeln!(out, "No data file to reload.")?;
            return Ok(());
        };

        match cohortlens_data::load_patients(path) {
            Ok(report) => {
                let skipped = report.skipped_rows.len();
                self.session.replace_records(report.store);
                writeln!(
                    out,
                    "Reloaded {} patients ({skipped} rows skipped).",
                    self.session.store().len()
                )?;
                if self.session.selected_patient_id().is_some() {
                    self.write_cohort(out)?;
                }
            }
            Err(e) => {
                warn!(error = %e, "reload failed");
                writeln!(out, "Reload failed: {e}")?;
            }
        }
        Ok(())
    }

    async fn check_credentials<W: Write>(&self, out: &mut W) -> eyre::Result<()> {
        let Some(sdk_config) = &self.sdk_config else {
            writeln!(out, "No AWS credential configured.")?;
            return Ok(());
        };

        match crate::aws::validate_credentials(sdk_config).await {
            Ok(identity) => writeln!(
                out,
                "Credentials valid: account {} ({})",
                identity.account_id, identity.arn
            )?,
            Err(e) => writeln!(out, "Credential check failed: {e}")?,
        }
        Ok(())
    }

    fn write_patient_list<W: Write>(&self, out: &mut W) -> eyre::Result<()> {
        let records = self.session.store().records();
        if records.is_empty() {
            writeln!(out, "No patients loaded.")?;
            return Ok(());
        }

        for record in records {
            writeln!(
                out,
                "{:<10} {:>4}  {}",
                sanitize_display_text(&record.id),
                sanitize_display_text(&record.age),
                sanitize_display_text(&record.diagnosis_category)
            )?;
        }
        Ok(())
    }

    fn write_cohort<W: Write>(&self, out: &mut W) -> eyre::Result<()> {
        let Selection::Selected { cohort, .. } = self.session.selection() else {
            writeln!(out, "No patient selected.")?;
            return Ok(());
        };

        let focal = &cohort.focal;
        writeln!(
            out,
            "Patient {} (age {}): {}",
            sanitize_display_text(&focal.id),
            sanitize_display_text(&focal.age),
            sanitize_display_text(&focal.diagnosis_category)
        )?;
        writeln!(out, "  {}", sanitize_display_text(&focal.diagnosis_note))?;
        writeln!(out, "Cohort peers: {}", cohort.peers.len())?;
        for peer in &cohort.peers {
            writeln!(
                out,
                "  {:<10} {:>4}  {}",
                sanitize_display_text(&peer.id),
                sanitize_display_text(&peer.age),
                sanitize_display_text(&peer.diagnosis_note)
            )?;
        }
        self.write_chart(out)
    }

    fn write_chart<W: Write>(&self, out: &mut W) -> eyre::Result<()> {
        if let Some(chart) = render_age_chart(self.session.age_bins(), CHART_WIDTH) {
            writeln!(out, "Age distribution:")?;
            writeln!(out, "{chart}")?;
        }
        Ok(())
    }

    fn write_prompts<W: Write>(&self, out: &mut W) -> eyre::Result<()> {
        let templates = self.session.templates();
        for field in PromptField::ALL {
            writeln!(out, "[{field}]\n{}\n", templates.get(field))?;
        }

        if let Ok(prompts) = self.session.current_prompts() {
            writeln!(out, "--- patient prompt to send ---\n{}\n", prompts.patient.user_text)?;
            writeln!(
                out,
                "--- population prompt to send ---\n{}",
                prompts.population.user_text
            )?;
        }
        Ok(())
    }

    fn write_summaries<W: Write>(&self, out: &mut W) -> eyre::Result<()> {
        let Some(summaries) = self.session.summaries() else {
            return Ok(());
        };
        write_summary(out, "Patient summary", &summaries.patient)?;
        write_summary(out, "Population summary", &summaries.population)
    }
}

fn write_summary<W: Write>(out: &mut W, title: &str, result: &SummaryResult) -> eyre::Result<()> {
    writeln!(
        out,
        "== {title} ({}) ==\n{}\n",
        result.generated_at.strftime("%Y-%m-%d %H:%M:%S UTC"),
        sanitize_display_text(&result.text)
    )?;
    Ok(())
}
