use std::path::PathBuf;

use charting_cli::commands::{self, RequestArgs};
use charting_cli::config;
use charting_core::encounter::{EncounterAction, EncounterStatus};
use clap::{Parser, Subcommand, ValueEnum};
use eyre::Result;
use serde_json::Value;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "charting")]
#[command(about = "Evaluate telenutrition charting forms")]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a widget tree for duplicate keys and list its leaves
    Validate { widgets: PathBuf },
    /// Format answers into the submission payload
    Format { widgets: PathBuf, answers: PathBuf },
    /// Show visibility and required state of every field
    Fields { widgets: PathBuf, answers: PathBuf },
    /// Resolve the options of one tiered chain
    Tiers {
        widgets: PathBuf,
        answers: PathBuf,
        key: String,
    },
    /// Render a display template
    Interpolate {
        template: String,
        answers: PathBuf,
        /// JSON object of placeholder name to placeholder definition
        placeholders: PathBuf,
    },
    /// Build the API request for an encounter action
    Request {
        widgets: PathBuf,
        answers: PathBuf,
        #[arg(long)]
        encounter: Uuid,
        #[arg(long, value_enum)]
        status: StatusArg,
        #[arg(long, value_enum)]
        action: ActionArg,
        /// Previous encounter answers to pre-fill from
        #[arg(long)]
        previous: Option<PathBuf>,
    },
    /// Write a config file with default settings
    InitConfig,
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Draft,
    Open,
    Oversight,
    Closed,
    Amended,
}

#[derive(Clone, Copy, ValueEnum)]
enum ActionArg {
    Save,
    Submit,
    Resubmit,
    Approve,
    Amend,
}

impl From<StatusArg> for EncounterStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Draft => EncounterStatus::Draft,
            StatusArg::Open => EncounterStatus::Open,
            StatusArg::Oversight => EncounterStatus::Oversight,
            StatusArg::Closed => EncounterStatus::Closed,
            StatusArg::Amended => EncounterStatus::Amended,
        }
    }
}

impl From<ActionArg> for EncounterAction {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Save => EncounterAction::Save,
            ActionArg::Submit => EncounterAction::Submit,
            ActionArg::Resubmit => EncounterAction::Resubmit,
            ActionArg::Approve => EncounterAction::Approve,
            ActionArg::Amend => EncounterAction::Amend,
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the command's JSON output.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let config = config::load_config(cli.config.as_deref())?;

    let output = match cli.command {
        Commands::Validate { widgets } => commands::validate(&commands::read_tree(&widgets)?)?,
        Commands::Format { widgets, answers } => commands::format(
            &config,
            &commands::read_tree(&widgets)?,
            &commands::read_answers(&answers)?,
        )?,
        Commands::Fields { widgets, answers } => commands::fields(
            &commands::read_tree(&widgets)?,
            &commands::read_answers(&answers)?,
        )?,
        Commands::Tiers {
            widgets,
            answers,
            key,
        } => commands::tiers(
            &config,
            commands::read_tree(&widgets)?,
            &commands::read_answers(&answers)?,
            &key,
        )?,
        Commands::Interpolate {
            template,
            answers,
            placeholders,
        } => Value::String(commands::interpolate(
            &config,
            &template,
            &commands::read_answers(&answers)?,
            commands::read_json(&placeholders)?,
        )?),
        Commands::Request {
            widgets,
            answers,
            encounter,
            status,
            action,
            previous,
        } => {
            let previous = previous
                .as_deref()
                .map(commands::read_answers)
                .transpose()?;
            commands::request(
                &config,
                commands::read_tree(&widgets)?,
                &commands::read_answers(&answers)?,
                RequestArgs {
                    encounter_id: encounter,
                    status: status.into(),
                    action: action.into(),
                    previous: previous.as_ref(),
                },
            )?
        }
        Commands::InitConfig => {
            let path = match &cli.config {
                Some(p) => p.clone(),
                None => config::default_config_path()?,
            };
            config::save_config(&config::ChartingConfig::default(), &path)?;
            Value::String(path.display().to_string())
        }
    };

    match output {
        Value::String(s) => println!("{s}"),
        other => println!("{}", serde_json::to_string_pretty(&other)?),
    }
    Ok(())
}
