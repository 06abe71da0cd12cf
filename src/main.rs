//! pneumatic-conditions - inspect and repair task conditions of workflow templates

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pneumatic_conditions::{commands, config, logging};

#[derive(Parser)]
#[command(name = "pneumatic-conditions")]
#[command(author, version, about = "Edit, validate and clone conditional rules of workflow templates")]
struct Cli {
    /// Config file (defaults to ~/.pneumatic-conditions/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init,

    /// List the operators available for a field type
    Operators {
        /// Field type (string, number, date, checkbox, task, kickoff, ...)
        field_type: String,
    },

    /// Check a template's conditions before activation
    Validate {
        /// Template JSON file
        template: PathBuf,

        /// Strict mode (fail on warnings)
        #[arg(long)]
        strict: bool,
    },

    /// Remove rules that reference deleted fields or tasks
    Refresh {
        /// Template JSON file
        template: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Regroup AND/OR rules of every condition
    Normalize {
        /// Template JSON file
        template: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Append a condition to a task
    AddCondition {
        /// Template JSON file
        template: PathBuf,

        /// Api name of the task to extend
        task_api_name: String,

        /// Add a start condition instead of a skip condition
        #[arg(long)]
        start: bool,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Duplicate a task right after itself
    CloneTask {
        /// Template JSON file
        template: PathBuf,

        /// Api name of the task to duplicate
        task_api_name: String,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config_from(path)?,
        None => config::load_config()?,
    };
    logging::init(&config.logging.filter)?;

    match cli.command {
        Commands::Init => {
            let paths = match &cli.config {
                Some(path) => config::ConditionsPaths {
                    root: path.parent().map(PathBuf::from).unwrap_or_default(),
                    config: path.clone(),
                },
                None => config::ConditionsPaths::new()?,
            };
            commands::init(&paths)?;
        }
        Commands::Operators { field_type } => {
            let messages = config.load_messages()?;
            commands::print_operators(&field_type, &messages)?;
        }
        Commands::Validate { template, strict } => {
            commands::validate(&template, strict)?;
            println!();
            println!("Validation complete!");
        }
        Commands::Refresh { template, output } => {
            let removed = commands::refresh(&template, output.as_deref(), &config)?;
            if output.is_some() {
                println!("✓ Removed {} stale rule(s)", removed);
            }
        }
        Commands::Normalize { template, output } => {
            commands::normalize(&template, output.as_deref())?;
        }
        Commands::AddCondition {
            template,
            task_api_name,
            start,
            output,
        } => {
            let condition = commands::add_condition(
                &template,
                &task_api_name,
                start,
                output.as_deref(),
                &config,
            )?;
            if output.is_some() {
                println!("✓ Added condition {}", condition);
            }
        }
        Commands::CloneTask {
            template,
            task_api_name,
            output,
        } => {
            let clone = commands::clone_task(&template, &task_api_name, output.as_deref())?;
            if output.is_some() {
                println!("✓ Created task {}", clone);
            }
        }
    }

    Ok(())
}
