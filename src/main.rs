use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use gymflow::config::Config;
use gymflow::definition::WizardDefinition;
use gymflow::logging;
use gymflow::script::{run_session, Script};

#[derive(Parser)]
#[command(name = "gymflow")]
#[command(about = "Wizard and sortable-list controllers for training-plan screens")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a wizard definition file
    Check {
        /// Definition file (.toml, .yaml, .yml or .json)
        definition: PathBuf,
    },

    /// Replay a scripted session against a wizard definition
    Run {
        /// Definition file (.toml, .yaml, .yml or .json)
        definition: PathBuf,

        /// Script of actions (.yaml or .json)
        #[arg(short, long)]
        script: PathBuf,

        /// Pretty-print the JSON report
        #[arg(short, long)]
        pretty: bool,
    },

    /// Write the effective configuration to .gymflow/config.toml
    Init {
        /// Overwrite an existing project config
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;
    let logging_handle = logging::init_logging(&config, cli.debug)?;

    match cli.command {
        Commands::Check { definition } => cmd_check(&definition)?,
        Commands::Run {
            definition,
            script,
            pretty,
        } => cmd_run(&config, &definition, &script, pretty).await?,
        Commands::Init { force } => cmd_init(&config, force)?,
    }

    if let Some(log_path) = logging_handle.log_file_path {
        tracing::debug!(path = %log_path.display(), "session log written");
    }

    Ok(())
}

fn cmd_check(path: &std::path::Path) -> Result<()> {
    let definition = WizardDefinition::from_path(path)
        .with_context(|| format!("Invalid definition {}", path.display()))?;

    let name = definition.name.as_deref().unwrap_or("wizard");
    println!("{} ({} steps)", name, definition.steps.len());
    println!("{}", "─".repeat(60));
    for (index, step) in definition.steps.iter().enumerate() {
        let marker = if index == definition.initial_step {
            ">"
        } else {
            " "
        };
        let optional = if step.optional { " (optional)" } else { "" };
        println!("{marker} {index:>2}. {} [{}]{optional}", step.title, step.id);
    }

    Ok(())
}

async fn cmd_run(
    config: &Config,
    definition_path: &std::path::Path,
    script_path: &std::path::Path,
    pretty: bool,
) -> Result<()> {
    let definition = WizardDefinition::from_path(definition_path)
        .with_context(|| format!("Invalid definition {}", definition_path.display()))?;
    let script = Script::from_path(script_path)?;

    tracing::info!(
        definition = %definition_path.display(),
        actions = script.actions.len(),
        "running scripted session"
    );

    let report = run_session(&definition, &script, &config.wizard_options()).await?;
    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");

    Ok(())
}

fn cmd_init(config: &Config, force: bool) -> Result<()> {
    let path = Config::project_config_path();
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    config.save()?;
    println!("Wrote {}", path.display());
    Ok(())
}
