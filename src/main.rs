mod cli;
mod core;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::config::AppConfig;

#[derive(Parser)]
#[command(name = "adk", about = "Local workspace services: model presets, cost history, icon themes", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text|json)
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Shorthand for --format json
    #[arg(short = 'j', long = "json", global = true)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage model presets
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },
    /// Record and query cost history
    Cost {
        #[command(subcommand)]
        action: CostAction,
    },
    /// Manage icon themes
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
    /// Run health checks for a provider/model pair or a whole preset
    Check {
        /// Provider id (e.g. anthropic)
        #[arg(required_unless_present = "preset")]
        provider: Option<String>,
        /// Model id (e.g. claude-sonnet-4-5)
        #[arg(required_unless_present = "preset")]
        model: Option<String>,
        /// Custom model metadata as JSON (limits, pricing)
        #[arg(long)]
        metadata: Option<String>,
        /// Check every model entry of a saved preset instead
        #[arg(long, conflicts_with_all = ["provider", "model", "metadata"])]
        preset: Option<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum PresetAction {
    /// List saved presets
    List,
    /// Show one preset
    Show {
        /// Preset id
        id: String,
    },
    /// Save a new preset
    Save {
        /// Preset name
        #[arg(short, long)]
        name: String,
        /// Model entry as provider/model-id (repeatable)
        #[arg(short, long = "model")]
        models: Vec<String>,
        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a preset
    Delete {
        /// Preset id
        id: String,
    },
    /// Update fields of a preset
    Update {
        /// Preset id
        id: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// Replacement model entries as provider/model-id (repeatable)
        #[arg(short, long = "model")]
        models: Option<Vec<String>>,
    },
    /// Export presets as JSON
    Export {
        /// Preset ids to export (default: all)
        #[arg(long = "id")]
        ids: Vec<String>,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import presets from an export file
    Import {
        /// Path to the export JSON
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum CostAction {
    /// Append a cost entry
    Record {
        /// Workspace the request ran in
        #[arg(short, long)]
        workspace: String,
        /// Model that served the request
        #[arg(short, long)]
        model: String,
        /// Input tokens
        #[arg(long, default_value_t = 0)]
        input: u64,
        /// Output tokens
        #[arg(long, default_value_t = 0)]
        output: u64,
        /// Cache-read tokens
        #[arg(long, default_value_t = 0)]
        cached: u64,
        /// Cache-creation tokens
        #[arg(long, default_value_t = 0)]
        cache_create: u64,
        /// Reasoning tokens
        #[arg(long, default_value_t = 0)]
        reasoning: u64,
        /// Request cost in USD
        #[arg(long)]
        cost: f64,
    },
    /// List raw cost entries
    History {
        /// Inclusive lower bound (RFC3339 or YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Inclusive upper bound (RFC3339 or YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Show daily summaries
    Daily {
        /// Inclusive start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Inclusive end date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Per-model cost breakdown
    Models {
        /// Inclusive lower bound (RFC3339 or YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Inclusive upper bound (RFC3339 or YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Rolling day/week/month totals
    Totals,
    /// Drop entries older than the retention window
    Prune {
        /// Retention window in days (default: config, then 90)
        #[arg(long)]
        days: Option<u32>,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    /// List installed icon themes
    List,
    /// Import icon themes from a VSIX archive
    Import {
        /// Path to the .vsix file
        file: PathBuf,
    },
    /// Delete an installed theme
    Delete {
        /// Theme id
        id: String,
    },
    /// Resolve an icon path inside a theme
    Icon {
        /// Theme id
        theme_id: String,
        /// Icon path relative to the theme root
        path: String,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Generate default config file
    Init,
    /// Validate config file
    Check,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("warning: {}; using defaults", e);
        AppConfig::default()
    });

    let opts = cli::output::OutputOptions::resolve(
        &config,
        cli.format.as_deref(),
        cli.json,
        cli.pretty,
        cli.no_color,
        cli.verbose,
    );

    match cli.command {
        Commands::Preset { action } => match action {
            PresetAction::List => cli::preset_cmd::list(&opts)?,
            PresetAction::Show { id } => cli::preset_cmd::show(&id, &opts)?,
            PresetAction::Save {
                name,
                models,
                description,
            } => cli::preset_cmd::save(&name, &models, description, &opts)?,
            PresetAction::Delete { id } => cli::preset_cmd::delete(&id, &opts)?,
            PresetAction::Update {
                id,
                name,
                description,
                models,
            } => cli::preset_cmd::update(&id, name, description, models, &opts)?,
            PresetAction::Export { ids, output } => {
                cli::preset_cmd::export(&ids, output.as_deref(), &opts)?
            }
            PresetAction::Import { file } => cli::preset_cmd::import(&file, &opts)?,
        },
        Commands::Cost { action } => match action {
            CostAction::Record {
                workspace,
                model,
                input,
                output,
                cached,
                cache_create,
                reasoning,
                cost,
            } => cli::cost_cmd::record(
                &workspace,
                &model,
                input,
                output,
                cached,
                cache_create,
                reasoning,
                cost,
                &opts,
            )?,
            CostAction::History { from, to } => {
                cli::cost_cmd::history(from.as_deref(), to.as_deref(), &opts)?
            }
            CostAction::Daily { from, to } => {
                cli::cost_cmd::daily(from.as_deref(), to.as_deref(), &opts)?
            }
            CostAction::Models { from, to } => {
                cli::cost_cmd::models(from.as_deref(), to.as_deref(), &opts)?
            }
            CostAction::Totals => cli::cost_cmd::totals(&opts)?,
            CostAction::Prune { days } => {
                let days = days.unwrap_or(config.cost.retention_days);
                cli::cost_cmd::prune(days, &opts)?
            }
        },
        Commands::Theme { action } => match action {
            ThemeAction::List => cli::theme_cmd::list(&opts)?,
            ThemeAction::Import { file } => cli::theme_cmd::import(&file, &opts)?,
            ThemeAction::Delete { id } => cli::theme_cmd::delete(&id, &opts)?,
            ThemeAction::Icon { theme_id, path } => {
                cli::theme_cmd::icon(&theme_id, &path, &opts)?
            }
        },
        Commands::Check {
            provider,
            model,
            metadata,
            preset,
        } => match preset {
            Some(preset_id) => cli::check_cmd::run_preset(&preset_id, &opts)?,
            None => {
                // required_unless_present guarantees both are set here.
                let provider = provider.unwrap_or_default();
                let model = model.unwrap_or_default();
                cli::check_cmd::run(&provider, &model, metadata.as_deref(), &opts)?
            }
        },
        Commands::Config { action } => match action {
            ConfigAction::Init => cli::config_cmd::init(&opts)?,
            ConfigAction::Check => cli::config_cmd::check(&opts)?,
        },
    }

    Ok(())
}
