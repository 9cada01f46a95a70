//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use sitefeed_pipeline::ContentLoader;
use sitefeed_shared::{AppConfig, init_config, load_config, validate_api_key};
use sitefeed_source::{TableClient, list_enrichment_images};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// sitefeed — publish events and courses from the tabular source.
#[derive(Parser)]
#[command(
    name = "sitefeed",
    version,
    about = "Pull event and course rows from the tabular API and publish the site content artifacts.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Load everything and write both artifacts (content.json, courses.json).
    Sync {
        /// Output directory (defaults to the configured output dir).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Load and write only the course artifact.
    Courses {
        /// Output directory (defaults to the configured output dir).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "sitefeed=info",
        1 => "sitefeed=debug",
        _ => "sitefeed=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Sync { out } => cmd_sync(out.as_deref()).await,
        Command::Courses { out } => cmd_courses(out.as_deref()).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

/// Full load: content snapshot plus course artifact.
async fn cmd_sync(out: Option<&Path>) -> Result<()> {
    let config = load_config()?;
    validate_api_key(&config)?;

    let out_dir = output_dir(&config, out);
    let loader = build_loader(&config)?;

    let spinner = make_spinner("Loading content");
    let snapshot = loader.content().await?;
    let courses = loader.load_courses().await?;
    spinner.finish_and_clear();

    let snapshot_meta = sitefeed_artifacts::write_snapshot_json(&out_dir, &snapshot)?;
    let courses_meta = sitefeed_artifacts::write_courses_json(&out_dir, &courses)?;

    info!(
        events = snapshot.events.len(),
        courses = courses.len(),
        out = %out_dir.display(),
        "sync complete"
    );
    println!(
        "Published {} events and {} courses to {}",
        snapshot.events.len(),
        courses.len(),
        out_dir.display()
    );
    println!("  {} ({} bytes)", snapshot_meta.filename, snapshot_meta.size_bytes);
    println!("  {} ({} bytes)", courses_meta.filename, courses_meta.size_bytes);

    Ok(())
}

/// Course artifact only.
async fn cmd_courses(out: Option<&Path>) -> Result<()> {
    let config = load_config()?;
    validate_api_key(&config)?;

    let out_dir = output_dir(&config, out);
    let loader = build_loader(&config)?;

    let spinner = make_spinner("Loading courses");
    let courses = loader.load_courses().await?;
    spinner.finish_and_clear();

    let meta = sitefeed_artifacts::write_courses_json(&out_dir, &courses)?;
    println!(
        "Published {} courses to {} ({} bytes)",
        courses.len(),
        out_dir.join(&meta.filename).display(),
        meta.size_bytes
    );

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Created {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn build_loader(config: &AppConfig) -> Result<ContentLoader<TableClient>> {
    let client = TableClient::from_config(&config.source)?;
    let pool = list_enrichment_images(Path::new(&config.images.dir), &config.images.prefix)?;
    Ok(ContentLoader::new(client, pool))
}

fn output_dir(config: &AppConfig, out: Option<&Path>) -> PathBuf {
    out.map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.output.dir))
}

fn make_spinner(msg: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").expect("valid template"));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(msg);
    spinner
}
