#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

use tailorboard_settings::{
    AppConfig, DocumentState, FontSize, HttpSettingsApi, SettingsPatch, SettingsStore, Theme,
};

#[derive(Debug, Parser)]
#[command(name = "tailorboard-settings", about = "Dashboard settings sync client")]
struct Cli {
    /// Base URL of the settings service (overrides TAILORBOARD_API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Path of the persisted settings envelope
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the locally persisted settings
    Show,
    /// Load settings for a user from the service
    Fetch {
        #[arg(long)]
        user: String,
    },
    /// Send a partial settings change for a user
    Update {
        #[arg(long)]
        user: String,
        #[command(flatten)]
        fields: PatchArgs,
    },
    /// Apply a change locally without contacting the service
    SetLocal {
        #[command(flatten)]
        fields: PatchArgs,
    },
    /// Overwrite a user's settings with the defaults
    Reset {
        #[arg(long)]
        user: String,
    },
}

#[derive(Debug, Args)]
struct PatchArgs {
    /// light | dark
    #[arg(long)]
    theme: Option<String>,
    /// small | medium | large | extra-large
    #[arg(long)]
    font_size: Option<String>,
    #[arg(long)]
    sidebar_collapsed: Option<bool>,
    #[arg(long)]
    notifications: Option<bool>,
    #[arg(long)]
    compact: Option<bool>,
}

impl PatchArgs {
    fn into_patch(self) -> SettingsPatch {
        SettingsPatch {
            theme: self.theme.map(Theme::from),
            font_size: self.font_size.map(FontSize::from),
            sidebar_collapsed: self.sidebar_collapsed,
            notifications_enabled: self.notifications,
            compact_mode: self.compact,
        }
    }
}

fn init_tracing(config: &AppConfig) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.trace_level())
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to install tracing subscriber")
}

fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::from_env()?;
    if let Some(base) = &cli.api_base {
        config = config.with_api_base(base)?;
    }
    if let Some(path) = &cli.storage {
        config = config.with_storage_path(path.clone());
    }
    Ok(config)
}

fn print_state(store: &SettingsStore<HttpSettingsApi, DocumentState>) -> Result<()> {
    let json = serde_json::to_string_pretty(&store.settings()).context("Failed to serialize settings")?;
    println!("{json}");

    let document = store.target();
    let classes: Vec<&str> = document.classes().collect();
    println!("classes: [{}]", classes.join(", "));
    for (name, value) in document.variables() {
        println!("{name}: {value}");
    }
    Ok(())
}

async fn run(cli: Cli, config: AppConfig) -> Result<ExitCode> {
    info!(api_base = %config.api_base, storage = %config.storage_path.display(), "Starting settings client");

    let store = SettingsStore::new(HttpSettingsApi::new(config.api_base.clone()), DocumentState::new())
        .with_envelope(config.storage_path.clone());
    store.restore();

    match cli.command {
        Command::Show => {}
        Command::Fetch { user } => store.fetch_settings(Some(&user)).await,
        Command::Update { user, fields } => store.update_settings(Some(&user), &fields.into_patch()).await,
        Command::SetLocal { fields } => store.set_local_settings(&fields.into_patch()),
        Command::Reset { user } => store.reset_settings(Some(&user)).await,
    }

    print_state(&store)?;

    if let Some(message) = store.error() {
        error!(error = %message, "Settings operation failed");
        eprintln!("error: {message}");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    init_tracing(&config)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build async runtime")?;

    runtime.block_on(run(cli, config))
}
