mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use client::{ApiMode, App, ClientConfig, build_api};
use session::{FileStorage, SessionStore};
use tracing_subscriber::EnvFilter;

use crate::commands::CliError;

const DEFAULT_LOG_FILTER: &str = "warn";
const STATE_DIR: &str = "invoice-cli";
const STATE_FILE: &str = "session.json";
const DEMO_BANNER: &str = "DEMO MODE: using built-in sample data, nothing is sent to a server.";

#[derive(Parser, Debug)]
#[command(name = "invoice-cli", about = "Invoice manager front end")]
struct Cli {
    /// Where the session survives between invocations.
    #[arg(long, env = "INVOICE_STATE_FILE")]
    state_file: Option<PathBuf>,

    /// Overrides `INVOICE_BACKEND_URL`.
    #[arg(long)]
    backend_url: Option<String>,

    /// Use the in-process demo backend even when a URL is configured.
    #[arg(long, default_value_t = false)]
    demo: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and keep the session.
    Login(Credentials),
    /// Create an account.
    Signup(Credentials),
    Logout,
    /// Show the logged-in user.
    Whoami,
    /// Connection and credential debug panel.
    Status,
    /// Show what the route guard does for a path.
    Open { path: String },
    Invoices(InvoicesCommand),
    Profile(ProfileCommand),
}

#[derive(Args, Debug)]
struct Credentials {
    #[arg(long)]
    email: String,
    #[arg(long, env = "INVOICE_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Args, Debug)]
struct InvoicesCommand {
    #[command(subcommand)]
    command: InvoicesSubcommand,
}

#[derive(Subcommand, Debug)]
enum InvoicesSubcommand {
    List,
    Show {
        id: i64,
    },
    Create {
        #[arg(long)]
        amount: Option<f64>,
        /// `YYYY-MM-DD`, defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
    Edit {
        id: i64,
        #[arg(long)]
        amount: Option<f64>,
        #[arg(long)]
        date: Option<String>,
    },
    Delete {
        id: i64,
    },
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    /// Merge `key=value` pairs into the stored user. Values that parse as
    /// JSON keep their type.
    Set {
        #[arg(required = true)]
        pairs: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = client_config(&cli)?;
    let state_file = match cli.state_file {
        Some(path) => path,
        None => default_state_file().ok_or(CliError::NoStateDir)?,
    };
    tracing::debug!(path = %state_file.display(), "session state file");

    let api = build_api(&config)?;
    let mut app = App::new(SessionStore::new(FileStorage::new(state_file)), api);
    if app.mode() == ApiMode::Demo {
        eprintln!("{DEMO_BANNER}");
    }

    let mut stdout = std::io::stdout().lock();
    commands::execute(&mut app, cli.command, &mut stdout).await
}

/// Environment settings with command-line overrides on top.
fn client_config(cli: &Cli) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::from_lookup(|key| match (key, &cli.backend_url) {
        ("INVOICE_BACKEND_URL", Some(url)) => Some(url.clone()),
        _ => std::env::var(key).ok(),
    })?;
    config.demo_mode |= cli.demo;
    Ok(config)
}

fn default_state_file() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join(STATE_DIR).join(STATE_FILE))
}
