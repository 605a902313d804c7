//! menu-display - terminal menu backed by the menu API
//!
//! Fetches the catalog with the stored session, refreshing expired
//! credentials on the way, and prints the category chips and product cards.

use clap::{ArgAction, Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

use commands::{AppContext, auth, categories, menu};

/// Customer-facing menu in the terminal
#[derive(Parser)]
#[command(name = "menu-display")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// API base URL
    #[arg(long, global = true, env = "MENU_API_URL")]
    pub base_url: Option<String>,

    /// Path to a .menu-display.toml file
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Session file holding the stored credentials
    #[arg(long, global = true, env = "MENU_SESSION_FILE")]
    pub session_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the menu
    Menu {
        /// Category chip to select
        #[arg(short, long)]
        category: Option<String>,

        /// Only show products whose name contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Read products from a JSON file instead of the API
        #[arg(long)]
        from_file: Option<PathBuf>,

        /// Print the selection, chips and cards as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the category chips in display order
    Categories {
        /// Print as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Manage the stored session
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Show whether credentials are stored
    Status,

    /// Store credentials issued by the login flow
    Import {
        /// Access token
        #[arg(long)]
        access_token: String,

        /// Refresh token
        #[arg(long)]
        refresh_token: Option<String>,

        /// Cached user profile (JSON)
        #[arg(long)]
        user: Option<String>,
    },

    /// Clear the stored session
    Logout,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = menu_telemetry::TelemetryConfig::from_verbosity(cli.global.verbose)
        .with_json(cli.global.log_json);
    if let Err(e) = menu_telemetry::init_with_config(telemetry) {
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }

    let result = run(cli).await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::from(commands::exit_code_for(&e))
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = AppContext::load(&cli.global)?;

    match cli.command {
        Commands::Menu {
            category,
            search,
            from_file,
            json,
        } => {
            let options = menu::MenuOptions {
                category,
                search,
                from_file,
                json,
            };
            menu::run(&ctx, options).await
        }

        Commands::Categories { json } => categories::run(&ctx, json).await,

        Commands::Auth { action } => match action {
            AuthAction::Status => auth::status(&ctx),
            AuthAction::Import {
                access_token,
                refresh_token,
                user,
            } => auth::import(&ctx, &access_token, refresh_token.as_deref(), user.as_deref()),
            AuthAction::Logout => auth::logout(&ctx),
        },
    }
}
