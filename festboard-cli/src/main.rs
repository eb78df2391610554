//! Festboard CLI: inspect and drive a dashboard session from the terminal.
//!
//! ```bash
//! festboard login organizer
//! festboard can manage_events
//! festboard menu --json
//! ```
//!
//! The session is kept in the file named by `sessions.storage_path` (default
//! `.festboard/storage.json`), so it survives between invocations. See `festboard --help`.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "festboard", about = "Festboard session and permission tool", version)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = festboard_core::config::CONFIG_FILE)]
    config: PathBuf,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login {
        username: String,

        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,

        /// Query string of the login view, used to pick where to continue
        #[arg(long)]
        redirect: Option<String>,
    },
    /// Show the signed-in user and their permissions
    Whoami,
    /// End the stored session
    Logout,
    /// Check a permission for the signed-in user
    Can { permission: String },
    /// Evaluate the route guard for a path using the stored session cookie
    Guard { path: String },
    /// Print the sidebar menu visible to the signed-in user
    Menu {
        #[arg(long)]
        json: bool,
    },
    /// Print the role catalog
    Roles,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let env = commands::Env::load(&cli.config, cli.verbose)?;

    match cli.command {
        Commands::Login { username, password, redirect } => {
            commands::session::login(&env, &username, password, redirect.as_deref()).await
        }
        Commands::Whoami => commands::session::whoami(&env).await,
        Commands::Logout => commands::session::logout(&env),
        Commands::Can { permission } => commands::access::can(&env, &permission).await,
        Commands::Guard { path } => commands::access::guard(&env, &path),
        Commands::Menu { json } => commands::menu::run(&env, json).await,
        Commands::Roles => {
            print!("{}", commands::access::render_roles());
            Ok(())
        }
    }
}
