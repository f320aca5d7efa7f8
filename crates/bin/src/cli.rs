//! CLI argument definitions for the filedesk binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Storage backend type
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Backend {
    /// SQLite database (default)
    Sqlite,
    /// PostgreSQL database
    Postgres,
    /// In-memory with JSON persistence (for development and ephemeral deployments)
    Inmemory,
}

/// filedesk personal file storage server
#[derive(Parser, Debug)]
#[command(name = "filedesk")]
#[command(about = "filedesk: session-authenticated personal file storage")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the filedesk server
    Serve(ServeArgs),
    /// Check health of a running filedesk server
    Health(HealthArgs),
    /// Inspect user accounts in the configured store
    #[command(subcommand)]
    Users(UsersCommand),
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// List all users with their file counts
    List(UsersListArgs),
}

/// Where the data lives. Shared by every command that opens the store.
#[derive(clap::Args, Debug, Clone)]
pub struct BackendConfig {
    /// Storage backend to use
    #[arg(short, long, default_value = "sqlite", env = "FILEDESK_BACKEND")]
    pub backend: Backend,

    /// Data directory for storage files.
    /// For SQLite: stores filedesk.db
    /// For InMemory: stores filedesk.json
    #[arg(short = 'D', long, env = "FILEDESK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// PostgreSQL connection URL (required when backend=postgres)
    #[arg(long, env = "FILEDESK_DATABASE_URL")]
    pub database_url: Option<String>,
}

/// Arguments for the serve command
#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value_t = 3000, env = "FILEDESK_PORT")]
    pub port: u16,

    /// Bind address
    #[arg(long, default_value = "0.0.0.0", env = "FILEDESK_HOST")]
    pub host: String,

    #[command(flatten)]
    pub backend_config: BackendConfig,

    /// Secret used to sign the session cookie.
    /// A random key is generated per process when unset, so sessions do not
    /// survive a restart.
    #[arg(long, env = "FILEDESK_SESSION_SECRET", hide_env_values = true)]
    pub session_secret: Option<String>,

    /// Origin allowed to make credentialed cross-origin requests
    #[arg(
        long,
        default_value = "http://localhost:3000",
        env = "FILEDESK_FRONTEND_URL"
    )]
    pub frontend_url: String,

    /// Require a logged-in session on the /api routes
    #[arg(long, env = "FILEDESK_API_REQUIRE_SESSION")]
    pub api_require_session: bool,
}

/// Arguments for the health command
#[derive(clap::Args, Debug)]
pub struct HealthArgs {
    /// Base URL of the server to check
    #[arg(long, default_value = "http://127.0.0.1:3000", env = "FILEDESK_URL")]
    pub url: String,

    /// Timeout in seconds
    #[arg(short, long, default_value_t = 5)]
    pub timeout: u64,
}

/// Arguments for `users list`
#[derive(clap::Args, Debug)]
pub struct UsersListArgs {
    #[command(flatten)]
    pub backend_config: BackendConfig,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}
