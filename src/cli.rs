//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, health, join, validate), and their associated
//! argument structs. Every server flag has an environment variable
//! equivalent for container deployments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "launchpad",
    version,
    about = "Landing page server with a waitlist signup and backend proxy",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        launchpad run                                   Serve on :3000, backend at 127.0.0.1:8000\n  \
        launchpad run --backend-url http://api:8000     Point the proxy at another backend\n  \
        launchpad join you@example.com --consent        Join the waitlist from the terminal"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the landing page server
    Run(Box<RunArgs>),

    /// Check health of a running instance (or its backend)
    Health(HealthArgs),

    /// Join the waitlist through a running instance
    Join(JoinArgs),

    /// Validate a site config file without starting
    Validate(ValidateArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        launchpad run                                      Auto-detect ./launchpad.yaml\n  \
        launchpad run -c site.yaml -p 8080 --pretty        Local dev mode\n  \
        launchpad run --backend-url https://api.example.com --timeout 10000")]
pub struct RunArgs {
    /// Site config file path (.yaml, .json, .toml)
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Directory holding static assets (favicons under favicon_io/)
    #[arg(long, env = "PUBLIC_DIR", default_value = "public")]
    pub public_dir: PathBuf,

    // -- Backend --
    /// Backend base URL the proxy forwards to (overrides the config file)
    #[arg(long, env = "BACKEND_URL", help_heading = "Backend")]
    pub backend_url: Option<String>,

    /// Backend request timeout in milliseconds (overrides the config file)
    #[arg(long, env = "REQUEST_TIMEOUT_MS", help_heading = "Backend")]
    pub timeout: Option<u64>,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Max request body size in bytes
    #[arg(
        long,
        env = "MAX_BODY_SIZE",
        default_value_t = 65_536,
        help_heading = "Tuning"
    )]
    pub max_body: usize,
}

#[derive(Args)]
pub struct HealthArgs {
    /// URL of the running instance
    #[arg(default_value = "http://localhost:3000")]
    pub url: String,

    /// Check the backend through the instance's proxy route instead
    #[arg(long)]
    pub backend: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        launchpad join you@example.com --consent\n  \
        launchpad join you@example.com --consent --url https://launch.example.com")]
pub struct JoinArgs {
    /// Email address to add to the waitlist
    pub email: String,

    /// Consent to storing the email address until launch
    #[arg(long)]
    pub consent: bool,

    /// URL of the running instance
    #[arg(long, default_value = "http://localhost:3000")]
    pub url: String,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Config file to validate
    #[arg(default_value = "launchpad.yaml")]
    pub config: PathBuf,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ValidateFormat,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}
