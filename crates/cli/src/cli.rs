use artisync_client::DEFAULT_TIMEOUT_MS;
use artisync_reconcile::TargetState;
use clap::builder::BoolishValueParser;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Summary message on stdout, warnings on stderr.
    #[default]
    Text,
    /// One JSON object on stdout.
    Json,
}

/// Command-line interface for the `artisync` application.
#[derive(Debug, Parser)]
#[command(
    name = "artisync",
    version,
    about = "Declaratively reconcile Artifactory configuration"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Resource kinds `artisync` can reconcile.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Reconciles repository configuration.
    Repositories(ReconcileArgs),
    /// Reconciles LDAP settings (requires the ldapSettings user plugin).
    LdapSettings(ReconcileArgs),
}

/// Arguments shared by every resource kind.
#[derive(Debug, Args)]
pub struct ReconcileArgs {
    /// JSON or YAML file with the desired records (`-` for stdin).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Target state: present, absent, or prune (case-insensitive).
    #[arg(long, env = "ARTISYNC_STATE", default_value_t = TargetState::Present)]
    pub state: TargetState,

    /// Check mode: report what would change without changing anything.
    #[arg(long, alias = "dry-run", default_value_t = false)]
    pub check: bool,

    /// Output format: text or json.
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Where and how to connect.
#[derive(Debug, Clone, Args)]
pub struct ConnectionArgs {
    /// Server URL, e.g. `https://artifactory.example.com` (`/artifactory/` is appended).
    #[arg(long, env = "ARTISYNC_BASE_URL", value_name = "URL")]
    pub base_url: Option<String>,

    /// Authentication mode: Basic, AccessToken, or ApiKey.
    #[arg(long, env = "ARTISYNC_AUTH_TYPE", default_value = "Basic")]
    pub auth_type: String,

    /// Credential for the chosen mode (`user:password` for Basic).
    #[arg(long, env = "ARTISYNC_AUTH_STRING", hide_env_values = true)]
    pub auth_string: Option<String>,

    /// Skip TLS certificate validation.
    #[arg(
        long,
        env = "ARTISYNC_IGNORE_CA_ERROR",
        value_parser = BoolishValueParser::new(),
        default_value_t = false
    )]
    pub ignore_ca_error: bool,

    /// Request timeout in milliseconds.
    #[arg(long, env = "ARTISYNC_TIMEOUT_MS", value_name = "MILLIS", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,
}
