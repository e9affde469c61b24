use std::time::Duration;

use anyhow::Result;
use artisync_client::{ClientConfig, HttpTransport, LdapSettingsAdapter, RepositoryAdapter};
use artisync_reconcile::{
    Record, Reconciler, RemoteResourceAdapter, TargetState, ValidationError,
};
use clap::Parser;

use crate::cli::{Cli, Commands, ConnectionArgs, ReconcileArgs};
use crate::config::apply_config_to_env;
use crate::desired::load_desired;
use crate::output::RunOutput;

/// Resource kind selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Repositories,
    LdapSettings,
}

/// The main entry point for the `artisync` application.
pub fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    apply_config_to_env()?;
    let cli = Cli::parse();

    let (resource, args) = match cli.command {
        Commands::Repositories(args) => (Resource::Repositories, args),
        Commands::LdapSettings(args) => (Resource::LdapSettings, args),
    };
    let format = args.format;

    let output = handle_reconcile_command(resource, args)?;
    let (stdout, stderr) = output.render(format)?;
    if !stderr.is_empty() {
        eprintln!("{stderr}");
    }
    println!("{stdout}");
    Ok(())
}

/// Validates input, connects, and reconciles one resource kind.
pub fn handle_reconcile_command(resource: Resource, args: ReconcileArgs) -> Result<RunOutput> {
    let desired = load_desired(&args.file)?;
    let config = client_config(&args.connection)?;
    let transport = HttpTransport::new(&config)?;
    let warnings = transport.warnings().to_vec();

    match resource {
        Resource::Repositories => reconcile(
            RepositoryAdapter::new(transport),
            args.state,
            &desired,
            args.check,
            warnings,
        ),
        Resource::LdapSettings => reconcile(
            LdapSettingsAdapter::new(transport),
            args.state,
            &desired,
            args.check,
            warnings,
        ),
    }
}

fn reconcile<A: RemoteResourceAdapter>(
    adapter: A,
    state: TargetState,
    desired: &[Record],
    dry_run: bool,
    warnings: Vec<String>,
) -> Result<RunOutput> {
    if state == TargetState::Prune && desired.is_empty() {
        tracing::warn!(
            kind = adapter.kind().plural,
            dry_run,
            "Prune with an empty desired list deletes every existing record"
        );
    }

    let report = Reconciler::new(adapter).reconcile(state, desired, dry_run)?;
    Ok(RunOutput::from_report(&report, warnings))
}

/// Builds client settings, rejecting missing or malformed values.
pub fn client_config(connection: &ConnectionArgs) -> Result<ClientConfig, ValidationError> {
    let base_url = connection
        .base_url
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ValidationError::MissingSetting("base_url".to_string()))?;
    let auth_string = connection
        .auth_string
        .as_deref()
        .ok_or_else(|| ValidationError::MissingSetting("auth_string".to_string()))?;

    ClientConfig::new(
        base_url,
        &connection.auth_type,
        auth_string,
        connection.ignore_ca_error,
        Duration::from_millis(connection.timeout_ms),
    )
}
