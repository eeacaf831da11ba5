#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

use anyhow::Context;
use clap::Parser;
use caselog_core::errors::CoreError;
use caselog_db::error::{DatabaseError, ErrorKind};

mod cli;
mod commands;
mod context;
mod output;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("caselog error: {error:#}");
        std::process::exit(exit_code(&error));
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let flags = cli.global_flags();

    let config = caselog_config::CaseConfig::load_with_dotenv()
        .context("failed to load caselog configuration")?;
    init_tracing(flags.quiet, flags.verbose, &config.general.log_level)?;

    if let cli::Commands::Init(args) = &cli.command {
        return commands::init::handle(args, &config, &flags);
    }

    let project_root = context::resolve_project_root(flags.project.as_deref())?;
    let ctx = context::AppContext::init(&project_root, &config, &flags)
        .await
        .context("failed to initialize caselog application context")?;

    commands::dispatch::dispatch(cli.command, &ctx, &flags).await
}

fn init_tracing(quiet: bool, verbose: bool, configured: &str) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        configured
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("CASELOG_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

/// Process exit code for a failed command, by error category.
fn exit_code(error: &anyhow::Error) -> i32 {
    let kind = error.chain().find_map(|cause| {
        cause
            .downcast_ref::<DatabaseError>()
            .map(DatabaseError::kind)
            .or_else(|| cause.downcast_ref::<CoreError>().map(core_kind))
    });
    match kind {
        Some(ErrorKind::Validation) => 2,
        Some(ErrorKind::NotFound) => 3,
        Some(ErrorKind::Conflict) => 4,
        Some(ErrorKind::StoreUnavailable) => 5,
        Some(ErrorKind::Internal) | None => 1,
    }
}

/// Kind of a core error raised before reaching the store.
const fn core_kind(error: &CoreError) -> ErrorKind {
    match error {
        CoreError::NotFound { .. } => ErrorKind::NotFound,
        CoreError::Conflict { .. } => ErrorKind::Conflict,
        CoreError::Validation(_) => ErrorKind::Validation,
        CoreError::Serialization(_) | CoreError::Other(_) => ErrorKind::Internal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_follows_error_kind() {
        let not_found = anyhow::Error::new(DatabaseError::NoResult).context("get case");
        assert_eq!(exit_code(&not_found), 3);
        let other = anyhow::anyhow!("bad flag");
        assert_eq!(exit_code(&other), 1);
        let invalid = anyhow::Error::new(CoreError::Validation("bad patch".into()));
        assert_eq!(exit_code(&invalid), 2);
    }
}
