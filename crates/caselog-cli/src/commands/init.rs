use std::path::PathBuf;

use anyhow::Context;
use caselog_config::{CaseConfig, PROJECT_DIR};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::InitArgs;
use crate::context::{app_context::database_path, resolve_project_root};
use crate::output::output;

#[derive(Debug, Serialize)]
struct InitResponse {
    config_path: PathBuf,
    database_path: PathBuf,
}

/// Handle `caselog init`.
pub fn handle(args: &InitArgs, config: &CaseConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let project_root = resolve_project_root(flags.project.as_deref())?;
    let project_dir = project_root.join(PROJECT_DIR);
    let config_path = project_dir.join("config.toml");
    if config_path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (pass --force to overwrite)",
            config_path.display()
        );
    }

    let starter = starter_config(args, config);
    std::fs::create_dir_all(&project_dir)
        .with_context(|| format!("failed to create {}", project_dir.display()))?;
    let rendered = toml::to_string_pretty(&starter).context("failed to render config")?;
    std::fs::write(&config_path, rendered)
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    tracing::info!(path = %config_path.display(), "wrote project config");

    output(
        &InitResponse {
            config_path,
            database_path: database_path(&project_root, &starter),
        },
        flags.format,
    )
}

/// The loaded config with the identity flags applied on top.
fn starter_config(args: &InitArgs, config: &CaseConfig) -> CaseConfig {
    let mut starter = config.clone();
    if let Some(username) = &args.username {
        starter.actor.username.clone_from(username);
    }
    if let Some(full_name) = &args.full_name {
        starter.actor.full_name.clone_from(full_name);
    }
    if let Some(email) = &args.email {
        starter.actor.email.clone_from(email);
    }
    starter
}
