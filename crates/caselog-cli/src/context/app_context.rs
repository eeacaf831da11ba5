use std::path::{Path, PathBuf};

use anyhow::Context;
use caselog_config::CaseConfig;
use caselog_core::identity::User;
use caselog_db::service::CaseService;

use crate::cli::GlobalFlags;

/// The open store and the acting user for one invocation.
pub struct AppContext {
    pub service: CaseService,
    /// Who mutations are recorded as.
    pub actor: User,
}

impl AppContext {
    pub async fn init(
        project_root: &Path,
        config: &CaseConfig,
        flags: &GlobalFlags,
    ) -> anyhow::Result<Self> {
        let actor = resolve_actor(config, flags.actor.as_deref())?;

        let db_path = database_path(project_root, config);
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let service = CaseService::new_local(&db_path.to_string_lossy())
            .await
            .context("failed to initialize caselog-db service")?;
        tracing::debug!(path = %db_path.display(), actor = %actor.username, "context ready");

        Ok(Self { service, actor })
    }
}

/// Configured database path, anchored at the project root when relative.
pub fn database_path(project_root: &Path, config: &CaseConfig) -> PathBuf {
    let configured = config.database.path_buf();
    if configured.is_absolute() {
        configured
    } else {
        project_root.join(configured)
    }
}

/// `--as` wins, then `[actor]` from config, then the login name.
fn resolve_actor(config: &CaseConfig, override_username: Option<&str>) -> anyhow::Result<User> {
    if let Some(username) = override_username.map(str::trim).filter(|u| !u.is_empty()) {
        return Ok(User::new(username));
    }
    if config.actor.is_configured() {
        return Ok(config.actor.to_user()?);
    }
    let login = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .context("no acting user: set [actor] username in config, CASELOG_ACTOR__USERNAME, or pass --as")?;
    tracing::warn!(%login, "no [actor] configured; recording mutations as the login user");
    Ok(User::new(login))
}
