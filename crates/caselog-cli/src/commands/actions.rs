use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `caselog actions`.
pub async fn handle(case_id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut actions = ctx.service.list_user_actions(case_id).await?;
    if let Some(limit) = flags.limit {
        actions.truncate(usize::try_from(limit)?);
    }
    output(&actions, flags.format)
}
