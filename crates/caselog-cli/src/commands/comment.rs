#[path = "comment/add.rs"]
mod add;
#[path = "comment/delete.rs"]
mod delete;
#[path = "comment/list.rs"]
mod list;
#[path = "comment/update.rs"]
mod update;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CommentCommands;
use crate::context::AppContext;

/// Handle `caselog comment`.
pub async fn handle(
    action: &CommentCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        CommentCommands::Add {
            case_id,
            comment,
            alert_id,
            index,
        } => {
            add::run(
                case_id,
                comment.clone(),
                alert_id.clone(),
                index.clone(),
                ctx,
                flags,
            )
            .await
        }
        CommentCommands::List { case_id } => list::run(case_id, ctx, flags).await,
        CommentCommands::Update {
            case_id,
            comment_id,
            version,
            comment_type,
            comment,
            alert_id,
            index,
        } => {
            update::run(
                case_id,
                update::Params {
                    comment_id: comment_id.clone(),
                    version: *version,
                    comment_type: comment_type.clone(),
                    comment: comment.clone(),
                    alert_id: alert_id.clone(),
                    index: index.clone(),
                },
                ctx,
                flags,
            )
            .await
        }
        CommentCommands::Delete {
            case_id,
            comment_id,
        } => delete::run(case_id, comment_id, ctx, flags).await,
    }
}
