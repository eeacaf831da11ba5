#[path = "case/create.rs"]
mod create;
#[path = "case/get.rs"]
mod get;
#[path = "case/list.rs"]
mod list;
#[path = "case/update.rs"]
mod update;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CaseCommands;
use crate::context::AppContext;

/// Handle `caselog case`.
pub async fn handle(action: &CaseCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        CaseCommands::Create {
            title,
            description,
            tags,
            status,
            connector,
            sync_alerts,
            owner,
        } => {
            create::run(
                create::Params {
                    title: title.clone(),
                    description: description.clone(),
                    tags: tags.clone(),
                    status: status.clone(),
                    connector: connector.clone(),
                    sync_alerts: *sync_alerts,
                    owner: owner.clone(),
                },
                ctx,
                flags,
            )
            .await
        }
        CaseCommands::Get { id } => get::run(id, ctx, flags).await,
        CaseCommands::List { status, tag, limit } => {
            list::run(status.as_deref(), tag.as_deref(), *limit, ctx, flags).await
        }
        CaseCommands::Update {
            id,
            version,
            title,
            description,
            status,
            tags,
            connector,
            sync_alerts,
            patch,
        } => {
            update::run(
                update::Params {
                    id: id.clone(),
                    version: *version,
                    title: title.clone(),
                    description: description.clone(),
                    status: status.clone(),
                    tags: tags.clone(),
                    connector: connector.clone(),
                    sync_alerts: *sync_alerts,
                    patch: patch.clone(),
                },
                ctx,
                flags,
            )
            .await
        }
    }
}
