use caselog_core::requests::PushRequest;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::PushArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `caselog push`.
pub async fn handle(args: &PushArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let request = PushRequest {
        connector_id: args.connector_id.clone(),
        connector_name: args.connector_name.clone(),
        external_id: args.external_id.clone(),
        external_title: args.external_title.clone(),
        external_url: args.external_url.clone(),
    };
    let case = ctx
        .service
        .push_case(&args.case_id, request, &ctx.actor)
        .await?;
    output(&case, flags.format)
}
