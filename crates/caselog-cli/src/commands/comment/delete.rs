use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct DeleteResponse<'a> {
    case_id: &'a str,
    comment_id: &'a str,
    deleted: bool,
}

pub async fn run(
    case_id: &str,
    comment_id: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    ctx.service
        .delete_comment(case_id, comment_id, &ctx.actor)
        .await?;
    output(
        &DeleteResponse {
            case_id,
            comment_id,
            deleted: true,
        },
        flags.format,
    )
}
