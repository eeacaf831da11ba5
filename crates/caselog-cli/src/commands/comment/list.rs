use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(case_id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut comments = ctx.service.list_comments(case_id).await?;
    if let Some(limit) = flags.limit {
        comments.truncate(usize::try_from(limit)?);
    }
    output(&comments, flags.format)
}
