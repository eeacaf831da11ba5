use caselog_core::enums::CaseStatus;
use caselog_db::repos::case::CaseFilter;

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    status: Option<&str>,
    tag: Option<&str>,
    limit: Option<u32>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let filter = CaseFilter {
        status: status
            .map(|raw| parse_enum::<CaseStatus>(raw, "status"))
            .transpose()?,
        tag: tag.map(str::to_string),
        limit: Some(effective_limit(limit, flags.limit, 20)),
    };
    let cases = ctx.service.list_cases(&filter).await?;
    output(&cases, flags.format)
}
