use caselog_core::entities::{CaseSettings, ConnectorRef};
use caselog_core::enums::CaseStatus;
use caselog_core::requests::CaseCreate;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::{parse_connector, parse_enum};
use crate::context::AppContext;
use crate::output::output;

pub struct Params {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub status: Option<String>,
    pub connector: Option<String>,
    pub sync_alerts: Option<bool>,
    pub owner: Option<String>,
}

pub async fn run(params: Params, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let request = build_request(params)?;
    let case = ctx.service.create_case(request, &ctx.actor).await?;
    output(&case, flags.format)
}

fn build_request(params: Params) -> anyhow::Result<CaseCreate> {
    let status = params
        .status
        .as_deref()
        .map(|raw| parse_enum::<CaseStatus>(raw, "status"))
        .transpose()?;
    let connector = params
        .connector
        .as_deref()
        .map(parse_connector)
        .transpose()?
        .unwrap_or_else(ConnectorRef::none);
    let settings = params
        .sync_alerts
        .map_or_else(CaseSettings::default, |sync_alerts| CaseSettings { sync_alerts });

    Ok(CaseCreate {
        description: params.description,
        title: params.title,
        tags: params.tags,
        status,
        connector,
        settings,
        owner: params.owner,
    })
}
