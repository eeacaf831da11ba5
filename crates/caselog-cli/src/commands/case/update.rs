use caselog_core::entities::CaseSettings;
use caselog_core::enums::CaseStatus;
use caselog_core::errors::CoreError;
use caselog_core::updates::case::{CasePatch, CasePatchBuilder};

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::{parse_connector, parse_enum};
use crate::context::AppContext;
use crate::output::output;

pub struct Params {
    pub id: String,
    pub version: u64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub tags: Option<Vec<String>>,
    pub connector: Option<String>,
    pub sync_alerts: Option<bool>,
    pub patch: Option<String>,
}

pub async fn run(params: Params, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let patch = build_patch(params)?;
    let case = ctx.service.update_case(&patch, &ctx.actor).await?;
    output(&case, flags.format)
}

fn build_patch(params: Params) -> anyhow::Result<CasePatch> {
    if let Some(raw) = params.patch.as_deref() {
        return Ok(patch_from_json(&params.id, params.version, raw)?);
    }

    let mut builder = CasePatchBuilder::new(params.id, params.version);
    if let Some(status) = params.status.as_deref() {
        builder = builder.status(parse_enum::<CaseStatus>(status, "status")?);
    }
    if let Some(title) = params.title {
        builder = builder.title(title);
    }
    if let Some(description) = params.description {
        builder = builder.description(description);
    }
    if let Some(tags) = params.tags {
        builder = builder.tags(tags);
    }
    if let Some(connector) = params.connector.as_deref() {
        builder = builder.connector(parse_connector(connector)?);
    }
    if let Some(sync_alerts) = params.sync_alerts {
        builder = builder.settings(CaseSettings { sync_alerts });
    }
    Ok(builder.build())
}

/// `--patch` JSON takes its id and version from the command line.
fn patch_from_json(id: &str, version: u64, raw: &str) -> Result<CasePatch, CoreError> {
    let mut value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|error| CoreError::Validation(format!("invalid patch JSON: {error}")))?;
    let Some(object) = value.as_object_mut() else {
        return Err(CoreError::Validation("patch JSON must be an object".into()));
    };
    object.insert("id".into(), id.into());
    object.insert("version".into(), version.into());
    CasePatch::from_json(value)
}
