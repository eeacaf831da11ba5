use caselog_core::enums::CommentType;
use caselog_core::errors::CoreError;
use caselog_core::updates::comment::CommentPatch;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub struct Params {
    pub comment_id: String,
    pub version: u64,
    pub comment_type: Option<String>,
    pub comment: Option<String>,
    pub alert_id: Option<String>,
    pub index: Option<String>,
}

pub async fn run(
    case_id: &str,
    params: Params,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let patch = build_patch(params)?;
    let updated = ctx
        .service
        .update_comment(case_id, &patch, &ctx.actor)
        .await?;
    output(&updated, flags.format)
}

fn build_patch(params: Params) -> anyhow::Result<CommentPatch> {
    let comment_type = params
        .comment_type
        .as_deref()
        .map(|raw| parse_enum::<CommentType>(raw, "type"))
        .transpose()?;
    let patch = CommentPatch {
        id: params.comment_id,
        version: params.version,
        comment_type,
        comment: params.comment,
        alert_id: params.alert_id,
        index: params.index,
    };
    if patch.is_empty() {
        return Err(CoreError::Validation(
            "At least one of --type, --comment, --alert-id, or --index must be provided".into(),
        )
        .into());
    }
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn params() -> Params {
        Params {
            comment_id: "cmt-1".into(),
            version: 1,
            comment_type: None,
            comment: None,
            alert_id: None,
            index: None,
        }
    }

    #[test]
    fn rejects_empty_edit() {
        let err = build_patch(params()).unwrap_err();
        assert!(matches!(err.downcast_ref::<CoreError>(), Some(CoreError::Validation(_))));
    }

    #[test]
    fn keeps_only_submitted_fields() {
        let mut p = params();
        p.comment = Some("Update my comment".into());
        let patch = build_patch(p).expect("patch should build");
        assert_eq!(patch.comment.as_deref(), Some("Update my comment"));
        assert!(patch.comment_type.is_none());
        assert_eq!(
            serde_json::to_string(&patch.changes()).unwrap(),
            r#"{"comment":"Update my comment"}"#
        );
    }

    #[test]
    fn parses_type_switch() {
        let mut p = params();
        p.comment_type = Some("alert".into());
        p.alert_id = Some("alert-1".into());
        p.index = Some("alerts".into());
        let patch = build_patch(p).expect("patch should build");
        assert_eq!(patch.comment_type, Some(CommentType::Alert));
    }
}
