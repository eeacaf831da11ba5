use caselog_core::entities::CommentContent;
use caselog_core::errors::CoreError;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    case_id: &str,
    comment: Option<String>,
    alert_id: Option<String>,
    index: Option<String>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let content = build_content(comment, alert_id, index)?;
    let created = ctx
        .service
        .create_comment(case_id, content, &ctx.actor)
        .await?;
    output(&created, flags.format)
}

fn build_content(
    comment: Option<String>,
    alert_id: Option<String>,
    index: Option<String>,
) -> anyhow::Result<CommentContent> {
    match (comment, alert_id, index) {
        (Some(comment), None, None) => Ok(CommentContent::User { comment }),
        (None, Some(alert_id), Some(index)) => Ok(CommentContent::Alert { alert_id, index }),
        _ => Err(CoreError::Validation(
            "pass either --comment or both --alert-id and --index".into(),
        )
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_makes_user_comment() {
        let content = build_content(Some("Wow, good luck catching that bad meanie!".into()), None, None)
            .expect("content should build");
        assert!(matches!(content, CommentContent::User { .. }));
    }

    #[test]
    fn alert_needs_both_parts() {
        assert!(build_content(None, Some("alert-1".into()), Some("alerts".into())).is_ok());
        let err = build_content(None, Some("alert-1".into()), None).unwrap_err();
        assert!(matches!(err.downcast_ref::<CoreError>(), Some(CoreError::Validation(_))));
        assert!(build_content(Some("x".into()), Some("alert-1".into()), Some("alerts".into())).is_err());
    }
}
