use clap::Subcommand;

/// Comment commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CommentCommands {
    /// Add a user or alert comment to a case.
    Add {
        case_id: String,
        #[arg(long, required_unless_present = "alert_id", conflicts_with_all = ["alert_id", "index"])]
        comment: Option<String>,
        #[arg(long, requires = "index")]
        alert_id: Option<String>,
        #[arg(long, requires = "alert_id")]
        index: Option<String>,
    },
    /// List a case's comments.
    List { case_id: String },
    /// Edit a comment.
    Update {
        case_id: String,
        comment_id: String,
        #[arg(long)]
        version: u64,
        /// user or alert.
        #[arg(long = "type")]
        comment_type: Option<String>,
        #[arg(long)]
        comment: Option<String>,
        #[arg(long)]
        alert_id: Option<String>,
        #[arg(long)]
        index: Option<String>,
    },
    /// Delete a comment.
    Delete { case_id: String, comment_id: String },
}
