use clap::{Args, Subcommand};

use crate::cli::subcommands::{CaseCommands, CommentCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create `.caselog/` with a starter config.
    Init(InitArgs),
    /// Cases.
    Case {
        #[command(subcommand)]
        action: CaseCommands,
    },
    /// Comments on a case.
    Comment {
        #[command(subcommand)]
        action: CommentCommands,
    },
    /// Record a push of a case to its external connector.
    Push(PushArgs),
    /// Show a case's user actions, oldest first.
    Actions { case_id: String },
}

#[derive(Clone, Debug, Args)]
pub struct InitArgs {
    /// Username to record on mutations.
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub full_name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    /// Overwrite an existing config file.
    #[arg(long)]
    pub force: bool,
}

#[derive(Clone, Debug, Args)]
pub struct PushArgs {
    pub case_id: String,
    #[arg(long)]
    pub connector_id: String,
    #[arg(long)]
    pub connector_name: String,
    #[arg(long)]
    pub external_id: String,
    #[arg(long)]
    pub external_title: String,
    #[arg(long)]
    pub external_url: String,
}
