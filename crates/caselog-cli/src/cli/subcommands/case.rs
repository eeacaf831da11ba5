use clap::Subcommand;

/// Case commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CaseCommands {
    /// Open a case.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// Comma-separated tags.
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
        /// open, in-progress or closed (default: open).
        #[arg(long)]
        status: Option<String>,
        /// Connector reference as JSON (`{"id","name","type","fields"}`).
        #[arg(long)]
        connector: Option<String>,
        #[arg(long)]
        sync_alerts: Option<bool>,
        #[arg(long)]
        owner: Option<String>,
    },
    /// Get a case by ID.
    Get { id: String },
    /// List cases, newest first.
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Apply a version-checked patch to a case.
    Update {
        id: String,
        /// The version the patch was prepared against.
        #[arg(long)]
        version: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<String>,
        /// Replacement tag set, comma-separated. Pass the flag alone to clear.
        #[arg(long, num_args = 0.., value_delimiter = ',')]
        tags: Option<Vec<String>>,
        /// Connector reference as JSON.
        #[arg(long)]
        connector: Option<String>,
        #[arg(long)]
        sync_alerts: Option<bool>,
        /// Full patch as JSON; merged under the id and version above.
        #[arg(long, conflicts_with_all = ["title", "description", "status", "tags", "connector", "sync_alerts"])]
        patch: Option<String>,
    },
}
