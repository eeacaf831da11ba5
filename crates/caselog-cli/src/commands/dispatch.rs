use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Case { action } => commands::case::handle(&action, ctx, flags).await,
        Commands::Comment { action } => commands::comment::handle(&action, ctx, flags).await,
        Commands::Push(args) => commands::push::handle(&args, ctx, flags).await,
        Commands::Actions { case_id } => commands::actions::handle(&case_id, ctx, flags).await,
        Commands::Init(_) => unreachable!("init is pre-dispatched in main"),
    }
}
