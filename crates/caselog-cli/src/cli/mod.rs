use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// `caselog` command line: global flags plus one subcommand.
#[derive(Debug, Parser)]
#[command(name = "caselog", version, about = "caselog - cases with an immutable audit trail")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// json (indented) or raw (one line per result)
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Cap on listed cases, comments or actions
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding `.caselog/` (default: current directory)
    #[arg(short, long, global = true)]
    pub project: Option<String>,

    /// Username recorded on mutations (overrides `actor.username`)
    #[arg(long = "as", global = true)]
    pub actor: Option<String>,
}

impl Cli {
    /// Flags handed to every command handler.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            project: self.project.clone(),
            actor: self.actor.clone(),
        }
    }
}
