use clap::ValueEnum;

/// How command results are printed on stdout.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Indented JSON.
    Json,
    /// One JSON document per line.
    Raw,
}

/// Flags shared by every subcommand, resolved once in `main`.
#[derive(Clone, Debug)]
pub struct GlobalFlags {
    pub format: OutputFormat,
    pub limit: Option<u32>,
    pub quiet: bool,
    pub verbose: bool,
    pub project: Option<String>,
    /// `--as`: username to record on mutations.
    pub actor: Option<String>,
}
