use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use warroom_core::analysis::AnalysisMode;

#[derive(Parser)]
#[command(name = "warroom")]
#[command(about = "Register voters into the shared war room registry")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to the local record cache
    #[arg(long, global = true, value_name = "PATH")]
    pub cache_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register a voter
    #[command(alias = "new")]
    Add {
        /// Actor (sector) id the voter is tied to
        #[arg(long, value_name = "ID")]
        actor: String,
        /// Voter full name
        #[arg(long, value_name = "NAME")]
        name: String,
        /// National ID number
        #[arg(long, value_name = "NUMBER")]
        id_number: String,
        /// Phone number
        #[arg(long, value_name = "PHONE")]
        phone: String,
        /// Only write the local cache; the next sync picks it up
        #[arg(long)]
        no_sync: bool,
        /// Report the registration's impact on the network (needs an API key)
        #[arg(long)]
        analyze: bool,
    },
    /// List registered voters, newest first
    List {
        /// Number of records to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a record from the local registry
    Delete {
        /// Record ID or unique ID prefix
        id: String,
    },
    /// Run one merge pass against the shared registry
    Sync,
    /// Keep syncing on an interval until interrupted
    Watch,
    /// Export the registry
    Export {
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        /// Output file or directory (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Render a thank-you card for a registered voter
    Card {
        /// Record ID or unique ID prefix
        id: String,
        /// Output file or directory (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Show the actor network
    Actors {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show registration progress
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Ask the language model for a narrative report
    Analyze {
        /// Report focus
        #[arg(long, value_enum, default_value_t = ModeArg::General)]
        mode: ModeArg,
        /// Actor id for tactical reports
        #[arg(long, value_name = "ID")]
        actor: Option<String>,
        /// Metric label for projection reports
        #[arg(long, value_name = "LABEL")]
        metric: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show resolved configuration
    Config,
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl From<ExportFormat> for warroom_core::export::ExportFormat {
    fn from(value: ExportFormat) -> Self {
        match value {
            ExportFormat::Csv => Self::Csv,
            ExportFormat::Json => Self::Json,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ModeArg {
    /// Health of the whole network
    General,
    /// One actor's loyalty levers (needs --actor)
    Actor,
    /// Effect of the latest registration
    Registry,
    /// Pace toward the target (needs --metric)
    Metric,
}

impl From<ModeArg> for AnalysisMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::General => Self::GeneralEcosystem,
            ModeArg::Actor => Self::ActorTactical,
            ModeArg::Registry => Self::VoteRegistryImpact,
            ModeArg::Metric => Self::MetricProjection,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
