use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "themelens",
    version,
    about = "Inspect Liquid theme schemas: section placement and block nesting"
)]
pub struct Cli {
    /// Theme root directory (overrides the configuration file)
    #[arg(short, long, global = true, env = "THEMELENS_ROOT")]
    pub root: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every template file and its schema status
    Scan(ScanArgs),
    /// Show which sections can be placed in which page zones
    Pages(PagesArgs),
    /// Show which blocks can be nested in which sections
    Blocks(BlocksArgs),
    /// Report dangling private block references and unrendered @theme blocks
    Check(CheckArgs),
    /// Print the effective configuration
    Config,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Only list files that carry a schema block
    #[arg(long)]
    pub schemas_only: bool,
}

#[derive(Args, Debug, Clone)]
pub struct PagesArgs {
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Limit output to one page type (index, product, collection, ...)
    #[arg(short, long)]
    pub page: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct BlocksArgs {
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Limit output to one section, by template name
    #[arg(short, long)]
    pub section: Option<String>,

    /// Also list blocks that cannot be added, with the reason
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}
