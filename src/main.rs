use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use stocklab::core::log::init_logging;
use stocklab::core::theme::Theme;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Search for a company name or ticker symbol
    Search {
        /// Company name or symbol fragment
        #[arg(required = true)]
        keywords: Vec<String>,
    },
    /// Show overview, quote, price history and news for a symbol
    Quote {
        symbol: String,
        /// Colour theme: light or dark
        #[arg(short, long)]
        theme: Option<Theme>,
    },
    /// Open the interactive dashboard
    Dashboard {
        /// Colour theme: light or dark
        #[arg(short, long)]
        theme: Option<Theme>,
    },
}

impl From<Commands> for stocklab::AppCommand {
    fn from(cmd: Commands) -> stocklab::AppCommand {
        match cmd {
            Commands::Search { keywords } => stocklab::AppCommand::Search {
                keywords: keywords.join(" "),
            },
            Commands::Quote { symbol, theme } => stocklab::AppCommand::Quote { symbol, theme },
            Commands::Dashboard { theme } => stocklab::AppCommand::Dashboard { theme },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => stocklab::cli::setup::setup(),
        Some(cmd) => stocklab::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
