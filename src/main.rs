use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use networth::core::log::init_logging;
use networth::core::timeframe::Timeframe;

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

#[derive(Args, Default)]
struct ViewArgs {
    /// Lookback period: All, 1Y, 3M, 1M, 2W or 1W
    #[arg(short, long)]
    timeframe: Option<Timeframe>,

    /// Display currency, e.g. EUR
    #[arg(long)]
    currency: Option<String>,
}

impl From<ViewArgs> for networth::RunOptions {
    fn from(args: ViewArgs) -> networth::RunOptions {
        networth::RunOptions {
            timeframe: args.timeframe,
            currency: args.currency,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display net worth and its change over the timeframe
    Summary(ViewArgs),
    /// Display net worth history over the timeframe
    History(ViewArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config_path = cli.config_path.as_deref();
    let result = match cli.command {
        Some(Commands::Setup) => networth::cli::setup::setup(),
        Some(Commands::Summary(args)) => {
            networth::run_command(networth::AppCommand::Summary, config_path, &args.into()).await
        }
        Some(Commands::History(args)) => {
            networth::run_command(networth::AppCommand::History, config_path, &args.into()).await
        }
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
