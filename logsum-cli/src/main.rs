use clap::Parser;
use logsum_cli::commands::Commands;
use logsum_cli::CliResult;

/// Sum the bytes transferred in Common Log Format access logs
#[derive(Debug, Parser)]
#[command(name = "logsum", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Process(args) => args.execute(),
        Commands::Compare(args) => args.execute(),
        Commands::List { subcommand } => subcommand.execute(),
    }
}
