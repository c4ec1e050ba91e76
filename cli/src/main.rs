mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, Commands, discover, info};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);
    print::banner();

    match commands.command {
        Commands::Info => {
            print::header("about the tool");
            info::info()?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Discover(args) => {
            print::header("getting ready for discovery");
            let cfg = args.to_config();
            discover::discover(args.target.unwrap_or_default(), &cfg).await
        }
    }
}
