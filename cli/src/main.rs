mod commands;
mod report;
mod terminal;

use commands::{CommandLine, Commands, probe, run, sources};
use terminal::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init(commands.verbose);

    match commands.command {
        Commands::Run { probe_args, output } => run::run(probe_args, output).await,
        Commands::Probe {
            endpoints,
            probe_args,
            output,
        } => probe::probe(endpoints, probe_args, output).await,
        Commands::Sources => {
            sources::list();
            Ok(())
        }
    }
}
