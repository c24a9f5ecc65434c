mod commands;
mod terminal;

use commands::{CommandLine, discover, segments};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    logging::init_logging(commands.level());

    let cidr: String = match &commands.cidr {
        Some(cidr) => cidr.clone(),
        None => segments::choose()?,
    };

    discover::discover(&cidr, commands.scan_config()).await?;
    print::end_of_program();
    Ok(())
}
