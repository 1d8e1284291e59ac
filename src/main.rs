// Bitcoin learning tools - CLI

use bitcoin_learn::{Cli, CliHandler};
use clap::Parser;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let mut handler = CliHandler::new(cli.stats, cli.analytics_out);

    if let Err(e) = handler.handle(cli.command).and_then(|_| handler.finish()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
