use clap::Parser;
use lanes::cli::commands::Cli;
use lanes::cli::handlers;
use lanes::io::logging;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
