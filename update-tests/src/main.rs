use clap::Parser;
use update_tests::cli::{Cli, run};
use update_tests::{exit_codes, logging};

fn main() {
    logging::init();
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("error: {:#}", err);
        std::process::exit(exit_codes::FAILED);
    }
}
