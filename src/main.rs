use clap::Parser;
use colored::Colorize;

use pocketbook::cli::{self, Cli};
use pocketbook::{logging, settings};

fn main() {
    let _cli = Cli::parse();
    logging::init();

    let settings = settings::load_settings();
    if let Err(e) = cli::dashboard::run(&settings) {
        eprintln!("{} {e}", "Error:".red().bold());
        std::process::exit(1);
    }
}
