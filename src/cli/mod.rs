pub mod dashboard;

use clap::Parser;

// Everything happens inside the dashboard; the command line only offers
// --help and --version.
#[derive(Parser)]
#[command(
    name = "pocketbook",
    version,
    about = "Log expenses, track invoices and watch your reserve goal, one session at a time."
)]
pub struct Cli {}
