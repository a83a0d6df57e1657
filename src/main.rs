use clap::Parser;
use farm_records::cli::{Args, setup_logging};
use farm_records::commands;
use std::process;

fn main() {
    let args = Args::parse();
    setup_logging(&args);

    match commands::run(args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
