//! Entry point for the `salmon` command-line interface.
#![forbid(unsafe_code)]

use std::error::Error as _;
use std::process;

use clap::Parser;
use log::error;

use salmon_cli::Cli;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let outcome = salmon_cli::run(cli);

    // The final line is printed on every path, success or failure, and
    // does not pass through the log filter.
    println!("Finished");
    if let Err(err) = outcome {
        error!("{err}");
        let mut source = err.source();
        while let Some(cause) = source {
            error!("caused by: {cause}");
            source = cause.source();
        }
        process::exit(1);
    }
}
