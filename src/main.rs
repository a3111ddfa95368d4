use std::io;
use std::process::ExitCode;

use clap::Parser;

use tracker_viewer::cli::{run, Args, Outcome};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args, &mut io::stdin().lock(), &mut io::stdout()) {
        Ok(Outcome::Completed) => ExitCode::SUCCESS,
        Ok(Outcome::Declined) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            ExitCode::FAILURE
        }
    }
}
