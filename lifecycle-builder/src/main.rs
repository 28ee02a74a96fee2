use clap::Parser;
use clap::error::ErrorKind;
use lifecycle_builder::cli::BuildArgs;
use lifecycle_builder::{Builder, Env, ExitClassification, exit_code};
use log::error;
use std::process;

// Suppress warnings due to the `unused_crate_dependencies` lint not handling binaries of library
// crates well.
use crossbeam_utils as _;
use lifecycle_common as _;
use lifecycle_data as _;
#[cfg(unix)]
use nix as _;
use path_absolutize as _;
use tempfile as _;
use thiserror as _;
#[cfg(test)]
use assert_cmd as _;
#[cfg(test)]
use indoc as _;
#[cfg(test)]
use toml as _;

fn main() {
    let args = match BuildArgs::try_parse() {
        Ok(args) => args,
        Err(error) => {
            let exit_code = match error.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => exit_code::SUCCESS,
                _ => exit_code::INVALID_ARGS,
            };

            let _ = error.print();
            process::exit(exit_code);
        }
    };

    setup_logging(args.log_level.verbosity());

    let builder: Builder = Builder::default();

    match builder.run(&args, Env::from_current()) {
        Ok(_) => process::exit(ExitClassification::Success.exit_code()),
        Err(error) => {
            error!("{error}");
            process::exit(error.exit_code());
        }
    }
}

fn setup_logging(verbosity: usize) {
    if let Err(error) = stderrlog::new().verbosity(verbosity).init() {
        eprintln!("Unable to initialize logger: {error}");
        process::exit(exit_code::UNSPECIFIED_ERROR);
    }
}
