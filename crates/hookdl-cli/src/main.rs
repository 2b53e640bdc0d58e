use hookdl_core::logging;

mod cli;

use crate::cli::CliCommand;

fn main() {
    // Fall back to stderr when the state dir is unwritable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    match CliCommand::run_from_args() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("hookdl error: {:#}", err);
            std::process::exit(1);
        }
    }
}
