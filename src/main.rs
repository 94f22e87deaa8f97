use std::process::ExitCode;

use clap::Parser;
use log::info;

use region_snip::cli::{validate_output_path, Cli};
use region_snip::dialog;
use region_snip::error::SessionError;
use region_snip::session::{self, Outcome, SessionOptions, EXIT_ERROR};
use region_snip::single_instance::acquire_single_instance;

fn main() -> ExitCode {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help / --version go to stdout and are not failures
            let code = if err.use_stderr() { EXIT_ERROR } else { 0 };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    // held until main returns
    let Some(_instance) = acquire_single_instance() else {
        let err = SessionError::InstanceAlreadyRunning;
        dialog::report(&err);
        return ExitCode::from(Outcome::Failed(err).exit_code());
    };

    let output = match validate_output_path(&cli.file) {
        Ok(path) => path,
        Err(err) => {
            dialog::report(&err);
            return ExitCode::from(Outcome::Failed(err).exit_code());
        }
    };

    info!("starting region_snip, output: {}", output.display());
    let outcome = session::run(SessionOptions {
        output,
        cancel_key: cli.escape_key.code(),
    });
    info!("session finished: {outcome}");
    ExitCode::from(outcome.exit_code())
}
