//! Binary entrypoint for the `parlwatch` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // A missing .env file is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();

    // Recording is handled in commands::dispatch via PARLWATCH_RECORD=<path>.
    match parlwatch::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
