//! dirfilter CLI
//!
//! Scan a directory into a text file, or copy into `<name>_filtrato` the
//! entries that a text file does not list.

mod cli;
mod commands;
mod error;
mod logging;
mod prompt;

use std::panic::{self, AssertUnwindSafe};
use std::process::{self, ExitCode};

use clap::Parser;
use colored::Colorize;
use tracing::error;

use cli::Cli;
use error::{N_EXIT_CRITICAL, N_EXIT_FAILURE, N_EXIT_INTERRUPTED, N_EXIT_SUCCESS};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are reported through the same path
            return ExitCode::from(if e.use_stderr() {
                N_EXIT_FAILURE
            } else {
                N_EXIT_SUCCESS
            });
        }
    };
    logging::init_tracing(cli.verbose, cli.quiet);

    if let Err(e) = ctrlc::set_handler(|| {
        eprintln!("\n\n{}", "[!] Operation interrupted by user.".yellow());
        process::exit(i32::from(N_EXIT_INTERRUPTED));
    }) {
        tracing::warn!("Cannot install the interrupt handler: {e}");
    }

    println!("{}", "--- dirfilter: scan/filter directory utility ---".bold());

    let n_exit = match panic::catch_unwind(AssertUnwindSafe(|| commands::run(cli.command))) {
        Ok(Ok(true)) => {
            println!("\n{}", "=".repeat(40));
            println!("{}", "[*] Operation completed.".green());
            N_EXIT_SUCCESS
        }
        Ok(Ok(false)) => {
            println!("\n{}", "=".repeat(40));
            println!(
                "{}",
                "[!] Operation finished with errors or partially.".yellow()
            );
            N_EXIT_FAILURE
        }
        Ok(Err(e)) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            e.exit_code()
        }
        Err(_) => {
            error!("Critical failure: the operation panicked");
            N_EXIT_CRITICAL
        }
    };

    ExitCode::from(n_exit)
}
