//! Action runners: resolve arguments, call the engine, render the outcome.

use std::env;
use std::path::Path;

use colored::Colorize;
use dirfilter_io_fs::{
    C_NAME_SCAN_OUTPUT_DEFAULT, EnumCopySymlinkStrategy, FilterCopyError, ReportFilter,
    ReportScan, SpecFilterOptions, filter_and_copy, scan_directory,
};
use tracing::debug;

use crate::cli::Commands;
use crate::error::Result;
use crate::prompt::{
    SPEC_EXISTING_DIR, SPEC_EXISTING_TXT_FILE, prompt_action, prompt_text_with_default,
    resolve_argument,
};

/// Run `command`, prompting for it when absent.
///
/// `Ok(true)` means the action completed cleanly, `Ok(false)` that it
/// finished with errors or only partially.
pub fn run(command: Option<Commands>) -> Result<bool> {
    debug!(
        "Running on {} ({})",
        env::consts::OS,
        env::consts::ARCH
    );

    let command = match command {
        Some(command) => command,
        None => prompt_action()?,
    };
    println!("{}", "-".repeat(40));

    match command {
        Commands::Scan { directory, output } => run_scan(directory, output),
        Commands::Filter {
            directory,
            reference,
            match_mode,
            follow_symlinks,
            suffix,
            dry_run,
        } => {
            let options = SpecFilterOptions {
                rule_match: match_mode.into(),
                rule_symlink: if follow_symlinks {
                    EnumCopySymlinkStrategy::Dereference
                } else {
                    EnumCopySymlinkStrategy::SkipSymlinks
                },
                suffix_dir_dst: suffix,
                if_dry_run: dry_run,
            };
            run_filter(directory, reference, options)
        }
    }
}

/// Scan a directory into a `.txt` file in the current working directory.
///
/// The output name is only asked for when the directory was asked for too.
pub fn run_scan(directory: Option<String>, output: Option<String>) -> Result<bool> {
    println!("{}", "[Action: Scan Directory]".bold());
    let if_interactive = directory.is_none();
    let path_dir = resolve_argument(
        directory,
        "Path of the directory to scan",
        &SPEC_EXISTING_DIR,
    )?;
    let name_output = match output {
        Some(name) => name,
        None if if_interactive => prompt_text_with_default(
            "Name of the output .txt file",
            C_NAME_SCAN_OUTPUT_DEFAULT,
        )?,
        None => C_NAME_SCAN_OUTPUT_DEFAULT.to_string(),
    };
    let path_cwd = env::current_dir()?;

    match scan_directory(&path_dir, &name_output, &path_cwd) {
        Ok(report) => {
            print_scan_summary(&report);
            Ok(true)
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            Ok(false)
        }
    }
}

/// Copy the entries of a directory that the reference file does not list.
pub fn run_filter(
    directory: Option<String>,
    reference: Option<String>,
    options: SpecFilterOptions,
) -> Result<bool> {
    println!("{}", "[Action: Filter Directory by Text File]".bold());
    let path_dir = resolve_argument(
        directory,
        "Path of the SOURCE directory to filter",
        &SPEC_EXISTING_DIR,
    )?;
    let path_reference = resolve_argument(
        reference,
        "Path of the .txt file with the names to EXCLUDE",
        &SPEC_EXISTING_TXT_FILE,
    )?;

    println!("  {}: {}", "Source directory".dimmed(), path_dir.cyan());
    println!("  {}: {}", "Reference file".dimmed(), path_reference.cyan());

    let if_dry_run = options.if_dry_run;
    match filter_and_copy(&path_dir, &path_reference, options) {
        Ok(report) => {
            print_filter_summary(&report, if_dry_run);
            Ok(report.is_success())
        }
        Err(FilterCopyError::Unexpected {
            message,
            path_dir_partial,
        }) => {
            eprintln!(
                "{}: unexpected failure during the process: {}",
                "error".red().bold(),
                message
            );
            if let Some(c_note) = partial_destination_note(path_dir_partial.as_deref()) {
                eprintln!("{} {}", "note:".yellow(), c_note);
            }
            Ok(false)
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            Ok(false)
        }
    }
}

/// Advisory for a destination left behind by an interrupted copy, when it
/// actually exists.
fn partial_destination_note(path_dir_partial: Option<&Path>) -> Option<String> {
    path_dir_partial
        .filter(|path| path.exists())
        .map(|path| format!("A partial destination directory may exist: {}", path.display()))
}

fn print_scan_summary(report: &ReportScan) {
    println!();
    println!("{}", "Scan completed.".green().bold());
    println!(
        "  {}: {}",
        "Entries written".dimmed(),
        report.cnt_written.to_string().cyan()
    );
    if report.cnt_placeholder > 0 {
        println!(
            "  {}: {}",
            "Placeholders".dimmed(),
            report.cnt_placeholder.to_string().yellow()
        );
    }
    println!(
        "  {}: {}",
        "Saved to".dimmed(),
        report.path_file_output.display().to_string().cyan()
    );
}

fn print_filter_summary(report: &ReportFilter, if_dry_run: bool) {
    println!();
    let Some(path_dir_dst) = &report.path_dir_dst else {
        println!("Nothing to copy: every entry is listed in the reference file.");
        return;
    };

    println!("{}", "Copy summary:".bold());
    if if_dry_run {
        println!(
            "  {}: {}",
            "Entries to copy (dry run)".dimmed(),
            report.cnt_planned.to_string().cyan()
        );
    } else {
        println!(
            "  {}: {}",
            "Copied".dimmed(),
            report.cnt_copied.to_string().green()
        );
    }
    let c_failed = report.error_count().to_string();
    println!(
        "  {}: {}",
        "Failed".dimmed(),
        if report.error_count() > 0 {
            c_failed.red()
        } else {
            c_failed.normal()
        }
    );
    if report.cnt_skipped > 0 {
        println!(
            "  {}: {}",
            "Skipped".dimmed(),
            report.cnt_skipped.to_string().yellow()
        );
    }
    println!(
        "  {}: {}",
        "Destination".dimmed(),
        path_dir_dst.display().to_string().cyan()
    );

    for error in &report.errors {
        println!("  {} {}", "-".red(), error);
    }
    if report.is_success() {
        println!("{}", "Filter and copy completed.".green().bold());
    } else {
        println!(
            "{}",
            "Some entries were not copied because of errors.".yellow()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::partial_destination_note;
    use tempfile::TempDir;

    #[test]
    fn test_partial_destination_note_only_for_existing_directory() {
        let tmp = TempDir::new().unwrap();
        let path_dst = tmp.path().join("photos_filtrato");

        assert_eq!(partial_destination_note(None), None);
        assert_eq!(partial_destination_note(Some(path_dst.as_path())), None);

        std::fs::create_dir(&path_dst).unwrap();
        let c_note = partial_destination_note(Some(path_dst.as_path())).unwrap();
        assert!(c_note.contains("partial destination"));
        assert!(c_note.contains("photos_filtrato"));
    }
}
