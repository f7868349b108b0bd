//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use dirfilter_io_fs::{C_SUFFIX_DIR_FILTERED, EnumExclusionMatchMode};

/// Scan a directory into a text file, or copy the entries a text file does
/// not list into a `<name>_filtrato` directory.
///
/// Missing arguments are asked for interactively.
#[derive(Parser, Debug)]
#[command(name = "dirfilter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The action to run (prompted when omitted)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List the immediate entries of a directory into a .txt file in the
    /// current directory
    Scan {
        /// Directory to scan
        directory: Option<String>,

        /// Output file name (".txt" is added when missing)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Copy the entries of a directory that a .txt file does not list
    Filter {
        /// Source directory to filter
        directory: Option<String>,

        /// .txt file with the names to EXCLUDE, one per line
        reference: Option<String>,

        /// How reference lines match entry names
        #[arg(long = "match", value_enum, env = "DIRFILTER_MATCH", default_value_t = ArgMatchMode::Literal)]
        match_mode: ArgMatchMode,

        /// Copy the targets of symbolic links instead of skipping them
        #[arg(long)]
        follow_symlinks: bool,

        /// Suffix of the destination directory name
        #[arg(long, env = "DIRFILTER_SUFFIX", default_value = C_SUFFIX_DIR_FILTERED)]
        suffix: String,

        /// Show what would be copied without creating anything
        #[arg(long)]
        dry_run: bool,
    },
}

impl Commands {
    /// Filter action with every option at its default.
    pub fn filter_default() -> Self {
        Self::Filter {
            directory: None,
            reference: None,
            match_mode: ArgMatchMode::Literal,
            follow_symlinks: false,
            suffix: C_SUFFIX_DIR_FILTERED.to_string(),
            dry_run: false,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgMatchMode {
    /// Exact name
    Literal,
    /// Shell wildcard
    Glob,
    /// Regular expression
    Regex,
}

impl From<ArgMatchMode> for EnumExclusionMatchMode {
    fn from(value: ArgMatchMode) -> Self {
        match value {
            ArgMatchMode::Literal => Self::Literal,
            ArgMatchMode::Glob => Self::Glob,
            ArgMatchMode::Regex => Self::Regex,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_filter_with_options() {
        let cli = Cli::try_parse_from([
            "dirfilter",
            "filter",
            "/data/photos",
            "/data/list.txt",
            "--match",
            "glob",
            "--follow-symlinks",
            "--dry-run",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Filter {
                directory,
                reference,
                match_mode,
                follow_symlinks,
                dry_run,
                ..
            }) => {
                assert_eq!(directory.as_deref(), Some("/data/photos"));
                assert_eq!(reference.as_deref(), Some("/data/list.txt"));
                assert_eq!(match_mode, ArgMatchMode::Glob);
                assert!(follow_symlinks);
                assert!(dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_without_command() {
        let cli = Cli::try_parse_from(["dirfilter", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["dirfilter", "-v", "-q"]).is_err());
    }
}
