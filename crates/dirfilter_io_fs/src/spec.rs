//! Filter option models and top-level error types.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::conf::C_SUFFIX_DIR_FILTERED;

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// How reference-file lines are matched against directory entry names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumExclusionMatchMode {
    /// Exact, case-sensitive name equality.
    Literal,
    /// Shell-like wildcards (`*`, `?`, character classes).
    Glob,
    /// Regular expression, searched anywhere in the name.
    Regex,
}

/// Symlink handling policy for top-level entries and copied subtrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumCopySymlinkStrategy {
    /// Follow the link and copy the target file or directory.
    Dereference,
    /// Ignore symlink entries.
    SkipSymlinks,
}

/// Target kind for [`crate::sanitize_filename`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumSanitizeTarget {
    /// Output text file: `.txt` suffix is enforced.
    File,
    /// Directory name: no suffix is added.
    Directory,
}

/// Classification of one source entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumEntryKind {
    File,
    Directory,
    Symlink,
    /// Socket, fifo, device or anything else.
    Special,
    /// Entry could not be inspected.
    Unknown,
}

impl fmt::Display for EnumEntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c_kind = match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
            Self::Special => "special entry",
            Self::Unknown => "entry",
        };
        f.write_str(c_kind)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// Input options for `filter_and_copy`.
#[derive(Debug, Clone)]
pub struct SpecFilterOptions {
    /// Matching rule applied to reference-file lines.
    pub rule_match: EnumExclusionMatchMode,
    /// Symlink handling behavior.
    pub rule_symlink: EnumCopySymlinkStrategy,
    /// Suffix appended to the destination directory name.
    pub suffix_dir_dst: String,
    /// Do not mutate filesystem; record what would be copied.
    pub if_dry_run: bool,
}

impl Default for SpecFilterOptions {
    fn default() -> Self {
        Self {
            rule_match: EnumExclusionMatchMode::Literal,
            rule_symlink: EnumCopySymlinkStrategy::SkipSymlinks,
            suffix_dir_dst: C_SUFFIX_DIR_FILTERED.to_string(),
            if_dry_run: false,
        }
    }
}

/// One failed top-level entry.
///
/// For directories, `path_failed` is the first path inside the subtree that
/// could not be copied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to copy {kind_entry} '{name_entry}': {exception}")]
pub struct ItemCopyError {
    /// Entry name as listed in the source directory.
    pub name_entry: String,
    /// Entry classification at copy time.
    pub kind_entry: EnumEntryKind,
    /// Source path of the entry.
    pub path_src: PathBuf,
    /// Destination path of the entry.
    pub path_dst: PathBuf,
    /// Path where the failure happened.
    pub path_failed: PathBuf,
    /// Underlying IO error kind, when the failure came from the OS.
    pub kind_io: Option<io::ErrorKind>,
    /// User-facing error text.
    pub exception: String,
}

/// Reference-file problems, raised before the source is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read reference file {}: {source}", .path.display())]
    ReferenceFileUnreadable { path: PathBuf, source: io::Error },
    #[error("Invalid pattern in reference file: {0}")]
    InvalidPattern(String),
    #[error("Invalid destination suffix {0:?}: must be non-empty and contain no path separator")]
    InvalidSuffix(String),
}

/// Source directory problems, raised before the destination is touched.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Source is not (or no longer) a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("Cannot list source directory {}: {source}", .path.display())]
    ListingFailed { path: PathBuf, source: io::Error },
}

/// Destination initialization problems, raised before any copy.
#[derive(Debug, Error)]
pub enum DestinationError {
    #[error("Cannot create destination directory {}: {source}", .path.display())]
    CreateFailed { path: PathBuf, source: io::Error },
    #[error(
        "Destination {} overlaps source {}",
        .path_dst.display(),
        .path_src.display()
    )]
    OverlapsSource { path_src: PathBuf, path_dst: PathBuf },
}

/// "Top-level call failed" errors for `filter_and_copy`.
///
/// Per-entry failures are not errors at this level; they are collected in
/// [`crate::ReportFilter::errors`].
#[derive(Debug, Error)]
pub enum FilterCopyError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Destination(#[from] DestinationError),
    /// Fault outside the per-entry error path during the copy phase.
    #[error("Unexpected failure during copy: {message}")]
    Unexpected {
        message: String,
        /// Destination that may hold partial results.
        path_dir_partial: Option<PathBuf>,
    },
}

/// Errors for `scan_directory`.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Path is not a valid directory: {}", .0.display())]
    SourceNotDirectory(PathBuf),
    #[error("Cannot list directory {}: {source}", .path.display())]
    ListingFailed { path: PathBuf, source: io::Error },
    #[error("Cannot write output file {}: {source}", .path.display())]
    OutputWriteFailed { path: PathBuf, source: io::Error },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
