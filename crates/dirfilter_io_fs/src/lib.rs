//! `dirfilter_io_fs` v1:
//! filesystem side of the dirfilter utility.
//!
//! Modules:
//! - `copy`      : filter-and-copy orchestration
//! - `scan`      : directory listing to a text file
//! - `exclusion` : reference-file loading and name matching
//! - `spec`      : enums/options/errors
//! - `report`    : run-time report models
//! - `conf`      : constants
//! - `util`      : sanitization, path and metadata helpers

pub mod conf;
pub mod copy;
pub mod exclusion;
pub mod report;
pub mod scan;
pub mod spec;
mod util;

pub use conf::{C_EXT_TXT, C_NAME_SCAN_OUTPUT_DEFAULT, C_SUFFIX_DIR_FILTERED};
pub use copy::filter_and_copy;
pub use exclusion::{SpecExclusionSet, parse_exclusion_names};
pub use report::{ReportFilter, ReportFilterBuilder, ReportScan};
pub use scan::scan_directory;
pub use spec::{
    ConfigError, DestinationError, EnumCopySymlinkStrategy, EnumEntryKind,
    EnumExclusionMatchMode, EnumSanitizeTarget, FilterCopyError, ItemCopyError, ScanError,
    SourceError, SpecFilterOptions,
};
pub use util::{normalize_path, sanitize_filename};
