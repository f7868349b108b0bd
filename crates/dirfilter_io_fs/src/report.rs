//! Filter/scan report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::spec::ItemCopyError;

/// Aggregate counters and diagnostics for one `filter_and_copy` run.
#[derive(Debug, Default, Clone)]
pub struct ReportFilter {
    /// Destination directory, once derived. Not created in dry-run mode or
    /// when nothing had to be copied.
    pub path_dir_dst: Option<PathBuf>,
    /// Number of unique names (or patterns) read from the reference file.
    pub cnt_excluded_names: u64,
    /// Number of entries in the source directory snapshot.
    pub cnt_scanned: u64,
    /// Number of entries left after removing excluded names.
    pub cnt_selected: u64,
    /// Number of entries copied successfully.
    pub cnt_copied: u64,
    /// Number of entries skipped (symlinks and special files).
    pub cnt_skipped: u64,
    /// Number of entries that would be copied in dry-run mode.
    pub cnt_planned: u64,
    /// Non-fatal warnings collected during loading/copy.
    pub warnings: Vec<String>,
    /// Per-entry failures.
    pub errors: Vec<ItemCopyError>,
}

impl ReportFilter {
    /// Number of entries that failed to copy.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// `true` when no entry failed. Partial success counts as failure.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_excluded_names".to_string(), self.cnt_excluded_names);
        dict_counts.insert("cnt_scanned".to_string(), self.cnt_scanned);
        dict_counts.insert("cnt_selected".to_string(), self.cnt_selected);
        dict_counts.insert("cnt_copied".to_string(), self.cnt_copied);
        dict_counts.insert("cnt_skipped".to_string(), self.cnt_skipped);
        dict_counts.insert("cnt_planned".to_string(), self.cnt_planned);
        dict_counts.insert("cnt_errors".to_string(), self.error_count() as u64);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        format!(
            "{prefix} excluded={} scanned={} selected={} copied={} skipped={} planned={} errors={} warnings={}",
            dict_counts["cnt_excluded_names"],
            dict_counts["cnt_scanned"],
            dict_counts["cnt_selected"],
            dict_counts["cnt_copied"],
            dict_counts["cnt_skipped"],
            dict_counts["cnt_planned"],
            dict_counts["cnt_errors"],
            dict_counts["cnt_warnings"]
        )
    }
}

impl fmt::Display for ReportFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[FILTER]"))
    }
}

/// Mutable accumulator for filter statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportFilterBuilder {
    /// See [`ReportFilter::path_dir_dst`].
    pub path_dir_dst: Option<PathBuf>,
    /// See [`ReportFilter::cnt_excluded_names`].
    pub cnt_excluded_names: u64,
    /// See [`ReportFilter::cnt_scanned`].
    pub cnt_scanned: u64,
    /// See [`ReportFilter::cnt_selected`].
    pub cnt_selected: u64,
    /// See [`ReportFilter::cnt_copied`].
    pub cnt_copied: u64,
    /// See [`ReportFilter::cnt_skipped`].
    pub cnt_skipped: u64,
    /// See [`ReportFilter::cnt_planned`].
    pub cnt_planned: u64,
    /// See [`ReportFilter::warnings`].
    pub warnings: Vec<String>,
    /// See [`ReportFilter::errors`].
    pub errors: Vec<ItemCopyError>,
}

impl ReportFilterBuilder {
    /// Increment copied count by one.
    pub fn add_copied(&mut self) {
        self.cnt_copied += 1;
    }

    /// Increment skipped count by one.
    pub fn add_skipped(&mut self) {
        self.cnt_skipped += 1;
    }

    /// Increment planned count by one.
    pub fn add_planned(&mut self) {
        self.cnt_planned += 1;
    }

    /// Add warning message.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Add one entry-scoped error.
    pub fn add_error(&mut self, error: ItemCopyError) {
        self.errors.push(error);
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportFilter {
        ReportFilter {
            path_dir_dst: self.path_dir_dst,
            cnt_excluded_names: self.cnt_excluded_names,
            cnt_scanned: self.cnt_scanned,
            cnt_selected: self.cnt_selected,
            cnt_copied: self.cnt_copied,
            cnt_skipped: self.cnt_skipped,
            cnt_planned: self.cnt_planned,
            warnings: self.warnings,
            errors: self.errors,
        }
    }
}

/// Result of one `scan_directory` run.
#[derive(Debug, Default, Clone)]
pub struct ReportScan {
    /// Written output file.
    pub path_file_output: PathBuf,
    /// Number of lines written (names plus placeholders).
    pub cnt_written: u64,
    /// Number of names replaced by the placeholder line.
    pub cnt_placeholder: u64,
    pub warnings: Vec<String>,
}

impl ReportScan {
    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} written={} placeholders={} output={}",
            self.cnt_written,
            self.cnt_placeholder,
            self.path_file_output.display()
        )
    }
}

impl fmt::Display for ReportScan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[SCAN]"))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{ReportFilter, ReportFilterBuilder, ReportScan};
    use crate::spec::{EnumEntryKind, ItemCopyError};

    #[test]
    fn report_filter_to_dict_and_format() {
        let report = ReportFilter {
            path_dir_dst: None,
            cnt_excluded_names: 2,
            cnt_scanned: 6,
            cnt_selected: 4,
            cnt_copied: 3,
            cnt_skipped: 1,
            cnt_planned: 0,
            warnings: vec!["w".to_string()],
            errors: vec![],
        };

        let dict_counts = report.to_dict();
        assert_eq!(dict_counts["cnt_scanned"], 6);
        assert_eq!(dict_counts["cnt_selected"], 4);
        assert_eq!(dict_counts["cnt_errors"], 0);
        assert_eq!(dict_counts["cnt_warnings"], 1);

        let txt = report.format("[FILTER]");
        assert_eq!(
            txt,
            "[FILTER] excluded=2 scanned=6 selected=4 copied=3 skipped=1 planned=0 errors=0 warnings=1"
        );
        assert_eq!(report.to_string(), txt);
        assert!(report.is_success());
    }

    #[test]
    fn report_filter_any_error_is_failure() {
        let mut builder = ReportFilterBuilder::default();
        builder.add_copied();
        builder.add_copied();
        builder.add_error(ItemCopyError {
            name_entry: "b.txt".to_string(),
            kind_entry: EnumEntryKind::File,
            path_src: PathBuf::from("/src/b.txt"),
            path_dst: PathBuf::from("/dst/b.txt"),
            path_failed: PathBuf::from("/src/b.txt"),
            kind_io: Some(std::io::ErrorKind::PermissionDenied),
            exception: "permission denied".to_string(),
        });

        let report = builder.build();
        assert_eq!(report.cnt_copied, 2);
        assert_eq!(report.error_count(), 1);
        assert!(!report.is_success());
        assert_eq!(
            report.errors[0].to_string(),
            "Failed to copy file 'b.txt': permission denied"
        );
    }

    #[test]
    fn report_scan_format() {
        let report = ReportScan {
            path_file_output: PathBuf::from("out.txt"),
            cnt_written: 3,
            cnt_placeholder: 1,
            warnings: vec![],
        };
        assert_eq!(
            report.to_string(),
            "[SCAN] written=3 placeholders=1 output=out.txt"
        );
    }
}
