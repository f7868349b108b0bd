//! Directory listing to a text file.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::conf::C_SCAN_PLACEHOLDER_LINE;
use crate::report::ReportScan;
use crate::spec::{EnumSanitizeTarget, ScanError};
use crate::util::{normalize_path, sanitize_filename};

/// Write the immediate entries of `dir_source`, one per line and sorted by
/// name, to `dir_output/<sanitized name_output>`.
///
/// Names that are not valid UTF-8 are written as a placeholder line.
pub fn scan_directory<P, Q>(
    dir_source: P,
    name_output: &str,
    dir_output: Q,
) -> Result<ReportScan, ScanError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let path_dir_src = normalize_path(dir_source.as_ref());
    let path_file_output = dir_output
        .as_ref()
        .join(sanitize_filename(name_output, EnumSanitizeTarget::File));

    info!("Starting scan of {}", path_dir_src.display());
    if !path_dir_src.is_dir() {
        return Err(ScanError::SourceNotDirectory(path_dir_src));
    }

    let to_listing_error = |e: io::Error| ScanError::ListingFailed {
        path: path_dir_src.clone(),
        source: e,
    };
    let mut l_names: Vec<OsString> = Vec::new();
    for _entry_res in fs::read_dir(&path_dir_src).map_err(to_listing_error)? {
        l_names.push(_entry_res.map_err(to_listing_error)?.file_name());
    }
    l_names.sort();
    info!("Found {} entries", l_names.len());

    info!("Writing results to {}", path_file_output.display());
    let mut report = ReportScan {
        path_file_output: path_file_output.clone(),
        ..ReportScan::default()
    };
    write_names(&l_names, &path_file_output, &mut report).map_err(|e| {
        ScanError::OutputWriteFailed {
            path: path_file_output.clone(),
            source: e,
        }
    })?;

    info!("Scan completed; results saved to {}", path_file_output.display());
    debug!("{report}");
    Ok(report)
}

fn write_names(
    l_names: &[OsString],
    path_file_output: &Path,
    report: &mut ReportScan,
) -> Result<(), io::Error> {
    let mut writer = BufWriter::new(File::create(path_file_output)?);
    for name in l_names {
        match name.to_str() {
            Some(c_name) => writeln!(writer, "{c_name}")?,
            None => {
                let c_warning = format!(
                    "Cannot write name {} (encoding problem); a placeholder is written instead",
                    name.to_string_lossy()
                );
                warn!("{c_warning}");
                report.warnings.push(c_warning);
                writeln!(writer, "{C_SCAN_PLACEHOLDER_LINE}")?;
                report.cnt_placeholder += 1;
            }
        }
        report.cnt_written += 1;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::scan_directory;
    use crate::spec::ScanError;

    #[test]
    fn scan_writes_sorted_names_one_per_line() {
        let tmp = TempDir::new().expect("tempdir");
        let src = tmp.path().join("src");
        let out = tmp.path().join("out");
        fs::create_dir_all(src.join("zeta")).expect("mkdir zeta");
        fs::create_dir_all(&out).expect("mkdir out");
        fs::write(src.join("b.txt"), "b").expect("write b");
        fs::write(src.join("a.txt"), "a").expect("write a");

        let report = scan_directory(&src, "listing", &out).expect("scan");

        assert_eq!(report.path_file_output, out.join("listing.txt"));
        assert_eq!(report.cnt_written, 3);
        assert_eq!(report.cnt_placeholder, 0);
        let txt = fs::read_to_string(out.join("listing.txt")).expect("read output");
        assert_eq!(txt, "a.txt\nb.txt\nzeta\n");
    }

    #[test]
    fn scan_sanitizes_output_name() {
        let tmp = TempDir::new().expect("tempdir");
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).expect("mkdir src");

        let report = scan_directory(&src, "a:b|c", tmp.path()).expect("scan");

        assert_eq!(report.path_file_output, tmp.path().join("a_b_c.txt"));
        assert_eq!(
            fs::read_to_string(tmp.path().join("a_b_c.txt")).expect("read output"),
            ""
        );
    }

    #[test]
    fn scan_rejects_missing_directory() {
        let tmp = TempDir::new().expect("tempdir");
        let err = scan_directory(tmp.path().join("missing"), "out.txt", tmp.path())
            .expect_err("missing directory must fail");
        assert!(matches!(err, ScanError::SourceNotDirectory(_)));
        assert!(!tmp.path().join("out.txt").exists());
    }

    #[test]
    fn scan_reports_unwritable_output() {
        let tmp = TempDir::new().expect("tempdir");
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).expect("mkdir src");

        let err = scan_directory(&src, "out.txt", tmp.path().join("no_such_dir"))
            .expect_err("unwritable output must fail");
        assert!(matches!(err, ScanError::OutputWriteFailed { .. }));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn scan_writes_placeholder_for_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = TempDir::new().expect("tempdir");
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).expect("mkdir src");
        fs::write(src.join("good.txt"), "g").expect("write good");
        fs::write(src.join(OsStr::from_bytes(b"bad\xff")), "b").expect("write bad");

        let report = scan_directory(&src, "out.txt", tmp.path()).expect("scan");

        assert_eq!(report.cnt_written, 2);
        assert_eq!(report.cnt_placeholder, 1);
        let txt = fs::read_to_string(tmp.path().join("out.txt")).expect("read output");
        assert!(txt.contains("good.txt\n"));
        assert!(txt.contains("UNWRITABLE_FILE_NAME (Encoding Error)\n"));
    }
}
