//! Filter-and-copy orchestration.

use std::collections::{BTreeSet, HashSet};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::exclusion::SpecExclusionSet;
use crate::report::{ReportFilter, ReportFilterBuilder};
use crate::spec::{
    ConfigError, DestinationError, EnumCopySymlinkStrategy, EnumEntryKind, FilterCopyError, ItemCopyError,
    SourceError, SpecFilterOptions,
};
use crate::util::{
    apply_metadata, classify_entry, copy_file_with_metadata, derive_destination_dir, is_overlap,
    is_valid_suffix, normalize_path, validate_destination_path_safety,
};

#[derive(Debug)]
struct SpecCopyStepFailure {
    path: PathBuf,
    error: io::Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnumItemOutcome {
    Copied(EnumEntryKind),
    Skipped(EnumEntryKind),
}

#[derive(Debug)]
struct SpecCopyContext {
    path_dir_src: PathBuf,
    path_dir_dst: PathBuf,
    rule_symlink: EnumCopySymlinkStrategy,
    builder_filter_report: ReportFilterBuilder,
    set_visited_dirs: HashSet<(u64, u64)>,
}

/// Copy every entry of `dir_source` not named in `file_reference` into a
/// sibling `<name>_filtrato` directory.
///
/// This function performs:
/// 1. Exclusion loading (one name per non-blank trimmed line).
/// 2. A single non-recursive snapshot of the source directory.
/// 3. Set difference; nothing to copy ends the run successfully without
///    creating the destination.
/// 4. Idempotent destination creation.
/// 5. Per-entry copy: files with metadata, directories merged recursively,
///    symlinks and special files skipped.
///
/// Returns [`ReportFilter`] when the copy phase ran, even if entries failed;
/// check [`ReportFilter::is_success`]. Copied entries are never rolled back.
/// Returns [`FilterCopyError`] for failures that stop the run before (or,
/// for `Unexpected`, outside) the per-entry copy loop.
pub fn filter_and_copy<P, Q>(
    dir_source: P,
    file_reference: Q,
    spec_filter_options: SpecFilterOptions,
) -> Result<ReportFilter, FilterCopyError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let path_dir_src = normalize_path(dir_source.as_ref());
    let path_file_ref = normalize_path(file_reference.as_ref());
    info!(
        source = %path_dir_src.display(),
        reference = %path_file_ref.display(),
        "Starting filter and copy"
    );
    if !is_valid_suffix(&spec_filter_options.suffix_dir_dst) {
        return Err(ConfigError::InvalidSuffix(spec_filter_options.suffix_dir_dst).into());
    }

    let mut builder_filter_report = ReportFilterBuilder::default();

    info!("Reading reference file {}", path_file_ref.display());
    let spec_exclusions = SpecExclusionSet::load(&path_file_ref, spec_filter_options.rule_match)?;
    builder_filter_report.cnt_excluded_names = spec_exclusions.len() as u64;
    if spec_exclusions.is_empty() {
        let c_warning = format!(
            "Reference file {} is empty or contains no valid names",
            path_file_ref.display()
        );
        warn!("{c_warning}");
        builder_filter_report.add_warning(c_warning);
    } else {
        info!(
            "Read {} unique names to exclude from the reference file",
            spec_exclusions.len()
        );
        debug!("Excluded names: {:?}", spec_exclusions.names());
    }

    info!("Reading source directory {}", path_dir_src.display());
    let set_names_src = snapshot_directory(&path_dir_src)?;
    builder_filter_report.cnt_scanned = set_names_src.len() as u64;
    info!("Found {} entries in the source directory", set_names_src.len());

    let l_names_copy: Vec<OsString> = set_names_src
        .into_iter()
        .filter(|name| !spec_exclusions.is_excluded(name))
        .collect();
    builder_filter_report.cnt_selected = l_names_copy.len() as u64;
    if l_names_copy.is_empty() {
        info!("Every entry is listed in the reference file; nothing to copy");
        return Ok(builder_filter_report.build());
    }
    info!("Found {} entries to copy", l_names_copy.len());

    let path_dir_dst = derive_destination_dir(&path_dir_src, &spec_filter_options.suffix_dir_dst);
    if is_overlap(&path_dir_src, &path_dir_dst) {
        return Err(DestinationError::OverlapsSource {
            path_src: path_dir_src,
            path_dst: path_dir_dst,
        }
        .into());
    }
    builder_filter_report.path_dir_dst = Some(path_dir_dst.clone());

    if spec_filter_options.if_dry_run {
        plan_entries(
            &l_names_copy,
            &path_dir_src,
            &path_dir_dst,
            spec_filter_options.rule_symlink,
            &mut builder_filter_report,
        );
        return Ok(builder_filter_report.build());
    }

    info!("Creating destination directory {}", path_dir_dst.display());
    fs::create_dir_all(&path_dir_dst).map_err(|e| DestinationError::CreateFailed {
        path: path_dir_dst.clone(),
        source: e,
    })?;

    let mut spec_cp_ctx = SpecCopyContext {
        path_dir_src,
        path_dir_dst: path_dir_dst.clone(),
        rule_symlink: spec_filter_options.rule_symlink,
        builder_filter_report,
        set_visited_dirs: HashSet::new(),
    };

    info!("Copying entries");
    run_copy_loop(&l_names_copy, &mut spec_cp_ctx, copy_selected_entry)?;

    let report = spec_cp_ctx.builder_filter_report.build();
    info!(
        copied = report.cnt_copied,
        failed = report.error_count(),
        skipped = report.cnt_skipped,
        destination = %path_dir_dst.display(),
        "Copy finished"
    );
    debug!("{report}");
    if !report.is_success() {
        warn!("Some entries were not copied because of errors");
    }
    Ok(report)
}

/// Apply `fn_copy` to every selected name.
///
/// A panic escaping `fn_copy` becomes [`FilterCopyError::Unexpected`]
/// pointing at the possibly partial destination.
fn run_copy_loop<F>(
    l_names_copy: &[OsString],
    spec_cp_ctx: &mut SpecCopyContext,
    mut fn_copy: F,
) -> Result<(), FilterCopyError>
where
    F: FnMut(&OsString, &mut SpecCopyContext),
{
    let res_copy = panic::catch_unwind(AssertUnwindSafe(|| {
        for name in l_names_copy {
            fn_copy(name, spec_cp_ctx);
        }
    }));
    res_copy.map_err(|payload| {
        let message = _describe_panic(payload.as_ref());
        error!("Unexpected failure during copy: {message}");
        FilterCopyError::Unexpected {
            message,
            path_dir_partial: Some(spec_cp_ctx.path_dir_dst.clone()),
        }
    })
}

fn snapshot_directory(path_dir_src: &Path) -> Result<BTreeSet<OsString>, SourceError> {
    if !path_dir_src.is_dir() {
        return Err(SourceError::NotADirectory(path_dir_src.to_path_buf()));
    }
    let to_listing_error = |e: io::Error| SourceError::ListingFailed {
        path: path_dir_src.to_path_buf(),
        source: e,
    };

    let mut set_names = BTreeSet::new();
    for _entry_res in fs::read_dir(path_dir_src).map_err(to_listing_error)? {
        let entry = _entry_res.map_err(to_listing_error)?;
        set_names.insert(entry.file_name());
    }
    Ok(set_names)
}

fn plan_entries(
    l_names_copy: &[OsString],
    path_dir_src: &Path,
    path_dir_dst: &Path,
    rule_symlink: EnumCopySymlinkStrategy,
    builder_filter_report: &mut ReportFilterBuilder,
) {
    info!(
        "Dry run: nothing will be created under {}",
        path_dir_dst.display()
    );
    for name in l_names_copy {
        let path_src = path_dir_src.join(name);
        match classify_entry(&path_src, rule_symlink) {
            Ok(EnumEntryKind::File | EnumEntryKind::Directory) => {
                info!("  - Would copy '{}'", name.to_string_lossy());
                builder_filter_report.add_planned();
            }
            Ok(kind_entry) => {
                info!(
                    "  - Would skip {kind_entry} '{}'",
                    name.to_string_lossy()
                );
                builder_filter_report.add_skipped();
            }
            Err(e) => {
                let c_warning = format!("Cannot inspect {} ({e})", path_src.display());
                warn!("{c_warning}");
                builder_filter_report.add_warning(c_warning);
            }
        }
    }
}

fn copy_selected_entry(name: &OsString, spec_cp_ctx: &mut SpecCopyContext) {
    let c_name = name.to_string_lossy().into_owned();
    match copy_entry(name, spec_cp_ctx) {
        Ok(EnumItemOutcome::Copied(kind_entry)) => {
            info!("  - Copied {kind_entry} '{c_name}'");
            spec_cp_ctx.builder_filter_report.add_copied();
        }
        Ok(EnumItemOutcome::Skipped(kind_entry)) => {
            info!("  - Skipped {kind_entry} '{c_name}' (not a regular file or directory)");
            spec_cp_ctx.builder_filter_report.add_skipped();
        }
        Err(err_item) => {
            error!("  - {err_item}");
            spec_cp_ctx.builder_filter_report.add_error(err_item);
        }
    }
}

fn copy_entry(
    name: &OsString,
    spec_cp_ctx: &mut SpecCopyContext,
) -> Result<EnumItemOutcome, ItemCopyError> {
    let path_src = spec_cp_ctx.path_dir_src.join(name);
    let path_dst = spec_cp_ctx.path_dir_dst.join(name);
    let to_item_error = |kind_entry: EnumEntryKind, l_failures: Vec<SpecCopyStepFailure>| {
        _build_item_error(name, kind_entry, &path_src, &path_dst, l_failures)
    };

    let kind_entry = classify_entry(&path_src, spec_cp_ctx.rule_symlink).map_err(|e| {
        to_item_error(
            EnumEntryKind::Unknown,
            vec![SpecCopyStepFailure {
                path: path_src.clone(),
                error: e,
            }],
        )
    })?;

    match kind_entry {
        EnumEntryKind::File => {
            validate_destination_path_safety(&path_dst, &spec_cp_ctx.path_dir_dst).map_err(|e| {
                to_item_error(
                    kind_entry,
                    vec![SpecCopyStepFailure {
                        path: path_dst.clone(),
                        error: e,
                    }],
                )
            })?;
            copy_file_with_metadata(&path_src, &path_dst).map_err(|e| {
                to_item_error(
                    kind_entry,
                    vec![SpecCopyStepFailure {
                        path: path_src.clone(),
                        error: e,
                    }],
                )
            })?;
        }
        EnumEntryKind::Directory => {
            spec_cp_ctx.set_visited_dirs.clear();
            let mut l_failures = Vec::new();
            merge_directory(&path_src, &path_dst, spec_cp_ctx, &mut l_failures);
            if !l_failures.is_empty() {
                return Err(to_item_error(kind_entry, l_failures));
            }
        }
        EnumEntryKind::Symlink | EnumEntryKind::Special | EnumEntryKind::Unknown => {
            return Ok(EnumItemOutcome::Skipped(kind_entry));
        }
    }
    Ok(EnumItemOutcome::Copied(kind_entry))
}

/// Recursively copy `path_src` into `path_dst`, merging with existing
/// content. Failures are collected and the walk continues with the next
/// child.
fn merge_directory(
    path_src: &Path,
    path_dst: &Path,
    spec_cp_ctx: &mut SpecCopyContext,
    l_failures: &mut Vec<SpecCopyStepFailure>,
) {
    if spec_cp_ctx.rule_symlink == EnumCopySymlinkStrategy::Dereference {
        match fs::metadata(path_src) {
            Ok(stat_src) => {
                #[cfg(unix)]
                {
                    use std::os::unix::fs::MetadataExt;
                    let tuple_dirs_identifier = (stat_src.dev(), stat_src.ino());
                    if !spec_cp_ctx.set_visited_dirs.insert(tuple_dirs_identifier) {
                        let c_warning = format!("Symlink loop detected: {}", path_src.display());
                        warn!("{c_warning}");
                        spec_cp_ctx.builder_filter_report.add_warning(c_warning);
                        return;
                    }
                }
                #[cfg(not(unix))]
                {
                    let _ = stat_src;
                }
            }
            Err(e) => {
                _push_failure(l_failures, path_src, e);
                return;
            }
        }
    }

    if let Err(e) = validate_destination_path_safety(path_dst, &spec_cp_ctx.path_dir_dst) {
        _push_failure(l_failures, path_dst, e);
        return;
    }
    if let Err(e) = fs::create_dir_all(path_dst) {
        _push_failure(l_failures, path_dst, e);
        return;
    }

    let iter_entries = match fs::read_dir(path_src) {
        Ok(iter) => iter,
        Err(e) => {
            _push_failure(l_failures, path_src, e);
            return;
        }
    };

    let mut l_children: Vec<(OsString, PathBuf)> = Vec::new();
    for _entry_res in iter_entries {
        match _entry_res {
            Ok(entry) => l_children.push((entry.file_name(), entry.path())),
            Err(e) => _push_failure(l_failures, path_src, e),
        }
    }
    l_children.sort_by(|a, b| a.0.cmp(&b.0));

    for (name_child, path_child_src) in l_children {
        let path_child_dst = path_dst.join(&name_child);
        let kind_child = match classify_entry(&path_child_src, spec_cp_ctx.rule_symlink) {
            Ok(v) => v,
            Err(e) => {
                _push_failure(l_failures, &path_child_src, e);
                continue;
            }
        };

        match kind_child {
            EnumEntryKind::File => {
                debug!("    copy {}", path_child_src.display());
                if let Err(e) =
                    validate_destination_path_safety(&path_child_dst, &spec_cp_ctx.path_dir_dst)
                {
                    _push_failure(l_failures, &path_child_dst, e);
                } else if let Err(e) = copy_file_with_metadata(&path_child_src, &path_child_dst) {
                    _push_failure(l_failures, &path_child_src, e);
                }
            }
            EnumEntryKind::Directory => {
                merge_directory(&path_child_src, &path_child_dst, spec_cp_ctx, l_failures);
            }
            EnumEntryKind::Symlink => {
                let c_warning = format!("Symlink skipped: {}", path_child_src.display());
                debug!("{c_warning}");
                spec_cp_ctx.builder_filter_report.add_warning(c_warning);
            }
            EnumEntryKind::Special | EnumEntryKind::Unknown => {
                let c_warning = format!("Special file skipped: {}", path_child_src.display());
                warn!("{c_warning}");
                spec_cp_ctx.builder_filter_report.add_warning(c_warning);
            }
        }
    }

    if let Err(e) = apply_metadata(path_src, path_dst) {
        _push_failure(l_failures, path_dst, e);
    }
}

fn _push_failure(l_failures: &mut Vec<SpecCopyStepFailure>, path: &Path, error: io::Error) {
    l_failures.push(SpecCopyStepFailure {
        path: path.to_path_buf(),
        error,
    });
}

fn _build_item_error(
    name: &OsString,
    kind_entry: EnumEntryKind,
    path_src: &Path,
    path_dst: &Path,
    l_failures: Vec<SpecCopyStepFailure>,
) -> ItemCopyError {
    let n_failures = l_failures.len();
    let mut iter_failures = l_failures.into_iter();
    let (path_failed, kind_io, c_detail) = match iter_failures.next() {
        Some(SpecCopyStepFailure { path, error }) => {
            let c_detail = format!("{} ({error})", path.display());
            (path, Some(error.kind()), c_detail)
        }
        None => (path_src.to_path_buf(), None, "unknown failure".to_string()),
    };
    let exception = if n_failures > 1 {
        format!("{n_failures} failures in subtree, first: {c_detail}")
    } else {
        c_detail
    };

    ItemCopyError {
        name_entry: name.to_string_lossy().into_owned(),
        kind_entry,
        path_src: path_src.to_path_buf(),
        path_dst: path_dst.to_path_buf(),
        path_failed,
        kind_io,
        exception,
    }
}

fn _describe_panic(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "unknown panic".to_string()
}
