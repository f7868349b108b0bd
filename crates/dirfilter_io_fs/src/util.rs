use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::conf::{
    C_EXT_TXT, C_NAME_DIR_FALLBACK, C_NAME_FILE_FALLBACK, TUP_FILENAME_ILLEGAL,
    TUP_RESERVED_DEVICE_NAMES,
};
use crate::spec::{EnumCopySymlinkStrategy, EnumEntryKind, EnumSanitizeTarget};

////////////////////////////////////////////////////////////////////////////////
// #region Sanitize

/// Make `name` safe to use as a file or directory name.
///
/// - Empty input falls back to `output.txt` / `output_dir`.
/// - Each of `/ \ : * ? " < > |` becomes `_`.
/// - [`EnumSanitizeTarget::File`] enforces a `.txt` suffix (case-insensitive).
/// - A result equal to a reserved device name (`CON`, `COM1`, ...,
///   case-insensitive) gets a leading `_`.
pub fn sanitize_filename(name: &str, rule_target: EnumSanitizeTarget) -> String {
    if name.is_empty() {
        return match rule_target {
            EnumSanitizeTarget::File => C_NAME_FILE_FALLBACK.to_string(),
            EnumSanitizeTarget::Directory => C_NAME_DIR_FALLBACK.to_string(),
        };
    }

    let mut c_name: String = name
        .chars()
        .map(|c| if TUP_FILENAME_ILLEGAL.contains(&c) { '_' } else { c })
        .collect();

    if rule_target == EnumSanitizeTarget::File && !c_name.to_lowercase().ends_with(C_EXT_TXT) {
        c_name.push_str(C_EXT_TXT);
    }

    let c_name_upper = c_name.to_uppercase();
    if TUP_RESERVED_DEVICE_NAMES.contains(&c_name_upper.as_str()) {
        c_name.insert(0, '_');
    }

    c_name
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

fn _absolutize_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(path)
}

/// Absolutize `path` against the working directory and resolve `.`/`..`
/// lexically. Symlinks are not resolved.
pub fn normalize_path(path: &Path) -> PathBuf {
    let path_abs = _absolutize_path(path);
    let mut path_out = PathBuf::new();
    for component in path_abs.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                path_out.pop();
            }
            other => path_out.push(other.as_os_str()),
        }
    }
    path_out
}

/// `<parent>/<sanitized basename><suffix>` for a normalized source directory.
///
/// A source without parent (filesystem root) is its own parent.
pub(crate) fn derive_destination_dir(path_dir_src: &Path, suffix_dir_dst: &str) -> PathBuf {
    let path_parent = path_dir_src.parent().unwrap_or(path_dir_src);
    let c_name_base = path_dir_src
        .file_name()
        .map(|v| v.to_string_lossy().into_owned())
        .unwrap_or_default();
    let c_name_dst = format!(
        "{}{suffix_dir_dst}",
        sanitize_filename(&c_name_base, EnumSanitizeTarget::Directory)
    );
    path_parent.join(c_name_dst)
}

/// A suffix keeps the destination a sibling of the source: non-empty, no
/// path separator.
pub(crate) fn is_valid_suffix(suffix_dir_dst: &str) -> bool {
    !suffix_dir_dst.is_empty() && !suffix_dir_dst.contains(['/', '\\'])
}

/// Canonicalize the longest existing ancestor and re-append the missing tail.
fn _resolve_for_overlap(path: &Path) -> PathBuf {
    let path_norm = normalize_path(path);
    let mut path_base = path_norm.as_path();
    let mut l_tail = Vec::new();
    loop {
        if let Ok(mut path_resolved) = fs::canonicalize(path_base) {
            for part in l_tail.iter().rev() {
                path_resolved.push(part);
            }
            return path_resolved;
        }
        match (path_base.parent(), path_base.file_name()) {
            (Some(path_parent), Some(name)) => {
                l_tail.push(name.to_os_string());
                path_base = path_parent;
            }
            _ => return path_norm.clone(),
        }
    }
}

/// Whether `src` and `dst` are the same directory or one contains the other.
pub(crate) fn is_overlap(src: &Path, dst: &Path) -> bool {
    let path_src_resolved = _resolve_for_overlap(src);
    let path_dst_resolved = _resolve_for_overlap(dst);
    path_dst_resolved.starts_with(&path_src_resolved)
        || path_src_resolved.starts_with(&path_dst_resolved)
}

/// Refuse to write through a symlink inside the destination tree.
///
/// Every existing component between `path_dir_dst_root` and `path_dst_item`,
/// and the item itself, must not be a symlink. Missing components are fine.
pub(crate) fn validate_destination_path_safety(
    path_dst_item: &Path,
    path_dir_dst_root: &Path,
) -> Result<(), io::Error> {
    let path_rel = path_dst_item.strip_prefix(path_dir_dst_root).map_err(|_| {
        io::Error::other(format!(
            "Unsafe destination path escapes destination root: {} (root={})",
            path_dst_item.display(),
            path_dir_dst_root.display()
        ))
    })?;

    let mut path_cursor = path_dir_dst_root.to_path_buf();
    for part_rel in path_rel.components() {
        path_cursor.push(part_rel.as_os_str());
        match fs::symlink_metadata(&path_cursor) {
            Ok(meta_cursor) if meta_cursor.file_type().is_symlink() => {
                return Err(io::Error::other(format!(
                    "Unsafe destination path is an existing symlink: {}",
                    path_cursor.display()
                )));
            }
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Classify `path` according to the symlink policy.
///
/// Under [`EnumCopySymlinkStrategy::Dereference`] a link reports the kind of
/// its target, and a broken link is an error.
pub(crate) fn classify_entry(
    path: &Path,
    rule_symlink: EnumCopySymlinkStrategy,
) -> Result<EnumEntryKind, io::Error> {
    let meta_entry = fs::symlink_metadata(path)?;
    let cfg_file_type = meta_entry.file_type();
    if cfg_file_type.is_symlink() {
        if rule_symlink == EnumCopySymlinkStrategy::SkipSymlinks {
            return Ok(EnumEntryKind::Symlink);
        }
        let meta_target = fs::metadata(path)?;
        return Ok(_kind_from_file_type(meta_target.file_type()));
    }
    Ok(_kind_from_file_type(cfg_file_type))
}

fn _kind_from_file_type(cfg_file_type: fs::FileType) -> EnumEntryKind {
    if cfg_file_type.is_file() {
        EnumEntryKind::File
    } else if cfg_file_type.is_dir() {
        EnumEntryKind::Directory
    } else {
        EnumEntryKind::Special
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Metadata

/// Copy bytes, permissions and timestamps (plus xattrs on Linux).
///
/// An existing destination file is overwritten.
pub(crate) fn copy_file_with_metadata(
    path_file_src: &Path,
    path_file_dst: &Path,
) -> Result<(), io::Error> {
    fs::copy(path_file_src, path_file_dst)?;
    apply_metadata(path_file_src, path_file_dst)?;
    #[cfg(target_os = "linux")]
    {
        copy_xattrs_linux(path_file_src, path_file_dst);
    }
    Ok(())
}

/// Apply permissions and access/modification times of `path_src` to `path_dst`.
pub(crate) fn apply_metadata(path_src: &Path, path_dst: &Path) -> Result<(), io::Error> {
    use filetime::{FileTime, set_file_times};

    let stat_src = fs::metadata(path_src)?;
    let file_time_access = FileTime::from_last_access_time(&stat_src);
    let file_time_modify = FileTime::from_last_modification_time(&stat_src);
    set_file_times(path_dst, file_time_access, file_time_modify)?;
    fs::set_permissions(path_dst, stat_src.permissions())?;
    Ok(())
}

#[cfg(target_os = "linux")]
fn copy_xattrs_linux(path_file_src: &Path, path_file_dst: &Path) {
    let iter_xattr_names = match xattr::list(path_file_src) {
        Ok(v) => v,
        Err(_) => return,
    };

    for name in iter_xattr_names {
        let Some(raw_value) = xattr::get(path_file_src, &name).ok().flatten() else {
            continue;
        };
        let _ = xattr::set(path_file_dst, &name, &raw_value);
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
