//! Filter/scan constants.

/// Suffix appended to the sanitized source basename to name the destination.
pub const C_SUFFIX_DIR_FILTERED: &str = "_filtrato";
/// Default scan output filename used by the CLI.
pub const C_NAME_SCAN_OUTPUT_DEFAULT: &str = "scan_output.txt";
/// Fallback filename when a file name sanitizes from empty input.
pub const C_NAME_FILE_FALLBACK: &str = "output.txt";
/// Fallback directory name when a directory name sanitizes from empty input.
pub const C_NAME_DIR_FALLBACK: &str = "output_dir";
/// Required extension for scan output and reference files.
pub const C_EXT_TXT: &str = ".txt";
/// Line written to a scan output in place of a name that is not valid UTF-8.
pub const C_SCAN_PLACEHOLDER_LINE: &str = "UNWRITABLE_FILE_NAME (Encoding Error)";

/// Characters replaced with `_` during filename sanitization.
pub const TUP_FILENAME_ILLEGAL: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Device names that cannot be used as file or directory names on Windows.
pub const TUP_RESERVED_DEVICE_NAMES: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];
