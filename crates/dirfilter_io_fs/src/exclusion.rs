//! Reference-file loading and name matching.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use globset::{Glob, GlobMatcher};
use regex::Regex;

use crate::spec::{ConfigError, EnumExclusionMatchMode};

#[derive(Debug, Clone)]
enum TypeExclusionPatternSeq {
    Literal,
    Glob(Vec<GlobMatcher>),
    Regex(Vec<Regex>),
}

/// Names read from a reference file, compiled for one match mode.
#[derive(Debug, Clone)]
pub struct SpecExclusionSet {
    set_names: BTreeSet<String>,
    patterns: TypeExclusionPatternSeq,
}

impl SpecExclusionSet {
    /// Read `path_file_ref` and compile its lines for `rule_match`.
    pub fn load(path_file_ref: &Path, rule_match: EnumExclusionMatchMode) -> Result<Self, ConfigError> {
        let raw_bytes =
            fs::read(path_file_ref).map_err(|e| ConfigError::ReferenceFileUnreadable {
                path: path_file_ref.to_path_buf(),
                source: e,
            })?;
        Self::from_names(parse_exclusion_names(&raw_bytes), rule_match)
    }

    pub fn from_names(
        set_names: BTreeSet<String>,
        rule_match: EnumExclusionMatchMode,
    ) -> Result<Self, ConfigError> {
        let patterns = _compile(&set_names, rule_match)?;
        Ok(Self {
            set_names,
            patterns,
        })
    }

    /// Number of unique non-blank lines.
    pub fn len(&self) -> usize {
        self.set_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set_names.is_empty()
    }

    pub fn names(&self) -> &BTreeSet<String> {
        &self.set_names
    }

    /// Whether a directory entry name is listed in the reference file.
    ///
    /// In literal mode a name that is not valid UTF-8 never matches.
    pub fn is_excluded(&self, name: &OsStr) -> bool {
        match &self.patterns {
            TypeExclusionPatternSeq::Literal => name
                .to_str()
                .is_some_and(|c_name| self.set_names.contains(c_name)),
            TypeExclusionPatternSeq::Glob(l_glob) => {
                let c_name = name.to_string_lossy();
                l_glob.iter().any(|p| p.is_match(c_name.as_ref()))
            }
            TypeExclusionPatternSeq::Regex(l_regex) => {
                let c_name = name.to_string_lossy();
                l_regex.iter().any(|p| p.is_match(&c_name))
            }
        }
    }
}

fn _compile(
    set_names: &BTreeSet<String>,
    rule_match: EnumExclusionMatchMode,
) -> Result<TypeExclusionPatternSeq, ConfigError> {
    match rule_match {
        EnumExclusionMatchMode::Literal => Ok(TypeExclusionPatternSeq::Literal),
        EnumExclusionMatchMode::Glob => {
            let mut l_glob = Vec::with_capacity(set_names.len());
            for pattern in set_names {
                let matcher = Glob::new(pattern)
                    .map_err(|e| ConfigError::InvalidPattern(format!("`{pattern}`: {e}")))?
                    .compile_matcher();
                l_glob.push(matcher);
            }
            Ok(TypeExclusionPatternSeq::Glob(l_glob))
        }
        EnumExclusionMatchMode::Regex => {
            let mut l_regex = Vec::with_capacity(set_names.len());
            for pattern in set_names {
                let regex = Regex::new(pattern)
                    .map_err(|e| ConfigError::InvalidPattern(format!("`{pattern}`: {e}")))?;
                l_regex.push(regex);
            }
            Ok(TypeExclusionPatternSeq::Regex(l_regex))
        }
    }
}

/// Split raw reference-file bytes into a set of trimmed, non-empty lines.
///
/// Lines end at `\n`, `\r\n` or a lone `\r`. Bytes that are not valid UTF-8
/// are dropped from the line rather than replaced.
pub fn parse_exclusion_names(raw_bytes: &[u8]) -> BTreeSet<String> {
    raw_bytes
        .split(|b| *b == b'\n' || *b == b'\r')
        .map(_decode_utf8_ignoring_invalid)
        .filter_map(|c_line| {
            let c_trimmed = c_line.trim();
            (!c_trimmed.is_empty()).then(|| c_trimmed.to_string())
        })
        .collect()
}

fn _decode_utf8_ignoring_invalid(raw_line: &[u8]) -> String {
    let mut c_line = String::with_capacity(raw_line.len());
    for chunk in raw_line.utf8_chunks() {
        c_line.push_str(chunk.valid());
    }
    c_line
}
