//! `--exclude` glob filtering
//!
//! A pattern without `/` matches an entry's basename at any depth. A pattern
//! with `/` matches the entry's path relative to the listing root. `*` and `?`
//! stop at `/`; a `**` component spans any number of directories.

use std::path::Path;

use glob::{MatchOptions, Pattern};

use crate::error::{FlsError, Result};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone)]
struct ExcludePattern {
    pattern: Pattern,
    /// Contains a `/`, so it is matched against the relative path
    anchored: bool,
}

/// Compiled set of exclude globs.
#[derive(Debug, Clone, Default)]
pub struct ExcludeFilter {
    patterns: Vec<ExcludePattern>,
}

impl ExcludeFilter {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|raw| compile(raw.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Check if an entry, given by its path relative to the root, is excluded.
    pub fn is_excluded(&self, relative: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let name = relative
            .file_name()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();

        self.patterns.iter().any(|p| {
            if p.anchored {
                p.pattern.matches_path_with(relative, MATCH_OPTIONS)
            } else {
                p.pattern.matches_with(&name, MATCH_OPTIONS)
            }
        })
    }
}

fn compile(raw: &str) -> Result<ExcludePattern> {
    // "build/" and "/build" both name the same root-relative path.
    let trimmed = raw.trim_end_matches('/');
    let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
    let pattern = Pattern::new(trimmed).map_err(|source| FlsError::InvalidExclude {
        pattern: raw.to_string(),
        source,
    })?;
    Ok(ExcludePattern {
        pattern,
        anchored: trimmed.contains('/'),
    })
}
