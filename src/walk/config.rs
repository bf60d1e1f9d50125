//! Configuration types for the walker

/// Configuration for directory walking behavior.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Levels to descend below the root's children; `None` = unbounded
    pub max_depth: Option<usize>,
    /// `--exclude` globs, matched before an entry is stat'd
    pub exclude_patterns: Vec<String>,
}

impl WalkerConfig {
    /// Map the CLI's signed depth (`-1` = unbounded) onto `max_depth`.
    pub fn depth_limit(max_depth: i64) -> Option<usize> {
        usize::try_from(max_depth).ok()
    }
}
