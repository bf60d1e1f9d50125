//! Depth-bounded directory walker
//!
//! Entries are visited depth-first in pre-order: a directory is handed to
//! the sink before anything inside it. Siblings come in byte order of their
//! names. Symlinks are listed but never followed.

use std::fs;
use std::path::Path;

use termcolor::WriteColor;
use tracing::{debug, trace};

use crate::error::{FlsError, Result};
use crate::file::{Attributes, File};
use crate::output::Diagnostics;

use super::config::WalkerConfig;
use super::filter::ExcludeFilter;

/// Receives every entry the walker discovers.
pub trait EntrySink {
    fn accept(&mut self, file: File) -> Result<()>;

    /// Called once after the walk; flushes or drains whatever was buffered.
    fn finish(&mut self) -> Result<()>;
}

/// Counts for one walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    pub entries: usize,
    pub errors: usize,
}

pub struct Walker {
    config: WalkerConfig,
    filter: ExcludeFilter,
}

impl Walker {
    pub fn new(config: WalkerConfig) -> Result<Self> {
        let filter = ExcludeFilter::new(&config.exclude_patterns)?;
        Ok(Self { config, filter })
    }

    /// Walk `root` and feed its entries to `sink`.
    ///
    /// A regular file is a single entry. A directory lists its contents but
    /// not itself. Anything else fails with `NotListable` before the sink
    /// sees a single entry. Traversal errors below the root go to
    /// `diagnostics` and the walk moves on to the next sibling.
    pub fn walk<S, W>(
        &self,
        root: &Path,
        sink: &mut S,
        diagnostics: &mut Diagnostics<W>,
    ) -> Result<WalkSummary>
    where
        S: EntrySink + ?Sized,
        W: WriteColor,
    {
        let meta = fs::metadata(root).map_err(|e| {
            debug!(root = %root.display(), error = %e, "cannot stat root");
            FlsError::NotListable(root.to_path_buf())
        })?;

        let errors_before = diagnostics.count();
        let mut entries = 0;

        if meta.is_file() {
            sink.accept(File::new(root, Attributes::from_metadata(&meta)))?;
            entries += 1;
        } else if meta.is_dir() {
            debug!(root = %root.display(), max_depth = ?self.config.max_depth, "walking");
            self.walk_dir(
                root,
                Path::new(""),
                self.config.max_depth,
                sink,
                diagnostics,
                &mut entries,
            )?;
        } else {
            return Err(FlsError::NotListable(root.to_path_buf()));
        }

        let summary = WalkSummary {
            entries,
            errors: diagnostics.count() - errors_before,
        };
        debug!(entries = summary.entries, errors = summary.errors, "walk finished");
        Ok(summary)
    }

    /// `remaining` is how many more levels may be entered below `dir`'s
    /// children; `None` is unbounded.
    fn walk_dir<S, W>(
        &self,
        dir: &Path,
        relative: &Path,
        remaining: Option<usize>,
        sink: &mut S,
        diagnostics: &mut Diagnostics<W>,
        entries: &mut usize,
    ) -> Result<()>
    where
        S: EntrySink + ?Sized,
        W: WriteColor,
    {
        let children = match read_sorted_entries(dir, diagnostics) {
            Some(children) => children,
            None => return Ok(()),
        };

        for child in children {
            let name = child.file_name();
            let child_relative = relative.join(&name);
            if self.filter.is_excluded(&child_relative) {
                trace!(path = %child_relative.display(), "excluded");
                continue;
            }

            let path = dir.join(&name);
            let file = match File::read(&path) {
                Ok(file) => file,
                Err(err) => {
                    diagnostics.report(&err);
                    continue;
                }
            };

            let descend = file.is_dir() && remaining != Some(0);
            sink.accept(file)?;
            *entries += 1;

            if descend {
                self.walk_dir(
                    &path,
                    &child_relative,
                    remaining.map(|d| d - 1),
                    sink,
                    diagnostics,
                    entries,
                )?;
            }
        }
        Ok(())
    }
}

/// Read a directory's entries sorted by name. Reports and returns `None`
/// when the directory itself cannot be opened.
fn read_sorted_entries<W: WriteColor>(
    dir: &Path,
    diagnostics: &mut Diagnostics<W>,
) -> Option<Vec<fs::DirEntry>> {
    let iter = match fs::read_dir(dir) {
        Ok(iter) => iter,
        Err(e) => {
            diagnostics.unreadable_dir(dir, &e);
            return None;
        }
    };

    let mut entries = Vec::new();
    for entry in iter {
        match entry {
            Ok(entry) => entries.push(entry),
            Err(e) => diagnostics.unreadable_dir(dir, &e),
        }
    }
    entries.sort_by_key(|e| e.file_name());
    Some(entries)
}
