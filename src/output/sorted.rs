//! Sorted output: collect everything, then drain the sort tree once

use std::io::Write;

use tracing::debug;

use crate::error::Result;
use crate::file::File;
use crate::format::Renderer;
use crate::sort::{SortSpec, SortTree};
use crate::walk::EntrySink;

pub struct SortedListing<W: Write> {
    tree: Option<SortTree>,
    renderer: Renderer,
    out: W,
}

impl<W: Write> SortedListing<W> {
    pub fn new(spec: SortSpec, reverse: bool, renderer: Renderer, out: W) -> Self {
        Self {
            tree: Some(SortTree::new(spec, reverse)),
            renderer,
            out,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> EntrySink for SortedListing<W> {
    fn accept(&mut self, file: File) -> Result<()> {
        if let Some(tree) = self.tree.as_mut() {
            tree.insert(&file, &mut self.renderer);
        }
        Ok(())
    }

    /// Nothing is written until here: the order is only known once every
    /// file has been seen.
    fn finish(&mut self) -> Result<()> {
        let Some(tree) = self.tree.take() else {
            return Ok(());
        };
        debug!(files = tree.len(), keys = tree.spec().len(), "draining sort tree");
        for line in tree.drain() {
            self.out.write_all(&line)?;
            self.out.write_all(b"\n")?;
        }
        self.out.flush()?;
        Ok(())
    }
}
