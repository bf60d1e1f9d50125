//! Synchronous unsorted output: the traversal thread renders and writes

use std::io::Write;

use crate::error::Result;
use crate::file::File;
use crate::format::Renderer;
use crate::walk::EntrySink;

/// Writes each entry as soon as the walker finds it.
pub struct DirectPrinter<W: Write> {
    renderer: Renderer,
    out: W,
    lines: u64,
}

impl<W: Write> DirectPrinter<W> {
    pub fn new(renderer: Renderer, out: W) -> Self {
        Self {
            renderer,
            out,
            lines: 0,
        }
    }

    pub fn lines(&self) -> u64 {
        self.lines
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> EntrySink for DirectPrinter<W> {
    fn accept(&mut self, file: File) -> Result<()> {
        let line = self.renderer.render(&file);
        self.out.write_all(&line)?;
        self.out.write_all(b"\n")?;
        self.lines += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::Attributes;
    use crate::format::Template;

    #[test]
    fn test_prints_in_arrival_order() {
        let mut printer = DirectPrinter::new(Renderer::new(Template::parse("%B:%s").unwrap()), Vec::new());
        for (name, size) in [("z", 3), ("a", 1), ("m", 2)] {
            let attrs = Attributes {
                size,
                ..Default::default()
            };
            printer.accept(File::new(name, attrs)).unwrap();
        }
        printer.finish().unwrap();
        assert_eq!(printer.lines(), 3);
        assert_eq!(String::from_utf8(printer.into_inner()).unwrap(), "z:3\na:1\nm:2\n");
    }
}
