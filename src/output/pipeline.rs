//! Streaming pipeline for unsorted listings
//!
//! The traversal thread publishes file records into an unbounded channel and
//! a dedicated printer thread renders and writes them in publish order. The
//! producer never blocks. Dropping the sender is the "done" signal: the
//! printer sees the disconnect only after every queued record has been
//! received, so "no more input" and "queue drained" are a single event.

use std::io::{self, Write};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use tracing::{debug, trace};

use crate::error::{FlsError, Result};
use crate::file::File;
use crate::format::Renderer;
use crate::walk::EntrySink;

/// What the printer thread hands back when it finishes.
#[derive(Debug)]
pub struct Consumed<W> {
    pub out: W,
    pub lines: u64,
}

/// Producer handle of the traversal/printer pair.
pub struct StreamingPipeline<W: Write + Send + 'static> {
    sender: Option<Sender<File>>,
    printer: Option<JoinHandle<io::Result<Consumed<W>>>>,
    published: u64,
}

impl<W: Write + Send + 'static> StreamingPipeline<W> {
    /// Spawn the printer thread writing to `out`.
    pub fn start(renderer: Renderer, out: W) -> Result<Self> {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let printer = thread::Builder::new()
            .name("fls-printer".to_string())
            .spawn(move || run_consumer(receiver, renderer, out))?;
        Ok(Self {
            sender: Some(sender),
            printer: Some(printer),
            published: 0,
        })
    }

    /// Queue one record. Never blocks. Fails once the printer has stopped,
    /// with the error that stopped it, so the walk can end early.
    pub fn publish(&mut self, file: File) -> Result<()> {
        let sender = self.sender.as_ref().ok_or(FlsError::PipelineClosed)?;
        if sender.send(file).is_ok() {
            self.published += 1;
            return Ok(());
        }

        trace!(published = self.published, "printer gone");
        self.sender = None;
        let printer = self.printer.take().ok_or(FlsError::PipelineClosed)?;
        match printer.join() {
            Ok(Err(e)) => Err(FlsError::Output(e)),
            // The receiver only goes away when the printer returns.
            Ok(Ok(_)) => Err(FlsError::PipelineClosed),
            Err(_) => Err(FlsError::PrinterPanicked),
        }
    }

    pub fn published(&self) -> u64 {
        self.published
    }

    /// Signal that nothing more will be published and wait for the printer
    /// to drain the queue.
    pub fn mark_done(&mut self) -> Result<Consumed<W>> {
        let sender = self.sender.take().ok_or(FlsError::PipelineClosed)?;
        drop(sender);
        let printer = self.printer.take().ok_or(FlsError::PipelineClosed)?;
        let consumed = printer.join().map_err(|_| FlsError::PrinterPanicked)??;
        debug!(
            published = self.published,
            printed = consumed.lines,
            "printer finished"
        );
        Ok(consumed)
    }
}

impl<W: Write + Send + 'static> Drop for StreamingPipeline<W> {
    fn drop(&mut self) {
        // Let the printer flush what was queued before an early return.
        self.sender.take();
        if let Some(printer) = self.printer.take() {
            let _ = printer.join();
        }
    }
}

impl<W: Write + Send + 'static> EntrySink for StreamingPipeline<W> {
    fn accept(&mut self, file: File) -> Result<()> {
        self.publish(file)
    }

    fn finish(&mut self) -> Result<()> {
        self.mark_done().map(|_| ())
    }
}

/// Printer loop: render and write records until the producer disconnects.
/// Blocks in `recv` while the queue is empty, flushing first so output
/// already rendered is visible while the walker is busy.
pub fn run_consumer<W: Write>(
    receiver: Receiver<File>,
    mut renderer: Renderer,
    mut out: W,
) -> io::Result<Consumed<W>> {
    let mut lines = 0u64;
    loop {
        let file = match receiver.try_recv() {
            Ok(file) => file,
            Err(TryRecvError::Empty) => {
                out.flush()?;
                match receiver.recv() {
                    Ok(file) => file,
                    Err(_) => break,
                }
            }
            Err(TryRecvError::Disconnected) => break,
        };
        let line = renderer.render(&file);
        out.write_all(&line)?;
        out.write_all(b"\n")?;
        lines += 1;
    }
    out.flush()?;
    Ok(Consumed { out, lines })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::Attributes;
    use crate::format::Template;
    use std::time::Duration;

    fn renderer() -> Renderer {
        Renderer::new(Template::parse("%N %s").unwrap())
    }

    fn file(i: i64) -> File {
        File::new(
            format!("entry-{}", i),
            Attributes {
                size: i,
                ..Default::default()
            },
        )
    }

    fn run(n: i64) -> (String, u64) {
        let mut pipeline = StreamingPipeline::start(renderer(), Vec::new()).unwrap();
        for i in 0..n {
            pipeline.publish(file(i)).unwrap();
        }
        assert_eq!(pipeline.published(), n as u64);
        let consumed = pipeline.mark_done().unwrap();
        (String::from_utf8(consumed.out).unwrap(), consumed.lines)
    }

    #[test]
    fn test_zero_items_terminates() {
        let (out, lines) = run(0);
        assert_eq!(lines, 0);
        assert_eq!(out, "");
    }

    #[test]
    fn test_emits_exactly_n_lines_in_publish_order() {
        for n in [1, 2, 17, 1000] {
            let (out, lines) = run(n);
            assert_eq!(lines, n as u64);
            let expected: Vec<String> = (0..n).map(|i| format!("entry-{} {}", i, i)).collect();
            assert_eq!(out.lines().collect::<Vec<_>>(), expected);
        }
    }

    #[test]
    fn test_slow_producer_keeps_order() {
        let mut pipeline = StreamingPipeline::start(renderer(), Vec::new()).unwrap();
        for i in 0..5 {
            pipeline.publish(file(i)).unwrap();
            thread::sleep(Duration::from_millis(2));
        }
        let consumed = pipeline.mark_done().unwrap();
        let out = String::from_utf8(consumed.out).unwrap();
        assert_eq!(
            out,
            "entry-0 0\nentry-1 1\nentry-2 2\nentry-3 3\nentry-4 4\n"
        );
    }

    #[test]
    fn test_mark_done_twice_is_an_error() {
        let mut pipeline = StreamingPipeline::start(renderer(), Vec::new()).unwrap();
        pipeline.mark_done().unwrap();
        assert!(matches!(pipeline.mark_done(), Err(FlsError::PipelineClosed)));
    }

    #[derive(Debug)]
    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_error_surfaces_at_mark_done() {
        let mut pipeline = StreamingPipeline::start(renderer(), BrokenPipe).unwrap();
        pipeline.publish(file(0)).unwrap();
        let err = pipeline.mark_done().unwrap_err();
        assert!(matches!(err, FlsError::Output(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn test_accept_fails_once_printer_has_stopped() {
        let mut pipeline = StreamingPipeline::start(renderer(), BrokenPipe).unwrap();
        pipeline.accept(file(0)).unwrap();
        while !pipeline.printer.as_ref().unwrap().is_finished() {
            thread::sleep(Duration::from_millis(1));
        }

        let err = pipeline.accept(file(1)).unwrap_err();
        assert!(matches!(err, FlsError::Output(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
        assert_eq!(pipeline.published(), 1);
        // Nothing left to wait for; later calls fail fast.
        assert!(matches!(pipeline.accept(file(2)), Err(FlsError::PipelineClosed)));
        assert!(matches!(pipeline.finish(), Err(FlsError::PipelineClosed)));
    }

    #[test]
    fn test_consumer_drains_backlog_after_disconnect() {
        let (sender, receiver) = crossbeam_channel::unbounded();
        for i in 0..3 {
            sender.send(file(i)).unwrap();
        }
        drop(sender);
        let consumed = run_consumer(receiver, renderer(), Vec::new()).unwrap();
        assert_eq!(consumed.lines, 3);
    }
}
