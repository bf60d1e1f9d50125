//! Error reporting on stderr
//!
//! Listing lines go to stdout only; everything here goes to a separate
//! stream so piping the listing never picks up error text.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use clap::ValueEnum;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing::debug;

use crate::error::FlsError;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to color a stream based on mode and environment.
pub fn should_use_color(mode: ColorMode, is_terminal: bool) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            is_terminal
        }
    }
}

/// Collects and prints traversal errors. Quiet mode still counts them.
pub struct Diagnostics<W: WriteColor> {
    out: W,
    quiet: bool,
    count: usize,
}

impl Diagnostics<StandardStream> {
    pub fn stderr(color: ColorMode, quiet: bool) -> Self {
        let choice = if should_use_color(color, io::stderr().is_terminal()) {
            ColorChoice::Always
        } else {
            ColorChoice::Never
        };
        Self::new(StandardStream::stderr(choice), quiet)
    }
}

impl<W: WriteColor> Diagnostics<W> {
    pub fn new(out: W, quiet: bool) -> Self {
        Self {
            out,
            quiet,
            count: 0,
        }
    }

    /// Number of traversal errors seen so far, printed or not.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// A directory could not be listed; its siblings are unaffected.
    pub fn unreadable_dir(&mut self, path: &Path, source: &io::Error) {
        self.traversal("cannot read directory", path, source);
    }

    /// An entry vanished or could not be stat'd.
    pub fn unstatable(&mut self, path: &Path, source: &io::Error) {
        self.traversal("cannot stat", path, source);
    }

    /// Report a traversal error carried as `FlsError::Traversal`.
    pub fn report(&mut self, err: &FlsError) {
        match err {
            FlsError::Traversal { path, source } => self.unstatable(path, source),
            other => self.fatal(other),
        }
    }

    /// Fatal errors are printed even in quiet mode and are not counted.
    pub fn fatal(&mut self, err: &FlsError) {
        let _ = self.write_line(&err.to_string());
    }

    fn traversal(&mut self, what: &str, path: &Path, source: &io::Error) {
        self.count += 1;
        debug!(path = %path.display(), error = %source, "{}", what);
        if self.quiet {
            return;
        }
        let message = format!("{} '{}': {}", what, path.display(), describe(source));
        // A failing stderr must not stop the listing.
        let _ = self.write_line(&message);
    }

    fn write_line(&mut self, message: &str) -> io::Result<()> {
        self.out
            .set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(self.out, "fls:")?;
        self.out.reset()?;
        writeln!(self.out, " {}", message)?;
        self.out.flush()
    }
}

/// Short reason text without the "(os error N)" suffix.
fn describe(err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::PermissionDenied => "Permission denied".to_string(),
        io::ErrorKind::NotFound => "No such file or directory".to_string(),
        _ => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use termcolor::NoColor;

    fn diagnostics(quiet: bool) -> Diagnostics<NoColor<Vec<u8>>> {
        Diagnostics::new(NoColor::new(Vec::new()), quiet)
    }

    fn text(d: Diagnostics<NoColor<Vec<u8>>>) -> String {
        String::from_utf8(d.into_inner().into_inner()).unwrap()
    }

    #[test]
    fn test_unreadable_dir_message() {
        let mut d = diagnostics(false);
        let err = io::Error::from(io::ErrorKind::PermissionDenied);
        d.unreadable_dir(Path::new("data/secret"), &err);
        assert_eq!(d.count(), 1);
        assert_eq!(
            text(d),
            "fls: cannot read directory 'data/secret': Permission denied\n"
        );
    }

    #[test]
    fn test_quiet_counts_but_prints_nothing() {
        let mut d = diagnostics(true);
        let err = io::Error::from(io::ErrorKind::NotFound);
        d.unstatable(Path::new("gone"), &err);
        d.unstatable(Path::new("gone2"), &err);
        assert_eq!(d.count(), 2);
        assert_eq!(text(d), "");
    }

    #[test]
    fn test_report_traversal_error() {
        let mut d = diagnostics(false);
        d.report(&FlsError::Traversal {
            path: PathBuf::from("tmp/x"),
            source: io::Error::from(io::ErrorKind::NotFound),
        });
        assert_eq!(
            text(d),
            "fls: cannot stat 'tmp/x': No such file or directory\n"
        );
    }

    #[test]
    fn test_fatal_ignores_quiet() {
        let mut d = diagnostics(true);
        d.fatal(&FlsError::EmptySortSpec);
        assert_eq!(d.count(), 0);
        assert_eq!(text(d), "fls: --sort needs at least one key\n");
    }

    #[test]
    fn test_color_mode_overrides() {
        assert!(should_use_color(ColorMode::Always, false));
        assert!(!should_use_color(ColorMode::Never, true));
    }
}
