//! CLI entry point for fls

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use fls::{
    ColorMode, DEFAULT_FORMAT, Diagnostics, DirectPrinter, EntrySink, FlsError, ListingMode,
    Renderer, SortSpec, SortedListing, StreamingPipeline, Template, Walker, WalkerConfig,
};
use termcolor::StandardStream;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const FORMAT_HELP: &str = "Output format template
%n path          %N raw path
%b basename      %B raw basename
%u user          %U uid
%g group         %G gid
%s size          %h human size
%p permstring    %P octal perm
%i inode number  %l number of hardlinks
%e extension     %E name without extension
%a epoch atime   %A iso atime
%m epoch mtime   %M iso mtime
%c epoch ctime   %C iso ctime
%F indicator (/@=|*)  %% literal percent";

const SORT_HELP: &str = "Sort by the given keys, highest priority first
n path       b basename    s size
u user       U uid         g group      G gid
i inode      l hardlinks
e extension  E name without extension
a atime      m mtime       c ctime
Keys may be run together (-s sm), comma-separated, or repeated";

#[derive(Parser, Debug)]
#[command(name = "fls")]
#[command(about = "List files recursively through a format template")]
#[command(version, disable_help_flag = true)]
struct Args {
    /// File or directory to list
    path: Option<PathBuf>,

    /// Output format (see --help)
    #[arg(
        short,
        long,
        env = "FLS_FORMAT",
        default_value = DEFAULT_FORMAT,
        value_name = "FMT",
        long_help = FORMAT_HELP
    )]
    format: String,

    /// Sort by the given keys (see --help)
    #[arg(short, long, value_name = "KEYS", long_help = SORT_HELP)]
    sort: Vec<String>,

    /// Reverse the sorted order
    #[arg(short, long)]
    reverse: bool,

    /// Descend at most N levels below the target's children (-1 = unbounded)
    #[arg(
        short = 'm',
        long = "max-depth",
        value_name = "N",
        default_value = "-1",
        allow_negative_numbers = true
    )]
    max_depth: i64,

    /// Exclude entries matching GLOB (** for recursive *; can be used multiple times)
    #[arg(short = 'x', long = "exclude", value_name = "GLOB")]
    exclude: Vec<String>,

    /// Don't show traversal error messages
    #[arg(short, long)]
    quiet: bool,

    /// Print from the traversal thread instead of a separate printer thread
    #[arg(long)]
    sequential: bool,

    /// Control color of error messages: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Print this message
    #[arg(short, long)]
    help: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("FLS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    init_logging();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.kind() == ErrorKind::DisplayVersion => e.exit(),
        Err(e) => {
            let _ = e.print();
            process::exit(1);
        }
    };

    if args.help {
        let _ = Args::command().print_long_help();
        process::exit(1);
    }

    let mut diagnostics = Diagnostics::stderr(args.color, args.quiet);
    let Some(path) = args.path.clone() else {
        let err = FlsError::Usage(format!(
            "missing file operand\n{}",
            Args::command().render_usage()
        ));
        diagnostics.fatal(&err);
        process::exit(err.exit_code());
    };

    if let Err(e) = run(&args, &path, &mut diagnostics) {
        if e.is_reportable() {
            diagnostics.fatal(&e);
        }
        process::exit(e.exit_code());
    }
}

/// Resolve the listing mode and drive one walk through the matching sink.
fn run(args: &Args, path: &Path, diagnostics: &mut Diagnostics<StandardStream>) -> fls::Result<()> {
    // Validate everything before the first line can be printed.
    let template = Template::parse(&args.format)?;
    let sort = SortSpec::from_args(&args.sort)?;
    let walker = Walker::new(WalkerConfig {
        max_depth: WalkerConfig::depth_limit(args.max_depth),
        exclude_patterns: args.exclude.clone(),
    })?;

    let mode = ListingMode::select(sort, args.reverse, args.sequential);
    debug!(?mode, path = %path.display(), "listing");

    let renderer = Renderer::new(template);
    let stdout = BufWriter::new(io::stdout());
    let mut sink: Box<dyn EntrySink> = match mode {
        ListingMode::Sequential => Box::new(DirectPrinter::new(renderer, stdout)),
        ListingMode::Streaming => Box::new(StreamingPipeline::start(renderer, stdout)?),
        ListingMode::Sorted { spec, reverse } => {
            Box::new(SortedListing::new(spec, reverse, renderer, stdout))
        }
    };

    walker.walk(path, sink.as_mut(), diagnostics)?;
    sink.finish()?;
    io::stdout().flush()?;
    Ok(())
}
