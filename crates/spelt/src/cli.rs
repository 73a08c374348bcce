#![allow(missing_docs)]

//! Definition of the command line interface.

use crate::{engine::TestEngine, verbosity::Verbosity};
use getopts::Options;
use std::path::Path;
use termcolor::WriteColor;

/// Exit status code used as a result of the test process.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ExitStatus(i32);

impl ExitStatus {
    pub const OK: Self = Self(0);
    pub const INVALID_ARGS: Self = Self(1);

    /// Map an aggregate run status onto a process exit status.
    pub fn from_run(status: i32) -> Self {
        Self(status)
    }

    /// Return the raw exit code.
    #[inline]
    pub fn code(self) -> i32 {
        self.0
    }

    /// Terminate the test process with the exit code.
    ///
    /// This method **should not** be called before the cleanup of the
    /// test process has completed.
    #[inline]
    pub fn exit(self) -> ! {
        std::process::exit(self.code());
    }
}

/// Command line arguments.
#[derive(Debug)]
pub struct Args {
    /// `-q`: silence all output, overriding `-v`.
    pub quiet: bool,
    /// `-v LEVEL`: explicit verbosity level.
    pub verbosity: Option<Verbosity>,
    /// `-t NAME` occurrences, in flag order.
    pub selected: Vec<String>,
}

impl Args {
    /// Parse the process arguments.
    pub fn from_env() -> Result<Self, ExitStatus> {
        let args: Vec<_> = std::env::args().collect();
        Self::from_args(&args)
    }

    /// Parse an explicit argument vector, `args[0]` being the program
    /// name.
    pub fn from_args(args: &[String]) -> Result<Self, ExitStatus> {
        let parser = Parser::new(args);
        match parser.parse() {
            Ok(Some(args)) => Ok(args),
            Ok(None) => {
                parser.print_usage();
                Err(ExitStatus::OK)
            }
            Err(err) => {
                eprintln!("Invalid options: {}", err);
                parser.print_usage();
                Err(ExitStatus::INVALID_ARGS)
            }
        }
    }
}

struct Parser<'a> {
    args: &'a [String],
    opts: Options,
}

impl<'a> Parser<'a> {
    fn new(args: &'a [String]) -> Self {
        let mut opts = Options::new();
        opts.optflag("h", "help", "Display this message");
        opts.optflag("q", "", "Suppress all output, including the final summary");
        opts.optopt(
            "v",
            "",
            "Set the verbosity level:
                0 = silent;
                1 = compact OK/FAIL lines (default);
                2 = also announce each test before it starts;
                3 = also print full failure detail;
                4 = also echo captured stdout;
                5 = also echo captured stderr",
            "LEVEL",
        );
        opts.optmulti(
            "t",
            "",
            "Run only the named test case (this flag can be used multiple times)",
            "NAME",
        );

        Self { args, opts }
    }

    fn print_usage(&self) {
        let binary = self.args.get(0).map(String::as_str).unwrap_or("unittest");
        let progname = Path::new(binary)
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(binary);

        let message = format!("Usage: {} [OPTIONS]", progname);
        eprintln!("{}", self.opts.usage(&message));
    }

    fn parse(&self) -> anyhow::Result<Option<Args>> {
        let args = &self.args[..];

        let matches = self.opts.parse(args.get(1..).unwrap_or(args))?;
        if matches.opt_present("h") {
            return Ok(None);
        }
        if let Some(free) = matches.free.first() {
            anyhow::bail!("unexpected argument '{}'", free);
        }

        let quiet = matches.opt_present("q");
        let verbosity = matches.opt_get("v")?;
        let selected = matches.opt_strs("t");

        Ok(Some(Args {
            quiet,
            verbosity,
            selected,
        }))
    }
}

/// Run the whole suite under the process arguments and tear the engine
/// down.
///
/// The returned status maps to the process exit code: 0 for a passing
/// run, 1 for argument errors (including an unknown `-t` name, which
/// aborts before anything runs), the aggregate status otherwise.
pub fn run_tests<W: WriteColor>(engine: &mut TestEngine<W>) -> ExitStatus {
    let args = match Args::from_env() {
        Ok(args) => args,
        Err(st) => return st,
    };
    run_tests_with(engine, &args)
}

/// Run the whole suite under already-parsed arguments.
pub fn run_tests_with<W: WriteColor>(engine: &mut TestEngine<W>, args: &Args) -> ExitStatus {
    crate::harness::install();

    if let Some(verbosity) = args.verbosity {
        engine.set_verbosity(verbosity);
    }
    if args.quiet {
        engine.set_verbosity(Verbosity::Silent);
    }

    for name in &args.selected {
        if engine.select(name).is_err() {
            println!("Unknown test case {}", name);
            return ExitStatus::INVALID_ARGS;
        }
    }

    let status = engine.run_suite();
    engine.destroy();
    ExitStatus::from_run(status)
}
