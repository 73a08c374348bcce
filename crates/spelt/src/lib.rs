/*!
A minimal registry-driven unit testing harness.

Test cases are registered by name on a [`TestEngine`] owned by the caller.
The engine drives every case through its lifecycle in registration order
(or through an explicitly selected subset), reads back each case's status
and captured output streams, and prints a verbosity-controlled textual
report. The process exit code reflects the aggregate result.

The engine never owns a concrete test type; it holds [`TestCase`] trait
objects and only consumes the capabilities that trait exposes. [`FnCase`]
is a ready-made implementation that wraps a plain closure, captures its
output in memory, and converts escaped panics into [`Status::Error`].

```no_run
use spelt::{check, FnCase, TestEngine};

fn main() {
    let mut engine = TestEngine::new();
    engine
        .add_test_case(
            "arith",
            FnCase::new(|_io| {
                check!(1 + 1 == 2);
                Ok(())
            }),
        )
        .unwrap();
    spelt::run_tests(&mut engine).exit();
}
```
!*/

#![deny(missing_docs)]
#![forbid(clippy::unimplemented, clippy::todo)]

#[macro_use]
mod macros;
mod cli;
mod engine;
mod harness;
mod printer;
mod test_case;
mod verbosity;

pub use crate::{
    cli::{run_tests, run_tests_with, Args, ExitStatus},
    engine::{EngineError, TestEngine},
    harness::{Capture, FnCase},
    printer::{render_line, Printer, DEFAULT_SCREEN_WIDTH},
    test_case::{Failure, Location, Status, TestCase},
    verbosity::Verbosity,
};
