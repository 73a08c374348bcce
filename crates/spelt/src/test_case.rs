use std::fmt;

/// The lifecycle status of a test case after it has run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    /// The case completed without a failed assertion.
    Success,
    /// An assertion failed at a known source location.
    Fail,
    /// An uncaught fault escaped the case body.
    Error,
    /// The case wrote to its error stream but otherwise succeeded.
    ///
    /// Treated as a failure only when the engine is configured to do so
    /// (see [`TestEngine::set_errout_is_fail`](crate::TestEngine::set_errout_is_fail)).
    OutOnErrorStream,
}

/// A source position recorded by a failed assertion.
#[derive(Copy, Clone, Debug)]
pub struct Location {
    /// The file the assertion lives in.
    pub file: &'static str,
    /// The line of the assertion.
    pub line: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Evidence attached to a non-successful status.
#[derive(Debug)]
pub struct Failure {
    /// Where the assertion failed. `None` for uncaught faults, which have
    /// no reliable source position.
    pub location: Option<Location>,
    /// A human-readable description of what went wrong.
    pub desc: String,
}

impl Failure {
    /// A failed assertion at a known source position.
    pub fn at(file: &'static str, line: u32, desc: impl Into<String>) -> Self {
        Self {
            location: Some(Location { file, line }),
            desc: desc.into(),
        }
    }

    /// An uncaught fault with no source position.
    pub fn uncaught(desc: impl Into<String>) -> Self {
        Self {
            location: None,
            desc: desc.into(),
        }
    }
}

/// The capabilities the engine consumes from a concrete test case.
///
/// The engine holds registered cases only through this trait: it drives the
/// lifecycle hooks and reads the status, captured streams, and failure
/// evidence back after execution. Assertion mechanics and the output
/// capture implementation belong entirely to the implementor; the engine
/// never intercepts a fault escaping [`run`](TestCase::run) — converting it
/// into [`Status::Error`] before returning is the case's job.
///
/// Lifecycle: the name is assigned once at registration; `init` is called
/// before any run; `begin_test`/`run`/`end_test` bracket a single
/// execution (at most once per engine session); `destroy` releases
/// resources at engine teardown.
pub trait TestCase {
    /// Assign the registered name. Called once by the engine.
    fn set_name(&mut self, name: &str);

    /// The registered name.
    fn name(&self) -> &str;

    /// Prepare internal state (fixture setup). Default: no-op.
    fn init(&mut self) {}

    /// Acquire output capture and reset per-run state.
    fn begin_test(&mut self);

    /// Execute the case body.
    fn run(&mut self);

    /// Finalize output capture. Must release it even if `run` faulted.
    fn end_test(&mut self);

    /// Release resources. Default: no-op.
    fn destroy(&mut self) {}

    /// The status after the last run.
    fn status(&self) -> Status;

    /// Text the case wrote to its output stream during the last run.
    fn captured_out(&self) -> &str;

    /// Text the case wrote to its error stream during the last run.
    fn captured_err(&self) -> &str;

    /// Failure evidence, when the status is [`Status::Fail`] or
    /// [`Status::Error`].
    fn failure(&self) -> Option<&Failure>;
}
