use crate::{
    printer::Printer,
    test_case::{Status, TestCase},
    verbosity::Verbosity,
};
use std::{collections::HashMap, fmt, mem};
use termcolor::{StandardStream, WriteColor};

/// Errors raised by the registry and lookup operations.
#[derive(Debug)]
pub enum EngineError {
    /// A test case was registered with an empty name.
    EmptyName,
    /// A test case was registered under an already-taken name.
    DuplicateName(String),
    /// A selection or single-test run named a case that is not registered.
    UnknownTestCase(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::EmptyName => f.write_str("test case name must not be empty"),
            EngineError::DuplicateName(name) => {
                write!(f, "the test name '{}' is conflicted", name)
            }
            EngineError::UnknownTestCase(name) => write!(f, "Test '{}' not found", name),
        }
    }
}

impl std::error::Error for EngineError {}

/// The test registry and execution/reporting engine.
///
/// An engine instance is constructed by the caller, usually in `main`,
/// registration sites receive it by reference, and the caller tears it
/// down with [`destroy`](TestEngine::destroy) at the end. There is no
/// hidden global instance.
///
/// Execution is strictly sequential in selection order; a case that never
/// returns blocks the whole suite. The writer defaults to the standard
/// output stream and can be replaced for capturing the report, e.g. with
/// `termcolor::NoColor<Vec<u8>>` in tests.
pub struct TestEngine<W = StandardStream> {
    cases: Vec<Box<dyn TestCase>>,
    by_name: HashMap<String, usize>,
    selection: Vec<usize>,
    status: i32,
    errout_is_fail: bool,
    verbosity: Verbosity,
    printer: Printer<W>,
}

impl TestEngine<StandardStream> {
    /// An engine reporting to standard output.
    pub fn new() -> Self {
        Self::with_writer_inner(Printer::stdout())
    }
}

impl Default for TestEngine<StandardStream> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: WriteColor> TestEngine<W> {
    /// An engine reporting into the given sink.
    pub fn with_writer(writer: W) -> Self {
        Self::with_writer_inner(Printer::new(writer))
    }

    fn with_writer_inner(printer: Printer<W>) -> Self {
        Self {
            cases: vec![],
            by_name: HashMap::new(),
            selection: vec![],
            status: 0,
            errout_is_fail: false,
            verbosity: Verbosity::default(),
            printer,
        }
    }

    /// Register a test case under `name`.
    ///
    /// The name is assigned to the case and must be non-empty and unique;
    /// violations are rejected before the case enters the registry.
    pub fn add_test_case(
        &mut self,
        name: &str,
        mut case: Box<dyn TestCase>,
    ) -> Result<(), EngineError> {
        if name.is_empty() {
            return Err(EngineError::EmptyName);
        }
        if self.by_name.contains_key(name) {
            return Err(EngineError::DuplicateName(name.to_owned()));
        }

        case.set_name(name);
        self.by_name.insert(name.to_owned(), self.cases.len());
        self.cases.push(case);
        log::debug!("registered test case '{}'", name);
        Ok(())
    }

    /// Find a registered case by name.
    pub fn lookup(&self, name: &str) -> Option<&dyn TestCase> {
        self.by_name.get(name).map(|&idx| &*self.cases[idx])
    }

    /// Append the named case to the selection set for the next run.
    pub fn select(&mut self, name: &str) -> Result<(), EngineError> {
        match self.by_name.get(name) {
            Some(&idx) => {
                self.selection.push(idx);
                Ok(())
            }
            None => Err(EngineError::UnknownTestCase(name.to_owned())),
        }
    }

    /// The aggregate run status: 0 when every executed case passed,
    /// -1 once any case has failed.
    pub fn status(&self) -> i32 {
        self.status
    }

    /// Set the report verbosity.
    pub fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
    }

    /// The current report verbosity.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Treat [`Status::OutOnErrorStream`] as a failure.
    pub fn set_errout_is_fail(&mut self, enabled: bool) {
        self.errout_is_fail = enabled;
    }

    /// Override the width compact status lines are padded to.
    pub fn set_screen_width(&mut self, width: usize) {
        self.printer.set_screen_width(width);
    }

    /// Reset the aggregate status and initialize every registered case in
    /// registration order.
    pub fn init(&mut self) {
        self.status = 0;
        for case in &mut self.cases {
            case.init();
        }
    }

    /// Run the selection set in order, numbering the cases from 1.
    ///
    /// Each failure folds the aggregate status to -1; later passes never
    /// reset it. The selection set is consumed by the run.
    pub fn run_all_tests(&mut self) {
        let selected = mem::take(&mut self.selection);
        log::debug!("running {} selected test case(s)", selected.len());
        for (count, idx) in selected.into_iter().enumerate() {
            self.run_one(count + 1, idx);
        }
    }

    /// Run the whole suite: initialize, default an empty selection to the
    /// full registry, execute, report. Returns the aggregate status.
    pub fn run_suite(&mut self) -> i32 {
        self.init();
        if self.selection.is_empty() {
            self.selection = (0..self.cases.len()).collect();
        }
        self.run_all_tests();
        self.report();
        self.status
    }

    /// Run a single case by name.
    ///
    /// A name absent from the registry is an error, not a failing test
    /// result. Returns the aggregate status otherwise.
    pub fn run_single(&mut self, name: &str) -> Result<i32, EngineError> {
        self.init();
        let idx = match self.by_name.get(name) {
            Some(&idx) => idx,
            None => return Err(EngineError::UnknownTestCase(name.to_owned())),
        };
        self.run_one(1, idx);
        Ok(self.status)
    }

    /// Whether a case counts as passed under the current options.
    pub fn has_passed(&self, case: &dyn TestCase) -> bool {
        match case.status() {
            Status::Success => true,
            Status::OutOnErrorStream => !self.errout_is_fail,
            Status::Fail | Status::Error => false,
        }
    }

    fn run_one(&mut self, count: usize, idx: usize) {
        self.begin_test(count, idx);
        self.cases[idx].run();
        self.end_test(count, idx);

        if !self.has_passed(&*self.cases[idx]) {
            self.status = -1;
        }
    }

    fn begin_test(&mut self, count: usize, idx: usize) {
        if self.verbosity >= Verbosity::Begin {
            let name = self.cases[idx].name().to_owned();
            let _ = self.printer.status_line(count, &name, "GO");
        }
        self.cases[idx].begin_test();
    }

    fn end_test(&mut self, count: usize, idx: usize) {
        self.cases[idx].end_test();

        let verbosity = self.verbosity;
        let passed = self.has_passed(&*self.cases[idx]);
        let case = &self.cases[idx];
        let printer = &mut self.printer;

        // The stdout and stderr checks are independent; a failing case can
        // produce both blocks.
        if !case.captured_out().is_empty()
            && (verbosity >= Verbosity::Stdout || (verbosity > Verbosity::Silent && !passed))
        {
            let _ = printer.stream_block("STDOUT", case.name(), case.captured_out());
        }
        if !case.captured_err().is_empty()
            && (verbosity >= Verbosity::Stderr || (verbosity > Verbosity::Silent && !passed))
        {
            let _ = printer.stream_block("STDERR", case.name(), case.captured_err());
        }

        match case.status() {
            Status::Error if verbosity > Verbosity::Silent => {
                let desc = case.failure().map(|f| f.desc.as_str()).unwrap_or("");
                let _ = printer.error_block(count, case.name(), desc);
            }
            Status::Fail if verbosity >= Verbosity::Failure => {
                let (location, desc) = match case.failure() {
                    Some(f) => (f.location, f.desc.as_str()),
                    None => (None, ""),
                };
                let _ = printer.failure_block(count, case.name(), location, desc);
            }
            _ if verbosity >= Verbosity::Status => {
                let tag = if passed { "OK" } else { "FAIL" };
                let _ = printer.status_line(count, case.name(), tag);
            }
            _ => {}
        }
    }

    /// Print the aggregate report.
    ///
    /// Silent verbosity suppresses everything. A failed run lists the
    /// names of all registered (not just selected) cases that did not
    /// pass, then the final verdict line is printed either way.
    pub fn report(&mut self) {
        if self.verbosity == Verbosity::Silent {
            return;
        }

        if self.status != 0 {
            let failed: Vec<String> = self
                .cases
                .iter()
                .map(|case| &**case)
                .filter(|&case| !self.has_passed(case))
                .map(|case| case.name().to_owned())
                .collect();
            if !failed.is_empty() {
                let _ = self.printer.failed_cases(&failed);
            }
        }

        let _ = self.printer.verdict(self.status == 0);
    }

    /// Tear the engine down: destroy every registered case in
    /// registration order, then clear the registry, the name index, and
    /// any pending selection.
    pub fn destroy(&mut self) {
        log::debug!("destroying {} test case(s)", self.cases.len());
        for case in &mut self.cases {
            case.destroy();
        }
        self.cases.clear();
        self.by_name.clear();
        self.selection.clear();
    }

    /// Consume the engine and hand back its report sink.
    pub fn into_writer(self) -> W {
        self.printer.into_inner()
    }
}
