use spelt::{
    check, EngineError, Failure, FnCase, Status, TestCase, TestEngine, Verbosity,
};
use std::{cell::RefCell, rc::Rc};
use termcolor::NoColor;

fn new_engine() -> TestEngine<NoColor<Vec<u8>>> {
    TestEngine::with_writer(NoColor::new(Vec::new()))
}

fn output(engine: TestEngine<NoColor<Vec<u8>>>) -> String {
    String::from_utf8(engine.into_writer().into_inner()).unwrap()
}

fn passing() -> Box<FnCase> {
    FnCase::new(|_io| Ok(()))
}

fn failing() -> Box<FnCase> {
    FnCase::new(|_io| {
        check!(1 + 1 == 3);
        Ok(())
    })
}

/// A case with a canned status, for exercising the engine's pass
/// determination in isolation.
struct StubCase {
    name: String,
    status: Status,
    destroyed: Rc<RefCell<bool>>,
}

impl StubCase {
    fn new(status: Status) -> Box<Self> {
        Box::new(Self {
            name: String::new(),
            status,
            destroyed: Rc::new(RefCell::new(false)),
        })
    }
}

impl TestCase for StubCase {
    fn set_name(&mut self, name: &str) {
        self.name = name.to_owned();
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn begin_test(&mut self) {}
    fn run(&mut self) {}
    fn end_test(&mut self) {}
    fn destroy(&mut self) {
        *self.destroyed.borrow_mut() = true;
    }
    fn status(&self) -> Status {
        self.status
    }
    fn captured_out(&self) -> &str {
        ""
    }
    fn captured_err(&self) -> &str {
        ""
    }
    fn failure(&self) -> Option<&Failure> {
        None
    }
}

#[test]
fn passing_suite_reports_passed() {
    let mut engine = new_engine();
    engine.add_test_case("alpha", passing()).unwrap();
    engine.add_test_case("beta", passing()).unwrap();

    assert_eq!(engine.run_suite(), 0);
    assert_eq!(engine.status(), 0);

    let out = output(engine);
    assert!(out.contains("[Case 1: alpha"));
    assert!(out.contains("[Case 2: beta"));
    assert!(out.contains("OK  ]"));
    assert!(out.ends_with("Unit Test Passed\n"));
    assert!(!out.contains("Failed cases"));
}

#[test]
fn failing_suite_lists_failed_cases_in_registration_order() {
    let mut engine = new_engine();
    engine.add_test_case("alpha", passing()).unwrap();
    engine.add_test_case("beta", failing()).unwrap();
    engine.add_test_case("gamma", failing()).unwrap();

    assert_eq!(engine.run_suite(), -1);

    let out = output(engine);
    assert!(out.contains("Failed cases: beta, gamma"));
    assert!(out.contains("FAIL]"));
    assert!(out.ends_with("Unit Test FAILED\n"));
}

#[test]
fn silent_run_produces_no_output() {
    let mut engine = new_engine();
    engine.add_test_case("ok", passing()).unwrap();
    engine.add_test_case("bad", failing()).unwrap();
    engine.set_verbosity(Verbosity::Silent);

    assert_eq!(engine.run_suite(), -1);
    assert!(output(engine).is_empty());
}

#[test]
fn selection_runs_in_selection_order() {
    let ran = Rc::new(RefCell::new(Vec::new()));
    let mark = |name: &'static str| {
        let ran = ran.clone();
        FnCase::new(move |_io| {
            ran.borrow_mut().push(name);
            Ok(())
        })
    };

    let mut engine = new_engine();
    engine.add_test_case("B", mark("B")).unwrap();
    engine.add_test_case("A", mark("A")).unwrap();
    engine.add_test_case("C", mark("C")).unwrap();

    engine.select("A").unwrap();
    engine.select("B").unwrap();
    assert_eq!(engine.run_suite(), 0);

    assert_eq!(*ran.borrow(), vec!["A", "B"]);

    let out = output(engine);
    let a = out.find("[Case 1: A").expect("A numbered first");
    let b = out.find("[Case 2: B").expect("B numbered second");
    assert!(a < b);
    assert!(!out.contains("[Case 3:"));
}

#[test]
fn selecting_unknown_name_is_an_error() {
    let mut engine = new_engine();
    engine.add_test_case("known", passing()).unwrap();

    match engine.select("unknown") {
        Err(EngineError::UnknownTestCase(name)) => assert_eq!(name, "unknown"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn duplicate_and_empty_names_are_rejected() {
    let mut engine = new_engine();
    engine.add_test_case("twice", passing()).unwrap();

    assert!(matches!(
        engine.add_test_case("twice", passing()),
        Err(EngineError::DuplicateName(_))
    ));
    assert!(matches!(
        engine.add_test_case("", passing()),
        Err(EngineError::EmptyName)
    ));

    // The rejected registrations must not have entered the registry.
    engine.set_verbosity(Verbosity::Silent);
    assert_eq!(engine.run_suite(), 0);
    let out = output(engine);
    assert!(out.is_empty());
}

#[test]
fn run_single_distinguishes_not_found_from_failure() {
    let mut engine = new_engine();
    engine.set_verbosity(Verbosity::Silent);
    engine.add_test_case("good", passing()).unwrap();
    engine.add_test_case("bad", failing()).unwrap();

    assert_eq!(engine.run_single("good").unwrap(), 0);
    assert_eq!(engine.run_single("bad").unwrap(), -1);
    assert!(matches!(
        engine.run_single("missing"),
        Err(EngineError::UnknownTestCase(_))
    ));
}

#[test]
fn pass_determination_follows_status_and_errout_option() {
    let mut engine = new_engine();

    let success = StubCase::new(Status::Success);
    let errout = StubCase::new(Status::OutOnErrorStream);
    let fail = StubCase::new(Status::Fail);
    let error = StubCase::new(Status::Error);

    assert!(engine.has_passed(&*success));
    assert!(engine.has_passed(&*errout));
    assert!(!engine.has_passed(&*fail));
    assert!(!engine.has_passed(&*error));

    engine.set_errout_is_fail(true);
    assert!(engine.has_passed(&*success));
    assert!(!engine.has_passed(&*errout));
    assert!(!engine.has_passed(&*fail));
    assert!(!engine.has_passed(&*error));
}

#[test]
fn stderr_output_fails_the_run_only_when_configured() {
    let noisy = || {
        FnCase::new(|io: &mut spelt::Capture| {
            io.write_err("grumble\n");
            Ok(())
        })
    };

    let mut engine = new_engine();
    engine.set_verbosity(Verbosity::Silent);
    engine.add_test_case("noisy", noisy()).unwrap();
    assert_eq!(engine.run_suite(), 0);

    let mut engine = new_engine();
    engine.set_verbosity(Verbosity::Silent);
    engine.set_errout_is_fail(true);
    engine.add_test_case("noisy", noisy()).unwrap();
    assert_eq!(engine.run_suite(), -1);
}

#[test]
fn captured_stdout_is_echoed_per_verbosity() {
    let chatty = || {
        FnCase::new(|io: &mut spelt::Capture| {
            io.write_out("hello from the test\n");
            Ok(())
        })
    };

    // A passing test's stdout stays hidden below the Stdout level.
    let mut engine = new_engine();
    engine.add_test_case("chatty", chatty()).unwrap();
    engine.run_suite();
    assert!(!output(engine).contains("STDOUT"));

    let mut engine = new_engine();
    engine.set_verbosity(Verbosity::Stdout);
    engine.add_test_case("chatty", chatty()).unwrap();
    engine.run_suite();
    let out = output(engine);
    assert!(out.contains("STDOUT chatty"));
    assert!(out.contains("hello from the test"));
}

#[test]
fn failing_test_output_is_echoed_even_at_low_verbosity() {
    let mut engine = new_engine();
    engine
        .add_test_case(
            "grouchy",
            FnCase::new(|io: &mut spelt::Capture| {
                io.write_out("progress note\n");
                io.write_err("something smells\n");
                check!(false);
                Ok(())
            }),
        )
        .unwrap();

    assert_eq!(engine.run_suite(), -1);

    // Both blocks appear, as failure evidence, despite the default level.
    let out = output(engine);
    assert!(out.contains("STDOUT grouchy"));
    assert!(out.contains("STDERR grouchy"));
}

#[test]
fn panic_is_reported_as_uncaught_error() {
    let mut engine = new_engine();
    engine
        .add_test_case("explosive", FnCase::new(|_io| panic!("boom")))
        .unwrap();

    assert_eq!(engine.run_suite(), -1);

    let out = output(engine);
    assert!(out.contains("Uncaught error in Case 1: explosive"));
    assert!(out.contains("boom"));
    // An uncaught fault is not an assertion failure.
    assert!(!out.contains("Failure in case"));
}

#[test]
fn failure_detail_appears_at_failure_verbosity() {
    let mut engine = new_engine();
    engine.set_verbosity(Verbosity::Failure);
    engine.add_test_case("willfail", failing()).unwrap();

    engine.run_suite();

    let out = output(engine);
    assert!(out.contains("Failure in case 1: willfail at "));
    assert!(out.contains("tests/engine.rs"));
    assert!(out.contains("assertion failed: 1 + 1 == 3"));
}

#[test]
fn begin_verbosity_announces_each_test() {
    let mut engine = new_engine();
    engine.set_verbosity(Verbosity::Begin);
    engine.add_test_case("quiet", passing()).unwrap();

    engine.run_suite();

    let out = output(engine);
    let go = out.find("GO  ]").expect("GO line printed");
    let ok = out.find("OK  ]").expect("OK line printed");
    assert!(go < ok);
}

#[test]
fn init_resets_the_aggregate_status() {
    let mut engine = new_engine();
    engine.set_verbosity(Verbosity::Silent);
    engine.add_test_case("bad", failing()).unwrap();

    assert_eq!(engine.run_suite(), -1);
    engine.init();
    assert_eq!(engine.status(), 0);
}

#[test]
fn destroy_releases_cases_and_clears_the_registry() {
    let case = StubCase::new(Status::Success);
    let destroyed = case.destroyed.clone();

    let mut engine = new_engine();
    engine.add_test_case("stub", case).unwrap();
    assert!(engine.lookup("stub").is_some());

    engine.destroy();
    assert!(*destroyed.borrow());
    assert!(engine.lookup("stub").is_none());
}

#[test]
fn multibyte_names_survive_status_line_truncation() {
    // A name whose multi-byte character straddles the screen-width
    // boundary must not split a code point while printing.
    let name = format!("{}é-and-more", "a".repeat(40));

    let mut engine = new_engine();
    engine.add_test_case(&name, passing()).unwrap();

    assert_eq!(engine.run_suite(), 0);

    let out = output(engine);
    assert!(out.contains("OK  ]"));
    assert!(out.ends_with("Unit Test Passed\n"));
}

#[test]
fn lookup_finds_registered_cases_by_name() {
    let mut engine = new_engine();
    engine.add_test_case("needle", passing()).unwrap();

    assert_eq!(engine.lookup("needle").unwrap().name(), "needle");
    assert!(engine.lookup("haystack").is_none());
}
