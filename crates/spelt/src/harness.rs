use crate::test_case::{Failure, Status, TestCase};
use maybe_unwind::{capture_panic_info, maybe_unwind};
use std::{
    panic::{self, AssertUnwindSafe},
    sync::Once,
};

/// Install the panic hook that lets `maybe_unwind` capture panic messages.
/// Panics raised outside a running case fall through to the previous hook.
pub(crate) fn install() {
    static SET_HOOK: Once = Once::new();
    SET_HOOK.call_once(|| {
        let prev_hook = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !capture_panic_info(info) {
                prev_hook(info);
            }
        }));
    });
}

/// In-memory stand-ins for the standard streams, owned by a case for the
/// duration of its begin/end bracket.
///
/// A case body writes through this handle instead of the real streams;
/// the engine reads the text back afterward and echoes it according to
/// the verbosity rules.
#[derive(Default)]
pub struct Capture {
    pub(crate) out: String,
    pub(crate) err: String,
}

impl Capture {
    /// Append text to the captured output stream.
    pub fn write_out(&mut self, text: impl AsRef<str>) {
        self.out.push_str(text.as_ref());
    }

    /// Append text to the captured error stream.
    ///
    /// A case that writes here but otherwise succeeds ends up with
    /// [`Status::OutOnErrorStream`].
    pub fn write_err(&mut self, text: impl AsRef<str>) {
        self.err.push_str(text.as_ref());
    }
}

type Body = Box<dyn FnMut(&mut Capture) -> Result<(), Failure>>;

/// A [`TestCase`] driven by a plain closure.
///
/// The closure receives a [`Capture`] for its stream output and signals a
/// failed assertion by returning a [`Failure`], usually through the
/// [`check!`](crate::check) and [`fail!`](crate::fail) macros. A panic
/// escaping the closure is caught and converted into [`Status::Error`]
/// with the panic message as the failure description, so the engine never
/// sees an unwinding fault.
pub struct FnCase {
    name: String,
    body: Body,
    capture: Capture,
    status: Status,
    failure: Option<Failure>,
}

impl FnCase {
    /// Wrap a closure as a registerable test case. The name is assigned
    /// later, at registration.
    pub fn new<F>(body: F) -> Box<Self>
    where
        F: FnMut(&mut Capture) -> Result<(), Failure> + 'static,
    {
        Box::new(Self {
            name: String::new(),
            body: Box::new(body),
            capture: Capture::default(),
            status: Status::Success,
            failure: None,
        })
    }
}

impl TestCase for FnCase {
    fn set_name(&mut self, name: &str) {
        self.name = name.to_owned();
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn begin_test(&mut self) {
        self.capture = Capture::default();
        self.status = Status::Success;
        self.failure = None;
    }

    fn run(&mut self) {
        install();

        let body = &mut self.body;
        let capture = &mut self.capture;
        let result = maybe_unwind(AssertUnwindSafe(|| body(capture)));

        match result {
            Ok(Ok(())) => {
                self.status = if self.capture.err.is_empty() {
                    Status::Success
                } else {
                    Status::OutOnErrorStream
                };
            }
            Ok(Err(failure)) => {
                self.status = Status::Fail;
                self.failure = Some(failure);
            }
            Err(unwind) => {
                self.status = Status::Error;
                self.failure = Some(Failure::uncaught(unwind.to_string()));
            }
        }
    }

    fn end_test(&mut self) {}

    fn status(&self) -> Status {
        self.status
    }

    fn captured_out(&self) -> &str {
        &self.capture.out
    }

    fn captured_err(&self) -> &str {
        &self.capture.err
    }

    fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }
}
