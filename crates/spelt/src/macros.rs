/// Fail the surrounding [`FnCase`](crate::FnCase) body, recording the
/// current source location and a formatted description.
///
/// Expands to an early `return` with a [`Failure`](crate::Failure), so it
/// is only usable inside a body returning `Result<(), Failure>`.
#[macro_export]
macro_rules! fail {
    ($($arg:tt)*) => {
        return ::std::result::Result::Err($crate::Failure::at(
            ::std::file!(),
            ::std::line!(),
            ::std::format!($($arg)*),
        ))
    };
}

/// Assert a condition inside an [`FnCase`](crate::FnCase) body, failing
/// the case with the stringified expression when it does not hold.
#[macro_export]
macro_rules! check {
    ($e:expr) => {
        if !($e) {
            $crate::fail!("assertion failed: {}", ::std::stringify!($e));
        }
    };
}
