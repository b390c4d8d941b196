//! Utilities for `assert!`s.

/// Asserts that an `Option` expression is `None`, printing the unexpected value otherwise.
///
/// Mostly useful for checking the return value of `insert` on maps that should never already
/// contain the key.
#[macro_export]
macro_rules! assert_none {
    ($val:expr $(,)?) => {
        match &$val {
            None => (),
            Some(found) => panic!("assertion failed: expected None, found Some({found:?})"),
        }
    };
    ($val:expr, $($msg:tt)+) => {
        match &$val {
            None => (),
            Some(found) => panic!(
                "assertion failed: expected None, found Some({found:?}): {}",
                format_args!($($msg)+),
            ),
        }
    };
}
