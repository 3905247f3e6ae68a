//! Left-to-right function application.

/// Feed a value through a sequence of functions, first to last
///
/// `pipe!(x, f, g)` is `g(f(x))`. It reads well with the curried fixture
/// builders:
///
/// ```rust
/// use spyglass::{arb_spy_fn, bind, bind_as, empty, ints, just, pipe};
///
/// let fixture = pipe!(
///     empty(),
///     bind("seed", |_| just(7u64)),
///     bind_as("lookup", "lookups", |_| arb_spy_fn::<(String,), _>(ints::<u32>())),
/// );
/// assert_eq!(fixture.value_keys(), &["seed", "lookup"]);
/// assert_eq!(fixture.log_keys(), &["lookups"]);
/// ```
#[macro_export]
macro_rules! pipe {
    ($value:expr $(,)?) => {
        $value
    };
    ($value:expr, $f:expr $(, $rest:expr)* $(,)?) => {
        $crate::pipe!(($f)($value) $(, $rest)*)
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_pipe_applies_in_order() {
        assert_eq!(crate::pipe!(3), 3);
        assert_eq!(crate::pipe!(3, |x| x + 1), 4);
        assert_eq!(crate::pipe!(3, |x| x + 1, |x| x * 10, |x: i32| x.to_string()), "40");
    }

    #[test]
    fn test_pipe_accepts_paths_and_trailing_comma() {
        fn double(x: u8) -> u8 {
            x * 2
        }
        assert_eq!(crate::pipe!(1, double, double,), 4);
    }
}
