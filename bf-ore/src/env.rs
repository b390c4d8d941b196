//! Utilities for reading environment variables.

use std::ffi::OsStr;

/// Values of an environment variable that we consider "off".
static FALSEY: &[&str] = &["", "0", "no", "off", "false"];

/// Returns true if the environment variable is set to anything other than one of
/// `'', '0', 'no', 'off', 'false'` (compared case-insensitively).
pub fn is_truthy<K: AsRef<OsStr>>(var: K) -> bool {
    match std::env::var_os(var) {
        None => false,
        Some(value) => value_is_truthy(&value),
    }
}

fn value_is_truthy(value: &OsStr) -> bool {
    // Anything that isn't valid unicode is certainly not one of our falsey values.
    let Some(value) = value.to_str() else {
        return true;
    };
    let value = value.trim();
    !FALSEY.iter().any(|falsey| value.eq_ignore_ascii_case(falsey))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness() {
        for val in ["1", "yes", "true", "TRUE", "anything"] {
            assert!(value_is_truthy(OsStr::new(val)), "{val}");
        }
        for val in ["", "0", "no", "No", "off", "false", "FALSE", " false "] {
            assert!(!value_is_truthy(OsStr::new(val)), "{val}");
        }
    }

    #[test]
    fn unset_is_falsey() {
        assert!(!is_truthy("BF_ORE_TEST_VARIABLE_THAT_IS_NEVER_SET"));
    }
}
