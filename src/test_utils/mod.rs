//! Shared test utilities for vtube.

pub mod fixtures;
pub mod logging;

use std::fmt::Debug;

/// One named row of a table-driven test.
#[derive(Debug, Clone)]
pub struct TestCase<I, E> {
    pub name: &'static str,
    pub input: I,
    pub expected: E,
}

/// Run every case and report all mismatches together, by case name.
pub fn run_table_tests<I, E, F>(cases: &[TestCase<I, E>], test_fn: F) -> Result<(), String>
where
    I: Debug,
    E: Debug + PartialEq,
    F: Fn(&I) -> E,
{
    let failures: Vec<String> = cases
        .iter()
        .filter_map(|case| {
            let actual = test_fn(&case.input);
            (actual != case.expected).then(|| {
                format!(
                    "{}: input {:?}\n  expected {:?}\n  actual   {actual:?}",
                    case.name, case.input, case.expected
                )
            })
        })
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "{} of {} cases failed:\n{}",
            failures.len(),
            cases.len(),
            failures.join("\n")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn double(n: &i32) -> i32 {
        n * 2
    }

    #[test]
    fn passing_table_is_ok() {
        let cases = [
            TestCase { name: "zero", input: 0, expected: 0 },
            TestCase { name: "two", input: 2, expected: 4 },
        ];
        assert_eq!(run_table_tests(&cases, double), Ok(()));
    }

    #[test]
    fn every_failure_is_reported() {
        let cases = [
            TestCase { name: "wrong_a", input: 1, expected: 3 },
            TestCase { name: "right", input: 2, expected: 4 },
            TestCase { name: "wrong_b", input: 5, expected: 0 },
        ];
        let report = run_table_tests(&cases, double).unwrap_err();
        assert!(report.starts_with("2 of 3 cases failed"));
        assert!(report.contains("wrong_a"));
        assert!(report.contains("wrong_b"));
        assert!(!report.contains("right:"));
    }
}
