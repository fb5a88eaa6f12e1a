//! Custom assertions for integration tests

use serde_json::Value;

/// Assert that output is valid JSON and return parsed value
pub fn assert_valid_json(output: &str, context: &str) -> Value {
    serde_json::from_str(output).unwrap_or_else(|e| {
        panic!(
            "Expected valid JSON ({}): {}\nOutput:\n{}",
            context, e, output
        )
    })
}

/// Assert that output contains a string
pub fn assert_contains(output: &str, needle: &str, context: &str) {
    assert!(
        output.contains(needle),
        "Expected output to contain '{}' ({})\nOutput:\n{}",
        needle,
        context,
        output
    );
}

/// Assert that output does NOT contain a string
pub fn assert_not_contains(output: &str, needle: &str, context: &str) {
    assert!(
        !output.contains(needle),
        "Expected output NOT to contain '{}' ({})\nOutput:\n{}",
        needle,
        context,
        output
    );
}

/// Assert that `needles` occur in `output` in the given order
pub fn assert_in_order(output: &str, needles: &[&str]) {
    let mut from = 0;
    for needle in needles {
        let found = output[from..].find(needle).unwrap_or_else(|| {
            panic!(
                "Expected '{}' after byte {}\nOutput:\n{}",
                needle, from, output
            )
        });
        from += found + needle.len();
    }
}

/// Number of non-overlapping occurrences of `needle`
pub fn count_occurrences(output: &str, needle: &str) -> usize {
    output.matches(needle).count()
}
