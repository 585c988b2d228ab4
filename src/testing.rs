//! Testing utilities and assertion helpers.
//!
//! Assertions over the calls captured by a [`LocalTransport`].
//!
//! # Example
//!
//! ```rust,ignore
//! use janis_mail::transports::LocalTransport;
//! use janis_mail::testing::*;
//!
//! #[tokio::test]
//! async fn test_order_shipped_mail() {
//!     let local = LocalTransport::new();
//!
//!     // ... trigger mail sending through `local` ...
//!
//!     assert_called(&local);
//!     assert_sent_to(&local, "user@example.com");
//!     assert_payload_field(&local, "templateCode", json!("order-shipped"));
//!     assert_header(&local, "janis-client", "acme");
//!
//!     // Regex matching
//!     assert_subject_matches(&local, r"Order \d+ shipped");
//! }
//! ```

use regex::Regex;
use serde_json::Value;

use crate::transports::{LocalTransport, RecordedCall};

// ============================================================================
// Helper Functions
// ============================================================================

/// Format a list of calls for error messages.
fn format_call_summary(calls: &[RecordedCall]) -> String {
    if calls.is_empty() {
        return "  (no calls made)".to_string();
    }

    calls
        .iter()
        .enumerate()
        .map(|(i, call)| {
            format!(
                "  {}. {}/{}/{} payload: {}",
                i + 1,
                call.service,
                call.namespace,
                call.method,
                call.payload
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn last_call(transport: &LocalTransport) -> RecordedCall {
    transport
        .last_call()
        .expect("Expected at least one call to be made, but none were made")
}

// ============================================================================
// Basic Assertions
// ============================================================================

/// Assert that at least one call was made.
///
/// # Panics
///
/// Panics if no call was made.
pub fn assert_called(transport: &LocalTransport) {
    assert!(
        transport.has_calls(),
        "Expected at least one call to be made, but none were made"
    );
}

/// Assert that no call was made.
///
/// # Panics
///
/// Panics if any call was made.
pub fn assert_no_calls(transport: &LocalTransport) {
    let calls = transport.calls();
    assert!(
        calls.is_empty(),
        "Expected no calls to be made, but {} were made.\n\nCalls made:\n{}",
        calls.len(),
        format_call_summary(&calls)
    );
}

/// Assert that exactly N calls were made.
///
/// # Panics
///
/// Panics if the count doesn't match.
pub fn assert_call_count(transport: &LocalTransport, expected: usize) {
    let calls = transport.calls();
    assert!(
        calls.len() == expected,
        "Expected {} call(s) to be made, but {} were made.\n\nCalls made:\n{}",
        expected,
        calls.len(),
        format_call_summary(&calls)
    );
}

/// Assert that a call addressed `address` in its `to` field.
///
/// # Panics
///
/// Panics if no call was sent to the address.
pub fn assert_sent_to(transport: &LocalTransport, address: &str) {
    assert!(
        transport.sent_to(address),
        "Expected a mail to be sent to '{}'.\n\nCalls made:\n{}",
        address,
        format_call_summary(&transport.calls())
    );
}

/// Assert that no call addressed `address` in its `to` field.
///
/// # Panics
///
/// Panics if a call was sent to the address.
pub fn refute_sent_to(transport: &LocalTransport, address: &str) {
    assert!(
        !transport.sent_to(address),
        "Expected no mail to be sent to '{}', but found one.\n\nCalls made:\n{}",
        address,
        format_call_summary(&transport.calls())
    );
}

// ============================================================================
// Last Call Assertions
// ============================================================================

/// Assert a top-level payload field of the last call.
///
/// # Panics
///
/// Panics if no call was made or the field differs.
pub fn assert_payload_field(transport: &LocalTransport, name: &str, expected: Value) {
    let last = last_call(transport);
    assert!(
        last.field(name) == Some(&expected),
        "Expected payload field '{}' to be {}, but was {:?}.\n\nLast call:\n{}",
        name,
        expected,
        last.field(name),
        format_call_summary(&[last.clone()])
    );
}

/// Assert a header of the last call.
///
/// # Panics
///
/// Panics if no call was made or the header differs.
pub fn assert_header(transport: &LocalTransport, name: &str, expected: &str) {
    let last = last_call(transport);
    assert!(
        last.header(name) == Some(expected),
        "Expected header '{}' to be '{}', but was {:?}.\n\nHeaders: {:?}",
        name,
        expected,
        last.header(name),
        last.headers
    );
}

/// Assert a call matching the payload predicate was made.
///
/// # Panics
///
/// Panics if no matching call was found.
pub fn assert_call_matches<F>(transport: &LocalTransport, predicate: F)
where
    F: Fn(&Value) -> bool,
{
    let matches = transport.find_calls(predicate);
    assert!(
        !matches.is_empty(),
        "Expected a call matching the predicate, but none was found.\n\nCalls made:\n{}",
        format_call_summary(&transport.calls())
    );
}

// ============================================================================
// Regex Matching
// ============================================================================

/// Assert the subject of the last call matches a regex pattern.
///
/// # Panics
///
/// Panics if no call was made or the subject doesn't match.
pub fn assert_subject_matches(transport: &LocalTransport, pattern: &str) {
    let last = last_call(transport);
    let subject = match last.field("subject") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };
    let re = Regex::new(pattern).expect("Invalid regex pattern");

    assert!(
        re.is_match(&subject),
        "Expected subject to match pattern '{}', but was '{}'.\n\nLast call:\n{}",
        pattern,
        subject,
        format_call_summary(&[last.clone()])
    );
}

/// Assert the body of the last call matches a regex pattern.
///
/// # Panics
///
/// Panics if no call was made or the body doesn't match.
pub fn assert_body_matches(transport: &LocalTransport, pattern: &str) {
    let last = last_call(transport);
    let body = last.field("body").and_then(Value::as_str).unwrap_or("");
    let re = Regex::new(pattern).expect("Invalid regex pattern");

    assert!(
        re.is_match(body),
        "Expected body to match pattern '{}', but it didn't.\n\nBody (first 500 chars):\n{}",
        pattern,
        body.chars().take(500).collect::<String>()
    );
}
