//! Shared-secret verification for the webhook endpoint.

use std::borrow::Cow;

use subtle::ConstantTimeEq;

use crate::error::{AppError, AppResult};

/// Message returned to callers presenting a wrong secret
pub const SECRET_MISMATCH: &str = "request URL: secret did not match";

/// Upper bound on how many times a supplied secret is URL-decoded before giving up
pub const MAX_SECRET_DECODE_ROUNDS: usize = 8;

/// Verifies the supplied secret against the configured one.
///
/// Proxies in front of the service sometimes percent-encode the query string
/// once or twice more. When the raw value does not match, it is query-unescaped
/// and compared again until it matches, stops changing, fails to decode, or
/// [`MAX_SECRET_DECODE_ROUNDS`] is reached. All comparisons are constant time.
pub fn verify_secret(expected: &str, supplied: &str) -> AppResult<()> {
    if expected.is_empty() {
        return Err(mismatch());
    }

    let mut candidate = Cow::Borrowed(supplied);
    for _ in 0..=MAX_SECRET_DECODE_ROUNDS {
        if constant_time_eq(candidate.as_bytes(), expected.as_bytes()) {
            return Ok(());
        }

        match query_unescape(&candidate) {
            Some(decoded) if decoded != *candidate => candidate = Cow::Owned(decoded),
            _ => break,
        }
    }

    Err(mismatch())
}

fn mismatch() -> AppError {
    AppError::Forbidden {
        message: SECRET_MISMATCH.to_string(),
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

/// Query-string unescaping: `+` becomes a space, `%XX` sequences are decoded.
/// Returns `None` when the result is not valid UTF-8.
fn query_unescape(value: &str) -> Option<String> {
    let spaced = value.replace('+', " ");
    urlencoding::decode(&spaced).ok().map(Cow::into_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SECRET: &str = "s3cr3t/key=";

    fn encode_times(value: &str, times: usize) -> String {
        (0..times).fold(value.to_string(), |acc, _| urlencoding::encode(&acc).into_owned())
    }

    #[test]
    fn test_exact_secret_matches() {
        assert!(verify_secret(SECRET, SECRET).is_ok());
    }

    #[test]
    fn test_encoded_secret_matches() {
        assert!(verify_secret(SECRET, "s3cr3t%2Fkey%3D").is_ok());
        assert!(verify_secret(SECRET, "s3cr3t%252Fkey%253D").is_ok());
    }

    #[test]
    fn test_plus_decodes_to_space() {
        assert!(verify_secret("two words", "two+words").is_ok());
    }

    #[test]
    fn test_near_miss_is_rejected() {
        let err = verify_secret(SECRET, "s3cr3t%2Fkey%3E").unwrap_err();
        match err {
            AppError::Forbidden { message } => assert_eq!(message, SECRET_MISMATCH),
            other => panic!("expected Forbidden, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_escape_terminates() {
        assert!(verify_secret(SECRET, "%zz%").is_err());
        assert!(verify_secret(SECRET, "%FF%FE").is_err());
    }

    #[test]
    fn test_empty_values_are_rejected() {
        assert!(verify_secret(SECRET, "").is_err());
        assert!(verify_secret("", "").is_err());
    }

    #[test]
    fn test_decode_rounds_are_bounded() {
        let at_limit = encode_times(SECRET, MAX_SECRET_DECODE_ROUNDS);
        assert!(verify_secret(SECRET, &at_limit).is_ok());

        let beyond_limit = encode_times(SECRET, MAX_SECRET_DECODE_ROUNDS + 1);
        assert!(verify_secret(SECRET, &beyond_limit).is_err());
    }

    proptest! {
        #[test]
        fn property_other_plain_values_rejected(candidate in "[A-Za-z0-9]{1,40}") {
            prop_assume!(candidate != SECRET);
            prop_assert!(verify_secret(SECRET, &candidate).is_err());
        }

        #[test]
        fn property_encoded_secret_accepted(times in 0usize..=3) {
            let encoded = encode_times(SECRET, times);
            prop_assert!(verify_secret(SECRET, &encoded).is_ok());
        }
    }
}
