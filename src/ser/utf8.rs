//
// Copyright 2026 bson-codec Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

use std::str;

/// Classification of a byte slice destined for a string position on the
/// wire.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Utf8Validation {
    /// Well-formed UTF-8, acceptable at this position.
    Valid,
    /// An embedded NUL byte at a position that forbids them, regardless
    /// of whether the bytes are otherwise well-formed.
    HasNull,
    /// A byte sequence that is not well-formed UTF-8 per RFC 3629.
    InvalidUtf8,
}

/// Classifies a byte slice. Keys and regular expression components pass
/// `allow_embedded_nul = false`; string values, which may legitimately
/// contain NUL bytes, pass `true`.
pub fn validate_utf8(bytes: &[u8], allow_embedded_nul: bool) -> Utf8Validation {
    if !allow_embedded_nul && bytes.contains(&0) {
        return Utf8Validation::HasNull;
    }
    match str::from_utf8(bytes) {
        Ok(_) => Utf8Validation::Valid,
        Err(_) => Utf8Validation::InvalidUtf8,
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_utf8, Utf8Validation};

    #[test]
    fn test_valid_ascii_and_multibyte() {
        assert_eq!(validate_utf8(b"hello", false), Utf8Validation::Valid);
        assert_eq!(validate_utf8("héllo жизнь".as_bytes(), false), Utf8Validation::Valid);
        assert_eq!(validate_utf8(b"", false), Utf8Validation::Valid);
    }

    #[test]
    fn test_embedded_nul() {
        assert_eq!(validate_utf8(b"a\x00b", false), Utf8Validation::HasNull);
        assert_eq!(validate_utf8(b"a\x00b", true), Utf8Validation::Valid);
    }

    #[test]
    fn test_invalid_utf8() {
        // A lone continuation byte, a truncated two-byte sequence, and an
        // overlong encoding of '/'.
        assert_eq!(validate_utf8(&[0x80], false), Utf8Validation::InvalidUtf8);
        assert_eq!(validate_utf8(&[0xC3], true), Utf8Validation::InvalidUtf8);
        assert_eq!(validate_utf8(&[0xC0, 0xAF], false), Utf8Validation::InvalidUtf8);
    }

    #[test]
    fn test_nul_reported_before_encoding() {
        // NUL wins over a malformed tail when NULs are forbidden.
        assert_eq!(validate_utf8(&[0x00, 0x80], false), Utf8Validation::HasNull);
        assert_eq!(validate_utf8(&[0x00, 0x80], true), Utf8Validation::InvalidUtf8);
    }
}
