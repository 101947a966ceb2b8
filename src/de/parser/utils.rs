//
// Copyright 2026 bson-codec Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

use nom::{
    IResult,
    bytes::complete::{tag, take, take_till},
    combinator::{map_res, verify},
    number::complete::le_i32,
    sequence::terminated,
};

use std::convert::TryFrom;

/// Parses a little-endian int32 length field into a usize, rejecting
/// negative values.
pub fn length(input: &[u8]) -> IResult<&[u8], usize> {
    map_res(le_i32, usize::try_from)(input)
}

/// Parses the bytes of a cstring: everything up to the NUL terminator,
/// consuming the terminator. By construction the bytes cannot contain an
/// embedded NUL.
pub fn cstring_bytes(input: &[u8]) -> IResult<&[u8], &[u8]> {
    terminated(take_till(|byte| byte == 0), tag(&b"\x00"[..]))(input)
}

/// Parses the payload of a length-prefixed string: an int32 length that
/// counts the trailing NUL, then that many bytes. The payload may contain
/// embedded NULs, but the final byte must be the terminator.
pub fn string_bytes(input: &[u8]) -> IResult<&[u8], &[u8]> {
    let (input, payload_length) = verify(length, |&n| n >= 1)(input)?;
    terminated(take(payload_length - 1), tag(&b"\x00"[..]))(input)
}

#[cfg(test)]
mod tests {
    use super::{cstring_bytes, length, string_bytes};

    #[test]
    fn test_length() {
        let (rest, value) = length(&[0x10, 0x00, 0x00, 0x00, 0xFF]).unwrap();
        assert_eq!(rest, &[0xFF]);
        assert_eq!(value, 16);
    }

    #[test]
    fn test_length_rejects_negative() {
        assert!(length(&[0xFF, 0xFF, 0xFF, 0xFF]).is_err());
    }

    #[test]
    fn test_cstring_bytes() {
        let (rest, value) = cstring_bytes(b"hello\x00tail").unwrap();
        assert_eq!(value, b"hello");
        assert_eq!(rest, b"tail");

        let (rest, value) = cstring_bytes(b"\x00").unwrap();
        assert_eq!(value, b"");
        assert_eq!(rest, b"");
    }

    #[test]
    fn test_cstring_bytes_requires_terminator() {
        assert!(cstring_bytes(b"hello").is_err());
    }

    #[test]
    fn test_string_bytes() {
        let (rest, value) = string_bytes(b"\x06\x00\x00\x00world\x00!").unwrap();
        assert_eq!(value, b"world");
        assert_eq!(rest, b"!");
    }

    #[test]
    fn test_string_bytes_with_embedded_nul() {
        let (rest, value) = string_bytes(b"\x04\x00\x00\x00a\x00b\x00").unwrap();
        assert_eq!(value, b"a\x00b");
        assert_eq!(rest, b"");
    }

    #[test]
    fn test_string_bytes_rejects_missing_terminator() {
        assert!(string_bytes(b"\x03\x00\x00\x00abc").is_err());
        assert!(string_bytes(b"\x00\x00\x00\x00").is_err());
    }
}
