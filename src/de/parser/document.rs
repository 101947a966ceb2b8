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
    bytes::complete::take,
    combinator::{map, verify},
    number::complete::le_u8,
    sequence::tuple,
};

use crate::de::parser::utils;

/// The smallest possible frame: the length prefix and the terminator.
pub const MIN_FRAME_LENGTH: usize = 5;

/// Parses a document frame: an int32 total length that counts every byte
/// from the length prefix through the trailing NUL, the element bytes,
/// and the NUL itself. Yields the element region without the terminator.
pub fn frame(input: &[u8]) -> IResult<&[u8], &[u8]> {
    let (input, total_length) = verify(utils::length, |&n| n >= MIN_FRAME_LENGTH)(input)?;
    map(
        verify(take(total_length - 4), |body: &[u8]| body.last() == Some(&0)),
        |body: &[u8]| &body[..body.len() - 1],
    )(input)
}

/// Parses one element header: the type tag byte and the key cstring
/// bytes.
pub fn element_header(input: &[u8]) -> IResult<&[u8], (u8, &[u8])> {
    tuple((le_u8, utils::cstring_bytes))(input)
}

#[cfg(test)]
mod tests {
    use super::{element_header, frame};

    #[test]
    fn test_frame_empty_document() {
        let (rest, elements) = frame(&[0x05, 0x00, 0x00, 0x00, 0x00]).unwrap();
        assert_eq!(elements, b"");
        assert_eq!(rest, b"");
    }

    #[test]
    fn test_frame_leaves_trailing_input() {
        let (rest, elements) = frame(&[0x05, 0x00, 0x00, 0x00, 0x00, 0xAB]).unwrap();
        assert_eq!(elements, b"");
        assert_eq!(rest, &[0xAB]);
    }

    #[test]
    fn test_frame_with_elements() {
        // {"a": true}
        let input = &[
            0x09, 0x00, 0x00, 0x00,
            0x08, b'a', 0x00, 0x01,
            0x00,
        ];
        let (rest, elements) = frame(input).unwrap();
        assert_eq!(elements, &[0x08, b'a', 0x00, 0x01]);
        assert_eq!(rest, b"");
    }

    #[test]
    fn test_frame_rejects_short_lengths() {
        assert!(frame(&[0x04, 0x00, 0x00, 0x00]).is_err());
        assert!(frame(&[0x00, 0x00, 0x00, 0x00, 0x00]).is_err());
    }

    #[test]
    fn test_frame_rejects_truncated_input() {
        assert!(frame(&[0x0A, 0x00, 0x00, 0x00, 0x00]).is_err());
    }

    #[test]
    fn test_frame_rejects_missing_terminator() {
        assert!(frame(&[0x05, 0x00, 0x00, 0x00, 0x01]).is_err());
    }

    #[test]
    fn test_element_header() {
        let (rest, (tag, key)) = element_header(&[0x10, b'a', b'b', 0x00, 0x2A]).unwrap();
        assert_eq!(tag, 0x10);
        assert_eq!(key, b"ab");
        assert_eq!(rest, &[0x2A]);
    }
}
