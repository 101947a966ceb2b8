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
    error::{Error as NomError, ErrorKind},
    number::complete::{le_f64, le_i32, le_i64, le_u32, le_u8},
    sequence::tuple,
};

use crate::de::parser::{document, utils};

/// Parses a 64-bit little-endian double payload.
pub fn double(input: &[u8]) -> IResult<&[u8], f64> {
    le_f64(input)
}

/// Parses a 32-bit little-endian integer payload.
pub fn int32(input: &[u8]) -> IResult<&[u8], i32> {
    le_i32(input)
}

/// Parses a 64-bit little-endian integer payload.
pub fn int64(input: &[u8]) -> IResult<&[u8], i64> {
    le_i64(input)
}

/// Parses a boolean payload; any non-zero byte reads as true.
pub fn boolean(input: &[u8]) -> IResult<&[u8], bool> {
    map(le_u8, |byte| byte != 0)(input)
}

/// Parses the 12 raw bytes of an object identifier.
pub fn object_id(input: &[u8]) -> IResult<&[u8], [u8; 12]> {
    map(take(12usize), |bytes: &[u8]| {
        let mut id = [0u8; 12];
        id.copy_from_slice(bytes);
        id
    })(input)
}

/// Parses a UTC datetime payload: milliseconds since the Unix epoch.
pub fn utc_datetime(input: &[u8]) -> IResult<&[u8], i64> {
    le_i64(input)
}

/// Parses a timestamp payload in wire order: increment, then seconds.
pub fn timestamp(input: &[u8]) -> IResult<&[u8], (u32, u32)> {
    tuple((le_u32, le_u32))(input)
}

/// Parses a regular expression payload: the pattern cstring followed by
/// the flags cstring.
pub fn regex(input: &[u8]) -> IResult<&[u8], (&[u8], &[u8])> {
    tuple((utils::cstring_bytes, utils::cstring_bytes))(input)
}

/// Parses a binary payload. Subtype 0x02 is the legacy form carrying an
/// inner length which must equal the outer length minus four; every other
/// subtype spans the outer length directly.
pub fn binary(input: &[u8]) -> IResult<&[u8], (u8, &[u8])> {
    let (input, outer_length) = utils::length(input)?;
    let (input, subtype) = le_u8(input)?;

    if subtype == 0x02 {
        let (input, _) = verify(utils::length, |&inner| inner + 4 == outer_length)(input)?;
        let (input, payload) = take(outer_length - 4)(input)?;
        Ok((input, (subtype, payload)))
    } else {
        let (input, payload) = take(outer_length)(input)?;
        Ok((input, (subtype, payload)))
    }
}

/// Parses a database pointer payload: the collection string and the 12
/// identifier bytes.
pub fn db_pointer(input: &[u8]) -> IResult<&[u8], (&[u8], [u8; 12])> {
    tuple((utils::string_bytes, object_id))(input)
}

/// Parses a code-with-scope payload, whose total length spans its own
/// prefix, the code string, and the scope frame. Yields the code bytes
/// and the scope's element region.
pub fn code_with_scope(input: &[u8]) -> IResult<&[u8], (&[u8], &[u8])> {
    let start_length = input.len();
    let (input, total_length) = utils::length(input)?;
    let (input, code) = utils::string_bytes(input)?;
    let (input, scope) = document::frame(input)?;

    if start_length - input.len() != total_length {
        return Err(nom::Err::Error(NomError::new(input, ErrorKind::Verify)));
    }
    Ok((input, (code, scope)))
}
