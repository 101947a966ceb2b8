//
// Copyright 2026 bson-codec Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

use std;
use std::fmt::{self, Display};

pub type Result<T> = std::result::Result<T, Error>;

/// BSON serialization and deserialization error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A key rejected by key checking: it begins with `$` or contains `.`.
    /// Carries the full diagnostic message.
    InvalidKeyName(String),
    /// A string payload whose bytes are not well-formed UTF-8.
    InvalidStringEncoding,
    /// The document as a whole cannot be encoded: a NUL byte in a key or
    /// regular expression component, or a frame longer than the size cap.
    InvalidDocument(String),
    /// A string that is not exactly 24 hexadecimal digits.
    InvalidObjectId(String),
    /// An element type tag this library does not recognize.
    UnknownElementType(u8),
    /// An integer that cannot be represented in 8 bytes.
    IntegerOutOfRange,
    /// The input ends before the length declared by its frame.
    TruncatedFrame,
    /// The input continues past the end of the declared frame.
    TrailingBytes,
    /// The output buffer could not grow to hold the document.
    OutOfMemory,
    /// A length slot was patched at a position outside the written region.
    InvalidWritePosition,
}

impl Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidKeyName(msg) =>
                formatter.write_str(msg),
            Error::InvalidStringEncoding =>
                formatter.write_str("String not valid UTF-8"),
            Error::InvalidDocument(msg) =>
                formatter.write_str(msg),
            Error::InvalidObjectId(msg) =>
                formatter.write_str(msg),
            Error::UnknownElementType(tag) =>
                write!(formatter, "unknown BSON element type 0x{:02x}", tag),
            Error::IntegerOutOfRange =>
                formatter.write_str("BSON can only represent integers up to 8 bytes wide"),
            Error::TruncatedFrame =>
                formatter.write_str("document frame ends before its declared length"),
            Error::TrailingBytes =>
                formatter.write_str("input continues past the end of the document frame"),
            Error::OutOfMemory =>
                formatter.write_str("failed to allocate memory in the output buffer"),
            Error::InvalidWritePosition =>
                formatter.write_str("write at a position outside the buffer"),
        }
    }
}

impl std::error::Error for Error {}
