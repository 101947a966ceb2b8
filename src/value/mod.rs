//
// Copyright 2026 bson-codec Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! # The BSON value model.
//!
//! BSON documents are ordered maps whose values carry one of the
//! following kinds:
//!
//! 1. Double-precision floating point.
//! 2. UTF-8 string.
//! 3. Embedded document.
//! 4. Array.
//! 5. Binary data with a one-byte subtype.
//! 6. ObjectId.
//! 7. Boolean.
//! 8. UTC datetime at millisecond precision.
//! 9. Null.
//! 10. Regular expression.
//! 11. Database reference.
//! 12. JavaScript code with scope.
//! 13. Symbol.
//! 14. 32-bit and 64-bit integers.
//! 15. Internal timestamp.
//! 16. MinKey and MaxKey.
//!
//! # References
//!
//! 1. http://bsonspec.org/spec.html

use std::convert::TryFrom;
use std::time::{SystemTime, UNIX_EPOCH};

use ordered_float::OrderedFloat;

use crate::document::Document;
use crate::error::Error;
use crate::oid::ObjectId;

mod serde;

/// BSON element wire format.
///
/// Every element of a document consists of a one-byte type tag, a
/// NUL-terminated key, and a payload whose shape the tag determines.
///
/// # Notes
/// 1. All integers and doubles are little-endian on the wire; the
///    ObjectId fields are the one big-endian exception.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum ElementType {
    /// A 64-bit IEEE-754 floating point value.
    Double,
    /// A length-prefixed UTF-8 string.
    String,
    /// An embedded document.
    EmbeddedDocument,
    /// A document whose keys are the decimal indices "0", "1", ...
    Array,
    /// A length-prefixed blob with a one-byte subtype.
    Binary,
    /// The deprecated undefined value; decoded as Null.
    Undefined,
    /// A 12-byte object identifier.
    ObjectId,
    /// A one-byte boolean.
    Boolean,
    /// Milliseconds since the Unix epoch as a 64-bit integer.
    UtcDatetime,
    /// The null value.
    Null,
    /// A pattern cstring followed by a flags cstring.
    Regex,
    /// The deprecated database pointer; decoded as a database reference.
    DbPointer,
    /// The deprecated plain JavaScript code form; decoded as a string.
    JavaScriptCode,
    /// A length-prefixed symbol name.
    Symbol,
    /// JavaScript code with its scope document.
    JavaScriptCodeWithScope,
    /// A 32-bit integer.
    Int32,
    /// An internal timestamp: increment then seconds on the wire.
    Timestamp,
    /// A 64-bit integer.
    Int64,
    /// Greater than every other value.
    MaxKey,
    /// Less than every other value.
    MinKey,
}

impl ElementType {

    /// Returns the element type identified by a wire tag byte, if any.
    pub fn from_u8(tag: u8) -> Option<ElementType> {
        use self::ElementType::*;
        match tag {
            0x01 => Some(Double),
            0x02 => Some(String),
            0x03 => Some(EmbeddedDocument),
            0x04 => Some(Array),
            0x05 => Some(Binary),
            0x06 => Some(Undefined),
            0x07 => Some(ObjectId),
            0x08 => Some(Boolean),
            0x09 => Some(UtcDatetime),
            0x0A => Some(Null),
            0x0B => Some(Regex),
            0x0C => Some(DbPointer),
            0x0D => Some(JavaScriptCode),
            0x0E => Some(Symbol),
            0x0F => Some(JavaScriptCodeWithScope),
            0x10 => Some(Int32),
            0x11 => Some(Timestamp),
            0x12 => Some(Int64),
            0x7F => Some(MaxKey),
            0xFF => Some(MinKey),
            _ => None,
        }
    }

    /// Returns the wire tag byte for the element type.
    pub fn to_u8(self) -> u8 {
        use self::ElementType::*;
        match self {
            Double => 0x01,
            String => 0x02,
            EmbeddedDocument => 0x03,
            Array => 0x04,
            Binary => 0x05,
            Undefined => 0x06,
            ObjectId => 0x07,
            Boolean => 0x08,
            UtcDatetime => 0x09,
            Null => 0x0A,
            Regex => 0x0B,
            DbPointer => 0x0C,
            JavaScriptCode => 0x0D,
            Symbol => 0x0E,
            JavaScriptCodeWithScope => 0x0F,
            Int32 => 0x10,
            Timestamp => 0x11,
            Int64 => 0x12,
            MaxKey => 0x7F,
            MinKey => 0xFF,
        }
    }

}

/// The one-byte classifier carried inside a Binary element.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum BinarySubtype {
    /// Subtype 0x00, plain bytes.
    Generic,
    /// Subtype 0x01.
    Function,
    /// Subtype 0x02, the legacy form with an inner length prefix.
    BinaryOld,
    /// Subtype 0x03, the legacy UUID form.
    UuidOld,
    /// Subtype 0x04.
    Uuid,
    /// Subtype 0x05.
    Md5,
    /// Any other subtype byte, preserved verbatim.
    UserDefined(u8),
}

impl From<u8> for BinarySubtype {
    fn from(byte: u8) -> BinarySubtype {
        match byte {
            0x00 => BinarySubtype::Generic,
            0x01 => BinarySubtype::Function,
            0x02 => BinarySubtype::BinaryOld,
            0x03 => BinarySubtype::UuidOld,
            0x04 => BinarySubtype::Uuid,
            0x05 => BinarySubtype::Md5,
            byte => BinarySubtype::UserDefined(byte),
        }
    }
}

impl From<BinarySubtype> for u8 {
    fn from(subtype: BinarySubtype) -> u8 {
        match subtype {
            BinarySubtype::Generic => 0x00,
            BinarySubtype::Function => 0x01,
            BinarySubtype::BinaryOld => 0x02,
            BinarySubtype::UuidOld => 0x03,
            BinarySubtype::Uuid => 0x04,
            BinarySubtype::Md5 => 0x05,
            BinarySubtype::UserDefined(byte) => byte,
        }
    }
}

/// A blob of bytes with its subtype classifier.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct Binary {
    pub subtype: BinarySubtype,
    pub bytes: Vec<u8>,
}

bitflags::bitflags! {
    /// Option flags of a BSON regular expression.
    ///
    /// The numeric values mirror the wrapper type's integer constants; on
    /// the wire each set flag becomes one character of the flags cstring.
    #[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
    pub struct RegexOptions: u8 {
        const IGNORE_CASE      = 0b0000_0001;
        const LOCALE_DEPENDENT = 0b0000_0010;
        const MULTILINE        = 0b0000_0100;
        const DOTALL           = 0b0000_1000;
        const UNICODE          = 0b0001_0000;
        const EXTENDED         = 0b0010_0000;
    }
}

/// The wire character for each flag, in the lexicographic order the
/// encoder must emit.
const REGEX_FLAG_TABLE: [(RegexOptions, char); 6] = [
    (RegexOptions::IGNORE_CASE, 'i'),
    (RegexOptions::LOCALE_DEPENDENT, 'l'),
    (RegexOptions::MULTILINE, 'm'),
    (RegexOptions::DOTALL, 's'),
    (RegexOptions::UNICODE, 'u'),
    (RegexOptions::EXTENDED, 'x'),
];

impl RegexOptions {

    /// Renders the flags as the sorted, deduplicated cstring payload.
    pub fn to_wire(self) -> String {
        let mut flags = String::new();
        for &(option, character) in REGEX_FLAG_TABLE.iter() {
            if self.contains(option) {
                flags.push(character);
            }
        }
        flags
    }

    /// Parses a flags string; characters outside the flag alphabet are
    /// discarded.
    pub fn from_wire(flags: &str) -> RegexOptions {
        let mut options = RegexOptions::empty();
        for character in flags.chars() {
            for &(option, known) in REGEX_FLAG_TABLE.iter() {
                if character == known {
                    options |= option;
                }
            }
        }
        options
    }

}

/// A regular expression as stored in a document: an uncompiled pattern
/// with its option flags.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct Regex {
    pub pattern: String,
    pub options: RegexOptions,
}

/// An internal timestamp. On the wire the increment precedes the seconds.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct Timestamp {
    pub seconds: u32,
    pub increment: u32,
}

/// JavaScript code with its scope document. The scope may be empty.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Code {
    pub code: String,
    pub scope: Document,
}

/// A reference to a document in another collection.
///
/// Encodes as the embedded document `{"$ref": namespace, "$id": id}`,
/// with key checking suspended for the dollar-prefixed keys.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct DbRef {
    pub namespace: String,
    pub id: Box<Value>,
}

/// Represents any value a BSON document can hold.
///
/// The encoder dispatches on the variant; every wire tag is an explicit
/// arm in both directions. Host types enter the model through the `From`
/// conversions below.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Value {
    /// A 64-bit floating point value.
    ///
    /// The ordered-float wrapper gives the model total equality so whole
    /// documents can be compared structurally.
    Double(OrderedFloat<f64>),

    /// A UTF-8 string. Embedded NUL bytes are allowed in string values,
    /// though never in keys.
    String(String),

    /// An embedded document.
    Document(Document),

    /// An array, encoded as a document keyed "0", "1", ...
    Array(Vec<Value>),

    /// Binary data with a subtype classifier.
    Binary(Binary),

    /// A 12-byte object identifier.
    ObjectId(ObjectId),

    /// A boolean.
    Boolean(bool),

    /// Milliseconds since the Unix epoch.
    UtcDatetime(i64),

    /// The null value.
    Null,

    /// An uncompiled regular expression with option flags.
    Regex(Regex),

    /// A reference to a document in another collection.
    DbRef(DbRef),

    /// JavaScript code with its scope document.
    Code(Code),

    /// A symbol, distinct from a string on the wire.
    Symbol(String),

    /// A 32-bit integer.
    Int32(i32),

    /// An internal timestamp.
    Timestamp(Timestamp),

    /// A 64-bit integer.
    Int64(i64),

    /// Greater than every other value.
    MaxKey,

    /// Less than every other value.
    MinKey,
}

impl Value {

    /// Returns the wire element type the value encodes as.
    pub fn element_type(&self) -> ElementType {
        match self {
            Value::Double(_) => ElementType::Double,
            Value::String(_) => ElementType::String,
            Value::Document(_) => ElementType::EmbeddedDocument,
            Value::Array(_) => ElementType::Array,
            Value::Binary(_) => ElementType::Binary,
            Value::ObjectId(_) => ElementType::ObjectId,
            Value::Boolean(_) => ElementType::Boolean,
            Value::UtcDatetime(_) => ElementType::UtcDatetime,
            Value::Null => ElementType::Null,
            Value::Regex(_) => ElementType::Regex,
            Value::DbRef(_) => ElementType::EmbeddedDocument,
            Value::Code(_) => ElementType::JavaScriptCodeWithScope,
            Value::Symbol(_) => ElementType::Symbol,
            Value::Int32(_) => ElementType::Int32,
            Value::Timestamp(_) => ElementType::Timestamp,
            Value::Int64(_) => ElementType::Int64,
            Value::MaxKey => ElementType::MaxKey,
            Value::MinKey => ElementType::MinKey,
        }
    }

}

impl From<f64> for Value {
    fn from(value: f64) -> Value {
        Value::Double(OrderedFloat(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Value {
        Value::Boolean(value)
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Value {
        Value::Int32(i32::from(value))
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Value {
        Value::Int32(i32::from(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Value {
        Value::Int32(value)
    }
}

/// An integer becomes an Int32 exactly when it fits one, and an Int64
/// otherwise.
impl From<i64> for Value {
    fn from(value: i64) -> Value {
        if value >= i64::from(i32::min_value()) && value <= i64::from(i32::max_value()) {
            Value::Int32(value as i32)
        } else {
            Value::Int64(value)
        }
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Value {
        Value::Int32(i32::from(value))
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Value {
        Value::Int32(i32::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Value {
        Value::from(i64::from(value))
    }
}

/// Unsigned values beyond the signed 64-bit range have no BSON
/// representation and fail with the out-of-range error.
impl TryFrom<u64> for Value {
    type Error = Error;

    fn try_from(value: u64) -> Result<Value, Error> {
        if value > i64::max_value() as u64 {
            Err(Error::IntegerOutOfRange)
        } else {
            Ok(Value::from(value as i64))
        }
    }
}

impl TryFrom<i128> for Value {
    type Error = Error;

    fn try_from(value: i128) -> Result<Value, Error> {
        i64::try_from(value)
            .map(Value::from)
            .map_err(|_| Error::IntegerOutOfRange)
    }
}

impl TryFrom<u128> for Value {
    type Error = Error;

    fn try_from(value: u128) -> Result<Value, Error> {
        i64::try_from(value)
            .map(Value::from)
            .map_err(|_| Error::IntegerOutOfRange)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Value {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Value {
        Value::String(value)
    }
}

impl From<Document> for Value {
    fn from(value: Document) -> Value {
        Value::Document(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Value {
        Value::Array(values.into_iter().map(Into::into).collect())
    }
}

impl From<Binary> for Value {
    fn from(value: Binary) -> Value {
        Value::Binary(value)
    }
}

impl From<ObjectId> for Value {
    fn from(value: ObjectId) -> Value {
        Value::ObjectId(value)
    }
}

impl From<Regex> for Value {
    fn from(value: Regex) -> Value {
        Value::Regex(value)
    }
}

impl From<Timestamp> for Value {
    fn from(value: Timestamp) -> Value {
        Value::Timestamp(value)
    }
}

impl From<Code> for Value {
    fn from(value: Code) -> Value {
        Value::Code(value)
    }
}

impl From<DbRef> for Value {
    fn from(value: DbRef) -> Value {
        Value::DbRef(value)
    }
}

/// A wall-clock instant becomes a UTC datetime at millisecond precision,
/// rounded from the sub-millisecond part.
impl From<SystemTime> for Value {
    fn from(time: SystemTime) -> Value {
        let millis = match time.duration_since(UNIX_EPOCH) {
            Ok(elapsed) => (elapsed.as_secs_f64() * 1000.0).round() as i64,
            Err(before_epoch) => -((before_epoch.duration().as_secs_f64() * 1000.0).round() as i64),
        };
        Value::UtcDatetime(millis)
    }
}

/// A native host regular expression carries an implicit MULTILINE flag.
/// The locale-dependent and Unicode flags have no host equivalent and are
/// only reachable through the explicit `Regex` wrapper.
impl From<&regex::Regex> for Value {
    fn from(value: &regex::Regex) -> Value {
        Value::Regex(Regex {
            pattern: value.as_str().to_string(),
            options: RegexOptions::MULTILINE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_type_tags_round_trip() {
        let tags = &[
            0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A,
            0x0B, 0x0C, 0x0D, 0x0E, 0x0F, 0x10, 0x11, 0x12, 0x7F, 0xFF,
        ];
        for &tag in tags.iter() {
            let element_type = ElementType::from_u8(tag).unwrap();
            assert_eq!(element_type.to_u8(), tag);
        }
        assert_eq!(ElementType::from_u8(0x13), None);
        assert_eq!(ElementType::from_u8(0x00), None);
    }

    #[test]
    fn test_integer_size_selection() {
        assert_eq!(Value::from(2147483647i64), Value::Int32(2147483647));
        assert_eq!(Value::from(2147483648i64), Value::Int64(2147483648));
        assert_eq!(Value::from(-2147483648i64), Value::Int32(-2147483648));
        assert_eq!(Value::from(-2147483649i64), Value::Int64(-2147483649));
    }

    #[test]
    fn test_unsigned_out_of_range() {
        assert_eq!(Value::try_from(u64::max_value()), Err(Error::IntegerOutOfRange));
        assert_eq!(Value::try_from(1u64 << 63), Err(Error::IntegerOutOfRange));
        assert_eq!(Value::try_from(5u64), Ok(Value::Int32(5)));
        assert_eq!(Value::try_from(1i128 << 70), Err(Error::IntegerOutOfRange));
    }

    #[test]
    fn test_regex_options_wire_form() {
        let options = RegexOptions::EXTENDED | RegexOptions::IGNORE_CASE | RegexOptions::MULTILINE;
        assert_eq!(options.to_wire(), "imx");
        assert_eq!(RegexOptions::from_wire("xmi"), options);
        assert_eq!(RegexOptions::from_wire("miqmx"), options);
        assert_eq!(RegexOptions::all().to_wire(), "ilmsux");
    }

    #[test]
    fn test_binary_subtype_bytes() {
        assert_eq!(BinarySubtype::from(0x02), BinarySubtype::BinaryOld);
        assert_eq!(u8::from(BinarySubtype::UserDefined(0x80)), 0x80);
        assert_eq!(BinarySubtype::from(0x80), BinarySubtype::UserDefined(0x80));
    }

    #[test]
    fn test_native_regex_implicit_multiline() {
        let native = regex::Regex::new("^ab.*c$").unwrap();
        match Value::from(&native) {
            Value::Regex(regex) => {
                assert_eq!(regex.pattern, "^ab.*c$");
                assert_eq!(regex.options, RegexOptions::MULTILINE);
            }
            other => panic!("expected a regex value, got {:?}", other),
        }
    }
}
