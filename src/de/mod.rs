//
// Copyright 2026 bson-codec Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

mod parser;

use std::str;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::oid::ObjectId;
use crate::value::{
    Binary,
    BinarySubtype,
    Code,
    DbRef,
    ElementType,
    Regex,
    RegexOptions,
    Timestamp,
    Value,
};

/// Options controlling deserialization.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct DeserializeOptions {
    /// Pass decoded regular expressions through the host engine. Patterns
    /// the engine accepts have their flags narrowed to the host-supported
    /// set; patterns it rejects keep their raw pattern/flags form so any
    /// stored document still round-trips. Defaults to true.
    pub compile_regex: bool,
}

impl Default for DeserializeOptions {
    fn default() -> DeserializeOptions {
        DeserializeOptions {
            compile_regex: true,
        }
    }
}

/// Deserializes one BSON document from bytes.
///
/// The input must hold exactly one frame: a well-formed document followed
/// by nothing. Every read is bounds-checked against the frame length the
/// input declares, and the input is never mutated.
pub fn deserialize(input: &[u8], options: &DeserializeOptions) -> Result<Document> {
    let (trailing, elements) =
        parser::document::frame(input).map_err(|_| Error::TruncatedFrame)?;
    if !trailing.is_empty() {
        return Err(Error::TrailingBytes);
    }
    read_elements(elements, options)
}

/// Materializes the elements of a frame into a document, preserving
/// encounter order.
fn read_elements(mut input: &[u8], options: &DeserializeOptions) -> Result<Document> {
    let mut document = Document::new();
    while !input.is_empty() {
        let (rest, (tag, key_bytes)) =
            parser::document::element_header(input).map_err(|_| Error::TruncatedFrame)?;
        let key = str::from_utf8(key_bytes).map_err(|_| Error::InvalidStringEncoding)?;
        let (rest, value) = read_value(rest, tag, options)?;
        document.insert(key, value);
        input = rest;
    }
    Ok(document)
}

/// Materializes the elements of an array frame. The decimal-index keys
/// are skipped; they appear on the wire in order.
fn read_array_elements(mut input: &[u8], options: &DeserializeOptions) -> Result<Vec<Value>> {
    let mut items = Vec::new();
    while !input.is_empty() {
        let (rest, (tag, _index)) =
            parser::document::element_header(input).map_err(|_| Error::TruncatedFrame)?;
        let (rest, value) = read_value(rest, tag, options)?;
        items.push(value);
        input = rest;
    }
    Ok(items)
}

/// Reads one value payload, dispatching on the element type tag.
fn read_value<'a>(
    input: &'a [u8],
    tag: u8,
    options: &DeserializeOptions,
) -> Result<(&'a [u8], Value)> {
    let element_type = ElementType::from_u8(tag).ok_or(Error::UnknownElementType(tag))?;

    match element_type {
        ElementType::Double => {
            let (rest, value) =
                parser::element::double(input).map_err(|_| Error::TruncatedFrame)?;
            Ok((rest, Value::Double(value.into())))
        }
        ElementType::String => {
            let (rest, bytes) =
                parser::utils::string_bytes(input).map_err(|_| Error::TruncatedFrame)?;
            Ok((rest, Value::String(read_string(bytes)?)))
        }
        ElementType::EmbeddedDocument => {
            let (rest, elements) =
                parser::document::frame(input).map_err(|_| Error::TruncatedFrame)?;
            let document = read_elements(elements, options)?;
            Ok((rest, document_value(document)))
        }
        ElementType::Array => {
            let (rest, elements) =
                parser::document::frame(input).map_err(|_| Error::TruncatedFrame)?;
            let items = read_array_elements(elements, options)?;
            Ok((rest, Value::Array(items)))
        }
        ElementType::Binary => {
            let (rest, (subtype, payload)) =
                parser::element::binary(input).map_err(|_| Error::TruncatedFrame)?;
            Ok((
                rest,
                Value::Binary(Binary {
                    subtype: BinarySubtype::from(subtype),
                    bytes: payload.to_vec(),
                }),
            ))
        }
        ElementType::Undefined => Ok((input, Value::Null)),
        ElementType::ObjectId => {
            let (rest, bytes) =
                parser::element::object_id(input).map_err(|_| Error::TruncatedFrame)?;
            Ok((rest, Value::ObjectId(ObjectId::from(bytes))))
        }
        ElementType::Boolean => {
            let (rest, value) =
                parser::element::boolean(input).map_err(|_| Error::TruncatedFrame)?;
            Ok((rest, Value::Boolean(value)))
        }
        ElementType::UtcDatetime => {
            let (rest, millis) =
                parser::element::utc_datetime(input).map_err(|_| Error::TruncatedFrame)?;
            Ok((rest, Value::UtcDatetime(millis)))
        }
        ElementType::Null => Ok((input, Value::Null)),
        ElementType::Regex => {
            let (rest, (pattern_bytes, flags_bytes)) =
                parser::element::regex(input).map_err(|_| Error::TruncatedFrame)?;
            let pattern =
                str::from_utf8(pattern_bytes).map_err(|_| Error::InvalidStringEncoding)?;
            let flags =
                str::from_utf8(flags_bytes).map_err(|_| Error::InvalidStringEncoding)?;
            let mut regex = Regex {
                pattern: pattern.to_string(),
                options: RegexOptions::from_wire(flags),
            };
            if options.compile_regex {
                regex = compile_regex(regex);
            }
            Ok((rest, Value::Regex(regex)))
        }
        ElementType::DbPointer => {
            let (rest, (collection_bytes, id)) =
                parser::element::db_pointer(input).map_err(|_| Error::TruncatedFrame)?;
            let namespace = read_string(collection_bytes)?;
            Ok((
                rest,
                Value::DbRef(DbRef {
                    namespace,
                    id: Box::new(Value::ObjectId(ObjectId::from(id))),
                }),
            ))
        }
        ElementType::JavaScriptCode => {
            let (rest, bytes) =
                parser::utils::string_bytes(input).map_err(|_| Error::TruncatedFrame)?;
            Ok((rest, Value::String(read_string(bytes)?)))
        }
        ElementType::Symbol => {
            let (rest, bytes) =
                parser::utils::string_bytes(input).map_err(|_| Error::TruncatedFrame)?;
            Ok((rest, Value::Symbol(read_string(bytes)?)))
        }
        ElementType::JavaScriptCodeWithScope => {
            let (rest, (code_bytes, scope_elements)) =
                parser::element::code_with_scope(input).map_err(|_| Error::TruncatedFrame)?;
            let code = read_string(code_bytes)?;
            let scope = read_elements(scope_elements, options)?;
            Ok((rest, Value::Code(Code { code, scope })))
        }
        ElementType::Int32 => {
            let (rest, value) =
                parser::element::int32(input).map_err(|_| Error::TruncatedFrame)?;
            Ok((rest, Value::Int32(value)))
        }
        ElementType::Timestamp => {
            let (rest, (increment, seconds)) =
                parser::element::timestamp(input).map_err(|_| Error::TruncatedFrame)?;
            Ok((rest, Value::Timestamp(Timestamp { seconds, increment })))
        }
        ElementType::Int64 => {
            let (rest, value) =
                parser::element::int64(input).map_err(|_| Error::TruncatedFrame)?;
            Ok((rest, Value::Int64(value)))
        }
        ElementType::MaxKey => Ok((input, Value::MaxKey)),
        ElementType::MinKey => Ok((input, Value::MinKey)),
    }
}

fn read_string(bytes: &[u8]) -> Result<String> {
    str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| Error::InvalidStringEncoding)
}

/// An embedded document whose first element is `$ref` holding a string,
/// with an `$id` present, is a database reference. Fields beyond the pair
/// are dropped. Any other shape stays a plain document.
fn document_value(document: Document) -> Value {
    let is_db_ref = match document.iter().next() {
        Some((key, Value::String(_))) => key == "$ref" && document.contains_key("$id"),
        _ => false,
    };
    if !is_db_ref {
        return Value::Document(document);
    }

    let mut namespace = String::new();
    let mut id = Value::Null;
    for (key, value) in document {
        match (key.as_str(), value) {
            ("$ref", Value::String(collection)) => namespace = collection,
            ("$id", target) => id = target,
            _ => {}
        }
    }
    Value::DbRef(DbRef {
        namespace,
        id: Box::new(id),
    })
}

/// Compiles a decoded pattern with the host engine. On success the flags
/// narrow to the host-supported set; on failure the raw wrapper survives
/// untouched.
fn compile_regex(raw: Regex) -> Regex {
    let host_options = raw.options
        & (RegexOptions::IGNORE_CASE
            | RegexOptions::MULTILINE
            | RegexOptions::DOTALL
            | RegexOptions::EXTENDED);

    let mut inline = String::new();
    for (option, character) in [
        (RegexOptions::IGNORE_CASE, 'i'),
        (RegexOptions::MULTILINE, 'm'),
        (RegexOptions::DOTALL, 's'),
        (RegexOptions::EXTENDED, 'x'),
    ]
    .iter()
    {
        if host_options.contains(*option) {
            inline.push(*character);
        }
    }

    let candidate = if inline.is_empty() {
        raw.pattern.clone()
    } else {
        format!("(?{}){}", inline, raw.pattern)
    };

    match regex::Regex::new(&candidate) {
        Ok(_) => Regex {
            pattern: raw.pattern,
            options: host_options,
        },
        Err(_) => raw,
    }
}
