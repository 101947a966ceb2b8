//
// Copyright 2026 bson-codec Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

mod buffer;
mod utf8;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::value::{Binary, BinarySubtype, Code, DbRef, ElementType, Regex, Value};

use self::buffer::Buffer;
use self::utf8::{validate_utf8, Utf8Validation};

/// Serializes a document into BSON bytes.
///
/// With `check_keys` set, keys beginning with `$` or containing `.` are
/// rejected; the internal keys of database references are exempt. With
/// `move_id` set, the `_id` element is written first regardless of its
/// position in the document and suppressed everywhere else. The finished
/// frame must not exceed `max_size` bytes.
///
/// Any error aborts the whole call; no partial output is returned.
pub fn serialize(
    document: &Document,
    check_keys: bool,
    move_id: bool,
    max_size: i32,
) -> Result<Vec<u8>> {
    let mut buffer = Buffer::new();
    buffer.set_max_size(max_size);
    write_document(&mut buffer, document, check_keys, move_id)?;
    Ok(buffer.take())
}

/// Writes one document frame: a reserved length slot, the elements, the
/// terminating NUL, and finally the patched length.
fn write_document(
    buffer: &mut Buffer,
    document: &Document,
    check_keys: bool,
    move_id: bool,
) -> Result<()> {
    let start = buffer.tell();
    let length_slot = buffer.reserve(4)?;

    if move_id {
        if let Some(id) = document.get("_id") {
            write_element(buffer, "_id", id, check_keys)?;
        }
        for (key, value) in document {
            if key != "_id" {
                write_element(buffer, key, value, check_keys)?;
            }
        }
    } else {
        for (key, value) in document {
            write_element(buffer, key, value, check_keys)?;
        }
    }

    buffer.push(0)?;
    let length = buffer.tell() - start;
    if length as i64 > i64::from(buffer.max_size()) {
        return Err(Error::InvalidDocument(format!(
            "Document too large: This BSON document is limited to {} bytes.",
            buffer.max_size()
        )));
    }
    buffer.patch(length_slot, &(length as i32).to_le_bytes())
}

/// Validates bytes bound for a string position and appends them.
fn write_utf8(buffer: &mut Buffer, bytes: &[u8], allow_embedded_nul: bool) -> Result<()> {
    match validate_utf8(bytes, allow_embedded_nul) {
        Utf8Validation::HasNull => Err(Error::InvalidDocument(
            "Key names / regex patterns must not contain the NULL byte".to_string(),
        )),
        Utf8Validation::InvalidUtf8 => Err(Error::InvalidStringEncoding),
        Utf8Validation::Valid => buffer.append(bytes),
    }
}

/// Writes an element header: the type tag and the key cstring.
fn write_key(buffer: &mut Buffer, element_type: ElementType, key: &str) -> Result<()> {
    buffer.push(element_type.to_u8())?;
    write_utf8(buffer, key.as_bytes(), false)?;
    buffer.push(0)
}

/// Writes a length-prefixed string: int32 length counting the trailing
/// NUL, the UTF-8 bytes, the NUL. Embedded NULs are allowed here.
fn write_string(buffer: &mut Buffer, value: &str) -> Result<()> {
    let length = value.len() as i32 + 1;
    buffer.append(&length.to_le_bytes())?;
    write_utf8(buffer, value.as_bytes(), true)?;
    buffer.push(0)
}

fn check_key(key: &str) -> Result<()> {
    if key.starts_with('$') {
        return Err(Error::InvalidKeyName(format!(
            "key {} must not start with '$'",
            key
        )));
    }
    if key.contains('.') {
        return Err(Error::InvalidKeyName(format!(
            "key {} must not contain '.'",
            key
        )));
    }
    Ok(())
}

fn write_element(buffer: &mut Buffer, key: &str, value: &Value, check_keys: bool) -> Result<()> {
    if check_keys {
        check_key(key)?;
    }
    write_key(buffer, value.element_type(), key)?;

    match value {
        Value::Double(double) => buffer.append(&double.into_inner().to_le_bytes()),
        Value::String(string) => write_string(buffer, string),
        Value::Document(document) => write_document(buffer, document, check_keys, false),
        Value::Array(items) => write_array(buffer, items, check_keys),
        Value::Binary(binary) => write_binary(buffer, binary),
        Value::ObjectId(id) => buffer.append(&id.bytes()),
        Value::Boolean(flag) => buffer.push(*flag as u8),
        Value::UtcDatetime(millis) => buffer.append(&millis.to_le_bytes()),
        Value::Null => Ok(()),
        Value::Regex(regex) => write_regex(buffer, regex),
        Value::DbRef(db_ref) => write_db_ref(buffer, db_ref),
        Value::Code(code) => write_code_with_scope(buffer, code),
        Value::Symbol(name) => write_string(buffer, name),
        Value::Int32(int) => buffer.append(&int.to_le_bytes()),
        Value::Timestamp(timestamp) => {
            buffer.append(&timestamp.increment.to_le_bytes())?;
            buffer.append(&timestamp.seconds.to_le_bytes())
        }
        Value::Int64(int) => buffer.append(&int.to_le_bytes()),
        Value::MaxKey => Ok(()),
        Value::MinKey => Ok(()),
    }
}

/// An array is a document keyed by the decimal indices from zero.
fn write_array(buffer: &mut Buffer, items: &[Value], check_keys: bool) -> Result<()> {
    let start = buffer.tell();
    let length_slot = buffer.reserve(4)?;

    for (index, item) in items.iter().enumerate() {
        write_element(buffer, &index.to_string(), item, check_keys)?;
    }

    buffer.push(0)?;
    let length = buffer.tell() - start;
    buffer.patch(length_slot, &(length as i32).to_le_bytes())
}

/// Subtype 0x02 is the legacy form whose payload carries its own inner
/// length; every other subtype uses the single outer length.
fn write_binary(buffer: &mut Buffer, binary: &Binary) -> Result<()> {
    let length = binary.bytes.len() as i32;
    if binary.subtype == BinarySubtype::BinaryOld {
        buffer.append(&(length + 4).to_le_bytes())?;
        buffer.push(binary.subtype.into())?;
        buffer.append(&length.to_le_bytes())?;
    } else {
        buffer.append(&length.to_le_bytes())?;
        buffer.push(binary.subtype.into())?;
    }
    buffer.append(&binary.bytes)
}

/// Pattern cstring, then the flags as a sorted deduplicated cstring.
fn write_regex(buffer: &mut Buffer, regex: &Regex) -> Result<()> {
    write_utf8(buffer, regex.pattern.as_bytes(), false)?;
    buffer.push(0)?;
    buffer.append(regex.options.to_wire().as_bytes())?;
    buffer.push(0)
}

/// A database reference is an embedded document whose dollar-prefixed
/// keys are always exempt from key checking.
fn write_db_ref(buffer: &mut Buffer, db_ref: &DbRef) -> Result<()> {
    let start = buffer.tell();
    let length_slot = buffer.reserve(4)?;

    write_key(buffer, ElementType::String, "$ref")?;
    write_string(buffer, &db_ref.namespace)?;
    write_element(buffer, "$id", &db_ref.id, false)?;

    buffer.push(0)?;
    let length = buffer.tell() - start;
    buffer.patch(length_slot, &(length as i32).to_le_bytes())
}

/// The total length spans its own prefix, the code string, and the scope
/// document. The scope is written with key checking off.
fn write_code_with_scope(buffer: &mut Buffer, code: &Code) -> Result<()> {
    let start = buffer.tell();
    let length_slot = buffer.reserve(4)?;

    write_string(buffer, &code.code)?;
    write_document(buffer, &code.scope, false, false)?;

    let total = buffer.tell() - start;
    buffer.patch(length_slot, &(total as i32).to_le_bytes())
}
