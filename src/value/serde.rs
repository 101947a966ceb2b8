//
// Copyright 2026 bson-codec Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! Serde integration for the value model.
//!
//! Plain kinds map straight onto the serde data model. The kinds serde
//! has no analog for travel as single-entry maps with a dollar-prefixed
//! magic key, the extended-JSON convention: `{"$oid": hex}`,
//! `{"$date": millis}`, and so on. Deserialization recognizes the same
//! shapes and otherwise builds plain documents in encounter order.

use std::fmt;

use serde::de;
use serde::ser::{self, SerializeMap};

use crate::document::Document;
use crate::oid::ObjectId;
use crate::value::{Binary, BinarySubtype, Code, DbRef, Regex, RegexOptions, Timestamp, Value};

fn magic_entry<S, T>(serializer: S, key: &'static str, value: &T) -> Result<S::Ok, S::Error>
where
    S: ser::Serializer,
    T: ser::Serialize,
{
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry(key, value)?;
    map.end()
}

impl ser::Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl ser::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        match self {
            Value::Double(double) => serializer.serialize_f64(double.into_inner()),
            Value::String(string) => serializer.serialize_str(string),
            Value::Document(document) => document.serialize(serializer),
            Value::Array(items) => serializer.collect_seq(items),
            Value::Binary(binary) => magic_entry(
                serializer,
                "$binary",
                &(u8::from(binary.subtype), &binary.bytes),
            ),
            Value::ObjectId(id) => magic_entry(serializer, "$oid", &id.to_hex()),
            Value::Boolean(flag) => serializer.serialize_bool(*flag),
            Value::UtcDatetime(millis) => magic_entry(serializer, "$date", millis),
            Value::Null => serializer.serialize_unit(),
            Value::Regex(regex) => magic_entry(
                serializer,
                "$regex",
                &(&regex.pattern, regex.options.to_wire()),
            ),
            Value::DbRef(db_ref) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("$ref", &db_ref.namespace)?;
                map.serialize_entry("$id", &*db_ref.id)?;
                map.end()
            }
            Value::Code(code) => {
                magic_entry(serializer, "$code", &(&code.code, &code.scope))
            }
            Value::Symbol(name) => magic_entry(serializer, "$symbol", name),
            Value::Int32(int) => serializer.serialize_i32(*int),
            Value::Timestamp(timestamp) => magic_entry(
                serializer,
                "$timestamp",
                &(timestamp.seconds, timestamp.increment),
            ),
            Value::Int64(int) => serializer.serialize_i64(*int),
            Value::MaxKey => magic_entry(serializer, "$maxKey", &1i32),
            Value::MinKey => magic_entry(serializer, "$minKey", &1i32),
        }
    }
}

/// Deserialization of any serde input into the value model. Plain inputs
/// become the matching variants; maps whose first key is one of the magic
/// keys become the corresponding extended kind.
impl<'de> de::Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Value, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct ValueVisitor;

        impl<'de> de::Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid BSON value")
            }

            #[inline]
            fn visit_bool<E>(self, value: bool) -> Result<Value, E> {
                Ok(Value::Boolean(value))
            }

            #[inline]
            fn visit_i64<E>(self, value: i64) -> Result<Value, E> {
                Ok(Value::from(value))
            }

            #[inline]
            fn visit_u64<E>(self, value: u64) -> Result<Value, E>
            where
                E: de::Error,
            {
                if value <= i64::max_value() as u64 {
                    Ok(Value::from(value as i64))
                } else {
                    Err(de::Error::custom("u64 value was too large"))
                }
            }

            #[inline]
            fn visit_f64<E>(self, value: f64) -> Result<Value, E> {
                Ok(Value::from(value))
            }

            #[inline]
            fn visit_str<E>(self, value: &str) -> Result<Value, E> {
                Ok(Value::String(value.into()))
            }

            #[inline]
            fn visit_string<E>(self, value: String) -> Result<Value, E> {
                Ok(Value::String(value))
            }

            #[inline]
            fn visit_bytes<E>(self, value: &[u8]) -> Result<Value, E> {
                Ok(Value::Binary(Binary {
                    subtype: BinarySubtype::Generic,
                    bytes: value.into(),
                }))
            }

            #[inline]
            fn visit_byte_buf<E>(self, value: Vec<u8>) -> Result<Value, E> {
                Ok(Value::Binary(Binary {
                    subtype: BinarySubtype::Generic,
                    bytes: value,
                }))
            }

            #[inline]
            fn visit_unit<E>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            #[inline]
            fn visit_none<E>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
            where
                D: de::Deserializer<'de>,
            {
                de::Deserialize::deserialize(deserializer)
            }

            fn visit_seq<V>(self, mut visitor: V) -> Result<Value, V::Error>
            where
                V: de::SeqAccess<'de>,
            {
                let mut items = Vec::new();
                while let Some(item) = visitor.next_element()? {
                    items.push(item);
                }
                Ok(Value::Array(items))
            }

            fn visit_map<V>(self, mut visitor: V) -> Result<Value, V::Error>
            where
                V: de::MapAccess<'de>,
            {
                let first_key = match visitor.next_key::<String>()? {
                    Some(key) => key,
                    None => return Ok(Value::Document(Document::new())),
                };

                match first_key.as_str() {
                    "$oid" => {
                        let hex_form: String = visitor.next_value()?;
                        let id = ObjectId::from_string(&hex_form).map_err(de::Error::custom)?;
                        Ok(Value::ObjectId(id))
                    }
                    "$date" => {
                        let millis: i64 = visitor.next_value()?;
                        Ok(Value::UtcDatetime(millis))
                    }
                    "$symbol" => {
                        let name: String = visitor.next_value()?;
                        Ok(Value::Symbol(name))
                    }
                    "$timestamp" => {
                        let (seconds, increment): (u32, u32) = visitor.next_value()?;
                        Ok(Value::Timestamp(Timestamp { seconds, increment }))
                    }
                    "$regex" => {
                        let (pattern, flags): (String, String) = visitor.next_value()?;
                        Ok(Value::Regex(Regex {
                            pattern,
                            options: RegexOptions::from_wire(&flags),
                        }))
                    }
                    "$binary" => {
                        let (subtype, bytes): (u8, Vec<u8>) = visitor.next_value()?;
                        Ok(Value::Binary(Binary {
                            subtype: BinarySubtype::from(subtype),
                            bytes,
                        }))
                    }
                    "$code" => {
                        let (code, scope): (String, Document) = visitor.next_value()?;
                        Ok(Value::Code(Code { code, scope }))
                    }
                    "$minKey" => {
                        let _: i32 = visitor.next_value()?;
                        Ok(Value::MinKey)
                    }
                    "$maxKey" => {
                        let _: i32 = visitor.next_value()?;
                        Ok(Value::MaxKey)
                    }
                    "$ref" => {
                        let namespace: String = visitor.next_value()?;
                        match visitor.next_key::<String>()? {
                            Some(ref key) if key == "$id" => {
                                let id: Value = visitor.next_value()?;
                                Ok(Value::DbRef(DbRef {
                                    namespace,
                                    id: Box::new(id),
                                }))
                            }
                            _ => Err(de::Error::custom("expected an $id after $ref")),
                        }
                    }
                    _ => {
                        let mut document = Document::new();
                        let value: Value = visitor.next_value()?;
                        document.insert(first_key, value);
                        while let Some((key, value)) = visitor.next_entry::<String, Value>()? {
                            document.insert(key, value);
                        }
                        Ok(Value::Document(document))
                    }
                }
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

/// A document deserializes as a plain map; magic keys are only
/// interpreted at the value level.
impl<'de> de::Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> Result<Document, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct DocumentVisitor;

        impl<'de> de::Visitor<'de> for DocumentVisitor {
            type Value = Document;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a BSON document")
            }

            fn visit_map<V>(self, mut visitor: V) -> Result<Document, V::Error>
            where
                V: de::MapAccess<'de>,
            {
                let mut document = Document::new();
                while let Some((key, value)) = visitor.next_entry::<String, Value>()? {
                    document.insert(key, value);
                }
                Ok(document)
            }
        }

        deserializer.deserialize_map(DocumentVisitor)
    }
}
