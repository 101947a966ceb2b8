
use bson_codec::{deserialize, doc, serialize, DeserializeOptions, Error, Value};

fn serialize_plain(document: &bson_codec::Document) -> Vec<u8> {
    serialize(document, false, false, bson_codec::max_bson_size()).unwrap()
}

#[test]
fn test_hello_world_canonical_bytes() {
    assert_eq!(
        serialize_plain(&doc! { "hello" => "world" }),
        vec![
            0x16, 0x00, 0x00, 0x00,
            0x02, 0x68, 0x65, 0x6C, 0x6C, 0x6F, 0x00,
            0x06, 0x00, 0x00, 0x00, 0x77, 0x6F, 0x72, 0x6C, 0x64, 0x00,
            0x00,
        ]
    );
}

#[test]
fn test_empty_document_canonical_bytes() {
    assert_eq!(serialize_plain(&doc! {}), vec![0x05, 0x00, 0x00, 0x00, 0x00]);
}

#[test]
fn test_frame_length_self_consistency() {
    let documents = vec![
        doc! {},
        doc! { "a" => 1 },
        doc! { "hello" => "world", "pi" => 3.14159 },
        doc! { "nested" => doc! { "deep" => vec![Value::from(1), Value::Null] } },
    ];
    for document in documents {
        let bytes = serialize_plain(&document);
        let declared = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        assert_eq!(declared as usize, bytes.len());
    }
}

#[test]
fn test_integer_tags_on_the_wire() {
    let int32_form = serialize_plain(&doc! { "n" => 2147483647i64 });
    assert_eq!(int32_form[4], 0x10);

    let int64_form = serialize_plain(&doc! { "n" => 2147483648i64 });
    assert_eq!(int64_form[4], 0x12);
}

#[test]
fn test_array_keys_are_decimal_indices() {
    let bytes = serialize_plain(&doc! {
        "a" => vec![Value::from(true), Value::from(false)],
    });
    // Embedded array document: tag, "0", NUL, payload, tag, "1", NUL, ...
    assert!(bytes.windows(3).any(|window| window == [0x08, b'0', 0x00]));
    assert!(bytes.windows(3).any(|window| window == [0x08, b'1', 0x00]));
}

#[test]
fn test_deserialize_rejects_garbage_between_documents() {
    let mut bytes = serialize_plain(&doc! { "a" => 1 });
    bytes.extend_from_slice(&[0xDE, 0xAD]);
    assert_eq!(
        deserialize(&bytes, &DeserializeOptions::default()),
        Err(Error::TrailingBytes)
    );
}

#[test]
fn test_deserialize_rejects_truncation_everywhere() {
    let bytes = serialize_plain(&doc! { "key" => "value", "other" => 12i64 });
    for cut in 1..bytes.len() {
        assert!(
            deserialize(&bytes[..cut], &DeserializeOptions::default()).is_err(),
            "a prefix of {} bytes decoded successfully",
            cut
        );
    }
}

#[test]
fn test_deserialize_db_pointer() {
    // {"p": dbpointer("things", 0x01..0x0c)}
    let mut input = vec![
        0x1F, 0x00, 0x00, 0x00,
        0x0C, b'p', 0x00,
        0x07, 0x00, 0x00, 0x00, b't', b'h', b'i', b'n', b'g', b's', 0x00,
    ];
    input.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
    input.push(0x00);
    assert_eq!(input.len(), 0x1F);

    let decoded = deserialize(&input, &DeserializeOptions::default()).unwrap();
    match decoded.get("p") {
        Some(Value::DbRef(reference)) => {
            assert_eq!(reference.namespace, "things");
            match &*reference.id {
                Value::ObjectId(id) => {
                    assert_eq!(id.bytes(), [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12])
                }
                other => panic!("expected an ObjectId, got {:?}", other),
            }
        }
        other => panic!("expected a DbRef, got {:?}", other),
    }
}

#[test]
fn test_deserialize_rejects_invalid_utf8_string() {
    // {"s": <0xFF 0xFE>}
    let input = &[
        0x0F, 0x00, 0x00, 0x00,
        0x02, b's', 0x00,
        0x03, 0x00, 0x00, 0x00, 0xFF, 0xFE, 0x00,
        0x00,
    ];
    assert_eq!(
        deserialize(input, &DeserializeOptions::default()),
        Err(Error::InvalidStringEncoding)
    );
}
