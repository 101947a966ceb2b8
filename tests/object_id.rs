
use bson_codec::ObjectId;

#[test]
fn test_from_string_to_hex_identity() {
    let id = ObjectId::from_string("507f1f77bcf86cd799439011").unwrap();
    assert_eq!(id.to_hex(), "507f1f77bcf86cd799439011");
    assert_eq!(id.to_string(), "507f1f77bcf86cd799439011");
}

#[test]
fn test_to_hex_lowercases_legal_uppercase_input() {
    let id = ObjectId::from_string("507F1F77BCF86CD799439011").unwrap();
    assert_eq!(id.to_hex(), "507f1f77bcf86cd799439011");
    assert_eq!(ObjectId::from_string(&id.to_hex()).unwrap(), id);
}

#[test]
fn test_generated_ids_share_machine_and_process_fields() {
    let first = ObjectId::generate(Some(1234)).bytes();
    let second = ObjectId::generate(Some(1234)).bytes();
    assert_eq!(first[0..9], second[0..9]);
    assert_ne!(first[9..12], second[9..12]);
}

#[test]
fn test_timestamp_field_is_big_endian_seconds() {
    let id = ObjectId::generate(Some(0xDEAD_BEEF));
    assert_eq!(id.timestamp(), 0xDEAD_BEEF);
    assert_eq!(&id.bytes()[0..4], &[0xDE, 0xAD, 0xBE, 0xEF]);
}
