use bytes::Bytes;

use super::*;

#[test]
fn test_decode_integer() {
    assert_eq!(decode(b"i42e").unwrap(), Value::Integer(42));
    assert_eq!(decode(b"i-42e").unwrap(), Value::Integer(-42));
    assert_eq!(decode(b"i0e").unwrap(), Value::Integer(0));
}

#[test]
fn test_decode_integer_invalid() {
    assert!(matches!(decode(b"i-0e"), Err(BencodeError::InvalidInteger(_))));
    assert!(matches!(decode(b"i03e"), Err(BencodeError::InvalidInteger(_))));
    assert!(matches!(decode(b"ie"), Err(BencodeError::InvalidInteger(_))));
    assert!(matches!(decode(b"i+5e"), Err(BencodeError::InvalidInteger(_))));
    assert!(matches!(decode(b"i42"), Err(BencodeError::UnexpectedEof(_))));
}

#[test]
fn test_decode_binary_bytes() {
    let value = decode(b"6:\x7f\x00\x00\x01\x1a\xe1").unwrap();
    assert_eq!(
        value.as_bytes().map(|b| b.as_ref()),
        Some(&[0x7f, 0, 0, 1, 0x1a, 0xe1][..])
    );
    assert_eq!(value.as_str(), None);
    assert_eq!(decode(b"0:").unwrap(), Value::Bytes(Bytes::new()));
}

#[test]
fn test_decode_truncated_bytes() {
    assert_eq!(decode(b"5:spam"), Err(BencodeError::UnexpectedEof(6)));
    assert!(matches!(
        decode(b"x:spam"),
        Err(BencodeError::UnexpectedChar('x', 0))
    ));
}

#[test]
fn test_decode_dht_error_message() {
    let value = decode(b"d1:eli201e23:A Generic Error Ocurrede1:t2:aa1:y1:ee").unwrap();
    let error = value.get(b"e").and_then(Value::as_list).unwrap();
    assert_eq!(error[0].as_integer(), Some(201));
    assert_eq!(error[1].as_str(), Some("A Generic Error Ocurred"));
    assert_eq!(value.get(b"y").and_then(Value::as_str), Some("e"));
}

#[test]
fn test_decode_dict_non_string_key() {
    assert_eq!(decode(b"di1e1:ae"), Err(BencodeError::NonStringKey(1)));
}

#[test]
fn test_decode_unterminated_containers() {
    assert!(matches!(decode(b"l4:spam"), Err(BencodeError::UnexpectedEof(_))));
    assert!(matches!(decode(b"d1:a"), Err(BencodeError::UnexpectedEof(_))));
}

#[test]
fn test_nesting_limit() {
    let mut deep = vec![b'l'; 100];
    deep.extend(vec![b'e'; 100]);
    assert_eq!(decode(&deep), Err(BencodeError::NestingTooDeep(64)));

    let mut shallow = vec![b'l'; 10];
    shallow.extend(vec![b'e'; 10]);
    assert!(decode(&shallow).is_ok());
}

#[test]
fn test_trailing_data_error() {
    assert_eq!(decode(b"i42eextra"), Err(BencodeError::TrailingData(5)));
}

#[test]
fn test_encode_sorts_keys() {
    let mut dict = Dict::new();
    dict.insert(Bytes::from_static(b"y"), Value::string("q"));
    dict.insert(Bytes::from_static(b"q"), Value::string("ping"));
    dict.insert(Bytes::from_static(b"t"), Value::string("aa"));
    assert_eq!(
        encode(&Value::Dict(dict)),
        b"d1:q4:ping1:t2:aa1:y1:qe".to_vec()
    );
}

#[test]
fn test_encode_negative_integer() {
    assert_eq!(encode(&Value::Integer(-42)), b"i-42e".to_vec());
}

#[test]
fn test_canonical_message_reencodes_identically() {
    let original: &[u8] =
        b"d1:rd2:id20:0123456789abcdefghij5:nodes0:e1:t2:aa1:v8:-DC0001-1:y1:re";
    assert_eq!(encode(&decode(original).unwrap()), original.to_vec());
}

#[test]
fn test_value_accessors() {
    let value = Value::Integer(42);
    assert_eq!(value.as_integer(), Some(42));
    assert!(value.as_bytes().is_none());
    assert_eq!(value.type_name(), "integer");

    let value = Value::from(&b"test"[..]);
    assert_eq!(value.as_str(), Some("test"));
    assert!(value.as_integer().is_none());

    let value = Value::List(vec![]);
    assert!(value.as_list().is_some());
    assert!(value.as_dict().is_none());
    assert!(value.into_dict().is_none());
}
