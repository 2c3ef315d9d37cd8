use super::value::Value;

/// Encodes `value` in canonical bencode.
///
/// Dictionary keys come out in sorted order because [`Dict`](super::Dict)
/// is a `BTreeMap`, so equal values always produce identical bytes.
///
/// ```
/// use dhtcli::bencode::{encode, Value};
///
/// let list = Value::List(vec![Value::Integer(201), Value::string("A Generic Error Ocurred")]);
/// assert_eq!(encode(&list), b"li201e23:A Generic Error Ocurrede");
/// ```
pub fn encode(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_into(value, &mut buf);
    buf
}

fn encode_into(value: &Value, buf: &mut Vec<u8>) {
    match value {
        Value::Integer(i) => {
            buf.push(b'i');
            buf.extend_from_slice(i.to_string().as_bytes());
            buf.push(b'e');
        }
        Value::Bytes(b) => encode_bytes(b, buf),
        Value::List(l) => {
            buf.push(b'l');
            for item in l {
                encode_into(item, buf);
            }
            buf.push(b'e');
        }
        Value::Dict(d) => {
            buf.push(b'd');
            for (key, val) in d {
                encode_bytes(key, buf);
                encode_into(val, buf);
            }
            buf.push(b'e');
        }
    }
}

fn encode_bytes(bytes: &[u8], buf: &mut Vec<u8>) {
    buf.extend_from_slice(bytes.len().to_string().as_bytes());
    buf.push(b':');
    buf.extend_from_slice(bytes);
}
