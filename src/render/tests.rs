use super::*;
use bytes::Bytes;

fn response(entries: Vec<(&'static str, Value)>) -> DhtMessage {
    let dict = entries
        .into_iter()
        .map(|(k, v)| (Bytes::from_static(k.as_bytes()), v))
        .collect();
    DhtMessage::new_response(Bytes::from_static(b"aa"), dict)
}

#[test]
fn test_render_nodes() {
    let msg = response(vec![
        ("id", Value::string("0123456789abcdefghij")),
        ("nodes", Value::string("C4D4E4F5055354C0A801E*E*ii")),
    ]);

    assert_eq!(
        Pretty(&msg).to_string(),
        "transaction: 0x6161\n\
         type: response\n\
         response:\n  \
         id: 0x303132333435363738396162636465666768696a\n  \
         nodes:\n    \
         4334443445344635303535333534433041383031@69.42.69.42:26985\n"
    );
}

#[test]
fn test_render_values_and_token() {
    let msg = response(vec![
        ("token", Value::string("aoeu")),
        (
            "values",
            Value::List(vec![Value::string("axje.u"), Value::string("idhtnm")]),
        ),
    ]);

    let text = Pretty(&msg).to_string();
    assert!(text.contains("  token: 0x616f6575\n"));
    assert!(text.contains("  values:\n    97.120.106.101:11893\n    105.100.104.116:28269\n"));
}

#[test]
fn test_render_falls_back_to_hex() {
    let msg = response(vec![
        ("nodes", Value::string("1234")),
        ("values", Value::List(vec![Value::string("12")])),
    ]);

    let text = Pretty(&msg).to_string();
    assert!(text.contains("  nodes: 0x31323334\n"));
    assert!(text.contains("  values:\n    - 0x3132\n"));
}

#[test]
fn test_render_query() {
    let mut args = Dict::new();
    args.insert(Bytes::from_static(b"implied_port"), Value::Integer(1));
    let mut msg = DhtMessage::new_query(crate::dht::Method::AnnouncePeer, args).unwrap();
    msg.transaction_id = Bytes::from_static(&[0xab, 0xcd]);

    let text = Pretty(&msg).to_string();
    assert!(text.starts_with("transaction: 0xabcd\ntype: query\nmethod: announce_peer\n"));
    assert!(text.contains("version: 0x2d4443303030312d\n"));
    assert!(text.contains("arguments:\n  implied_port: 1\n"));
}

#[test]
fn test_render_error() {
    let msg = DhtMessage::new_error(Bytes::from_static(b"aa"), 203, "Protocol Error");
    assert_eq!(
        Pretty(&msg).to_string(),
        "transaction: 0x6161\ntype: error\nerror: 203 Protocol Error\n"
    );
}

#[test]
fn test_render_nested() {
    let mut inner = Dict::new();
    inner.insert(Bytes::from_static(b"n"), Value::Integer(-3));
    let msg = response(vec![(
        "extra",
        Value::List(vec![Value::Dict(inner), Value::Integer(7)]),
    )]);

    assert!(Pretty(&msg)
        .to_string()
        .ends_with("response:\n  extra:\n    -\n      n: -3\n    - 7\n"));
}
