//! Human readable rendering of KRPC messages.
//!
//! ```
//! use bytes::Bytes;
//! use dhtcli::bencode::Dict;
//! use dhtcli::dht::DhtMessage;
//! use dhtcli::render::Pretty;
//!
//! let msg = DhtMessage::new_response(Bytes::from_static(b"aa"), Dict::new());
//! assert!(Pretty(&msg).to_string().starts_with("transaction: 0x6161\n"));
//! ```

use crate::bencode::{Dict, Value};
use crate::dht::{parse_compact_nodes, parse_compact_peers, DhtMessage, MessageType};
use std::fmt;

const INDENT: &str = "  ";

/// Displays a [`DhtMessage`] as indented text.
///
/// `nodes` and `values` are decoded into `id@address` and address lines;
/// when they do not decode they fall back to hex like every other byte
/// string.
pub struct Pretty<'a>(pub &'a DhtMessage);

impl fmt::Display for Pretty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = self.0;

        writeln!(f, "transaction: 0x{}", hex::encode(&msg.transaction_id))?;
        let kind = match msg.message_type {
            MessageType::Query => "query",
            MessageType::Response => "response",
            MessageType::Error => "error",
        };
        writeln!(f, "type: {kind}")?;
        if let Some(method) = msg.method {
            writeln!(f, "method: {method}")?;
        }
        if let Some(version) = &msg.version {
            writeln!(f, "version: 0x{}", hex::encode(version))?;
        }
        if let Some(args) = &msg.arguments {
            writeln!(f, "arguments:")?;
            write_dict(f, args, 1)?;
        }
        if let Some(response) = &msg.response {
            writeln!(f, "response:")?;
            write_dict(f, response, 1)?;
        }
        if let Some((code, message)) = &msg.error {
            writeln!(f, "error: {code} {message}")?;
        }
        Ok(())
    }
}

fn write_dict(f: &mut fmt::Formatter<'_>, dict: &Dict, depth: usize) -> fmt::Result {
    let pad = INDENT.repeat(depth);

    for (key, value) in dict {
        let name = String::from_utf8_lossy(key);
        match (&key[..], value) {
            (b"nodes", Value::Bytes(data)) => {
                if let Ok(nodes) = parse_compact_nodes(data) {
                    writeln!(f, "{pad}{name}:")?;
                    for node in nodes {
                        writeln!(f, "{pad}{INDENT}{node}")?;
                    }
                    continue;
                }
            }
            (b"values", Value::List(list)) => {
                if let Ok(peers) = parse_compact_peers(list) {
                    writeln!(f, "{pad}{name}:")?;
                    for peer in peers {
                        writeln!(f, "{pad}{INDENT}{peer}")?;
                    }
                    continue;
                }
            }
            _ => {}
        }
        write_value(f, &format!("{name}:"), value, depth)?;
    }
    Ok(())
}

fn write_value(f: &mut fmt::Formatter<'_>, label: &str, value: &Value, depth: usize) -> fmt::Result {
    let pad = INDENT.repeat(depth);

    match value {
        Value::Integer(i) => writeln!(f, "{pad}{label} {i}"),
        Value::Bytes(b) => writeln!(f, "{pad}{label} 0x{}", hex::encode(b)),
        Value::List(items) => {
            writeln!(f, "{pad}{label}")?;
            for item in items {
                write_value(f, "-", item, depth + 1)?;
            }
            Ok(())
        }
        Value::Dict(dict) => {
            writeln!(f, "{pad}{label}")?;
            write_dict(f, dict, depth + 1)
        }
    }
}

#[cfg(test)]
mod tests;
