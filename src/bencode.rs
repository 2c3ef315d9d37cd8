//! Bencode encoding and decoding ([BEP-3]).
//!
//! Every DHT message travels as a single bencoded dictionary, so this module
//! is the bottom layer of the message codec.
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d1:y1:re` → {"y": "r"} |
//!
//! # Examples
//!
//! ```
//! use bytes::Bytes;
//! use dhtcli::bencode::{decode, encode, Dict, Value};
//!
//! let ping = decode(b"d1:ad2:id20:abcdefghij0123456789e1:q4:ping1:t2:aa1:y1:qe").unwrap();
//! assert_eq!(ping.get(b"q").and_then(Value::as_str), Some("ping"));
//!
//! let mut dict = Dict::new();
//! dict.insert(Bytes::from_static(b"y"), Value::from("r"));
//! dict.insert(Bytes::from_static(b"t"), Value::Integer(7));
//! assert_eq!(encode(&Value::Dict(dict)), b"d1:ti7e1:y1:re");
//! ```
//!
//! Decoding rejects anything that is not canonical enough to round-trip:
//!
//! - [`BencodeError::UnexpectedEof`] - input ended inside a value
//! - [`BencodeError::InvalidInteger`] - `-0`, leading zeros, empty digits
//! - [`BencodeError::UnexpectedChar`] - a byte that cannot start a value
//! - [`BencodeError::NestingTooDeep`] - more than 64 levels of containers
//! - [`BencodeError::TrailingData`] - bytes left over after the value
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod decode;
mod encode;
mod error;
mod value;

pub use decode::decode;
pub use encode::encode;
pub use error::BencodeError;
pub use value::{Dict, Value};

#[cfg(test)]
mod tests;
