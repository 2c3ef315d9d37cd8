//! dhtcli - a client for the BitTorrent Mainline DHT
//!
//! # Modules
//!
//! - [`bencode`] - BEP-3 bencode encoding/decoding
//! - [`dht`] - BEP-5 messages, transport and iterative node lookup
//! - [`constants`] - protocol sizes and client defaults
//! - [`render`] - indented text form of a message

pub mod bencode;
pub mod constants;
pub mod dht;
pub mod render;

pub use bencode::{decode, encode, BencodeError, Value};
pub use dht::{DhtError, DhtMessage, DhtQuery, Node, NodeId, QueryProcessor, RoutingTable, Transport};
