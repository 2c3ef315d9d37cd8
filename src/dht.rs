//! BitTorrent Mainline DHT client ([BEP-5]).
//!
//! - [`DhtMessage`] and the compact encodings are the wire codec.
//! - [`Transport`] performs one request/response exchange per call.
//! - [`QueryProcessor`] runs an iterative `find_node` lookup over a
//!   [`RoutingTable`] of the closest known candidates.
//!
//! [BEP-5]: http://bittorrent.org/beps/bep_0005.html

mod error;
mod lookup;
mod message;
mod node;
mod routing;
mod transport;

pub use error::DhtError;
pub use lookup::QueryProcessor;
pub use message::{DhtMessage, DhtQuery, MessageType, Method, TransactionId};
pub use node::{
    decode_hash, decode_hex, distance, encode_compact_nodes, encode_compact_peer,
    parse_compact_nodes, parse_compact_peer, parse_compact_peers, Distance, InfoHash, Node, NodeId,
};
pub use routing::RoutingTable;
pub use transport::{resolve, Transport};
