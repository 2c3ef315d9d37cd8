//! Protocol constants and client defaults.
//!
//! Sizes come straight from [BEP-5]; the defaults are what the command line
//! falls back to when a flag is not given.
//!
//! [BEP-5]: http://bittorrent.org/beps/bep_0005.html

use std::time::Duration;

// ============================================================================
// Client identification
// ============================================================================

/// Client signature sent in the `v` key of every query (BEP-20 style, with
/// a client code no other implementation uses).
pub const CLIENT_VERSION: &[u8; 8] = b"-DC0001-";

/// Width of the transaction ids we generate. BEP-5 recommends 2 bytes.
pub const TRANSACTION_ID_LEN: usize = 2;

// ============================================================================
// Wire sizes
// ============================================================================

/// Length of a node id or info hash.
pub const ID_LEN: usize = 20;

/// Length of a compact IPv4 peer record: 4 address octets + 2 port bytes.
pub const COMPACT_PEER_LEN: usize = 6;

/// Length of a compact node record: node id followed by a compact peer.
pub const COMPACT_NODE_LEN: usize = ID_LEN + COMPACT_PEER_LEN;

/// Receive buffer for a single reply datagram.
pub const MAX_DATAGRAM_SIZE: usize = 65_535;

// ============================================================================
// Defaults
// ============================================================================

/// Deadline for a single request/response exchange.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Well-known entry point into the mainline DHT.
pub const DEFAULT_BOOTSTRAP_NODE: &str = "router.utorrent.com:6881";

/// Number of candidates an iterative lookup keeps (BEP-5 bucket size).
pub const DEFAULT_TABLE_SIZE: usize = 8;
