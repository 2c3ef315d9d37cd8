use super::error::DhtError;
use crate::bencode::Value;
use crate::constants::{COMPACT_NODE_LEN, COMPACT_PEER_LEN, ID_LEN};
use bytes::Bytes;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4};

/// A 20-byte torrent info hash.
pub type InfoHash = [u8; ID_LEN];

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub [u8; ID_LEN]);

impl NodeId {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DhtError> {
        let id: [u8; ID_LEN] = bytes
            .try_into()
            .map_err(|_| DhtError::InvalidNodeId(bytes.len()))?;
        Ok(Self(id))
    }

    /// Parses a 40 character hex string, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, DhtError> {
        decode_hash(s).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }

    pub fn distance(&self, other: &NodeId) -> Distance {
        let mut dist = [0u8; ID_LEN];
        for (d, (a, b)) in dist.iter_mut().zip(self.0.iter().zip(other.0.iter())) {
            *d = a ^ b;
        }
        Distance(dist)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// XOR distance between two ids, read as a 160-bit big-endian unsigned
/// integer. Byte-wise ordering of the array is numeric ordering.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Distance(pub [u8; ID_LEN]);

impl Distance {
    pub const ZERO: Distance = Distance([0; ID_LEN]);
    pub const MAX: Distance = Distance([0xff; ID_LEN]);

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Debug for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Distance(0x{})", hex::encode(self.0))
    }
}

/// XOR distance between two raw identifiers.
///
/// Both sides must be exactly 20 bytes; the metric is undefined otherwise.
///
/// ```
/// use dhtcli::dht::distance;
///
/// let a = [0xffu8; 20];
/// let mut b = a;
/// b[19] = 0xba;
/// assert_eq!(distance(&a, &b).unwrap().0[19], 69);
/// assert!(distance(&a, &a).unwrap().is_zero());
/// assert!(distance(&a, &b[..19]).is_err());
/// ```
pub fn distance(a: &[u8], b: &[u8]) -> Result<Distance, DhtError> {
    if a.len() != b.len() {
        return Err(DhtError::Validation(format!(
            "distance between ids of different lengths ({} and {})",
            a.len(),
            b.len()
        )));
    }
    Ok(NodeId::from_bytes(a)?.distance(&NodeId::from_bytes(b)?))
}

/// A DHT participant: its id and the UDP address it answers on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub addr: SocketAddr,
}

impl Node {
    pub fn new(id: NodeId, addr: SocketAddr) -> Self {
        Self { id, addr }
    }

    pub fn from_compact(data: &[u8]) -> Result<Self, DhtError> {
        if data.len() != COMPACT_NODE_LEN {
            return Err(DhtError::InvalidCompact(format!(
                "node record must be {} bytes, got {}",
                COMPACT_NODE_LEN,
                data.len()
            )));
        }
        let (id, peer) = data.split_at(ID_LEN);
        Ok(Self::new(NodeId::from_bytes(id)?, parse_compact_peer(peer)?))
    }

    /// The 26-byte compact form. IPv6 nodes have none.
    pub fn to_compact(&self) -> Option<[u8; COMPACT_NODE_LEN]> {
        let SocketAddr::V4(v4) = self.addr else {
            return None;
        };
        let mut compact = [0u8; COMPACT_NODE_LEN];
        compact[..ID_LEN].copy_from_slice(&self.id.0);
        compact[ID_LEN..].copy_from_slice(&encode_compact_peer(&v4));
        Some(compact)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.addr)
    }
}

/// Parses a `nodes` value: back-to-back 26-byte records.
pub fn parse_compact_nodes(data: &[u8]) -> Result<Vec<Node>, DhtError> {
    if data.len() % COMPACT_NODE_LEN != 0 {
        return Err(DhtError::InvalidCompact(format!(
            "compact node encoding must be a multiple of {} bytes long, got {}",
            COMPACT_NODE_LEN,
            data.len()
        )));
    }
    data.chunks_exact(COMPACT_NODE_LEN)
        .map(Node::from_compact)
        .collect()
}

pub fn encode_compact_nodes(nodes: &[Node]) -> Bytes {
    nodes
        .iter()
        .filter_map(Node::to_compact)
        .flatten()
        .collect::<Vec<u8>>()
        .into()
}

pub fn parse_compact_peer(data: &[u8]) -> Result<SocketAddr, DhtError> {
    let &[a, b, c, d, hi, lo] = data else {
        return Err(DhtError::InvalidCompact(format!(
            "compact peer encoding must be {} bytes long, got {}",
            COMPACT_PEER_LEN,
            data.len()
        )));
    };
    let ip = Ipv4Addr::new(a, b, c, d);
    Ok(SocketAddr::new(IpAddr::V4(ip), u16::from_be_bytes([hi, lo])))
}

pub fn encode_compact_peer(addr: &SocketAddrV4) -> [u8; COMPACT_PEER_LEN] {
    let mut data = [0u8; COMPACT_PEER_LEN];
    data[..4].copy_from_slice(&addr.ip().octets());
    data[4..].copy_from_slice(&addr.port().to_be_bytes());
    data
}

/// Parses a `values` list. One bad entry fails the whole list.
pub fn parse_compact_peers(values: &[Value]) -> Result<Vec<SocketAddr>, DhtError> {
    values
        .iter()
        .map(|v| {
            v.as_bytes()
                .ok_or_else(|| {
                    DhtError::InvalidCompact(format!(
                        "peer entry is a {}, expected a byte string",
                        v.type_name()
                    ))
                })
                .and_then(|b| parse_compact_peer(b))
        })
        .collect()
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Decodes hex text of any even length into raw bytes.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, DhtError> {
    hex::decode(strip_hex_prefix(s))
        .map_err(|e| DhtError::Validation(format!("{s:?} is not valid hex: {e}")))
}

/// Decodes hex text that must represent exactly 20 bytes (a node id or an
/// info hash).
pub fn decode_hash(s: &str) -> Result<[u8; ID_LEN], DhtError> {
    decode_hex(s)?.as_slice().try_into().map_err(|_| {
        DhtError::Validation(format!("{s:?} needs to represent {ID_LEN} bytes"))
    })
}
