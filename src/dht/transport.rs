use super::error::DhtError;
use super::message::{DhtMessage, DhtQuery};
use super::node::NodeId;
use crate::constants::{DEFAULT_QUERY_TIMEOUT, ID_LEN, MAX_DATAGRAM_SIZE};
use rand::rngs::OsRng;
use rand::TryRngCore;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::debug;

/// Resolves `host:port` text to a socket address, preferring IPv4 since
/// compact node records can only describe IPv4 contacts.
pub async fn resolve(host_port: &str) -> Result<SocketAddr, DhtError> {
    let addrs: Vec<SocketAddr> = tokio::net::lookup_host(host_port)
        .await
        .map_err(|e| DhtError::Resolve(format!("{host_port}: {e}")))?
        .collect();

    addrs
        .iter()
        .find(|a| a.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| DhtError::Resolve(format!("{host_port}: no addresses")))
}

/// Issues single BEP-5 queries to remote nodes.
///
/// Every call opens its own UDP socket, sends one datagram and waits for one
/// reply, so a `Transport` holds no connection state and can be shared
/// freely. There is no retry; a caller that wants one loops.
///
/// # Examples
///
/// ```no_run
/// use dhtcli::dht::{resolve, Transport};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = Transport::new()?;
/// let addr = resolve("router.utorrent.com:6881").await?;
///
/// let pong = transport.ping(addr).await?;
/// println!("bootstrap id: {:?}", pong.sender_id());
///
/// let peers = transport
///     .get_peers(addr, "e2467cbf021192c241367b892230dc1e05c0580e")
///     .await?;
/// println!("token: {:?}", peers.token());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Transport {
    id: NodeId,
    timeout: Duration,
}

impl Transport {
    /// A transport with a node id drawn from the operating system CSPRNG.
    pub fn new() -> Result<Self, DhtError> {
        Self::with_rng(&mut OsRng)
    }

    /// A transport whose node id is drawn from `rng`.
    pub fn with_rng<R: TryRngCore + ?Sized>(rng: &mut R) -> Result<Self, DhtError> {
        let mut id = [0u8; ID_LEN];
        rng.try_fill_bytes(&mut id)
            .map_err(|e| DhtError::Random(e.to_string()))?;
        Ok(Self::with_id(NodeId(id)))
    }

    pub fn with_id(id: NodeId) -> Self {
        Self {
            id,
            timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Overrides the per-query reply deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn query_timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn ping(&self, addr: SocketAddr) -> Result<DhtMessage, DhtError> {
        self.query(addr, &DhtQuery::Ping).await
    }

    /// `target_hex` must be the hex form of a 20-byte node id.
    pub async fn find_node(&self, addr: SocketAddr, target_hex: &str) -> Result<DhtMessage, DhtError> {
        let query = DhtQuery::find_node(target_hex)?;
        self.query(addr, &query).await
    }

    /// `info_hash_hex` must be the hex form of a 20-byte info hash.
    pub async fn get_peers(
        &self,
        addr: SocketAddr,
        info_hash_hex: &str,
    ) -> Result<DhtMessage, DhtError> {
        let query = DhtQuery::get_peers(info_hash_hex)?;
        self.query(addr, &query).await
    }

    /// Announces that we are downloading `info_hash_hex` on `port`.
    ///
    /// `token_hex` is the token from an earlier `get_peers` reply of the same
    /// node. A `port` of 0 sets `implied_port` so the node uses our source
    /// port instead.
    pub async fn announce_peer(
        &self,
        addr: SocketAddr,
        info_hash_hex: &str,
        token_hex: &str,
        port: u16,
    ) -> Result<DhtMessage, DhtError> {
        let query = DhtQuery::announce_peer(info_hash_hex, token_hex, port)?;
        self.query(addr, &query).await
    }

    pub async fn query(&self, addr: SocketAddr, query: &DhtQuery) -> Result<DhtMessage, DhtError> {
        let request = DhtMessage::new_query(query.method(), query.arguments(&self.id))?;
        self.send(addr, &request).await
    }

    /// Sends `request` to `addr` and decodes the first datagram that comes
    /// back before the deadline.
    pub async fn send(&self, addr: SocketAddr, request: &DhtMessage) -> Result<DhtMessage, DhtError> {
        let local = if addr.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(local).await?;
        socket.connect(addr).await?;

        debug!(
            "Sending {} to {} (tid {})",
            request.method.map_or("message", |m| m.as_str()),
            addr,
            hex::encode(&request.transaction_id)
        );
        socket.send(&request.encode()).await?;

        let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];
        let n = match timeout(self.timeout, socket.recv(&mut buf)).await {
            Ok(result) => result?,
            Err(_) => return Err(DhtError::Timeout(self.timeout)),
        };

        let reply = DhtMessage::decode(&buf[..n])?;
        if reply.transaction_id != request.transaction_id {
            debug!(
                "Reply from {} carries tid {}, expected {}",
                addr,
                hex::encode(&reply.transaction_id),
                hex::encode(&request.transaction_id)
            );
        }
        Ok(reply)
    }
}
