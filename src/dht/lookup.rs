use super::error::DhtError;
use super::message::{DhtMessage, DhtQuery};
use super::node::{Distance, Node, NodeId};
use super::routing::RoutingTable;
use super::transport::Transport;
use std::collections::HashSet;
use std::net::SocketAddr;
use tracing::{debug, info, warn};

/// Drives an iterative `find_node` search through the DHT.
///
/// Construction pings the bootstrap node to learn its id and seeds the
/// routing table with it at distance zero, so it is always the first node
/// queried. [`find_node`](Self::find_node) then walks towards the target one
/// query at a time, always asking the closest candidate it has not asked yet.
///
/// ```no_run
/// use dhtcli::dht::{resolve, QueryProcessor};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let bootstrap = resolve("router.utorrent.com:6881").await?;
/// let mut processor = QueryProcessor::new(bootstrap, 8).await?;
/// let closest = processor
///     .find_node("4142434445464748494a4b4c4d4e4f5051525354")
///     .await?;
/// for node in closest.nodes()? {
///     println!("{node}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct QueryProcessor {
    transport: Transport,
    routing_table: RoutingTable,
}

impl QueryProcessor {
    pub async fn new(bootstrap: SocketAddr, k: usize) -> Result<Self, DhtError> {
        Self::with_transport(Transport::new()?, bootstrap, k).await
    }

    pub async fn with_transport(
        transport: Transport,
        bootstrap: SocketAddr,
        k: usize,
    ) -> Result<Self, DhtError> {
        let mut routing_table = RoutingTable::new(k)?;

        let pong = transport.ping(bootstrap).await?;
        let id = pong.sender_id().ok_or_else(|| {
            DhtError::Protocol(format!(
                "ping response from bootstrap node {bootstrap} did not include an id"
            ))
        })?;

        debug!("Bootstrap node {} has id {}", bootstrap, id);
        routing_table.insert(Node::new(id, bootstrap), Distance::ZERO);

        Ok(Self {
            transport,
            routing_table,
        })
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn routing_table(&self) -> &RoutingTable {
        &self.routing_table
    }

    /// Searches for the node whose id is `target_hex`.
    ///
    /// Returns the `find_node` response that lists the target as soon as one
    /// arrives. Otherwise, once every candidate is used up, returns the
    /// response of the queried node closest to the target, or the first
    /// response received if none was closer. Unreachable nodes and malformed
    /// replies are logged and skipped.
    pub async fn find_node(&mut self, target_hex: &str) -> Result<DhtMessage, DhtError> {
        let target = NodeId::from_hex(target_hex)?;
        let query = DhtQuery::FindNode { target };

        info!("Looking up node {}", target);

        let mut best: Option<DhtMessage> = None;
        let mut closest = Distance::MAX;
        let mut visited: HashSet<NodeId> = HashSet::new();

        while !self.routing_table.is_empty() {
            let candidate = self.routing_table.pop()?;
            visited.insert(candidate.id);

            let (response, nodes) = match self.ask(&candidate, &query).await {
                Ok(reply) => reply,
                Err(e) if e.is_recoverable() => {
                    warn!("Skipping node {}: {}", candidate, e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let d = target.distance(&candidate.id);
            // Ranked by the distance of the node we asked, not of the nodes
            // it returned.
            if d < closest {
                closest = d;
                best = Some(response.clone());
            } else if best.is_none() {
                best = Some(response.clone());
            }

            for node in nodes {
                let dn = target.distance(&node.id);
                if dn.is_zero() {
                    info!(
                        "Found target {} at {} after {} queries",
                        target,
                        node.addr,
                        visited.len()
                    );
                    return Ok(response);
                }
                if visited.contains(&node.id) {
                    continue;
                }
                self.routing_table.insert(node, dn);
            }
        }

        info!("Lookup exhausted after {} queries", visited.len());
        best.ok_or(DhtError::Exhausted)
    }

    async fn ask(
        &self,
        candidate: &Node,
        query: &DhtQuery,
    ) -> Result<(DhtMessage, Vec<Node>), DhtError> {
        let response = self.transport.query(candidate.addr, query).await?;
        let nodes = response.nodes()?;
        debug!("Node {} returned {} nodes", candidate, nodes.len());
        Ok((response, nodes))
    }
}
