use super::error::DhtError;
use super::node::{Distance, Node};

#[derive(Debug, Clone)]
struct Entry {
    node: Node,
    distance: Distance,
}

/// Candidate set for a single lookup: at most `k` nodes, closest first.
///
/// Distances are relative to the target of the lookup in progress and are
/// supplied by the caller. The table is not synchronised; it belongs to one
/// search at a time.
#[derive(Debug)]
pub struct RoutingTable {
    capacity: usize,
    entries: Vec<Entry>,
}

impl RoutingTable {
    pub fn new(capacity: usize) -> Result<Self, DhtError> {
        if capacity == 0 {
            return Err(DhtError::Config(format!(
                "routing table size must be >= 1, got {capacity}"
            )));
        }
        Ok(Self {
            capacity,
            entries: Vec::with_capacity(capacity + 1),
        })
    }

    /// Inserts `node`, keeping entries ordered by distance and dropping the
    /// farthest once over capacity. Equal distances keep insertion order.
    pub fn insert(&mut self, node: Node, distance: Distance) {
        let pos = self.entries.partition_point(|e| e.distance <= distance);
        self.entries.insert(pos, Entry { node, distance });
        self.entries.truncate(self.capacity);
    }

    /// Removes and returns the closest node.
    pub fn pop(&mut self) -> Result<Node, DhtError> {
        if self.entries.is_empty() {
            return Err(DhtError::EmptyTable);
        }
        Ok(self.entries.remove(0).node)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries from closest to farthest.
    pub fn iter(&self) -> impl Iterator<Item = (&Node, &Distance)> {
        self.entries.iter().map(|e| (&e.node, &e.distance))
    }
}
