use crate::bencode::BencodeError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DhtError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("invalid node id length: expected 20 bytes, got {0}")]
    InvalidNodeId(usize),

    #[error("bencode error: {0}")]
    Bencode(#[from] BencodeError),

    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("invalid compact encoding: {0}")]
    InvalidCompact(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not resolve {0}")]
    Resolve(String),

    #[error("no reply within {0:?}")]
    Timeout(Duration),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("could not successfully query any DHT node")]
    Exhausted,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("pop() called on empty routing table")]
    EmptyTable,

    #[error("random source failed: {0}")]
    Random(String),
}

impl DhtError {
    /// Whether an iterative lookup may skip the failing candidate and carry
    /// on. True for malformed replies and network failures, false for caller
    /// mistakes and contract violations.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DhtError::Bencode(_)
                | DhtError::InvalidMessage(_)
                | DhtError::InvalidCompact(_)
                | DhtError::Io(_)
                | DhtError::Resolve(_)
                | DhtError::Timeout(_)
        )
    }
}
