use super::error::DhtError;
use super::node::{
    decode_hash, decode_hex, parse_compact_nodes, parse_compact_peer, parse_compact_peers,
    InfoHash, Node, NodeId,
};
use crate::bencode::{decode, encode, Dict, Value};
use crate::constants::{CLIENT_VERSION, TRANSACTION_ID_LEN};
use bytes::Bytes;
use rand::rngs::OsRng;
use rand::TryRngCore;
use std::fmt;
use std::net::SocketAddr;

pub type TransactionId = Bytes;

/// The `y` key of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Query,
    Response,
    Error,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Query => "q",
            MessageType::Response => "r",
            MessageType::Error => "e",
        }
    }

    fn from_wire(raw: &[u8]) -> Option<Self> {
        match raw {
            b"q" => Some(MessageType::Query),
            b"r" => Some(MessageType::Response),
            b"e" => Some(MessageType::Error),
            _ => None,
        }
    }
}

/// The `q` key of a query: one of the four BEP-5 methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Ping,
    FindNode,
    GetPeers,
    AnnouncePeer,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Ping => "ping",
            Method::FindNode => "find_node",
            Method::GetPeers => "get_peers",
            Method::AnnouncePeer => "announce_peer",
        }
    }

    fn from_wire(raw: &[u8]) -> Option<Self> {
        match raw {
            b"ping" => Some(Method::Ping),
            b"find_node" => Some(Method::FindNode),
            b"get_peers" => Some(Method::GetPeers),
            b"announce_peer" => Some(Method::AnnouncePeer),
            _ => None,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A query before it is flattened into an argument dictionary.
///
/// The hex constructors validate caller input, so a query that exists is
/// always well formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DhtQuery {
    Ping,
    FindNode {
        target: NodeId,
    },
    GetPeers {
        info_hash: InfoHash,
    },
    AnnouncePeer {
        info_hash: InfoHash,
        port: u16,
        token: Bytes,
        implied_port: bool,
    },
}

impl DhtQuery {
    pub fn find_node(target_hex: &str) -> Result<Self, DhtError> {
        Ok(DhtQuery::FindNode {
            target: NodeId::from_hex(target_hex)?,
        })
    }

    pub fn get_peers(info_hash_hex: &str) -> Result<Self, DhtError> {
        Ok(DhtQuery::GetPeers {
            info_hash: decode_hash(info_hash_hex)?,
        })
    }

    /// `port == 0` asks the responder to use the UDP source port of the
    /// query instead (`implied_port = 1`).
    pub fn announce_peer(info_hash_hex: &str, token_hex: &str, port: u16) -> Result<Self, DhtError> {
        Ok(DhtQuery::AnnouncePeer {
            info_hash: decode_hash(info_hash_hex)?,
            port,
            token: decode_hex(token_hex)?.into(),
            implied_port: port == 0,
        })
    }

    pub fn method(&self) -> Method {
        match self {
            DhtQuery::Ping => Method::Ping,
            DhtQuery::FindNode { .. } => Method::FindNode,
            DhtQuery::GetPeers { .. } => Method::GetPeers,
            DhtQuery::AnnouncePeer { .. } => Method::AnnouncePeer,
        }
    }

    /// The `a` dictionary for this query sent from `id`.
    pub fn arguments(&self, id: &NodeId) -> Dict {
        let mut args = Dict::new();
        args.insert(key("id"), Value::from(&id.as_bytes()[..]));

        match self {
            DhtQuery::Ping => {}
            DhtQuery::FindNode { target } => {
                args.insert(key("target"), Value::from(&target.as_bytes()[..]));
            }
            DhtQuery::GetPeers { info_hash } => {
                args.insert(key("info_hash"), Value::from(&info_hash[..]));
            }
            DhtQuery::AnnouncePeer {
                info_hash,
                port,
                token,
                implied_port,
            } => {
                args.insert(key("implied_port"), Value::Integer(*implied_port as i64));
                args.insert(key("info_hash"), Value::from(&info_hash[..]));
                args.insert(key("port"), Value::Integer(*port as i64));
                args.insert(key("token"), Value::Bytes(token.clone()));
            }
        }

        args
    }
}

/// A KRPC message as it appears on the wire.
///
/// Arguments and results stay as bencode dictionaries here; typed access
/// goes through [`DhtMessage::nodes`], [`DhtMessage::values`],
/// [`DhtMessage::sender_id`] and [`DhtMessage::token`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhtMessage {
    pub transaction_id: TransactionId,
    pub message_type: MessageType,
    pub method: Option<Method>,
    pub arguments: Option<Dict>,
    pub response: Option<Dict>,
    pub error: Option<(i64, String)>,
    pub version: Option<Bytes>,
}

impl DhtMessage {
    /// A query with a fresh random transaction id, stamped with our client
    /// version.
    pub fn new_query(method: Method, arguments: Dict) -> Result<Self, DhtError> {
        let mut tid = [0u8; TRANSACTION_ID_LEN];
        OsRng
            .try_fill_bytes(&mut tid)
            .map_err(|e| DhtError::Random(e.to_string()))?;

        Ok(Self {
            transaction_id: Bytes::copy_from_slice(&tid),
            message_type: MessageType::Query,
            method: Some(method),
            arguments: Some(arguments),
            response: None,
            error: None,
            version: Some(Bytes::from_static(CLIENT_VERSION)),
        })
    }

    pub fn new_response(transaction_id: TransactionId, response: Dict) -> Self {
        Self {
            transaction_id,
            message_type: MessageType::Response,
            method: None,
            arguments: None,
            response: Some(response),
            error: None,
            version: None,
        }
    }

    pub fn new_error(transaction_id: TransactionId, code: i64, message: &str) -> Self {
        Self {
            transaction_id,
            message_type: MessageType::Error,
            method: None,
            arguments: None,
            response: None,
            error: Some((code, message.to_string())),
            version: None,
        }
    }

    pub fn decode(data: &[u8]) -> Result<Self, DhtError> {
        let dict = match decode(data)? {
            Value::Dict(dict) => dict,
            other => {
                return Err(DhtError::InvalidMessage(format!(
                    "expected dictionary, got {}",
                    other.type_name()
                )))
            }
        };

        let transaction_id = get(&dict, "t", Value::as_bytes)?
            .cloned()
            .ok_or_else(|| DhtError::InvalidMessage("missing transaction id".into()))?;

        let raw_type = get(&dict, "y", Value::as_bytes)?
            .ok_or_else(|| DhtError::InvalidMessage("missing message type".into()))?;
        let message_type = MessageType::from_wire(raw_type).ok_or_else(|| {
            DhtError::InvalidMessage(format!(
                "unknown message type {:?}",
                String::from_utf8_lossy(raw_type)
            ))
        })?;

        let method = get(&dict, "q", Value::as_bytes)?
            .map(|raw| {
                Method::from_wire(raw).ok_or_else(|| {
                    DhtError::InvalidMessage(format!(
                        "unknown query {:?}",
                        String::from_utf8_lossy(raw)
                    ))
                })
            })
            .transpose()?;

        let arguments = get(&dict, "a", Value::as_dict)?.cloned();
        let response = get(&dict, "r", Value::as_dict)?.cloned();
        let version = get(&dict, "v", Value::as_bytes)?.cloned();
        let error = get(&dict, "e", Value::as_list)?
            .map(parse_error_list)
            .transpose()?;

        match message_type {
            MessageType::Query if method.is_none() => {
                return Err(DhtError::InvalidMessage("missing query name".into()))
            }
            MessageType::Query if arguments.is_none() => {
                return Err(DhtError::InvalidMessage("missing query arguments".into()))
            }
            MessageType::Response if response.is_none() => {
                return Err(DhtError::InvalidMessage("missing response dictionary".into()))
            }
            MessageType::Error if error.is_none() => {
                return Err(DhtError::InvalidMessage("missing error list".into()))
            }
            _ => {}
        }

        Ok(Self {
            transaction_id,
            message_type,
            method,
            arguments,
            response,
            error,
            version,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut dict = Dict::new();

        dict.insert(key("t"), Value::Bytes(self.transaction_id.clone()));
        dict.insert(key("y"), Value::string(self.message_type.as_str()));

        if let Some(method) = self.method {
            dict.insert(key("q"), Value::string(method.as_str()));
        }
        if let Some(args) = &self.arguments {
            dict.insert(key("a"), Value::Dict(args.clone()));
        }
        if let Some(resp) = &self.response {
            dict.insert(key("r"), Value::Dict(resp.clone()));
        }
        if let Some((code, message)) = &self.error {
            dict.insert(
                key("e"),
                Value::List(vec![Value::Integer(*code), Value::string(message)]),
            );
        }
        if let Some(version) = &self.version {
            dict.insert(key("v"), Value::Bytes(version.clone()));
        }

        encode(&Value::Dict(dict))
    }

    /// Looks `name` up in the arguments and the response. A key present in
    /// both is ambiguous and rejected.
    fn field(&self, name: &str) -> Result<Option<&Value>, DhtError> {
        let in_args = self.arguments.as_ref().and_then(|a| a.get(name.as_bytes()));
        let in_resp = self.response.as_ref().and_then(|r| r.get(name.as_bytes()));

        match (in_args, in_resp) {
            (Some(_), Some(_)) => Err(DhtError::InvalidMessage(format!(
                "{name:?} present as both an argument and a response"
            ))),
            (found, None) | (None, found) => Ok(found),
        }
    }

    /// Nodes carried in the compact `nodes` field. Absent means none.
    pub fn nodes(&self) -> Result<Vec<Node>, DhtError> {
        match self.field("nodes")? {
            None => Ok(Vec::new()),
            Some(Value::Bytes(data)) => parse_compact_nodes(data),
            Some(other) => Err(DhtError::InvalidCompact(format!(
                "\"nodes\" is a {}, expected a byte string",
                other.type_name()
            ))),
        }
    }

    /// Peers carried in the `values` field: normally a list of 6-byte
    /// strings, though a lone 6-byte string is accepted too.
    pub fn values(&self) -> Result<Vec<SocketAddr>, DhtError> {
        match self.field("values")? {
            None => Ok(Vec::new()),
            Some(Value::List(list)) => parse_compact_peers(list),
            Some(Value::Bytes(data)) => Ok(vec![parse_compact_peer(data)?]),
            Some(other) => Err(DhtError::InvalidCompact(format!(
                "\"values\" is a {}, expected a list",
                other.type_name()
            ))),
        }
    }

    /// The `id` of whoever sent this message, if it is a well formed id.
    pub fn sender_id(&self) -> Option<NodeId> {
        [&self.response, &self.arguments]
            .into_iter()
            .flatten()
            .find_map(|d| d.get(b"id".as_slice()))
            .and_then(Value::as_bytes)
            .and_then(|b| NodeId::from_bytes(b).ok())
    }

    /// The announce token handed out by a `get_peers` response.
    pub fn token(&self) -> Option<&Bytes> {
        self.response
            .as_ref()
            .and_then(|r| r.get(b"token".as_slice()))
            .and_then(Value::as_bytes)
    }
}

fn key(name: &'static str) -> Bytes {
    Bytes::from_static(name.as_bytes())
}

/// Fetches an optional key, failing if it holds the wrong bencode type.
fn get<'a, T: ?Sized>(
    dict: &'a Dict,
    name: &str,
    extract: fn(&'a Value) -> Option<&'a T>,
) -> Result<Option<&'a T>, DhtError> {
    match dict.get(name.as_bytes()) {
        None => Ok(None),
        Some(value) => extract(value).map(Some).ok_or_else(|| {
            DhtError::InvalidMessage(format!(
                "{name:?} has unexpected type {}",
                value.type_name()
            ))
        }),
    }
}

fn parse_error_list(list: &[Value]) -> Result<(i64, String), DhtError> {
    match list {
        [Value::Integer(code), Value::Bytes(message), ..] => {
            Ok((*code, String::from_utf8_lossy(message).into_owned()))
        }
        _ => Err(DhtError::InvalidMessage(
            "error must be a list of [code, message]".into(),
        )),
    }
}
