use bytes::Bytes;
use std::collections::BTreeMap;

/// A bencode dictionary. Keys are raw byte strings and iterate in sorted
/// order, which is exactly the order the encoder must emit them in.
pub type Dict = BTreeMap<Bytes, Value>;

/// A decoded bencode value.
///
/// DHT payloads mix printable fields (`"y"`, `"q"`) with raw binary ones
/// (node ids, compact node records), so byte strings are kept as [`Bytes`]
/// and only interpreted as UTF-8 on request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer(i64),
    Bytes(Bytes),
    List(Vec<Value>),
    Dict(Dict),
}

impl Value {
    /// Byte string value holding the UTF-8 bytes of `s`.
    pub fn string(s: &str) -> Self {
        Value::Bytes(Bytes::copy_from_slice(s.as_bytes()))
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the byte string as `&str` when it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Consumes the value and returns the dictionary without cloning it.
    pub fn into_dict(self) -> Option<Dict> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Looks up `key` when this value is a dictionary.
    ///
    /// ```
    /// use dhtcli::bencode::decode;
    ///
    /// let value = decode(b"d1:y1:re").unwrap();
    /// assert_eq!(value.get(b"y").and_then(|v| v.as_str()), Some("r"));
    /// assert_eq!(value.get(b"t"), None);
    /// ```
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.as_dict()?.get(key)
    }

    /// Short name of the variant, used in decode error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Bytes(_) => "byte string",
            Value::List(_) => "list",
            Value::Dict(_) => "dictionary",
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(Bytes::copy_from_slice(b))
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Value::List(l)
    }
}

impl From<Dict> for Value {
    fn from(d: Dict) -> Self {
        Value::Dict(d)
    }
}
