use super::error::BencodeError;
use super::value::{Dict, Value};
use bytes::Bytes;

const MAX_DEPTH: usize = 64;

/// Decodes exactly one bencode value spanning all of `data`.
pub fn decode(data: &[u8]) -> Result<Value, BencodeError> {
    let mut decoder = Decoder { data, pos: 0 };
    let value = decoder.value(0)?;

    match data.len() - decoder.pos {
        0 => Ok(value),
        extra => Err(BencodeError::TrailingData(extra)),
    }
}

struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    fn peek(&self) -> Result<u8, BencodeError> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or(BencodeError::UnexpectedEof(self.pos))
    }

    /// Advances past the next occurrence of `delim` and returns the bytes
    /// before it.
    fn take_until(&mut self, delim: u8) -> Result<&'a [u8], BencodeError> {
        let data = self.data;
        let rest = &data[self.pos..];
        let len = rest
            .iter()
            .position(|&b| b == delim)
            .ok_or(BencodeError::UnexpectedEof(self.data.len()))?;
        self.pos += len + 1;
        Ok(&rest[..len])
    }

    fn value(&mut self, depth: usize) -> Result<Value, BencodeError> {
        if depth > MAX_DEPTH {
            return Err(BencodeError::NestingTooDeep(MAX_DEPTH));
        }

        match self.peek()? {
            b'i' => self.integer(),
            b'l' => self.list(depth),
            b'd' => self.dict(depth),
            b'0'..=b'9' => self.bytes().map(Value::Bytes),
            c => Err(BencodeError::UnexpectedChar(c as char, self.pos)),
        }
    }

    fn integer(&mut self) -> Result<Value, BencodeError> {
        self.pos += 1;
        let digits = self.take_until(b'e')?;

        let text = std::str::from_utf8(digits)
            .map_err(|_| BencodeError::InvalidInteger("not ascii".into()))?;

        let unsigned = text.strip_prefix('-').unwrap_or(text);
        if unsigned.is_empty() {
            return Err(BencodeError::InvalidInteger("empty".into()));
        }
        if !unsigned.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BencodeError::InvalidInteger(text.into()));
        }
        if unsigned.starts_with('0') && (unsigned.len() > 1 || text.starts_with('-')) {
            return Err(BencodeError::InvalidInteger(format!("non-canonical {text}")));
        }

        text.parse()
            .map(Value::Integer)
            .map_err(|_| BencodeError::InvalidInteger(text.into()))
    }

    fn bytes(&mut self) -> Result<Bytes, BencodeError> {
        let start = self.pos;
        let len: usize = std::str::from_utf8(self.take_until(b':')?)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or(BencodeError::InvalidStringLength(start))?;

        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(BencodeError::UnexpectedEof(self.data.len()))?;

        let bytes = Bytes::copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;
        Ok(bytes)
    }

    fn list(&mut self, depth: usize) -> Result<Value, BencodeError> {
        self.pos += 1;
        let mut list = Vec::new();

        while self.peek()? != b'e' {
            list.push(self.value(depth + 1)?);
        }

        self.pos += 1;
        Ok(Value::List(list))
    }

    fn dict(&mut self, depth: usize) -> Result<Value, BencodeError> {
        self.pos += 1;
        let mut dict = Dict::new();

        while self.peek()? != b'e' {
            if !self.peek()?.is_ascii_digit() {
                return Err(BencodeError::NonStringKey(self.pos));
            }
            let key = self.bytes()?;
            let value = self.value(depth + 1)?;
            dict.insert(key, value);
        }

        self.pos += 1;
        Ok(Value::Dict(dict))
    }
}
