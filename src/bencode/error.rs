use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BencodeError {
    #[error("unexpected end of input at byte {0}")]
    UnexpectedEof(usize),

    #[error("invalid integer: {0}")]
    InvalidInteger(String),

    #[error("invalid string length at byte {0}")]
    InvalidStringLength(usize),

    #[error("unexpected character {0:?} at byte {1}")]
    UnexpectedChar(char, usize),

    #[error("dictionary key at byte {0} is not a byte string")]
    NonStringKey(usize),

    #[error("{0} trailing bytes after value")]
    TrailingData(usize),

    #[error("nesting deeper than {0} levels")]
    NestingTooDeep(usize),
}
