use std::borrow::Cow;
use std::fmt;

/// Scalar handed to a router by the query layer.
///
/// Routers never look inside a value beyond [`Value::to_bytes`]; the variants
/// only exist so callers can pass SQL literals through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Text(String),
    Binary(Vec<u8>),
    Boolean(bool),
}

impl Value {
    /// Raw byte projection used as the routing key.
    ///
    /// Numerics project to their SQL text form, booleans to `1`/`0`,
    /// text and binary to their bytes, and NULL to the empty key.
    pub fn to_bytes(&self) -> Cow<'_, [u8]> {
        match self {
            Self::Null => Cow::Borrowed(&[]),
            Self::Integer(i) => Cow::Owned(i.to_string().into_bytes()),
            Self::Unsigned(u) => Cow::Owned(u.to_string().into_bytes()),
            Self::Float(f) => Cow::Owned(f.to_string().into_bytes()),
            Self::Text(s) => Cow::Borrowed(s.as_bytes()),
            Self::Binary(b) => Cow::Borrowed(b),
            Self::Boolean(b) => Cow::Borrowed(if *b { b"1" } else { b"0" }),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Unsigned(u) => write!(f, "{}", u),
            Self::Float(fl) => write!(f, "{}", fl),
            Self::Text(s) => write!(f, "{}", s),
            Self::Binary(b) => write!(f, "0x{}", hex::encode(b)),
            Self::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Self::Unsigned(u)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Self::Binary(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Self::Binary(b.to_vec())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}
