//! Routing results.
//!
//! A router answers with one of three destinations: a single shard id, a
//! half-open range of shard ids, or every shard.

use std::fmt;

/// Half-open shard-id interval `[start, end)`.
///
/// `end == None` means the range is unbounded above: the prefix was all
/// `0xFF` bytes and has no finite successor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyRange {
    pub start: Vec<u8>,
    pub end: Option<Vec<u8>>,
}

impl KeyRange {
    /// The range of every shard id that starts with `prefix`.
    pub fn from_prefix(prefix: Vec<u8>) -> Self {
        let end = increment(&prefix);
        Self { start: prefix, end }
    }

    pub fn is_unbounded(&self) -> bool {
        self.end.is_none()
    }

    /// Lexicographic membership test honouring the open upper bound.
    pub fn contains(&self, id: &[u8]) -> bool {
        if id < self.start.as_slice() {
            return false;
        }
        match &self.end {
            Some(end) => id < end.as_slice(),
            None => true,
        }
    }
}

impl fmt::Display for KeyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, ", hex::encode(&self.start))?;
        match &self.end {
            Some(end) => write!(f, "{})", hex::encode(end)),
            None => write!(f, "+inf)"),
        }
    }
}

/// Where the rows for a key (or key prefix) live.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Destination {
    ShardId(Vec<u8>),
    ShardRange(KeyRange),
    AllShards,
}

impl Destination {
    /// Range destination for a (possibly empty) shard-id prefix.
    ///
    /// An empty prefix carries no information and targets every shard.
    pub fn from_prefix(begin: Vec<u8>) -> Self {
        if begin.is_empty() {
            return Self::AllShards;
        }
        Self::ShardRange(KeyRange::from_prefix(begin))
    }

    pub fn is_single_shard(&self) -> bool {
        matches!(self, Self::ShardId(_))
    }

    /// Shard id bytes of a single-shard destination.
    pub fn shard_id(&self) -> Option<&[u8]> {
        match self {
            Self::ShardId(id) => Some(id),
            _ => None,
        }
    }

    /// Whether a row stored under shard id `id` is targeted by this destination.
    pub fn contains(&self, id: &[u8]) -> bool {
        match self {
            Self::ShardId(own) => own.as_slice() == id,
            Self::ShardRange(range) => range.contains(id),
            Self::AllShards => true,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShardId(id) => write!(f, "shard {}", hex::encode(id)),
            Self::ShardRange(range) => write!(f, "range {}", range),
            Self::AllShards => write!(f, "all shards"),
        }
    }
}

/// Adds one to `value` read as a big-endian unsigned integer.
///
/// Returns `None` when every byte overflows (all `0xFF`, or empty input).
pub fn increment(value: &[u8]) -> Option<Vec<u8>> {
    let mut out = value.to_vec();
    for byte in out.iter_mut().rev() {
        if *byte < u8::MAX {
            *byte += 1;
            return Some(out);
        }
        *byte = 0;
    }
    None
}
