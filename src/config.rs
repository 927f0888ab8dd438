use crate::core::{Result, RouteError};
use crate::hash::{md5_truncated, xxhash64_truncated};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Parameter naming the component hash.
pub const PARAM_HASH: &str = "hash";
/// Parameter holding the JSON array of component boundaries.
pub const PARAM_OFFSETS: &str = "offsets";

/// Hash applied to each key component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HashKind {
    /// The key itself is the shard id.
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "md5")]
    Md5,
    #[serde(rename = "xxhash64")]
    XxHash64,
}

impl HashKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Md5 => "md5",
            Self::XxHash64 => "xxhash64",
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Hash one component. Identity mode returns the component unchanged.
    pub fn apply(&self, component: &[u8]) -> Vec<u8> {
        match self {
            Self::None => component.to_vec(),
            Self::Md5 => md5_truncated(component),
            Self::XxHash64 => xxhash64_truncated(component),
        }
    }
}

impl FromStr for HashKind {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" => Ok(Self::None),
            "md5" => Ok(Self::Md5),
            "xxhash64" => Ok(Self::XxHash64),
            other => Err(RouteError::Configuration(format!(
                "invalid hash '{}': expected one of \"\", \"md5\", \"xxhash64\"",
                other
            ))),
        }
    }
}

impl fmt::Display for HashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

/// Immutable router configuration.
///
/// Built once, then shared read-only by the exact and prefix routers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    name: String,
    hash: HashKind,
    offsets: Vec<usize>,
}

impl RouterConfig {
    /// Identity-mode configuration: keys are used verbatim as shard ids.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            hash: HashKind::None,
            offsets: Vec::new(),
        }
    }

    /// Set the component hash
    pub fn hash(mut self, hash: HashKind) -> Self {
        self.hash = hash;
        self
    }

    /// Set the component boundaries
    pub fn offsets(mut self, offsets: Vec<usize>) -> Self {
        self.offsets = offsets;
        self
    }

    /// Parse the declarative `hash` / `offsets` parameters.
    ///
    /// Missing parameters mean identity mode. `offsets` is ignored unless a
    /// hash is configured.
    pub fn from_params(name: &str, params: Option<&HashMap<String, String>>) -> Result<Self> {
        let config = Self::new(name);
        let Some(params) = params else {
            return Ok(config);
        };

        let raw_hash = params.get(PARAM_HASH).map(String::as_str).unwrap_or("");
        let hash = raw_hash.parse::<HashKind>().map_err(|_| {
            RouteError::Configuration(format!("invalid hash {} to router {}", raw_hash, name))
        })?;
        if !hash.is_enabled() {
            return Ok(config);
        }

        let raw_offsets = match params.get(PARAM_OFFSETS).map(String::as_str) {
            None | Some("") => {
                return Err(RouteError::Configuration(format!(
                    "router {} requires offsets when hash is defined",
                    name
                )));
            }
            Some(raw) => raw,
        };
        let offsets = parse_offsets(raw_offsets).map_err(|_| {
            RouteError::Configuration(format!(
                "invalid offsets {} to router {}: expected sorted positive ints in brackets",
                raw_offsets, name
            ))
        })?;

        config.hash(hash).offsets(offsets).build()
    }

    /// Check the invariants without consuming the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.hash.is_enabled() {
            return Ok(());
        }
        if self.offsets.is_empty() {
            return Err(RouteError::Configuration(format!(
                "router {} requires offsets when hash is defined",
                self.name
            )));
        }
        if !self.offsets.is_sorted() {
            return Err(RouteError::Configuration(format!(
                "offsets {:?} to router {} are not sorted",
                self.offsets, self.name
            )));
        }
        if self.offsets[0] == 0 {
            return Err(RouteError::Configuration(format!(
                "offsets {:?} to router {} must be positive",
                self.offsets, self.name
            )));
        }
        Ok(())
    }

    /// Validate and normalise: equal adjacent offsets collapse into one.
    pub fn build(mut self) -> Result<Self> {
        self.validate()?;
        let before = self.offsets.len();
        self.offsets.dedup();
        if self.offsets.len() != before {
            tracing::warn!(
                router = %self.name,
                offsets = ?self.offsets,
                "collapsed duplicate offsets"
            );
        }
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hash_kind(&self) -> HashKind {
        self.hash
    }

    pub fn component_offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Minimum length of a complete key, if hashing is enabled.
    pub fn last_offset(&self) -> Option<usize> {
        if self.hash.is_enabled() {
            self.offsets.last().copied()
        } else {
            None
        }
    }

    /// Approximate heap + inline footprint in bytes.
    pub fn estimated_size(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.name.capacity()
            + self.offsets.capacity() * std::mem::size_of::<usize>()
    }
}

/// JSON array of non-negative integers. Ordering and positivity are checked
/// by [`RouterConfig::validate`].
fn parse_offsets(raw: &str) -> Result<Vec<usize>> {
    let parsed: Vec<i64> = serde_json::from_str(raw)?;
    parsed
        .into_iter()
        .map(|off| {
            usize::try_from(off).map_err(|_| {
                RouteError::Configuration(format!("offset {} is not a positive integer", off))
            })
        })
        .collect()
}
