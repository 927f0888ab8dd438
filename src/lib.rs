// ============================================================================
// shardkey Library
// ============================================================================

pub mod config;
pub mod core;
pub mod expression;
pub mod hash;
pub mod registry;
pub mod router;
pub mod transform;

// Re-export main types for convenience
pub use config::{HashKind, RouterConfig};
pub use crate::core::{Destination, KeyRange, Result, RouteError, Value, increment};
pub use registry::{RouterRegistry, RouterSet, RoutingDefinition};
pub use router::{CompareOp, ExactRouter, PrefixRouter, Router};
pub use transform::{KeyTransform, TransformMode};

// ============================================================================
// Declarative construction
// ============================================================================

/// Build a composite-key router from declarative `hash` / `offsets` parameters.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use shardkey::{Destination, Router, Value};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut params = HashMap::new();
/// params.insert("hash".to_string(), "md5".to_string());
/// params.insert("offsets".to_string(), "[2,4]".to_string());
///
/// let router = shardkey::build_router("cfc_md5", Some(&params))?;
///
/// let ids = router.map(&[Value::from("aabbcc")])?;
/// assert!(ids[0].is_single_shard());
///
/// let ranges = router.prefix_router().map(&[Value::from("aabb%")])?;
/// assert!(matches!(ranges[0], Destination::ShardRange(_)));
/// assert!(ranges[0].contains(ids[0].shard_id().unwrap()));
/// # Ok(())
/// # }
/// ```
pub fn build_router(
    name: &str,
    params: Option<&std::collections::HashMap<String, String>>,
) -> Result<ExactRouter> {
    ExactRouter::new(RouterConfig::from_params(name, params)?)
}
