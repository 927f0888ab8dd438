//! Router facades over the key transform.
//!
//! [`ExactRouter`] maps complete keys to a single shard id and backs every
//! comparison except LIKE. [`PrefixRouter`] maps the literal prefix of a LIKE
//! pattern to the range of shard ids that can hold matching rows. Both share
//! one [`RouterConfig`].

use crate::config::RouterConfig;
use crate::core::{Destination, Result, RouteError, Value};
use crate::expression::literal_prefix;
use crate::transform::{KeyTransform, TransformMode};
use std::fmt;
use std::sync::Arc;

/// Routing cost: a pure O(key length) function, no lookups.
pub const ROUTER_COST: u32 = 1;

/// Capability set every router exposes to the query planner.
pub trait Router: Send + Sync + fmt::Debug {
    /// Router name for diagnostics
    fn name(&self) -> &str;

    /// Planner priority hint; lower is cheaper.
    fn cost(&self) -> u32;

    /// Whether a value maps to exactly one shard.
    fn is_unique(&self) -> bool;

    /// Whether routing needs a round-trip to the database.
    fn needs_external_context(&self) -> bool;

    /// For each value, whether it maps to the matching expected shard id.
    fn verify(&self, values: &[Value], expected_ids: &[Vec<u8>]) -> Result<Vec<bool>>;

    /// Destination for each value. Fails for the whole batch on the first bad value.
    fn map(&self, values: &[Value]) -> Result<Vec<Destination>>;

    /// Variant used for LIKE predicates, if the router has one.
    fn prefix(&self) -> Option<&dyn Router> {
        None
    }
}

/// Comparison a routed column appears in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Equal,
    NullSafeEqual,
    In,
    Like,
}

/// Unique router for complete composite keys.
#[derive(Debug, Clone)]
pub struct ExactRouter {
    config: Arc<RouterConfig>,
    prefix: PrefixRouter,
}

impl ExactRouter {
    /// Validate `config` and build the exact router with its prefix variant.
    pub fn new(config: RouterConfig) -> Result<Self> {
        let config = Arc::new(config.build()?);
        tracing::debug!(
            router = %config.name(),
            hash = %config.hash_kind(),
            offsets = ?config.component_offsets(),
            "built composite key router"
        );
        Ok(Self {
            prefix: PrefixRouter {
                config: Arc::clone(&config),
            },
            config,
        })
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// The LIKE-predicate variant sharing this router's configuration.
    pub fn prefix_router(&self) -> &PrefixRouter {
        &self.prefix
    }

    /// Router to consult for a column compared with `op`.
    pub fn router_for(&self, op: CompareOp) -> &dyn Router {
        match op {
            CompareOp::Like => &self.prefix as &dyn Router,
            CompareOp::Equal | CompareOp::NullSafeEqual | CompareOp::In => self as &dyn Router,
        }
    }

    /// Shard id of one complete key.
    pub fn shard_id(&self, key: &[u8]) -> Result<Vec<u8>> {
        KeyTransform::from_validated(&self.config).compute(key, TransformMode::Full)
    }
}

impl Router for ExactRouter {
    fn name(&self) -> &str {
        self.config.name()
    }

    fn cost(&self) -> u32 {
        ROUTER_COST
    }

    fn is_unique(&self) -> bool {
        true
    }

    fn needs_external_context(&self) -> bool {
        false
    }

    fn verify(&self, values: &[Value], expected_ids: &[Vec<u8>]) -> Result<Vec<bool>> {
        verify_exact(&self.config, values, expected_ids)
    }

    fn map(&self, values: &[Value]) -> Result<Vec<Destination>> {
        let transform = KeyTransform::from_validated(&self.config);
        values
            .iter()
            .map(|value| {
                transform
                    .compute(&value.to_bytes(), TransformMode::Full)
                    .map(Destination::ShardId)
            })
            .collect()
    }

    fn prefix(&self) -> Option<&dyn Router> {
        Some(&self.prefix)
    }
}

impl fmt::Display for ExactRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.config.name())
    }
}

/// Non-unique router for LIKE pattern literals.
#[derive(Debug, Clone)]
pub struct PrefixRouter {
    config: Arc<RouterConfig>,
}

impl PrefixRouter {
    /// Shard range that can hold rows matching `pattern`.
    pub fn destination_for_pattern(&self, pattern: &[u8]) -> Result<Destination> {
        let prefix = literal_prefix(pattern);
        let begin =
            KeyTransform::from_validated(&self.config).compute(&prefix, TransformMode::Partial)?;
        Ok(Destination::from_prefix(begin))
    }
}

impl Router for PrefixRouter {
    fn name(&self) -> &str {
        self.config.name()
    }

    fn cost(&self) -> u32 {
        ROUTER_COST
    }

    fn is_unique(&self) -> bool {
        false
    }

    fn needs_external_context(&self) -> bool {
        false
    }

    /// A pattern literal written by INSERT is a plain key, so verification
    /// is the exact router's.
    fn verify(&self, values: &[Value], expected_ids: &[Vec<u8>]) -> Result<Vec<bool>> {
        verify_exact(&self.config, values, expected_ids)
    }

    fn map(&self, values: &[Value]) -> Result<Vec<Destination>> {
        values
            .iter()
            .map(|value| self.destination_for_pattern(&value.to_bytes()))
            .collect()
    }
}

impl fmt::Display for PrefixRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.config.name())
    }
}

fn verify_exact(
    config: &RouterConfig,
    values: &[Value],
    expected_ids: &[Vec<u8>],
) -> Result<Vec<bool>> {
    if values.len() != expected_ids.len() {
        return Err(RouteError::LengthMismatch {
            values: values.len(),
            ids: expected_ids.len(),
        });
    }
    let transform = KeyTransform::from_validated(config);
    values
        .iter()
        .zip(expected_ids)
        .map(|(value, expected)| {
            let id = transform.compute(&value.to_bytes(), TransformMode::Full)?;
            Ok(id == *expected)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HashKind;
    use crate::hash::md5_truncated;

    fn md5_router(offsets: Vec<usize>) -> ExactRouter {
        ExactRouter::new(RouterConfig::new("cfc_md5").hash(HashKind::Md5).offsets(offsets))
            .unwrap()
    }

    #[test]
    fn test_capabilities() {
        let router = md5_router(vec![2, 4]);
        assert_eq!(router.name(), "cfc_md5");
        assert_eq!(router.cost(), 1);
        assert!(router.is_unique());
        assert!(!router.needs_external_context());

        let prefix = router.prefix_router();
        assert_eq!(prefix.name(), "cfc_md5");
        assert_eq!(prefix.cost(), 1);
        assert!(!prefix.is_unique());
        assert!(!prefix.needs_external_context());
        assert!(prefix.prefix().is_none());
    }

    #[test]
    fn test_router_for_dispatches_like_to_prefix() {
        let router = md5_router(vec![2, 4]);
        assert!(router.router_for(CompareOp::Equal).is_unique());
        assert!(router.router_for(CompareOp::In).is_unique());
        assert!(router.router_for(CompareOp::NullSafeEqual).is_unique());
        assert!(!router.router_for(CompareOp::Like).is_unique());
    }

    #[test]
    fn test_map_aborts_batch_on_short_key() {
        let router = md5_router(vec![4, 8]);
        let err = router
            .map(&[Value::from("abcdefgh"), Value::from("ab")])
            .unwrap_err();
        assert!(matches!(err, RouteError::InsufficientKeyLength { need: 8, got: 2, .. }));
    }

    #[test]
    fn test_prefix_map_short_literal() {
        let router = md5_router(vec![2, 4]);
        let dest = router.prefix_router().map(&[Value::from("ab%")]).unwrap();
        assert_eq!(dest, vec![Destination::from_prefix(md5_truncated(b"ab"))]);
    }

    #[test]
    fn test_prefix_map_without_full_component_is_all_shards() {
        let router = md5_router(vec![4, 8]);
        let dest = router.prefix_router().map(&[Value::from("ab%")]).unwrap();
        assert_eq!(dest, vec![Destination::AllShards]);
    }

    #[test]
    fn test_verify_length_mismatch() {
        let router = md5_router(vec![2]);
        let err = router.verify(&[Value::from("abc")], &[]).unwrap_err();
        assert_eq!(err, RouteError::LengthMismatch { values: 1, ids: 0 });
    }

    #[test]
    fn test_prefix_verify_matches_exact() {
        let router = md5_router(vec![2, 4]);
        let values = vec![Value::from("aabbcc"), Value::from("xxyyzz")];
        let ids = vec![router.shard_id(b"aabbcc").unwrap(), b"nope".to_vec()];
        assert_eq!(router.verify(&values, &ids).unwrap(), vec![true, false]);
        assert_eq!(
            router.prefix_router().verify(&values, &ids).unwrap(),
            vec![true, false]
        );
    }

    #[test]
    fn test_invalid_config_fails_construction() {
        let result = ExactRouter::new(RouterConfig::new("cfc").hash(HashKind::Md5));
        assert!(matches!(result, Err(RouteError::Configuration(_))));
    }
}
