//! Key → shard id transform.
//!
//! A composite key is split at the configured offsets and each component is
//! hashed independently; the shard id is the concatenation of the component
//! hashes. Keys sharing a component-aligned prefix therefore share a shard-id
//! prefix, which is what lets a LIKE prefix map to a contiguous shard range.

use crate::config::RouterConfig;
use crate::core::{Result, RouteError};

/// Whether the input must reach every component boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformMode {
    /// Complete key; shorter than the last offset is an error.
    Full,
    /// Key prefix; stops at the first boundary the input does not reach.
    Partial,
}

/// Borrowing view over a validated configuration that computes shard ids.
#[derive(Debug, Clone, Copy)]
pub struct KeyTransform<'a> {
    config: &'a RouterConfig,
}

impl<'a> KeyTransform<'a> {
    /// Fails with a configuration error unless `config` passes
    /// [`RouterConfig::validate`].
    pub fn new(config: &'a RouterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Caller guarantees `config` came out of [`RouterConfig::build`].
    pub(crate) fn from_validated(config: &'a RouterConfig) -> Self {
        Self { config }
    }

    pub fn compute(&self, key: &[u8], mode: TransformMode) -> Result<Vec<u8>> {
        let Some(last) = self.config.last_offset() else {
            return Ok(key.to_vec());
        };
        let hash = self.config.hash_kind();
        let offsets = self.config.component_offsets();

        let n = key.len();
        if mode == TransformMode::Full && n < last {
            return Err(RouteError::InsufficientKeyLength {
                name: self.config.name().to_string(),
                need: last,
                got: n,
            });
        }

        let mut out = Vec::with_capacity(n);
        let mut prev = 0;
        for &offset in offsets {
            if n < offset {
                tracing::trace!(
                    router = %self.config.name(),
                    offset,
                    len = n,
                    "prefix stops before component boundary"
                );
                return Ok(out);
            }
            out.extend_from_slice(&hash.apply(&key[prev..offset]));
            prev = offset;
        }
        if prev < n {
            out.extend_from_slice(&hash.apply(&key[prev..]));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HashKind;
    use crate::hash::{md5_truncated, xxhash64_truncated};

    fn md5_config(offsets: Vec<usize>) -> RouterConfig {
        RouterConfig::new("cfc")
            .hash(HashKind::Md5)
            .offsets(offsets)
            .build()
            .unwrap()
    }

    #[test]
    fn test_identity_returns_key() {
        let config = RouterConfig::new("cfc");
        let transform = KeyTransform::new(&config).unwrap();
        assert_eq!(transform.compute(b"abc", TransformMode::Full).unwrap(), b"abc");
        assert_eq!(transform.compute(b"", TransformMode::Full).unwrap(), b"");
        assert_eq!(transform.compute(b"ab", TransformMode::Partial).unwrap(), b"ab");
    }

    #[test]
    fn test_full_key_hashes_each_component() {
        let config = md5_config(vec![2, 4]);
        let out = KeyTransform::new(&config)
            .unwrap()
            .compute(b"aabbcccc", TransformMode::Full)
            .unwrap();

        let mut expected = md5_truncated(b"aa");
        expected.extend(md5_truncated(b"bb"));
        expected.extend(md5_truncated(b"cccc"));
        assert_eq!(out, expected);
    }

    #[test]
    fn test_key_ending_on_last_offset_has_no_trailer() {
        let config = md5_config(vec![2, 4]);
        let out = KeyTransform::new(&config)
            .unwrap()
            .compute(b"aabb", TransformMode::Full)
            .unwrap();
        let mut expected = md5_truncated(b"aa");
        expected.extend(md5_truncated(b"bb"));
        assert_eq!(out, expected);
    }

    #[test]
    fn test_full_mode_rejects_short_key() {
        let config = md5_config(vec![4, 8]);
        let err = KeyTransform::new(&config)
            .unwrap()
            .compute(b"ab", TransformMode::Full)
            .unwrap_err();
        assert_eq!(
            err,
            RouteError::InsufficientKeyLength {
                name: "cfc".into(),
                need: 8,
                got: 2,
            }
        );
    }

    #[test]
    fn test_partial_mode_stops_at_boundary() {
        let config = md5_config(vec![4, 8]);
        let transform = KeyTransform::new(&config).unwrap();

        assert!(transform.compute(b"ab", TransformMode::Partial).unwrap().is_empty());
        assert_eq!(
            transform.compute(b"abcdef", TransformMode::Partial).unwrap(),
            md5_truncated(b"abcd")
        );
    }

    #[test]
    fn test_xxhash_components() {
        let config = RouterConfig::new("cfc")
            .hash(HashKind::XxHash64)
            .offsets(vec![3])
            .build()
            .unwrap();
        let out = KeyTransform::new(&config)
            .unwrap()
            .compute(b"abcdefghijklmnop", TransformMode::Full)
            .unwrap();

        let mut expected = xxhash64_truncated(b"abc");
        expected.extend(xxhash64_truncated(b"defghijklmnop"));
        assert_eq!(out, expected);
        assert_eq!(out.len(), 3 + 8);
    }

    #[test]
    fn test_unvalidated_config_is_rejected() {
        let unsorted = RouterConfig::new("cfc")
            .hash(HashKind::Md5)
            .offsets(vec![4, 2]);
        assert!(matches!(
            KeyTransform::new(&unsorted),
            Err(RouteError::Configuration(_))
        ));

        let no_offsets = RouterConfig::new("cfc").hash(HashKind::Md5);
        assert!(matches!(
            KeyTransform::new(&no_offsets),
            Err(RouteError::Configuration(_))
        ));

        let zero = RouterConfig::new("cfc")
            .hash(HashKind::XxHash64)
            .offsets(vec![0, 3]);
        assert!(KeyTransform::new(&zero).is_err());
    }

    #[test]
    fn test_unbuilt_config_with_duplicates_does_not_panic() {
        let config = RouterConfig::new("cfc")
            .hash(HashKind::Md5)
            .offsets(vec![2, 2, 4]);
        let out = KeyTransform::new(&config)
            .unwrap()
            .compute(b"aabbcc", TransformMode::Full)
            .unwrap();

        let mut expected = md5_truncated(b"aa");
        expected.extend(md5_truncated(b"bb"));
        expected.extend(md5_truncated(b"cc"));
        assert_eq!(out, expected);
    }
}
