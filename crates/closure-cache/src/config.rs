//! Cache configuration, loadable from TOML.
//!
//! ```toml
//! caching = true
//! direct_predicate = "urn:x-hp-direct-predicate:http_//www.w3.org/2000/01/rdf-schema#subClassOf"
//! closed_predicate = "http://www.w3.org/2000/01/rdf-schema#subClassOf"
//! ```
//!
//! Every key is optional. The predicate names are only consulted by callers
//! that build caches over string terms (such as the command-line tool).

use crate::error::CacheError;
use crate::session::{DIRECT_SUBCLASS_OF, RDFS_SUBCLASS_OF};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Memoize closed-view results between mutations.
    pub caching: bool,
    /// Name of the predicate selecting the direct view.
    pub direct_predicate: String,
    /// Name of the predicate selecting the closed view.
    pub closed_predicate: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            caching: false,
            direct_predicate: DIRECT_SUBCLASS_OF.to_string(),
            closed_predicate: RDFS_SUBCLASS_OF.to_string(),
        }
    }
}

impl CacheConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, CacheError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = CacheConfig::from_toml_str("").expect("empty config parses");
        assert_eq!(config, CacheConfig::default());
        assert!(!config.caching);
        assert_eq!(config.closed_predicate, RDFS_SUBCLASS_OF);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = CacheConfig::from_toml_str(
            "caching = true\ndirect_predicate = \"ex:directBroader\"\nclosed_predicate = \"ex:broader\"\n",
        )
        .expect("config parses");
        assert!(config.caching);
        assert_eq!(config.direct_predicate, "ex:directBroader");
        assert_eq!(config.closed_predicate, "ex:broader");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = CacheConfig::from_toml_str("cache_triples = true").expect_err("unknown key");
        assert!(matches!(err, CacheError::Config(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = CacheConfig::load("/nonexistent/closure-cache.toml").expect_err("missing file");
        assert!(matches!(err, CacheError::Io(_)));
    }
}
