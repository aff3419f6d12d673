//! # Resolver Configuration
//!
//! Tunables for coercion. Every field has a default, so an empty document
//! (or `ResolverConfig::default()`) gives the strict standard behaviour.

use crate::descriptor::CollectionFormat;
use crate::error::ParamResult;
use serde::{Deserialize, Serialize};

/// Strings accepted as booleans. Matching ignores ASCII case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BooleanVocabulary {
    /// Spellings of `true`.
    pub truthy: Vec<String>,
    /// Spellings of `false`.
    pub falsy: Vec<String>,
}

impl Default for BooleanVocabulary {
    fn default() -> Self {
        Self {
            truthy: ["true", "1", "yes", "on"].map(String::from).to_vec(),
            falsy: ["false", "0", "no", "off"].map(String::from).to_vec(),
        }
    }
}

impl BooleanVocabulary {
    /// Looks the raw value up in the vocabulary. `None` means it is not a boolean.
    pub fn parse(&self, raw: &str) -> Option<bool> {
        if self.truthy.iter().any(|t| t.eq_ignore_ascii_case(raw)) {
            Some(true)
        } else if self.falsy.iter().any(|f| f.eq_ignore_ascii_case(raw)) {
            Some(false)
        } else {
            None
        }
    }
}

/// Options applied by the [`Resolver`](crate::resolver::Resolver).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Boolean spellings.
    pub boolean: BooleanVocabulary,
    /// Collection format assumed for arrays that declare none.
    /// `None` rejects such descriptors as invalid definitions.
    pub default_collection_format: Option<CollectionFormat>,
    /// Strip surrounding whitespace from raw text before coercing.
    pub trim_whitespace: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            boolean: BooleanVocabulary::default(),
            default_collection_format: None,
            trim_whitespace: true,
        }
    }
}

impl ResolverConfig {
    /// Parses a configuration document from YAML.
    pub fn from_yaml_str(yaml: &str) -> ParamResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses a configuration document from JSON.
    pub fn from_json_str(json: &str) -> ParamResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
