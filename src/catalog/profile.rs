use std::fmt;
use std::marker::PhantomData;

use regex::Regex;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::errors::CatalogError;

/// One catalog entry as it appears in the JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct VendorEntry {
    pub sites: Vec<String>,
    pub block_signatures: Vec<String>,
    #[serde(default)]
    pub test_payload: Option<String>,
    #[serde(default, deserialize_with = "ordered_pairs")]
    pub match_info: Vec<(String, String)>,
}

/// Validated test profile for one WAF product.
#[derive(Debug, Clone)]
pub struct VendorProfile {
    pub name: String,
    pub sites: Vec<String>,
    pub block_signatures: Vec<String>,
    /// Label -> pattern, in catalog order. Every pattern has at least one capture group.
    pub extraction_patterns: Vec<(String, Regex)>,
    pub canonical_payload: Option<String>,
}

impl VendorProfile {
    pub fn from_entry(name: &str, entry: VendorEntry) -> Result<Self, CatalogError> {
        let invalid = |reason: &str| CatalogError::InvalidVendor {
            vendor: name.to_string(),
            reason: reason.to_string(),
        };

        if entry.sites.is_empty() {
            return Err(invalid("sites must not be empty"));
        }
        if entry.block_signatures.is_empty() {
            return Err(invalid("block_signatures must not be empty"));
        }
        if entry.block_signatures.iter().any(|s| s.is_empty()) {
            // an empty signature would match every body
            return Err(invalid("block_signatures must not contain empty strings"));
        }

        let mut extraction_patterns = Vec::with_capacity(entry.match_info.len());
        for (label, pattern) in entry.match_info {
            let re = Regex::new(&pattern).map_err(|source| CatalogError::InvalidPattern {
                vendor: name.to_string(),
                label: label.clone(),
                source,
            })?;
            if re.captures_len() < 2 {
                return Err(invalid(&format!("pattern for {} has no capture group", label)));
            }
            extraction_patterns.push((label, re));
        }

        Ok(Self {
            name: name.to_string(),
            sites: entry.sites,
            block_signatures: entry.block_signatures,
            extraction_patterns,
            canonical_payload: entry.test_payload.filter(|p| !p.is_empty()),
        })
    }

    /// Build a profile in code; used by tests and embedders that skip the JSON layer.
    pub fn new(name: &str, sites: &[&str], block_signatures: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            sites: sites.iter().map(|s| s.to_string()).collect(),
            block_signatures: block_signatures.iter().map(|s| s.to_string()).collect(),
            extraction_patterns: Vec::new(),
            canonical_payload: None,
        }
    }

    pub fn with_canonical_payload(mut self, payload: &str) -> Self {
        self.canonical_payload = Some(payload.to_string());
        self
    }

    pub fn with_pattern(mut self, label: &str, pattern: Regex) -> Self {
        self.extraction_patterns.push((label.to_string(), pattern));
        self
    }
}

/// Deserialize a JSON object into `(key, value)` pairs, keeping document order.
pub(crate) fn ordered_pairs<'de, D, V>(deserializer: D) -> Result<Vec<(String, V)>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct PairsVisitor<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for PairsVisitor<V> {
        type Value = Vec<(String, V)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a JSON object")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, V>()? {
                out.push((key, value));
            }
            Ok(out)
        }
    }

    deserializer.deserialize_map(PairsVisitor(PhantomData))
}
