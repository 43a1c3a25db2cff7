// Vendor catalog: immutable once loaded, passed explicitly into the session.

pub mod profile;

pub use profile::{VendorEntry, VendorProfile};

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::errors::CatalogError;

const BUILTIN_CATALOG: &str = include_str!("../../catalog/wafs.json");

#[derive(Deserialize)]
struct CatalogFile(#[serde(deserialize_with = "profile::ordered_pairs")] Vec<(String, VendorEntry)>);

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    vendors: Vec<VendorProfile>,
}

impl Catalog {
    /// Build from already validated profiles. Names must be unique.
    pub fn new(vendors: Vec<VendorProfile>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for v in &vendors {
            if !seen.insert(v.name.as_str()) {
                return Err(CatalogError::DuplicateVendor(v.name.clone()));
            }
        }
        Ok(Self { vendors })
    }

    pub fn from_json(data: &str) -> Result<Self, CatalogError> {
        let CatalogFile(entries) = serde_json::from_str(data)?;
        let vendors = entries
            .into_iter()
            .map(|(name, entry)| VendorProfile::from_entry(&name, entry))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(vendors)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// The vendor table shipped with the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn get(&self, name: &str) -> Option<&VendorProfile> {
        self.vendors.iter().find(|v| v.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.vendors.iter().map(|v| v.name.as_str()).collect()
    }

    pub fn vendors(&self) -> &[VendorProfile] {
        &self.vendors
    }

    pub fn len(&self) -> usize {
        self.vendors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }

    /// Resolve a vendor selection. `None` means the whole catalog in catalog order;
    /// otherwise the requested order is kept and unknown names are returned separately.
    pub fn select<'a>(&'a self, names: Option<&'a [String]>) -> (Vec<&'a VendorProfile>, Vec<&'a str>) {
        match names {
            None => (self.vendors.iter().collect(), Vec::new()),
            Some(names) => {
                let mut found = Vec::new();
                let mut unknown = Vec::new();
                for name in names {
                    match self.get(name) {
                        Some(v) => found.push(v),
                        None => unknown.push(name.as_str()),
                    }
                }
                (found, unknown)
            }
        }
    }
}
