//! Read-only property listings. The calculators only ever need price, size and type.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::{info, warn};

use crate::types::PropertyType;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyRecord {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub location: String,
    pub price: f64,
    pub size_sq_ft: Option<f64>,
    pub property_type: Option<PropertyType>,
    pub community: Option<String>,
    pub bedrooms: Option<u32>,
}

pub trait PropertyCatalog {
    fn get(&self, id: u32) -> Option<&PropertyRecord>;
    fn list(&self) -> &[PropertyRecord];
}

/// Listings loaded once from a YAML sequence.
#[derive(Debug, Default)]
pub struct YamlCatalog {
    properties: Vec<PropertyRecord>,
}

impl YamlCatalog {
    pub fn new(properties: Vec<PropertyRecord>) -> Self {
        Self { properties }
    }

    /// A missing file is an empty catalog; a malformed one is an error.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("Property catalog {} not found, starting empty", path.display());
            return Ok(Self::default());
        }
        let s = fs::read_to_string(path)
            .with_context(|| format!("reading catalog {}", path.display()))?;
        let properties: Vec<PropertyRecord> = serde_yaml::from_str(&s)
            .with_context(|| format!("parsing catalog {}", path.display()))?;
        info!("Loaded {} properties from {}", properties.len(), path.display());
        Ok(Self { properties })
    }
}

impl PropertyCatalog for YamlCatalog {
    fn get(&self, id: u32) -> Option<&PropertyRecord> {
        self.properties.iter().find(|p| p.id == id)
    }

    fn list(&self) -> &[PropertyRecord] {
        &self.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTINGS: &str = r#"
- id: 1
  name: Marina Heights 2BR
  location: Dubai Marina
  price: 1850000
  size_sq_ft: 1250
  property_type: apartment
  community: Dubai Marina
  bedrooms: 2
- id: 7
  name: Springs Villa
  price: 3200000
"#;

    #[test]
    fn parses_listings_and_looks_up_by_id() {
        let props: Vec<PropertyRecord> = serde_yaml::from_str(LISTINGS).unwrap();
        let cat = YamlCatalog::new(props);
        assert_eq!(cat.list().len(), 2);
        let p = cat.get(1).unwrap();
        assert_eq!(p.property_type, Some(PropertyType::Apartment));
        assert_eq!(p.size_sq_ft, Some(1250.0));
        let v = cat.get(7).unwrap();
        assert_eq!(v.location, "");
        assert_eq!(v.size_sq_ft, None);
        assert!(cat.get(3).is_none());
    }

    #[test]
    fn missing_file_is_an_empty_catalog() {
        let cat = YamlCatalog::load("/definitely/not/here/properties.yaml").unwrap();
        assert!(cat.list().is_empty());
    }
}
