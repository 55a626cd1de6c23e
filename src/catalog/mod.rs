mod defaults;

use crate::error::{CropCastError, Result};
use crate::models::CropParams;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Quick planning figures for a crop, independent of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropBaseline {
    pub tonnes_per_acre: f64,
    pub cycle_days: u32,
}

/// Injectable name → crop parameter table.
///
/// Keys are stored lower-cased; lookups trim and lower-case the query.
#[derive(Debug, Clone, Default)]
pub struct CropCatalog {
    crops: BTreeMap<String, CropParams>,
    categories: BTreeMap<String, Vec<String>>,
    baselines: BTreeMap<String, CropBaseline>,
}

/// On-disk layout for a custom crop table.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    crops: BTreeMap<String, CropParams>,
    #[serde(default)]
    categories: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    baselines: BTreeMap<String, CropBaseline>,
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

impl CropCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Catalog pre-loaded with the built-in crop defaults.
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        for (name, params) in defaults::builtin_crops() {
            catalog.insert(name, params);
        }
        for (category, names) in defaults::categories() {
            catalog.categories.insert(
                category.to_string(),
                names.into_iter().map(String::from).collect(),
            );
        }
        for (name, tonnes_per_acre, cycle_days) in defaults::baselines() {
            catalog.baselines.insert(
                normalize(name),
                CropBaseline {
                    tonnes_per_acre,
                    cycle_days,
                },
            );
        }
        catalog
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: CatalogFile = serde_yaml::from_str(yaml)?;
        let mut catalog = Self::empty();
        for (name, params) in file.crops {
            catalog.insert(&name, params);
        }
        catalog.categories = file.categories;
        catalog.baselines = file
            .baselines
            .into_iter()
            .map(|(name, baseline)| (normalize(&name), baseline))
            .collect();
        Ok(catalog)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CropCastError::Config(format!(
                "Failed to read crop catalog {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Built-ins, with the optional custom table merged over them.
    pub fn load(overlay: Option<&Path>) -> Result<Self> {
        let mut catalog = Self::builtin();
        if let Some(path) = overlay {
            let custom = Self::from_yaml_file(path)?;
            tracing::info!(path = %path.display(), crops = custom.len(), "Merged custom crop catalog");
            catalog.merge(custom);
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, name: &str, params: CropParams) {
        self.crops.insert(normalize(name), params);
    }

    /// Overlay another catalog; entries in `other` replace ours.
    pub fn merge(&mut self, other: CropCatalog) {
        self.crops.extend(other.crops);
        for (category, names) in other.categories {
            let entry = self.categories.entry(category).or_default();
            for name in names {
                if !entry.contains(&name) {
                    entry.push(name);
                }
            }
        }
        self.baselines.extend(other.baselines);
    }

    pub fn get(&self, name: &str) -> Result<&CropParams> {
        self.crops
            .get(&normalize(name))
            .ok_or_else(|| CropCastError::UnsupportedCrop {
                name: name.trim().to_string(),
                supported: self.supported(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.crops.contains_key(&normalize(name))
    }

    /// Sorted lookup keys.
    pub fn supported(&self) -> Vec<String> {
        self.crops.keys().cloned().collect()
    }

    pub fn categories(&self) -> &BTreeMap<String, Vec<String>> {
        &self.categories
    }

    pub fn baseline(&self, name: &str) -> Result<CropBaseline> {
        self.baselines
            .get(&normalize(name))
            .copied()
            .ok_or_else(|| CropCastError::UnsupportedCrop {
                name: name.trim().to_string(),
                supported: self.baselines.keys().cloned().collect(),
            })
    }

    pub fn len(&self) -> usize {
        self.crops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }
}
