use std::collections::HashMap;

use serde::Serialize;

/// Footprint used for foods missing from the catalog (kg CO2e per kg).
pub const DEFAULT_FOOTPRINT_KG_PER_KG: f64 = 1.0;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FoodCatalogEntry {
    pub name: String,
    pub local_name: String,
    pub shelf_life_days: u32,
    pub carbon_footprint_kg_per_kg: f64,
}

/// Static food reference data, keyed by lowercase food name.
#[derive(Debug, Clone)]
pub struct FoodCatalog {
    entries: HashMap<String, FoodCatalogEntry>,
}

// (name, local name, shelf life in days, kg CO2e per kg)
const BUILTIN_FOODS: &[(&str, &str, u32, f64)] = &[
    ("tomato", "Tomat", 7, 1.1),
    ("banana", "Pisang", 5, 0.9),
    ("apple", "Apel", 30, 0.5),
    ("milk", "Susu", 7, 1.5),
    ("bread", "Roti", 5, 1.0),
    ("egg", "Telur", 21, 0.8),
    ("chicken", "Ayam", 2, 3.2),
    ("lettuce", "Selada", 3, 0.3),
    ("rice", "Nasi", 4, 2.7),
    ("pasta", "Pasta", 5, 1.2),
    ("cheese", "Keju", 21, 8.5),
    ("beef", "Daging Sapi", 3, 27.0),
    ("pork", "Daging Babi", 3, 6.1),
    ("fish", "Ikan", 2, 3.9),
];

impl FoodCatalog {
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN_FOODS.iter().map(|&(name, local, shelf, footprint)| {
            FoodCatalogEntry {
                name: name.to_string(),
                local_name: local.to_string(),
                shelf_life_days: shelf,
                carbon_footprint_kg_per_kg: footprint,
            }
        }))
    }

    pub fn from_entries(entries: impl IntoIterator<Item = FoodCatalogEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|e| (e.name.to_lowercase(), e))
            .collect();
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&FoodCatalogEntry> {
        self.entries.get(&name.to_lowercase())
    }

    /// Carbon footprint for `name`, falling back to the default for unknown foods.
    pub fn footprint(&self, name: &str) -> f64 {
        self.get(name)
            .map(|e| e.carbon_footprint_kg_per_kg)
            .unwrap_or(DEFAULT_FOOTPRINT_KG_PER_KG)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Default for FoodCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
