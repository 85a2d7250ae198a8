//! Product catalog: the base offering and its optional add-ons.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogAddOn {
    pub key: String,
    pub label: String,
    pub price: f64,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCatalog {
    #[serde(default)]
    pub base_offering_key: String,
    pub base_label: String,
    pub base_price: f64,
    #[serde(default)]
    pub add_ons: Vec<CatalogAddOn>,
}

impl Default for ProductCatalog {
    fn default() -> Self {
        Self {
            base_offering_key: "life_legacy_base".to_string(),
            base_label: "Life & Legacy Base".to_string(),
            base_price: 950.0,
            add_ons: vec![
                CatalogAddOn {
                    key: "advanced_healthcare_directives".to_string(),
                    label: "Advanced Healthcare Directives".to_string(),
                    price: 250.0,
                    enabled: true,
                },
                CatalogAddOn {
                    key: "kids_protection_plan".to_string(),
                    label: "Kids Protection Plan".to_string(),
                    price: 300.0,
                    enabled: false,
                },
            ],
        }
    }
}

impl ProductCatalog {
    pub fn get_add_on_mut(&mut self, key: &str) -> Option<&mut CatalogAddOn> {
        self.add_ons.iter_mut().find(|a| a.key == key)
    }

    /// Flips an add-on. Returns the new state, or `None` for an unknown key.
    pub fn toggle_add_on(&mut self, key: &str) -> Option<bool> {
        let add_on = self.get_add_on_mut(key)?;
        add_on.enabled = !add_on.enabled;
        Some(add_on.enabled)
    }

    pub fn enabled_add_ons(&self) -> impl Iterator<Item = &CatalogAddOn> {
        self.add_ons.iter().filter(|a| a.enabled)
    }

    /// Base price plus every enabled add-on.
    pub fn total(&self) -> f64 {
        self.base_price + self.enabled_add_ons().map(|a| a.price).sum::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_total_counts_enabled_add_ons_only() {
        let catalog = ProductCatalog::default();
        assert_eq!(catalog.total(), 1200.0);
    }

    #[test]
    fn test_toggle_add_on() {
        let mut catalog = ProductCatalog::default();
        assert_eq!(catalog.toggle_add_on("kids_protection_plan"), Some(true));
        assert_eq!(catalog.total(), 1500.0);
        assert_eq!(catalog.toggle_add_on("nope"), None);
    }
}
