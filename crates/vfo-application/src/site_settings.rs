//! Site configuration and product catalog services.
//!
//! Keys: `siteConfig` → `SiteConfig`, `catalog` → `ProductCatalog`

use std::sync::Arc;

use serde_json::{Map, Value};
use vfo_core::catalog::ProductCatalog;
use vfo_core::error::{Result, VfoError};
use vfo_core::site_config::SiteConfig;
use vfo_core::store::{KeyValueStore, KeyValueStoreExt, keys};

pub struct SiteConfigService {
    store: Arc<dyn KeyValueStore>,
}

impl SiteConfigService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The stored config, or an empty one.
    pub fn get(&self) -> SiteConfig {
        self.store.get_or_default(keys::SITE_CONFIG)
    }

    /// Shallow-merges `patch` over the stored config and saves the result.
    pub fn save(&self, patch: &Map<String, Value>) -> Result<SiteConfig> {
        let merged = self.get().merged(patch)?;
        self.store.set(keys::SITE_CONFIG, &merged)?;
        Ok(merged)
    }
}

pub struct CatalogService {
    store: Arc<dyn KeyValueStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The stored catalog. The first read persists the default catalog.
    pub fn get(&self) -> Result<ProductCatalog> {
        match self.store.get_raw(keys::CATALOG)? {
            Some(_) => Ok(self.store.get_or_default(keys::CATALOG)),
            None => {
                let catalog = ProductCatalog::default();
                self.store.set(keys::CATALOG, &catalog)?;
                Ok(catalog)
            }
        }
    }

    pub fn save(&self, catalog: &ProductCatalog) -> Result<()> {
        self.store.set(keys::CATALOG, catalog)
    }

    /// Flips an add-on and returns the saved catalog.
    pub fn toggle_add_on(&self, key: &str) -> Result<ProductCatalog> {
        let mut catalog = self.get()?;
        catalog
            .toggle_add_on(key)
            .ok_or_else(|| VfoError::not_found("add-on", key))?;
        self.save(&catalog)?;
        Ok(catalog)
    }

    pub fn total(&self) -> Result<f64> {
        Ok(self.get()?.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vfo_infrastructure::MemoryStore;

    #[test]
    fn test_catalog_seeded_on_first_read_then_toggled() {
        let service = CatalogService::new(Arc::new(MemoryStore::new()));
        assert_eq!(service.total().unwrap(), 1200.0);

        let catalog = service.toggle_add_on("kids_protection_plan").unwrap();
        assert!(catalog.add_ons[1].enabled);
        assert_eq!(service.total().unwrap(), 1500.0);
        assert!(service.toggle_add_on("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_site_config_patch_merges() {
        let service = SiteConfigService::new(Arc::new(MemoryStore::new()));
        service
            .save(json!({"logoPath": "/wy-apt-logo.png"}).as_object().unwrap())
            .unwrap();
        let saved = service
            .save(json!({"paywallEnabled": false}).as_object().unwrap())
            .unwrap();
        assert_eq!(saved.logo_path.as_deref(), Some("/wy-apt-logo.png"));
        assert_eq!(saved.paywall_enabled, Some(false));
    }
}
