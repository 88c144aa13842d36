// src/catalog/fixture.rs

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::{Catalog, Category};


/// The bundled demonstration catalog, embedded at build time.
const DEMO_CATALOG: &str = include_str!("../../fixtures/catalog.json");


/// On-disk catalog layout. Validation happens after deserialization.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    categories: Vec<Category>,
}


impl Catalog {
    /// The six-product demo catalog shipped in `fixtures/catalog.json`.
    pub fn demo() -> Result<Self> {
        parse_catalog(DEMO_CATALOG).context("Bundled demo catalog is invalid")
    }
}


/// Load and validate a catalog from a JSON file on disk.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog> {
    let path = path.as_ref();

    let contents = fs::read_to_string(path).with_context(|| {
        format!("Failed to read catalog fixture '{}'", path.display())
    })?;

    parse_catalog(&contents).with_context(|| {
        format!(
            "Failed to load catalog '{}'.\n\
             Ensure it's valid JSON of the form {{\"categories\": [{{\"key\", \"products\"}}]}}.",
            path.display()
        )
    })
}


fn parse_catalog(raw: &str) -> Result<Catalog> {
    let parsed: CatalogFile = serde_json::from_str(raw)?;
    Ok(Catalog::new(parsed.categories)?)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_catalog_loads() {
        let catalog = Catalog::demo().expect("demo catalog");
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.categories().len(), 4);

        let lego = catalog.find_by_id("5").expect("lego");
        assert_eq!(lego.category, "Toys");
        assert_eq!(lego.prices["amazon"], 128.00);
    }

    #[test]
    fn parse_rejects_invalid_prices() {
        let raw = r#"{"categories":[{"key":"misc","products":[
            {"id":"1","name":"X","category":"Misc","imageUrl":"x","prices":{"amazon":-3.0}}
        ]}]}"#;
        let err = parse_catalog(raw).unwrap_err();
        assert!(err.to_string().contains("negative price"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = load_catalog("fixtures/does-not-exist.json").unwrap_err();
        assert!(err.to_string().contains("does-not-exist.json"));
    }
}
