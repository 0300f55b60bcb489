use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::population::Population;
use crate::spec::PopulationSpec;

const BUILTIN: &str = include_str!("data/populations.json");

/// A named set of population specs, loaded from JSON.
///
/// The document shape is `{ "populations": [ <spec>, ... ] }`. Every spec is
/// validated on load and names must be unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    populations: Vec<PopulationSpec>,
}

impl Catalog {
    /// The catalog shipped with the crate.
    pub fn builtin() -> SimResult<Self> {
        Self::from_json_str(BUILTIN)
    }

    /// Parse and validate a catalog document.
    pub fn from_json_str(json: &str) -> SimResult<Self> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Read, parse, and validate a catalog file.
    pub fn from_file(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SimError::CatalogRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Build a catalog from specs, validating each.
    pub fn from_specs(populations: Vec<PopulationSpec>) -> SimResult<Self> {
        let catalog = Self { populations };
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> SimResult<()> {
        let mut seen = HashSet::new();
        for spec in &self.populations {
            spec.validate()?;
            if !seen.insert(spec.name.as_str()) {
                return Err(SimError::DuplicatePopulation(spec.name.clone()));
            }
        }
        Ok(())
    }

    /// Look up a spec by name.
    pub fn get(&self, name: &str) -> Option<&PopulationSpec> {
        self.populations.iter().find(|p| p.name == name)
    }

    /// Population names in document order.
    pub fn names(&self) -> Vec<&str> {
        self.populations.iter().map(|p| p.name.as_str()).collect()
    }

    /// Iterate over the specs in document order.
    pub fn iter(&self) -> impl Iterator<Item = &PopulationSpec> {
        self.populations.iter()
    }

    /// Number of specs.
    pub fn len(&self) -> usize {
        self.populations.len()
    }

    /// Return `true` if the catalog holds no specs.
    pub fn is_empty(&self) -> bool {
        self.populations.is_empty()
    }

    /// Keep only the named specs, in document order.
    ///
    /// Fails on the first name the catalog does not contain.
    pub fn select(&self, names: &[String]) -> SimResult<Self> {
        if let Some(missing) = names.iter().find(|n| self.get(n).is_none()) {
            return Err(SimError::PopulationNotFound(missing.clone()));
        }
        Ok(Self {
            populations: self
                .populations
                .iter()
                .filter(|p| names.contains(&p.name))
                .cloned()
                .collect(),
        })
    }

    /// Instantiate an empty [`Population`] for every spec.
    pub fn into_populations(self) -> SimResult<Vec<Population>> {
        self.populations.into_iter().map(Population::new).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{Bound, Choice, Evolution, SiteRule};
    use std::io::Write;

    #[test]
    fn builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(
            catalog.names(),
            vec![
                "canyon",
                "geyser",
                "sinkhole",
                "hot_spring",
                "mesa",
                "sandstorm",
                "avalanche",
                "cobbler",
                "potter",
                "diplomat",
                "assayer",
            ]
        );
    }

    #[test]
    fn builtin_covers_every_rule_shape() {
        let catalog = Catalog::builtin().unwrap();
        let sites: Vec<&SiteRule> = catalog.iter().map(|p| &p.site).collect();
        assert!(sites.iter().any(|s| matches!(s, SiteRule::Tile { .. })));
        assert!(sites.iter().any(|s| matches!(s, SiteRule::Near { .. })));
        assert!(sites.iter().any(|s| matches!(s, SiteRule::Creature { .. })));

        let evolutions: Vec<&Evolution> = catalog
            .iter()
            .flat_map(|p| p.attributes.iter().map(|a| &a.evolution))
            .collect();
        assert!(evolutions.iter().any(|e| matches!(e, Evolution::Fixed)));
        assert!(evolutions.iter().any(|e| matches!(e, Evolution::Approach { .. })));
        assert!(evolutions.iter().any(|e| matches!(e, Evolution::Walk { .. })));
        assert!(evolutions.iter().any(|e| matches!(e, Evolution::Coupled { .. })));
        assert!(evolutions.iter().any(|e| matches!(e, Evolution::Product { .. })));

        let geyser = catalog.get("geyser").unwrap();
        let vitality = geyser.retention.vitality.as_ref().unwrap();
        assert_eq!(vitality.bound, Bound::Outside { low: 5.0, high: 95.0 });

        let cobbler = catalog.get("cobbler").unwrap();
        assert!(matches!(
            cobbler.categories[0].choice,
            Choice::Tiered { rederive: true, .. }
        ));

        let diplomat = catalog.get("diplomat").unwrap();
        assert_eq!(diplomat.admission_ceiling(), 4);
    }

    #[test]
    fn builtin_populations_instantiate() {
        let populations = Catalog::builtin().unwrap().into_populations().unwrap();
        assert_eq!(populations.len(), 11);
        assert!(populations.iter().all(Population::is_empty));
    }

    #[test]
    fn duplicate_names_rejected() {
        let catalog = Catalog::builtin().unwrap();
        let canyon = catalog.get("canyon").unwrap().clone();
        let err = Catalog::from_specs(vec![canyon.clone(), canyon]).unwrap_err();
        assert!(matches!(err, SimError::DuplicatePopulation(name) if name == "canyon"));
    }

    #[test]
    fn invalid_spec_rejected_on_load() {
        let json = r#"{
            "populations": [{
                "name": "bad",
                "schedule": { "check_interval": 0, "spawn_chance": 0.5, "max_population": 1 },
                "site": { "kind": "tile", "accepts": ["grass"] },
                "retention": { "window": 10 }
            }]
        }"#;
        let err = Catalog::from_json_str(json).unwrap_err();
        assert!(matches!(err, SimError::InvalidSpec { population, .. } if population == "bad"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Catalog::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, SimError::CatalogParse(_)));
    }

    #[test]
    fn select_filters_in_document_order() {
        let catalog = Catalog::builtin().unwrap();
        let picked = catalog
            .select(&["potter".to_string(), "canyon".to_string()])
            .unwrap();
        assert_eq!(picked.names(), vec!["canyon", "potter"]);

        let err = catalog.select(&["volcano".to_string()]).unwrap_err();
        assert!(matches!(err, SimError::PopulationNotFound(name) if name == "volcano"));
    }

    #[test]
    fn from_file_reads_catalog() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&Catalog::builtin().unwrap()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let catalog = Catalog::from_file(file.path()).unwrap();
        assert_eq!(catalog, Catalog::builtin().unwrap());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Catalog::from_file(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, SimError::CatalogRead { .. }));
    }
}
