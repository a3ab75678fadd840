//! In-memory catalog of ships, shield generators and shield boosters.
//!
//! Loaded once per session from a single JSON document. Generators are expanded into every
//! blueprint x experimental variant at load time and indexed by kind and class. Apart from
//! [DataCatalog::import_loadout] the catalog is read-only; test cases borrow it.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::data::booster::{BoosterRecord, ShieldBoosterVariant};
use crate::data::generator::{engineered_variants, Engineering, GeneratorKind, GeneratorRecord, ShieldGenerator};
use crate::data::import::derive_imported_ship;
use crate::data::ship::{Ship, ShipRecord};
use crate::data::validate::validate_catalog;
use crate::error::{CatalogError, ConfigError, Error, Result};
use crate::optimizer::TestCase;

pub const DEFAULT_CATALOG_PATH: &str = "data/shield_data.json";

/// On-disk layout of the catalog document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub ships: Vec<ShipRecord>,
    #[serde(default)]
    pub shield_booster_variants: Vec<BoosterRecord>,
    pub shield_generators: GeneratorSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorSection {
    pub modules: BTreeMap<GeneratorKind, Vec<GeneratorRecord>>,
    #[serde(default)]
    pub engineering: Engineering,
}

type GeneratorIndex = BTreeMap<GeneratorKind, BTreeMap<u8, Vec<ShieldGenerator>>>;

#[derive(Debug, Clone, Default)]
pub struct DataCatalog {
    ships: BTreeMap<String, Ship>,
    imported_ships: BTreeMap<String, Ship>,
    boosters: Vec<ShieldBoosterVariant>,
    generators: GeneratorIndex,
}

impl DataCatalog {
    pub fn load(path: impl AsRef<Path>) -> std::result::Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&raw)?;
        info!(
            path = %path.display(),
            ships = catalog.ships.len(),
            boosters = catalog.boosters.len(),
            "loaded shield catalog"
        );
        Ok(catalog)
    }

    pub fn from_json_str(raw: &str) -> std::result::Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        Self::from_file(file)
    }

    /// Build the catalog from a parsed document. Validation errors reject the whole document;
    /// warnings are logged and the affected entries are loaded as-is.
    pub fn from_file(file: CatalogFile) -> std::result::Result<Self, CatalogError> {
        let report = validate_catalog(&file);
        for diagnostic in report.warnings() {
            warn!(context = %diagnostic.context, "{}", diagnostic.message);
        }
        if report.has_errors() {
            let messages: Vec<String> = report.errors().map(ToString::to_string).collect();
            return Err(CatalogError::Invalid(messages.join("; ")));
        }

        let mut ships = BTreeMap::new();
        for record in file.ships {
            let ship = Ship::from(record);
            ships.entry(ship.name.clone()).or_insert(ship);
        }

        let boosters = file
            .shield_booster_variants
            .into_iter()
            .map(ShieldBoosterVariant::from)
            .collect();

        let section = file.shield_generators;
        let mut generators: GeneratorIndex = BTreeMap::new();
        for (kind, records) in &section.modules {
            let by_class = generators.entry(*kind).or_default();
            for record in records {
                // first generator of a class wins
                by_class
                    .entry(record.module_class)
                    .or_insert_with(|| engineered_variants(record, *kind, &section.engineering));
            }
            debug!(kind = kind.as_str(), classes = by_class.len(), "expanded shield generators");
        }

        Ok(Self {
            ships,
            imported_ships: BTreeMap::new(),
            boosters,
            generators,
        })
    }

    /// Imported ships first, then catalog ships; both alphabetically.
    pub fn ship_names(&self) -> Vec<&str> {
        self.imported_ships
            .keys()
            .chain(self.ships.keys())
            .map(String::as_str)
            .collect()
    }

    pub fn ship(&self, name: &str) -> Option<&Ship> {
        self.ships.get(name).or_else(|| self.imported_ships.get(name))
    }

    pub fn boosters(&self) -> &[ShieldBoosterVariant] {
        &self.boosters
    }

    /// Engineered variants of one kind and class, in blueprint x experimental order.
    pub fn generators(&self, kind: GeneratorKind, module_class: u8) -> &[ShieldGenerator] {
        self.generators
            .get(&kind)
            .and_then(|by_class| by_class.get(&module_class))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// `(min, max)` generator class the ship can mount, or `None` if nothing fits.
    ///
    /// The minimum is the smallest class whose normal generator tolerates the hull mass; the
    /// maximum is the class of the first internal slot able to take the ship's largest generator.
    pub fn compatible_generator_classes(&self, ship: &Ship) -> Option<(u8, u8)> {
        let normal = self.generators.get(&GeneratorKind::Normal)?;
        let min_class = normal
            .iter()
            .find(|(_, variants)| {
                variants
                    .first()
                    .is_some_and(|generator| generator.base_stats.maxmass > ship.hull_mass)
            })
            .map(|(class, _)| *class)?;
        let (_, max_class) = ship.available_internal_slot(ship.highest_internal, false)?;
        (min_class > 0 && min_class <= max_class).then_some((min_class, max_class))
    }

    /// Start a test case for `name` with the largest compatible generator class, one booster per
    /// utility slot, prismatics allowed and the booster short list enabled.
    pub fn select_ship(&self, name: &str) -> Result<TestCase<'_>> {
        let ship = self.ship(name).ok_or_else(|| Error::UnknownShip {
            name: name.to_string(),
        })?;
        let (min_class, max_class) =
            self.compatible_generator_classes(ship)
                .ok_or_else(|| ConfigError::NoCompatibleGeneratorClass {
                    ship: ship.display_name().to_string(),
                })?;
        Ok(TestCase::new(self, ship, (min_class, max_class)))
    }

    /// Register a ship derived from a journal `Loadout` event and return its custom name.
    /// A later import with the same custom name replaces the earlier one.
    pub fn import_loadout(&mut self, event: &Value) -> std::result::Result<String, CatalogError> {
        let symbol = event
            .get("Ship")
            .and_then(Value::as_str)
            .ok_or_else(|| CatalogError::Import("missing 'Ship' field".to_string()))?;
        let base = self
            .ships
            .values()
            .find(|ship| ship.symbol.eq_ignore_ascii_case(symbol))
            .ok_or_else(|| CatalogError::Import(format!("unknown ship type '{symbol}'")))?;

        let imported = derive_imported_ship(base, event)?;
        if self.compatible_generator_classes(&imported).is_none() {
            return Err(CatalogError::Import(format!(
                "'{}' has no internal slot for a compatible shield generator",
                imported.display_name()
            )));
        }

        let name = imported.display_name().to_string();
        if self.imported_ships.insert(name.clone(), imported).is_some() {
            debug!(ship = %name, "replaced earlier import");
        }
        info!(ship = %name, "imported loadout");
        Ok(name)
    }
}
