//! Shield generator records and their engineered variants.
//!
//! The catalog stores one unengineered generator per kind and class plus a list of
//! engineering blueprints and experimental effects. Every base generator is expanded into
//! blueprint x experimental variants at load time; each variant keeps the base stats so an
//! export can describe what the engineering changed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::ship::round4;

/// Generator kind. Ordering is the order candidates are generated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeneratorKind {
    BiWeave,
    Normal,
    /// Premium tier; only offered when the test case allows prismatics.
    Prismatic,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 3] = [Self::BiWeave, Self::Normal, Self::Prismatic];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BiWeave => "bi-weave",
            Self::Normal => "normal",
            Self::Prismatic => "prismatic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneratorStats {
    pub integrity: f64,
    pub power: f64,
    pub explres: f64,
    pub kinres: f64,
    pub thermres: f64,
    pub regen: f64,
    pub brokenregen: f64,
    pub distdraw: f64,
    pub minmass: f64,
    pub optmass: f64,
    pub maxmass: f64,
    pub minmul: f64,
    pub optmul: f64,
    pub maxmul: f64,
}

/// Unengineered generator as written in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorRecord {
    pub symbol: String,
    pub name: String,
    #[serde(rename = "class")]
    pub module_class: u8,
    #[serde(default = "default_rating")]
    pub rating: char,
    #[serde(flatten)]
    pub stats: GeneratorStats,
}

fn default_rating() -> char {
    'A'
}

/// A blueprint or experimental effect: feature name -> modifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blueprint {
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub features: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Engineering {
    #[serde(default)]
    pub blueprints: Vec<Blueprint>,
    #[serde(default)]
    pub experimental_effects: Vec<Blueprint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Modification {
    pub symbol: String,
    pub name: String,
}

/// A (possibly engineered) shield generator variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShieldGenerator {
    pub symbol: String,
    pub name: String,
    pub module_class: u8,
    pub rating: char,
    pub kind: GeneratorKind,
    pub stats: GeneratorStats,
    /// Stats before engineering.
    pub base_stats: GeneratorStats,
    pub blueprint: Option<Modification>,
    pub experimental: Option<Modification>,
}

impl ShieldGenerator {
    pub fn unengineered(record: &GeneratorRecord, kind: GeneratorKind) -> Self {
        ShieldGenerator {
            symbol: record.symbol.clone(),
            name: record.name.clone(),
            module_class: record.module_class,
            rating: record.rating,
            kind,
            stats: record.stats,
            base_stats: record.stats,
            blueprint: None,
            experimental: None,
        }
    }

    pub fn engineered_name(&self) -> &str {
        self.blueprint
            .as_ref()
            .map_or("not engineered", |blueprint| blueprint.name.as_str())
    }

    pub fn experimental_name(&self) -> &str {
        self.experimental
            .as_ref()
            .map_or("no experimental effect", |effect| effect.name.as_str())
    }
}

impl std::fmt::Display for ShieldGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}{}) - {} - {}",
            self.name,
            self.module_class,
            self.rating,
            self.engineered_name(),
            self.experimental_name()
        )
    }
}

#[derive(Debug, Clone, Copy)]
enum Calc {
    /// `v * (1 + f)`
    Scale,
    /// `1 - (1 - r)(1 - f)`
    Resistance,
}

/// (stat, feature key, calculation). All three multipliers follow the `optmul` feature.
const FEATURE_RULES: &[(&str, &str, Calc)] = &[
    ("integrity", "integrity", Calc::Scale),
    ("brokenregen", "brokenregen", Calc::Scale),
    ("regen", "regen", Calc::Scale),
    ("distdraw", "distdraw", Calc::Scale),
    ("power", "power", Calc::Scale),
    ("optmul", "optmul", Calc::Scale),
    ("minmul", "optmul", Calc::Scale),
    ("maxmul", "optmul", Calc::Scale),
    ("kinres", "kinres", Calc::Resistance),
    ("thermres", "thermres", Calc::Resistance),
    ("explres", "explres", Calc::Resistance),
];

fn stat_mut<'s>(stats: &'s mut GeneratorStats, name: &str) -> Option<&'s mut f64> {
    match name {
        "integrity" => Some(&mut stats.integrity),
        "brokenregen" => Some(&mut stats.brokenregen),
        "regen" => Some(&mut stats.regen),
        "distdraw" => Some(&mut stats.distdraw),
        "power" => Some(&mut stats.power),
        "optmul" => Some(&mut stats.optmul),
        "minmul" => Some(&mut stats.minmul),
        "maxmul" => Some(&mut stats.maxmul),
        "kinres" => Some(&mut stats.kinres),
        "thermres" => Some(&mut stats.thermres),
        "explres" => Some(&mut stats.explres),
        _ => None,
    }
}

/// Apply blueprint or experimental features. Experimental resistance features are percentages.
pub fn apply_features(stats: &mut GeneratorStats, features: &BTreeMap<String, f64>, percentage: bool) {
    for (stat, key, calc) in FEATURE_RULES {
        let Some(&feature) = features.get(*key) else {
            continue;
        };
        let Some(value) = stat_mut(stats, stat) else {
            continue;
        };
        *value = match calc {
            Calc::Scale => *value * (1.0 + feature),
            Calc::Resistance => {
                let feature = if percentage { feature / 100.0 } else { feature };
                1.0 - (1.0 - *value) * (1.0 - feature)
            }
        };
        *value = round4(*value);
    }
}

/// Every blueprint x experimental combination of `record`. Missing blueprint or experimental
/// lists contribute a single "none" entry so a catalog without engineering still yields the base.
pub fn engineered_variants(
    record: &GeneratorRecord,
    kind: GeneratorKind,
    engineering: &Engineering,
) -> Vec<ShieldGenerator> {
    let blueprints: Vec<Option<&Blueprint>> = if engineering.blueprints.is_empty() {
        vec![None]
    } else {
        engineering.blueprints.iter().map(Some).collect()
    };
    let experimentals: Vec<Option<&Blueprint>> = if engineering.experimental_effects.is_empty() {
        vec![None]
    } else {
        engineering.experimental_effects.iter().map(Some).collect()
    };

    let base = ShieldGenerator::unengineered(record, kind);
    let mut variants = Vec::with_capacity(blueprints.len() * experimentals.len());
    for blueprint in &blueprints {
        let mut engineered = base.clone();
        if let Some(blueprint) = blueprint {
            apply_features(&mut engineered.stats, &blueprint.features, false);
            engineered.blueprint = Some(Modification {
                symbol: blueprint.symbol.clone(),
                name: blueprint.name.clone(),
            });
        }
        for experimental in &experimentals {
            let mut variant = engineered.clone();
            if let Some(experimental) = experimental {
                apply_features(&mut variant.stats, &experimental.features, true);
                variant.experimental = Some(Modification {
                    symbol: experimental.symbol.clone(),
                    name: experimental.name.clone(),
                });
            }
            variants.push(variant);
        }
    }
    variants
}
