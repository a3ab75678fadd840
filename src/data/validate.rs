use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::path::Path;

use crate::data::catalog::CatalogFile;
use crate::data::generator::{Blueprint, GeneratorRecord};
use crate::error::CatalogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == ValidationSeverity::Warning)
    }
}

/// Generator stats a blueprint or experimental effect may modify.
const KNOWN_FEATURES: &[&str] = &[
    "integrity",
    "brokenregen",
    "regen",
    "distdraw",
    "power",
    "optmul",
    "kinres",
    "thermres",
    "explres",
];

const VALID_RATINGS: &str = "ABCDE";

pub fn validate_catalog_file(path: impl AsRef<Path>) -> Result<ValidationReport, CatalogError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file: CatalogFile = serde_json::from_str(&raw)?;
    Ok(validate_catalog(&file))
}

pub fn validate_catalog(file: &CatalogFile) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_ships(&mut report, file);
    validate_generators(&mut report, file);
    validate_boosters(&mut report, file);
    report
}

fn positive(report: &mut ValidationReport, context: &str, field: &str, value: f64) {
    if !value.is_finite() || value <= 0.0 {
        report.push(
            ValidationSeverity::Error,
            format!("{context}.{field}"),
            "must be a finite positive number",
        );
    }
}

fn resistance(report: &mut ValidationReport, context: &str, field: &str, value: f64) {
    if !value.is_finite() || value >= 1.0 {
        report.push(
            ValidationSeverity::Error,
            format!("{context}.{field}"),
            format!("resistance must be finite and below 1.0 (got {value})"),
        );
    }
}

fn validate_ships(report: &mut ValidationReport, file: &CatalogFile) {
    let mut seen_names = HashSet::new();
    for (index, ship) in file.ships.iter().enumerate() {
        let context = format!("ships[{index}]");
        if ship.name.trim().is_empty() {
            report.push(ValidationSeverity::Error, format!("{context}.ship"), "missing non-empty name");
        } else if !seen_names.insert(ship.name.as_str()) {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.ship"),
                format!("duplicate ship name '{}'", ship.name),
            );
        }
        positive(report, &context, "baseShieldStrength", ship.base_shield_strength);
        positive(report, &context, "hullMass", ship.hull_mass);
        if !(1..=8).contains(&ship.highest_internal) {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.highest_internal"),
                format!("must be between 1 and 8 (got {})", ship.highest_internal),
            );
        }
        if ship.utility_slots > 8 {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}.utility_slots"),
                format!("unusually many utility slots ({})", ship.utility_slots),
            );
        }
        let resistances = &ship.base_resistances;
        resistance(report, &context, "base_resistances.explosive", resistances.explosive);
        resistance(report, &context, "base_resistances.kinetic", resistances.kinetic);
        resistance(report, &context, "base_resistances.thermal", resistances.thermal);
        if ship.loadout_template.get("Modules").and_then(|m| m.as_array()).is_none() {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}.loadout_template"),
                "no 'Modules' array; export links will be incomplete",
            );
        }
    }
}

fn validate_generator(report: &mut ValidationReport, context: &str, generator: &GeneratorRecord) {
    let stats = &generator.stats;
    if !(1..=8).contains(&generator.module_class) {
        report.push(
            ValidationSeverity::Error,
            format!("{context}.class"),
            format!("must be between 1 and 8 (got {})", generator.module_class),
        );
    }
    if !VALID_RATINGS.contains(generator.rating) {
        report.push(
            ValidationSeverity::Error,
            format!("{context}.rating"),
            format!("unknown rating '{}'", generator.rating),
        );
    }
    positive(report, context, "minmass", stats.minmass);
    if !(stats.minmass < stats.optmass && stats.optmass < stats.maxmass) {
        report.push(
            ValidationSeverity::Error,
            format!("{context}.optmass"),
            "expected minmass < optmass < maxmass",
        );
    }
    if !(stats.minmul < stats.optmul && stats.optmul < stats.maxmul) {
        report.push(
            ValidationSeverity::Error,
            format!("{context}.optmul"),
            "expected minmul < optmul < maxmul",
        );
    }
    if !stats.regen.is_finite() || stats.regen < 0.0 {
        report.push(
            ValidationSeverity::Error,
            format!("{context}.regen"),
            "must be finite and non-negative",
        );
    }
    resistance(report, context, "explres", stats.explres);
    resistance(report, context, "kinres", stats.kinres);
    resistance(report, context, "thermres", stats.thermres);
}

fn validate_features(report: &mut ValidationReport, context: &str, blueprints: &[Blueprint]) {
    for (index, blueprint) in blueprints.iter().enumerate() {
        for (key, value) in &blueprint.features {
            let feature_context = format!("{context}[{index}].features.{key}");
            if !KNOWN_FEATURES.contains(&key.as_str()) {
                report.push(
                    ValidationSeverity::Warning,
                    feature_context,
                    format!("feature is ignored by '{}'", blueprint.name),
                );
            } else if !value.is_finite() {
                report.push(ValidationSeverity::Error, feature_context, "must be finite");
            }
        }
    }
}

fn validate_generators(report: &mut ValidationReport, file: &CatalogFile) {
    let section = &file.shield_generators;
    if !section.modules.contains_key(&crate::data::GeneratorKind::Normal) {
        report.push(
            ValidationSeverity::Error,
            "shield_generators.modules",
            "missing 'normal' generators (needed to derive compatible classes)",
        );
    }
    for (kind, generators) in &section.modules {
        let mut seen_classes = BTreeSet::new();
        for (index, generator) in generators.iter().enumerate() {
            let context = format!("shield_generators.modules.{}[{index}]", kind.as_str());
            validate_generator(report, &context, generator);
            if !seen_classes.insert(generator.module_class) {
                report.push(
                    ValidationSeverity::Warning,
                    context,
                    format!(
                        "second class {} generator is ignored; the first one wins",
                        generator.module_class
                    ),
                );
            }
        }
    }
    validate_features(
        report,
        "shield_generators.engineering.blueprints",
        &section.engineering.blueprints,
    );
    validate_features(
        report,
        "shield_generators.engineering.experimental_effects",
        &section.engineering.experimental_effects,
    );
}

fn validate_boosters(report: &mut ValidationReport, file: &CatalogFile) {
    if file.shield_booster_variants.is_empty() {
        report.push(
            ValidationSeverity::Warning,
            "shield_booster_variants",
            "no booster variants; only generator-only loadouts can be tested",
        );
    }
    for (index, booster) in file.shield_booster_variants.iter().enumerate() {
        let context = format!("shield_booster_variants[{index}]");
        if !booster.shield_strength_bonus.is_finite() || booster.shield_strength_bonus <= -1.0 {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.shield_strength_bonus"),
                "must be finite and above -1.0",
            );
        }
        resistance(report, &context, "exp_res_bonus", booster.exp_res_bonus);
        resistance(report, &context, "kin_res_bonus", booster.kin_res_bonus);
        resistance(report, &context, "therm_res_bonus", booster.therm_res_bonus);
    }
}
