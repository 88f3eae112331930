// ==========================================
// Resto Supply - unit conversion table
// ==========================================
// Static mapping unit-name -> (compatibility class, factor in the class
// canonical unit: kilograms for weight, liters for volume, bare count for
// discrete). Conversion across classes is never legal.
// Pure data + arithmetic; no state, no side effects.
// ==========================================

use crate::domain::types::UnitClass;
use thiserror::Error;

/// Conversion failure: the caller decides whether this is fatal (the cost
/// standardizer degrades to the raw unit price instead of failing).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitConversionError {
    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    #[error("units not convertible: {from} ({from_class}) vs {to} ({to_class})")]
    IncompatibleClasses {
        from: String,
        from_class: UnitClass,
        to: String,
        to_class: UnitClass,
    },
}

// Factors per unit name, grouped by class. Spanish market aliases included
// because invoices arrive with whatever the supplier printed.
// qq = quintal (46 kg in the local convention).
const UNIT_TABLE: &[(&str, UnitClass, f64)] = &[
    // ===== weight (canonical: kg) =====
    ("kg", UnitClass::Weight, 1.0),
    ("kilo", UnitClass::Weight, 1.0),
    ("g", UnitClass::Weight, 0.001),
    ("gr", UnitClass::Weight, 0.001),
    ("lb", UnitClass::Weight, 0.453592),
    ("libra", UnitClass::Weight, 0.453592),
    ("oz", UnitClass::Weight, 0.0283495),
    ("qq", UnitClass::Weight, 46.0),
    ("quintal", UnitClass::Weight, 46.0),
    ("ton", UnitClass::Weight, 1000.0),
    ("t", UnitClass::Weight, 1000.0),
    // ===== volume (canonical: l) =====
    ("l", UnitClass::Volume, 1.0),
    ("lt", UnitClass::Volume, 1.0),
    ("litro", UnitClass::Volume, 1.0),
    ("liter", UnitClass::Volume, 1.0),
    ("ml", UnitClass::Volume, 0.001),
    ("gal", UnitClass::Volume, 3.78541),
    ("galon", UnitClass::Volume, 3.78541),
    // ===== discrete count (canonical: unit) =====
    ("unit", UnitClass::Count, 1.0),
    ("und", UnitClass::Count, 1.0),
    ("u", UnitClass::Count, 1.0),
    ("each", UnitClass::Count, 1.0),
    ("dozen", UnitClass::Count, 12.0),
    ("docena", UnitClass::Count, 12.0),
];

fn lookup(unit: &str) -> Option<(UnitClass, f64)> {
    let needle = unit.trim().to_lowercase();
    UNIT_TABLE
        .iter()
        .find(|(name, _, _)| *name == needle)
        .map(|(_, class, factor)| (*class, *factor))
}

/// Compatibility class of a unit name (case-insensitive).
pub fn class_of(unit: &str) -> Option<UnitClass> {
    lookup(unit).map(|(class, _)| class)
}

/// Multiplicative factor to the class canonical unit.
pub fn factor_of(unit: &str) -> Option<f64> {
    lookup(unit).map(|(_, factor)| factor)
}

/// Whether two unit names belong to the same compatibility class.
pub fn compatible(a: &str, b: &str) -> bool {
    match (class_of(a), class_of(b)) {
        (Some(ca), Some(cb)) => ca == cb,
        _ => false,
    }
}

/// Convert a quantity between two units of the same class.
///
/// Returns `quantity * factor(from) / factor(to)`; signals instead of
/// silently returning a value when either unit is unknown or the classes
/// differ.
pub fn convert(quantity: f64, from: &str, to: &str) -> Result<f64, UnitConversionError> {
    let (from_class, from_factor) =
        lookup(from).ok_or_else(|| UnitConversionError::UnknownUnit(from.to_string()))?;
    let (to_class, to_factor) =
        lookup(to).ok_or_else(|| UnitConversionError::UnknownUnit(to.to_string()))?;

    if from_class != to_class {
        return Err(UnitConversionError::IncompatibleClasses {
            from: from.to_string(),
            from_class,
            to: to.to_string(),
            to_class,
        });
    }

    Ok(quantity * from_factor / to_factor)
}
