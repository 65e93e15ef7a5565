//! Stereotype classification tables (spec.md §4.3).
//!
//! `historicalRoleMixin` is not named by any group in spec.md's table; it is
//! classified semi-rigid alongside `mixin`/`phaseMixin` so it resolves and
//! parses but never drives the rigidity check or Rules P1-P6.

pub const ULTIMATE_SORTALS: &[&str] = &[
    "kind",
    "collective",
    "quantity",
    "relator",
    "quality",
    "mode",
    "intrinsicMode",
    "extrinsicMode",
    "type",
    "powertype",
];

pub const NON_ULTIMATE_SORTALS: &[&str] = &["subkind", "phase", "role", "historicalRole"];

pub const RIGID: &[&str] = &["kind", "collective", "quantity", "subkind", "category"];

pub const ANTI_RIGID: &[&str] = &["role", "phase", "historicalRole", "roleMixin"];

pub const SEMI_RIGID: &[&str] = &["mixin", "phaseMixin", "historicalRoleMixin"];

pub fn is_ultimate_sortal(stereotype: &str) -> bool {
    ULTIMATE_SORTALS.contains(&stereotype)
}

pub fn is_non_ultimate_sortal(stereotype: &str) -> bool {
    NON_ULTIMATE_SORTALS.contains(&stereotype)
}

pub fn is_rigid(stereotype: &str) -> bool {
    RIGID.contains(&stereotype)
}

pub fn is_anti_rigid(stereotype: &str) -> bool {
    ANTI_RIGID.contains(&stereotype)
}

pub fn is_semi_rigid(stereotype: &str) -> bool {
    SEMI_RIGID.contains(&stereotype)
}
