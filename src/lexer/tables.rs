//! Fixed vocabulary tables for keyword/stereotype/type classification.
//!
//! Mirrors spec.md §6.1's canonical token-kind tables. Kept as flat arrays
//! (rather than the teacher's `lazy_static!`-built `LexMap`) since lookups
//! here are by exact string match against a small fixed set, not by the
//! longest-match trie the teacher needs for its operator lexicon.

pub const KEYWORDS: &[&str] = &[
    "package",
    "import",
    "genset",
    "disjoint",
    "complete",
    "incomplete",
    "overlapping",
    "general",
    "specifics",
    "where",
    "specializes",
    "datatype",
    "enum",
    "of",
    "relation",
    "functional-complexes",
];

pub const CLASS_STEREOTYPES: &[&str] = &[
    "event",
    "situation",
    "process",
    "category",
    "mixin",
    "phaseMixin",
    "roleMixin",
    "historicalRoleMixin",
    "kind",
    "collective",
    "quantity",
    "quality",
    "mode",
    "intrinsicMode",
    "extrinsicMode",
    "subkind",
    "phase",
    "role",
    "historicalRole",
    "relator",
];

/// Legacy hyphenated spellings that are retyped as `CLASS_STEREOTYPE` (spec.md §6.1).
pub const LEGACY_HYPHENATED_CLASS_STEREOTYPES: &[(&str, &str)] = &[
    ("intrinsic-mode", "intrinsicMode"),
    ("extrinsic-mode", "extrinsicMode"),
    ("intrinsic-modes", "intrinsicMode"),
    ("extrinsic-modes", "extrinsicMode"),
];

pub const RELATION_STEREOTYPES: &[&str] = &[
    "material",
    "derivation",
    "comparative",
    "mediation",
    "characterization",
    "externalDependence",
    "componentOf",
    "memberOf",
    "subCollectionOf",
    "subQualityOf",
    "instantiation",
    "termination",
    "participational",
    "participation",
    "historicalDependence",
    "creation",
    "manifestation",
    "bringsAbout",
    "triggers",
    "composition",
    "aggregation",
    "inherence",
    "value",
    "formal",
    "constitution",
];

pub const NATIVE_TYPES: &[&str] = &["number", "string", "boolean", "date", "time", "datetime"];

pub const META_ATTRIBUTES: &[&str] = &["ordered", "const", "derived", "subsets", "redefines"];

pub fn is_class_stereotype(word: &str) -> bool {
    CLASS_STEREOTYPES.contains(&word)
}

pub fn is_relation_stereotype(word: &str) -> bool {
    RELATION_STEREOTYPES.contains(&word)
}

pub fn is_native_type(word: &str) -> bool {
    NATIVE_TYPES.contains(&word)
}

pub fn is_meta_attribute(word: &str) -> bool {
    META_ATTRIBUTES.contains(&word)
}

/// `Foo` + `DataType` suffix, first letter uppercase (spec.md §4.1 family 5).
pub fn is_user_type(word: &str) -> bool {
    word.ends_with("DataType")
        && word.len() > "DataType".len()
        && word.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Every fixed vocabulary entry, flattened for the suggester (spec.md §4.2.1).
pub fn vocabulary() -> impl Iterator<Item = &'static str> {
    KEYWORDS
        .iter()
        .chain(CLASS_STEREOTYPES.iter())
        .chain(RELATION_STEREOTYPES.iter())
        .chain(NATIVE_TYPES.iter())
        .chain(META_ATTRIBUTES.iter())
        .copied()
}
