/// Exercises offered to every user before any custom ones.
pub const CATALOG: [&str; 6] = [
    "Squat",
    "Bench Press",
    "Deadlift",
    "Overhead Press",
    "Barbell Row",
    "Pull-up",
];

/// Catalog entry matching `name` (case-insensitive), with its canonical spelling.
pub fn catalog_name(name: &str) -> Option<&'static str> {
    let wanted = name.trim();
    CATALOG
        .iter()
        .copied()
        .find(|c| c.eq_ignore_ascii_case(wanted))
}

pub fn is_catalog(name: &str) -> bool {
    catalog_name(name).is_some()
}
