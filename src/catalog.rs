//! Read-only table of commonly looked-up medicines, grouped by category.
//! Backs the list/random/search endpoints; never touches the network.

use rand::Rng;
use serde::Serialize;

const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Pain Relief",
        &["Ibuprofen", "Acetaminophen", "Aspirin", "Naproxen", "Diclofenac"],
    ),
    (
        "Antibiotics",
        &["Amoxicillin", "Azithromycin", "Ciprofloxacin", "Doxycycline", "Cephalexin"],
    ),
    (
        "Cardiovascular",
        &["Lisinopril", "Amlodipine", "Atorvastatin", "Metoprolol", "Losartan"],
    ),
    (
        "Diabetes",
        &["Metformin", "Insulin Glargine", "Glipizide", "Sitagliptin"],
    ),
    (
        "Mental Health",
        &["Sertraline", "Fluoxetine", "Escitalopram", "Bupropion", "Trazodone"],
    ),
    (
        "Allergy",
        &["Cetirizine", "Loratadine", "Fexofenadine", "Diphenhydramine"],
    ),
    (
        "Gastrointestinal",
        &["Omeprazole", "Pantoprazole", "Famotidine", "Ondansetron"],
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub category: &'static str,
}

pub fn categories() -> impl Iterator<Item = (&'static str, &'static [&'static str])> {
    CATEGORIES.iter().copied()
}

pub fn entries() -> impl Iterator<Item = CatalogEntry> {
    categories().flat_map(|(category, names)| {
        names.iter().map(move |&name| CatalogEntry { name, category })
    })
}

pub fn total() -> usize {
    CATEGORIES.iter().map(|(_, names)| names.len()).sum()
}

pub fn random_entry() -> Option<CatalogEntry> {
    let n = total();
    if n == 0 {
        return None;
    }
    entries().nth(rand::rng().random_range(0..n))
}

/// Case-insensitive substring match on the name, optionally restricted to
/// one category (also case-insensitive, exact).
pub fn search(query: &str, category: Option<&str>) -> Vec<CatalogEntry> {
    let needle = query.trim().to_lowercase();
    entries()
        .filter(|e| category.map_or(true, |c| e.category.eq_ignore_ascii_case(c.trim())))
        .filter(|e| e.name.to_lowercase().contains(&needle))
        .collect()
}
