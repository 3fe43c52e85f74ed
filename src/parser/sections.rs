use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Named landmark on a medicine page. Each variant is the `id` attribute of
/// the heading that opens the section on the source site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionId {
    Uses,
    Warnings,
    Dosage,
    SideEffects,
    Interactions,
    Precautions,
    /// Professional monograph anchor. Only consulted when `uses` is missing.
    Monograph,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown section identifier `{0}`")]
pub struct UnknownSection(pub String);

impl SectionId {
    /// The six sections every record carries, in record order.
    pub const RECORD: [SectionId; 6] = [
        SectionId::Uses,
        SectionId::Warnings,
        SectionId::Dosage,
        SectionId::SideEffects,
        SectionId::Interactions,
        SectionId::Precautions,
    ];

    pub const ALL: [SectionId; 7] = [
        SectionId::Uses,
        SectionId::Warnings,
        SectionId::Dosage,
        SectionId::SideEffects,
        SectionId::Interactions,
        SectionId::Precautions,
        SectionId::Monograph,
    ];

    pub fn anchor(self) -> &'static str {
        match self {
            SectionId::Uses => "uses",
            SectionId::Warnings => "warnings",
            SectionId::Dosage => "dosage",
            SectionId::SideEffects => "side-effects",
            SectionId::Interactions => "interactions",
            SectionId::Precautions => "precautions",
            SectionId::Monograph => "monograph",
        }
    }

    /// True if `id` is the anchor of any recognized section.
    pub fn is_landmark_anchor(id: &str) -> bool {
        Self::ALL.iter().any(|s| s.anchor() == id)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.anchor())
    }
}

impl Serialize for SectionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.anchor())
    }
}

impl FromStr for SectionId {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.anchor() == s)
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}
