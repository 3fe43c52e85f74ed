use std::sync::LazyLock;

use regex::Regex;

use crate::parser::dom::{DomError, Page};
use crate::parser::text::{self, normalize};

const SUBTITLE_SELECTOR: &str = ".drug-subtitle";

// Every label that can appear on the subtitle line; a value runs until the next one.
const KNOWN_LABELS: &[&str] = &[
    "generic name:",
    "brand names:",
    "brand name:",
    "dosage forms:",
    "dosage form:",
    "drug classes:",
    "drug class:",
    "availability:",
];

// Trailing pronunciation guide: "ibuprofen [ eye-BUE-proe-fen ]"
static PRONUNCIATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\[[^\]]*\]\s*$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaLabel {
    GenericName,
    BrandNames,
    DrugClass,
}

impl MetaLabel {
    fn spellings(self) -> &'static [&'static str] {
        match self {
            MetaLabel::GenericName => &["generic name:"],
            MetaLabel::BrandNames => &["brand names:", "brand name:"],
            MetaLabel::DrugClass => &["drug class:", "drug classes:"],
        }
    }
}

/// Page title: the first `h1`.
pub fn title(page: &Page) -> Result<Option<String>, DomError> {
    Ok(page
        .select_first("h1")?
        .and_then(|h1| text::non_empty(normalize(&h1.text()))))
}

/// Value for `label` from the subtitle line under the title.
pub fn subtitle_value(page: &Page, label: MetaLabel) -> Result<Option<String>, DomError> {
    Ok(page
        .select(SUBTITLE_SELECTOR)?
        .iter()
        .find_map(|n| value_after_label(&n.text(), label)))
}

/// Drug class from the subtitle, or failing that from any paragraph that
/// carries the label.
pub fn drug_class(page: &Page) -> Result<Option<String>, DomError> {
    if let Some(class) = subtitle_value(page, MetaLabel::DrugClass)? {
        return Ok(Some(class));
    }
    Ok(page
        .select("p")?
        .iter()
        .find_map(|p| value_after_label(&p.text(), MetaLabel::DrugClass)))
}

/// Text following `label` up to the next known label, pronunciation removed.
pub fn value_after_label(raw: &str, label: MetaLabel) -> Option<String> {
    let text = normalize(raw);
    // ASCII lowering keeps byte offsets aligned with `text`.
    let lower = text.to_ascii_lowercase();

    let (start, spelling) = label
        .spellings()
        .iter()
        .filter_map(|s| lower.find(s).map(|i| (i, *s)))
        .min_by_key(|(i, _)| *i)?;
    let value_start = start + spelling.len();

    let rest_lower = &lower[value_start..];
    let end = KNOWN_LABELS
        .iter()
        .filter_map(|l| rest_lower.find(l))
        .min()
        .unwrap_or(rest_lower.len());

    let value = text[value_start..value_start + end].trim();
    let value = PRONUNCIATION_RE.replace(value, "");
    text::non_empty(value.trim().trim_end_matches([',', ';']).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBTITLE: &str = r#"<h1>Ibuprofen</h1>
        <p class="drug-subtitle">
            <b>Generic name:</b> ibuprofen [ eye-BUE-proe-fen ]<br>
            <b>Brand names:</b> Advil, Motrin IB, Midol IB<br>
            <b>Dosage forms:</b> oral capsule (200 mg)<br>
            <b>Drug class:</b> Nonsteroidal anti-inflammatory drugs
        </p>"#;

    #[test]
    fn subtitle_fields() {
        let page = Page::parse(SUBTITLE);
        assert_eq!(title(&page).unwrap().as_deref(), Some("Ibuprofen"));
        assert_eq!(
            subtitle_value(&page, MetaLabel::GenericName).unwrap().as_deref(),
            Some("ibuprofen")
        );
        assert_eq!(
            subtitle_value(&page, MetaLabel::BrandNames).unwrap().as_deref(),
            Some("Advil, Motrin IB, Midol IB")
        );
        assert_eq!(
            drug_class(&page).unwrap().as_deref(),
            Some("Nonsteroidal anti-inflammatory drugs")
        );
    }

    #[test]
    fn drug_class_from_paragraph() {
        let page = Page::parse("<h1>X</h1><p>Some intro.</p><p>Drug class: NSAID</p>");
        assert_eq!(subtitle_value(&page, MetaLabel::DrugClass).unwrap(), None);
        assert_eq!(drug_class(&page).unwrap().as_deref(), Some("NSAID"));
    }

    #[test]
    fn singular_brand_label() {
        assert_eq!(
            value_after_label("Brand name: Tylenol", MetaLabel::BrandNames).as_deref(),
            Some("Tylenol")
        );
    }

    #[test]
    fn empty_value_is_none() {
        assert_eq!(value_after_label("Generic name:   Brand names: Advil", MetaLabel::GenericName), None);
        assert_eq!(value_after_label("no labels here", MetaLabel::DrugClass), None);
    }

    #[test]
    fn missing_title_is_none() {
        let page = Page::parse("<p>untitled</p>");
        assert_eq!(title(&page).unwrap(), None);
    }
}
