use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::locator::{LocateError, Locator};
use crate::parser::dom::{DomError, Page};
use crate::parser::extract::meta::{self, MetaLabel};
use crate::parser::extract::{self, CONTENT_UNAVAILABLE, NOT_AVAILABLE};
use crate::parser::sections::SectionId;

/// Everything known about one medicine. Every field is always present;
/// fields that could not be extracted read "Information not available".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineRecord {
    pub name: String,
    pub generic: String,
    pub brand_names: String,
    pub drug_class: String,
    pub uses: String,
    pub warnings: String,
    pub dosage: String,
    pub side_effects: String,
    pub interactions: String,
    pub precautions: String,
    pub source: String,
}

pub struct Assembler {
    locator: Locator,
}

impl Assembler {
    pub fn new(locator: Locator) -> Self {
        Self { locator }
    }

    /// Locate the page for `subject` and extract every field from it.
    pub async fn assemble(&self, subject: &str) -> Result<MedicineRecord, LocateError> {
        let resolved = self.locator.resolve(subject).await?;
        let record = build_record(subject, &resolved.page, resolved.url);
        info!(subject, source = %record.source, "Assembled record");
        Ok(record)
    }
}

/// Build a record from an already-parsed page. No I/O.
pub fn build_record(subject: &str, page: &Page, source: String) -> MedicineRecord {
    let name = match meta::title(page) {
        Ok(Some(title)) => title,
        Ok(None) => subject.trim().to_string(),
        Err(e) => {
            warn!(field = "name", error = %e, "{}", CONTENT_UNAVAILABLE);
            subject.trim().to_string()
        }
    };

    let [uses, warnings, dosage, side_effects, interactions, precautions] =
        SectionId::RECORD.map(|id| extract::extract(page, id));
    let uses = if uses.is_available() {
        uses
    } else {
        debug!(subject, "No uses section, trying monograph");
        extract::extract(page, SectionId::Monograph)
    };

    MedicineRecord {
        name,
        generic: meta_field("generic", meta::subtitle_value(page, MetaLabel::GenericName)),
        brand_names: meta_field("brandNames", meta::subtitle_value(page, MetaLabel::BrandNames)),
        drug_class: meta_field("drugClass", meta::drug_class(page)),
        uses: uses.into_field(),
        warnings: warnings.into_field(),
        dosage: dosage.into_field(),
        side_effects: side_effects.into_field(),
        interactions: interactions.into_field(),
        precautions: precautions.into_field(),
        source,
    }
}

fn meta_field(field: &str, value: Result<Option<String>, DomError>) -> String {
    match value {
        Ok(Some(v)) => v,
        Ok(None) => NOT_AVAILABLE.to_string(),
        Err(e) => {
            warn!(field, error = %e, "{}", CONTENT_UNAVAILABLE);
            NOT_AVAILABLE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::Settings;
    use crate::fetch::testing::StaticFetcher;

    const ORIGIN: &str = "https://www.drugs.com";

    fn assembler(fetcher: StaticFetcher) -> Assembler {
        Assembler::new(Locator::new(Arc::new(fetcher), &Settings::default()))
    }

    #[tokio::test]
    async fn search_fallback_end_to_end() {
        let fetcher = StaticFetcher::default()
            .with_page(
                &format!("{ORIGIN}/search.php?searchterm=ibuprofen-200mg"),
                r#"<ul><li><a href="/search?x=1">refine</a></li>
                   <li><a href="/pro/ibuprofen">Ibuprofen (Monograph)</a></li></ul>"#,
            )
            .with_page(
                &format!("{ORIGIN}/pro/ibuprofen"),
                r#"<h1>Ibuprofen</h1>
                   <h2 id="uses">Uses</h2>
                   <div class="contentBox"><p>For minor aches.</p></div>"#,
            );
        let record = assembler(fetcher).assemble("Ibuprofen 200mg").await.unwrap();
        assert_eq!(record.uses, "For minor aches.");
        assert_eq!(record.source, format!("{ORIGIN}/pro/ibuprofen"));
        assert_eq!(record.name, "Ibuprofen");
        assert_eq!(record.warnings, NOT_AVAILABLE);
        assert_eq!(record.generic, NOT_AVAILABLE);
    }

    #[tokio::test]
    async fn locator_failure_aborts_assembly() {
        let err = assembler(StaticFetcher::default())
            .assemble("nothing")
            .await
            .unwrap_err();
        assert!(matches!(err, LocateError::Transport { .. }));
    }

    #[test]
    fn drug_class_from_paragraph_fallback() {
        let page = Page::parse(
            r#"<h1>Celecoxib</h1><p>Overview text.</p><p>Drug class: NSAID</p>"#,
        );
        let record = build_record("celecoxib", &page, "file".into());
        assert_eq!(record.drug_class, "NSAID");
        assert_eq!(record.brand_names, NOT_AVAILABLE);
    }

    #[test]
    fn uses_falls_back_to_monograph() {
        let page = Page::parse(
            r#"<h1>Naproxen</h1>
               <h2 id="monograph">Monograph</h2>
               <div class="contentBox"><p>Naproxen is an NSAID.</p></div>"#,
        );
        let record = build_record("naproxen", &page, "file".into());
        assert_eq!(record.uses, "Naproxen is an NSAID.");
    }

    #[test]
    fn missing_sections_do_not_block_others() {
        let page = Page::parse(
            r#"<h2 id="warnings">Warnings</h2><div class="contentBox">Keep away from children.</div>"#,
        );
        let record = build_record("Mystery Pill", &page, "file".into());
        assert_eq!(record.name, "Mystery Pill");
        assert_eq!(record.warnings, "Keep away from children.");
        for field in [
            &record.uses,
            &record.dosage,
            &record.side_effects,
            &record.interactions,
            &record.precautions,
            &record.generic,
            &record.brand_names,
            &record.drug_class,
        ] {
            assert_eq!(field, NOT_AVAILABLE);
        }
    }

    #[test]
    fn serializes_camel_case() {
        let page = Page::parse("<h1>A</h1>");
        let json = serde_json::to_value(build_record("a", &page, "u".into())).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        for key in [
            "name", "generic", "brandNames", "drugClass", "uses", "warnings", "dosage",
            "sideEffects", "interactions", "precautions", "source",
        ] {
            assert!(keys.contains(&key), "missing {}", key);
        }
        assert_eq!(keys.len(), 11);
    }

    #[test]
    fn ibuprofen_fixture_record() {
        let html = std::fs::read_to_string("tests/fixtures/ibuprofen.html").unwrap();
        let page = Page::parse(&html);
        let record = build_record("ibuprofen", &page, format!("{ORIGIN}/ibuprofen.html"));
        assert_eq!(record.name, "Ibuprofen");
        assert_eq!(record.generic, "ibuprofen");
        assert_eq!(record.brand_names, "Advil, Motrin, Midol IB");
        assert_eq!(record.drug_class, "Nonsteroidal anti-inflammatory drugs");
        assert!(record.side_effects.contains("upset stomach"));
        assert!(!record.side_effects.contains("More about ibuprofen"));
    }
}
