use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;

use crate::parser::dom::Page;
use crate::parser::extract::{self, cascade::Strategy};
use crate::parser::sections::SectionId;
use crate::record::{build_record, MedicineRecord};

/// What `extract` produces for one saved page.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum FileExtraction {
    Record(MedicineRecord),
    Section {
        file: String,
        section: SectionId,
        strategy: Option<Strategy>,
        text: String,
    },
}

/// Run the extractor over one saved HTML page. The record's `source` is
/// `source` if given, else the file path.
pub fn extract_file(
    path: &Path,
    section: Option<SectionId>,
    source: Option<&str>,
) -> Result<FileExtraction> {
    let html = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let page = Page::parse(&html);
    let file = path.display().to_string();

    Ok(match section {
        Some(id) => {
            let (extraction, strategy) = extract::extract_traced(&page, id);
            FileExtraction::Section {
                file,
                section: id,
                strategy,
                text: extraction.into_field(),
            }
        }
        None => {
            let subject = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let source = source.map(str::to_string).unwrap_or(file);
            FileExtraction::Record(build_record(&subject, &page, source))
        }
    })
}

/// [`extract_file`] over many files in parallel, results in input order.
pub fn extract_files(
    paths: &[PathBuf],
    section: Option<SectionId>,
    source: Option<&str>,
) -> Result<Vec<(PathBuf, Result<FileExtraction>)>> {
    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let results = paths
        .par_iter()
        .map(|path| {
            let out = extract_file(path, section, source);
            pb.inc(1);
            (path.clone(), out)
        })
        .collect();

    pb.finish_and_clear();
    Ok(results)
}
