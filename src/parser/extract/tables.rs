use crate::parser::dom::{DomError, Node};
use crate::parser::text::normalize;

/// Rows of every table under `container` that have more than one `td`,
/// each rendered as `cell - cell - ...`. Header-only rows are skipped.
pub fn dosage_rows(container: Node<'_>) -> Result<Vec<String>, DomError> {
    let mut rows = Vec::new();
    for tr in container.select("tr")? {
        let cells: Vec<String> = tr
            .select("td")?
            .iter()
            .map(|td| normalize(&td.text()))
            .collect();
        if cells.len() > 1 {
            rows.push(cells.join(" - "));
        }
    }
    Ok(rows)
}
