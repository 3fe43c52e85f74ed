//! Ordered extraction strategies for a single section.
//!
//! The heading carrying the section's anchor id is the landmark. Its next
//! element sibling, if it is a content box, decides which strategies apply:
//! with a box, only [`Strategy::ContentBox`] and the sibling fallback run;
//! without one, the enclosing container and the sibling walk are tried first.

use serde::Serialize;

use super::tables;
use crate::parser::dom::{DomError, Node, Page};
use crate::parser::sections::SectionId;
use crate::parser::text::{self, clean, normalize};

const CONTENT_BOX_CLASS: &str = "contentBox";
const FLOW_TAGS: &[&str] = &["p", "ul", "ol", "table"];
const SIBLING_FALLBACK_LIMIT: usize = 5;

// Stripped from an enclosing container before reading it.
const NON_CONTENT_TAGS: &[&str] = &[
    "script", "style", "noscript", "nav", "button", "form", "iframe", "svg",
];
const NON_CONTENT_CLASSES: &[&str] = &[
    "more-resources",
    "more-resources-list",
    "references",
    "reference-list",
    "footnote",
    "footnotes",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Nearest ancestor content box, headings and boilerplate removed. Uncapped.
    EnclosingContainer,
    /// Flow elements after the landmark, up to the next heading or landmark.
    SiblingWalk,
    /// The content box right after the landmark (tables for dosage).
    ContentBox,
    /// First few flow siblings after the landmark, content boxes skipped.
    SiblingFallback,
}

impl Strategy {
    pub const CASCADE: [Strategy; 4] = [
        Strategy::EnclosingContainer,
        Strategy::SiblingWalk,
        Strategy::ContentBox,
        Strategy::SiblingFallback,
    ];

    fn run(self, cx: &Landmark<'_>) -> Result<Option<String>, DomError> {
        match self {
            Strategy::EnclosingContainer => enclosing_container(cx),
            Strategy::SiblingWalk => Ok(sibling_walk(cx)),
            Strategy::ContentBox => content_box(cx),
            Strategy::SiblingFallback => Ok(sibling_fallback(cx)),
        }
    }
}

struct Landmark<'a> {
    page: &'a Page,
    id: SectionId,
    heading: Node<'a>,
    adjacent_box: Option<Node<'a>>,
}

/// First strategy to yield non-empty text wins. `Ok(None)` when the landmark
/// is missing or every strategy comes up empty.
pub fn run(page: &Page, id: SectionId) -> Result<Option<(Strategy, String)>, DomError> {
    let Some(heading) = page.by_id(id.anchor()) else {
        return Ok(None);
    };
    let cx = Landmark {
        page,
        id,
        heading,
        adjacent_box: heading.next_sibling().filter(is_content_box),
    };

    for strategy in Strategy::CASCADE {
        if let Some(text) = strategy.run(&cx)? {
            return Ok(Some((strategy, text)));
        }
    }
    Ok(None)
}

pub fn is_content_box(node: &Node<'_>) -> bool {
    node.has_class(CONTENT_BOX_CLASS)
}

fn is_landmark(node: &Node<'_>) -> bool {
    node.id().is_some_and(SectionId::is_landmark_anchor)
}

fn is_non_content(node: Node<'_>) -> bool {
    node.is_heading()
        || node.is_one_of(NON_CONTENT_TAGS)
        || NON_CONTENT_CLASSES.iter().any(|c| node.has_class(c))
}

fn enclosing_container(cx: &Landmark<'_>) -> Result<Option<String>, DomError> {
    if cx.adjacent_box.is_some() {
        return Ok(None);
    }
    let Some(container) = cx.heading.ancestors().find(is_content_box) else {
        return Ok(None);
    };
    let scrubbed = cx.page.scrubbed_text(container, is_non_content)?;
    Ok(text::non_empty(normalize(&scrubbed)))
}

fn sibling_walk(cx: &Landmark<'_>) -> Option<String> {
    if cx.adjacent_box.is_some() {
        return None;
    }
    let mut pieces = Vec::new();
    for sibling in cx.heading.following_siblings() {
        if sibling.is_heading() || is_landmark(&sibling) {
            break;
        }
        if sibling.is_one_of(FLOW_TAGS) {
            let piece = normalize(&sibling.text());
            if !piece.is_empty() {
                pieces.push(piece);
            }
        }
    }
    clean(&pieces.join(" "))
}

fn content_box(cx: &Landmark<'_>) -> Result<Option<String>, DomError> {
    let Some(container) = cx.adjacent_box else {
        return Ok(None);
    };
    if cx.id == SectionId::Dosage {
        let rows = tables::dosage_rows(container)?;
        if !rows.is_empty() {
            return Ok(text::non_empty(text::cap(&rows.join("\n"), text::MAX_TEXT_CHARS)));
        }
    }
    Ok(clean(&container.text()))
}

fn sibling_fallback(cx: &Landmark<'_>) -> Option<String> {
    let flattened = cx
        .heading
        .following_siblings()
        .filter(|n| n.is_one_of(FLOW_TAGS) && !is_content_box(n))
        .take(SIBLING_FALLBACK_LIMIT)
        .map(|n| n.text())
        .collect::<Vec<_>>()
        .join(" ");
    clean(&flattened)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::text::MAX_TEXT_CHARS;

    fn run_html(html: &str, id: SectionId) -> Option<(Strategy, String)> {
        run(&Page::parse(html), id).unwrap()
    }

    #[test]
    fn adjacent_box_is_used() {
        let html = r#"<h2 id="uses">Uses</h2>
            <div class="contentBox"><p>For minor aches.</p></div>"#;
        assert_eq!(
            run_html(html, SectionId::Uses),
            Some((Strategy::ContentBox, "For minor aches.".into()))
        );
    }

    #[test]
    fn empty_box_falls_through_to_siblings() {
        let html = r#"<div>
            <h2 id="warnings">Warnings</h2>
            <div class="contentBox">   </div>
            <p>Avoid alcohol.</p>
        </div>"#;
        assert_eq!(
            run_html(html, SectionId::Warnings),
            Some((Strategy::SiblingFallback, "Avoid alcohol.".into()))
        );
    }

    #[test]
    fn enclosing_box_is_scrubbed() {
        let html = r#"<div class="contentBox">
            <h2 id="side-effects">Side effects</h2>
            <p>Upset stomach, <b>nausea</b>.</p>
            <h3>Sub heading</h3>
            <div class="more-resources">More about this drug</div>
            <script>track();</script>
            <ul><li>Dizziness</li></ul>
        </div>"#;
        let (strategy, text) = run_html(html, SectionId::SideEffects).unwrap();
        assert_eq!(strategy, Strategy::EnclosingContainer);
        assert_eq!(text, "Upset stomach, nausea. Dizziness");
    }

    #[test]
    fn enclosing_path_is_not_capped() {
        let long = "word ".repeat(600);
        let html = format!(
            r#"<div class="contentBox"><h2 id="warnings">W</h2><p>{}</p></div>"#,
            long
        );
        let (strategy, text) = run_html(&html, SectionId::Warnings).unwrap();
        assert_eq!(strategy, Strategy::EnclosingContainer);
        assert!(text.chars().count() > MAX_TEXT_CHARS);
    }

    #[test]
    fn sibling_walk_stops_at_next_landmark() {
        let html = r#"<body>
            <h2 id="uses">Uses</h2>
            <p>Relieves pain.</p>
            <span>ignored inline</span>
            <ul><li>Headache</li><li>Toothache</li></ul>
            <p id="warnings">Warning text belongs elsewhere.</p>
            <p>Also elsewhere.</p>
        </body>"#;
        assert_eq!(
            run_html(html, SectionId::Uses),
            Some((Strategy::SiblingWalk, "Relieves pain. Headache Toothache".into()))
        );
    }

    #[test]
    fn sibling_walk_stops_at_heading() {
        let html = r#"<h2 id="precautions">Precautions</h2>
            <p>Tell your doctor.</p><h3>Next</h3><p>Not this.</p>"#;
        assert_eq!(
            run_html(html, SectionId::Precautions).map(|(_, t)| t),
            Some("Tell your doctor.".into())
        );
    }

    #[test]
    fn sibling_walk_is_capped() {
        let long = "x".repeat(3000);
        let html = format!(r#"<h2 id="uses">U</h2><p>{}</p>"#, long);
        let (_, text) = run_html(&html, SectionId::Uses).unwrap();
        assert_eq!(text.chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn fallback_takes_at_most_five() {
        let html = r#"<h2 id="interactions">I</h2>
            <div class="contentBox"></div>
            <p>1</p><p>2</p><div class="contentBox">skip</div><p>3</p><p>4</p><p>5</p><p>6</p>"#;
        assert_eq!(
            run_html(html, SectionId::Interactions),
            Some((Strategy::SiblingFallback, "1 2 3 4 5".into()))
        );
    }

    #[test]
    fn dosage_table_rows() {
        let html = r#"<h2 id="dosage">Dosage</h2>
            <div class="contentBox"><table>
                <tr><th>Dose</th><th>Frequency</th></tr>
                <tr><td>10mg</td><td>once daily</td></tr>
                <tr><td>20mg</td><td>twice daily</td></tr>
                <tr><td>40mg</td><td>three times daily</td></tr>
            </table></div>"#;
        assert_eq!(
            run_html(html, SectionId::Dosage),
            Some((
                Strategy::ContentBox,
                "10mg - once daily\n20mg - twice daily\n40mg - three times daily".into()
            ))
        );
    }

    #[test]
    fn dosage_without_table_flattens() {
        let html = r#"<h2 id="dosage">Dosage</h2>
            <div class="contentBox"><p>Take  one tablet
            every 6 hours.</p></div>"#;
        assert_eq!(
            run_html(html, SectionId::Dosage).map(|(_, t)| t),
            Some("Take one tablet every 6 hours.".into())
        );
    }

    #[test]
    fn table_outside_dosage_is_flattened() {
        let html = r#"<h2 id="interactions">I</h2>
            <div class="contentBox"><table><tr><td>warfarin</td><td>major</td></tr></table></div>"#;
        assert_eq!(
            run_html(html, SectionId::Interactions).map(|(_, t)| t),
            Some("warfarin major".into())
        );
    }

    #[test]
    fn missing_landmark_is_none() {
        assert_eq!(run_html("<p>nothing here</p>", SectionId::Uses), None);
    }

    #[test]
    fn heading_with_nothing_after_is_none() {
        assert_eq!(run_html(r#"<h2 id="uses">Uses</h2>"#, SectionId::Uses), None);
    }
}
