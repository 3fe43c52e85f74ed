//! Typed navigation over a parsed HTML page.
//!
//! Everything downstream (locator checks, the section cascade, metadata
//! labels) goes through [`Page`] and [`Node`] so that only this file knows
//! about `scraper`.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("invalid selector `{0}`")]
    Selector(String),
    #[error("node vanished from cloned document")]
    DetachedNode,
}

// Elements whose edges separate words when flattening text.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "caption", "dd", "div", "dl", "dt",
    "figcaption", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main",
    "nav", "ol", "p", "pre", "section", "table", "tbody", "td", "tfoot", "th", "thead", "tr",
    "ul",
];

fn selector(css: &str) -> Result<Selector, DomError> {
    Selector::parse(css).map_err(|_| DomError::Selector(css.to_string()))
}

/// One fetched page. Never mutated after parsing.
#[derive(Debug)]
pub struct Page {
    html: Html,
}

impl Page {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    pub fn root(&self) -> Node<'_> {
        Node(self.html.root_element())
    }

    pub fn by_id(&self, id: &str) -> Option<Node<'_>> {
        self.root().descendants().find(|n| n.id() == Some(id))
    }

    pub fn select(&self, css: &str) -> Result<Vec<Node<'_>>, DomError> {
        let sel = selector(css)?;
        Ok(self.html.select(&sel).map(Node).collect())
    }

    pub fn select_first(&self, css: &str) -> Result<Option<Node<'_>>, DomError> {
        let sel = selector(css)?;
        Ok(self.html.select(&sel).next().map(Node))
    }

    /// Text of `container` after removing every descendant matching `strip`.
    ///
    /// Works on a clone of the whole tree: the matching subtrees are detached
    /// from the copy and the container is read back from it, so the page
    /// itself stays untouched.
    pub fn scrubbed_text<F>(&self, container: Node<'_>, strip: F) -> Result<String, DomError>
    where
        F: Fn(Node<'_>) -> bool,
    {
        let container_id = container.0.id();
        let doomed: Vec<_> = container
            .descendants()
            .filter(|n| n.0.id() != container_id && strip(*n))
            .map(|n| n.0.id())
            .collect();

        let mut copy = self.html.clone();
        for id in doomed {
            if let Some(mut node) = copy.tree.get_mut(id) {
                node.detach();
            }
        }

        let kept = copy
            .tree
            .get(container_id)
            .and_then(ElementRef::wrap)
            .ok_or(DomError::DetachedNode)?;
        Ok(Node(kept).text())
    }
}

/// Borrowed view of one element inside a [`Page`].
#[derive(Clone, Copy)]
pub struct Node<'a>(ElementRef<'a>);

impl<'a> Node<'a> {
    pub fn tag(&self) -> &'a str {
        self.0.value().name()
    }

    pub fn id(&self) -> Option<&'a str> {
        self.0.value().id()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.0.value().attr(name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.0.value().classes().any(|c| c == class)
    }

    pub fn is_heading(&self) -> bool {
        matches!(self.tag(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
    }

    pub fn is_one_of(&self, tags: &[&str]) -> bool {
        tags.contains(&self.tag())
    }

    /// Raw descendant text. Inline markup is concatenated as-is; block
    /// element edges become a space. Not normalized.
    pub fn text(&self) -> String {
        let mut out = String::new();
        push_text(self.0, &mut out);
        out
    }

    pub fn next_sibling(&self) -> Option<Node<'a>> {
        self.following_siblings().next()
    }

    /// Element siblings after this one, in document order.
    pub fn following_siblings(&self) -> impl Iterator<Item = Node<'a>> {
        self.0.next_siblings().filter_map(ElementRef::wrap).map(Node)
    }

    /// Element ancestors, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = Node<'a>> {
        self.0.ancestors().filter_map(ElementRef::wrap).map(Node)
    }

    /// This element and every element below it, in document order.
    pub fn descendants(&self) -> impl Iterator<Item = Node<'a>> {
        self.0.descendants().filter_map(ElementRef::wrap).map(Node)
    }

    pub fn select(&self, css: &str) -> Result<Vec<Node<'a>>, DomError> {
        let sel = selector(css)?;
        Ok(self.0.select(&sel).map(Node).collect())
    }
}

fn push_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child) = ElementRef::wrap(child) {
            let block = BLOCK_TAGS.contains(&child.value().name());
            if block {
                out.push(' ');
            }
            push_text(child, out);
            if block {
                out.push(' ');
            }
        }
    }
}
