use std::sync::{Arc, LazyLock};

use regex::Regex;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Settings;
use crate::fetch::{FetchError, Fetcher};
use crate::parser::dom::Page;

static NON_SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Path segment of canonical per-medicine profile pages.
const PROFILE_SEGMENT: &str = "/pro/";
/// Class the site puts on its error page body.
const ERROR_MARKER_CLASS: &str = "error-page";

#[derive(Debug, Error)]
pub enum LocateError {
    #[error("could not fetch {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("no usable search results for `{query}`")]
    NoSearchResults { query: String, url: String },
    #[error("{url} is a not-found page")]
    DocumentNotFound { url: String },
}

impl LocateError {
    /// The last URL the locator tried.
    pub fn url(&self) -> &str {
        match self {
            LocateError::Transport { url, .. }
            | LocateError::NoSearchResults { url, .. }
            | LocateError::DocumentNotFound { url } => url,
        }
    }
}

/// A fetched, parsed page and the URL it came from.
#[derive(Debug)]
pub struct ResolvedDocument {
    pub page: Page,
    pub url: String,
}

pub struct Locator {
    fetcher: Arc<dyn Fetcher>,
    origin: String,
    search_path: String,
}

impl Locator {
    pub fn new(fetcher: Arc<dyn Fetcher>, settings: &Settings) -> Self {
        Self {
            fetcher,
            origin: settings.site_origin.trim_end_matches('/').to_string(),
            search_path: settings.search_path.clone(),
        }
    }

    /// Resolve a free-text medicine name to its page.
    ///
    /// Tries `<origin>/<slug>.html` first. If that fetch fails for any reason,
    /// searches the site and follows the best result link. Either way the
    /// final page is rejected if it is the site's not-found page.
    pub async fn resolve(&self, subject: &str) -> Result<ResolvedDocument, LocateError> {
        let slug = slugify(subject);
        let direct = format!("{}/{}.html", self.origin, slug);

        let (url, body) = match self.fetcher.fetch(&direct).await {
            Ok(body) => {
                debug!(slug = %slug, url = %direct, "Direct lookup hit");
                (direct, body)
            }
            Err(e) => {
                info!(slug = %slug, error = %e, "Direct lookup failed, searching");
                self.search(&slug).await?
            }
        };

        let page = Page::parse(&body);
        if is_not_found_page(&page) {
            return Err(LocateError::DocumentNotFound { url });
        }
        Ok(ResolvedDocument { page, url })
    }

    async fn search(&self, slug: &str) -> Result<(String, String), LocateError> {
        let search_url = format!("{}{}{}", self.origin, self.search_path, slug);
        let results = self
            .fetcher
            .fetch(&search_url)
            .await
            .map_err(|source| LocateError::Transport {
                url: search_url.clone(),
                source,
            })?;

        let link = pick_result_link(&results).ok_or_else(|| LocateError::NoSearchResults {
            query: slug.to_string(),
            url: search_url.clone(),
        })?;
        let url = self.absolutize(&link);
        info!(slug, url = %url, "Following search result");

        let body = self
            .fetcher
            .fetch(&url)
            .await
            .map_err(|source| LocateError::Transport {
                url: url.clone(),
                source,
            })?;
        Ok((url, body))
    }

    fn absolutize(&self, link: &str) -> String {
        if link.starts_with("//") {
            format!("https:{}", link)
        } else if link.starts_with('/') {
            format!("{}{}", self.origin, link)
        } else {
            link.to_string()
        }
    }
}

/// Lowercase, then every run outside `[a-z0-9]` becomes one hyphen.
pub fn slugify(subject: &str) -> String {
    NON_SLUG_RE
        .replace_all(&subject.to_lowercase(), "-")
        .into_owned()
}

/// Best link on a search results page: the first profile link, else the
/// first root-relative link that is not itself a search link.
pub fn pick_result_link(html: &str) -> Option<String> {
    let page = Page::parse(html);
    let hrefs: Vec<&str> = page
        .root()
        .descendants()
        .filter(|n| n.tag() == "a")
        .filter_map(|n| n.attr("href"))
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .collect();

    hrefs
        .iter()
        .find(|h| h.contains(PROFILE_SEGMENT))
        .or_else(|| {
            hrefs
                .iter()
                .find(|h| is_root_relative(h) && !is_search_link(h))
        })
        .map(|h| h.to_string())
}

fn is_root_relative(href: &str) -> bool {
    href.starts_with('/') && !href.starts_with("//")
}

/// `/search`, `/search/...` or `/search.php?...`, but not `/research.html`.
fn is_search_link(href: &str) -> bool {
    let path = href.split(['?', '#']).next().unwrap_or_default();
    path.strip_prefix("/search")
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/') || rest.starts_with('.'))
}

pub fn is_not_found_page(page: &Page) -> bool {
    page.root().descendants().any(|n| {
        (n.tag() == "h1" && n.text().contains("404")) || n.has_class(ERROR_MARKER_CLASS)
    })
}
