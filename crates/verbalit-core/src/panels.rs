//! Inspiration side panels: Pinterest embed, Google and Unsplash image search.
//!
//! Only the panel state and the result shapes live here; fetching is up to
//! the host.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

const GOOGLE_SEARCH_PATH: &str = "/api/google-images";
const UNSPLASH_SEARCH_PATH: &str = "/api/unsplash-photos";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    Pinterest,
    Google,
    Unsplash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinterestEmbed {
    #[default]
    Board,
    Profile,
}

/// One image in a search result grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSearchResult {
    /// Stable key for the result.
    pub id: String,
    /// Image URL to display.
    pub src: String,
    pub alt: String,
}

#[derive(Deserialize)]
struct GoogleResponse {
    #[serde(default)]
    items: Vec<GoogleItem>,
}

#[derive(Deserialize)]
struct GoogleItem {
    link: String,
    #[serde(default)]
    title: String,
}

#[derive(Deserialize)]
struct UnsplashResponse {
    #[serde(default)]
    results: Vec<UnsplashPhoto>,
}

#[derive(Deserialize)]
struct UnsplashPhoto {
    id: String,
    urls: UnsplashUrls,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Deserialize)]
struct UnsplashUrls {
    small: String,
}

/// Parse a `/api/google-images` response. A missing `items` list is empty.
pub fn parse_google_results(json: &str) -> Result<Vec<ImageSearchResult>, serde_json::Error> {
    let response: GoogleResponse = serde_json::from_str(json)?;
    Ok(response
        .items
        .into_iter()
        .map(|item| ImageSearchResult {
            id: item.link.clone(),
            src: item.link,
            alt: item.title,
        })
        .collect())
}

/// Parse a `/api/unsplash-photos` response. A missing `results` list is empty.
pub fn parse_unsplash_results(json: &str) -> Result<Vec<ImageSearchResult>, serde_json::Error> {
    let response: UnsplashResponse = serde_json::from_str(json)?;
    Ok(response
        .results
        .into_iter()
        .map(|photo| ImageSearchResult {
            id: photo.id,
            src: photo.urls.small,
            alt: photo
                .description
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| "Unsplash Image".to_string()),
        })
        .collect())
}

/// Side panel state. At most one panel is open at a time.
#[derive(Debug, Clone, Default)]
pub struct Panels {
    open: Option<Panel>,
    pub pinterest_url: String,
    pub pinterest_embed: PinterestEmbed,
    pub google_query: String,
    pub google_results: Vec<ImageSearchResult>,
    pub unsplash_query: String,
    pub unsplash_results: Vec<ImageSearchResult>,
}

impl Panels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `panel` (closing the others) or close it if it is already open.
    pub fn toggle(&mut self, panel: Panel) {
        self.open = if self.open == Some(panel) {
            None
        } else {
            Some(panel)
        };
        log::debug!("side panel: {:?}", self.open);
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn open_panel(&self) -> Option<Panel> {
        self.open
    }

    pub fn is_open(&self, panel: Panel) -> bool {
        self.open == Some(panel)
    }

    /// Whether the side drawer is visible at all.
    pub fn side_panel_open(&self) -> bool {
        self.open.is_some()
    }

    /// Request path for the current query, or `None` when there is nothing
    /// to search.
    pub fn search_path(&self, panel: Panel) -> Option<String> {
        let (path, param, query) = match panel {
            Panel::Google => (GOOGLE_SEARCH_PATH, "q", &self.google_query),
            Panel::Unsplash => (UNSPLASH_SEARCH_PATH, "query", &self.unsplash_query),
            Panel::Pinterest => return None,
        };
        if query.is_empty() {
            return None;
        }
        let encoded = form_urlencoded::Serializer::new(String::new())
            .append_pair(param, query)
            .finish();
        Some(format!("{}?{}", path, encoded))
    }

    /// Store results for a panel. Pinterest has no result grid.
    pub fn set_results(&mut self, panel: Panel, results: Vec<ImageSearchResult>) {
        match panel {
            Panel::Google => self.google_results = results,
            Panel::Unsplash => self.unsplash_results = results,
            Panel::Pinterest => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panels_are_exclusive() {
        let mut panels = Panels::new();
        panels.toggle(Panel::Pinterest);
        panels.toggle(Panel::Google);
        assert!(panels.is_open(Panel::Google));
        assert!(!panels.is_open(Panel::Pinterest));

        panels.toggle(Panel::Unsplash);
        assert_eq!(panels.open_panel(), Some(Panel::Unsplash));

        panels.toggle(Panel::Unsplash);
        assert!(!panels.side_panel_open());
    }

    #[test]
    fn test_search_path() {
        let mut panels = Panels::new();
        assert_eq!(panels.search_path(Panel::Google), None);

        panels.google_query = "brutalist houses".into();
        panels.unsplash_query = "fog & sea".into();
        assert_eq!(
            panels.search_path(Panel::Google).as_deref(),
            Some("/api/google-images?q=brutalist+houses")
        );
        assert_eq!(
            panels.search_path(Panel::Unsplash).as_deref(),
            Some("/api/unsplash-photos?query=fog+%26+sea")
        );
        assert_eq!(panels.search_path(Panel::Pinterest), None);
    }

    #[test]
    fn test_parse_google() {
        let results = parse_google_results(
            r#"{ "items": [ { "link": "https://img/1.jpg", "title": "One" } ] }"#,
        )
        .unwrap();
        assert_eq!(
            results,
            vec![ImageSearchResult {
                id: "https://img/1.jpg".into(),
                src: "https://img/1.jpg".into(),
                alt: "One".into(),
            }]
        );
        assert!(parse_google_results("{}").unwrap().is_empty());
    }

    #[test]
    fn test_parse_unsplash_default_alt() {
        let results = parse_unsplash_results(
            r#"{ "results": [ { "id": "abc", "urls": { "small": "https://u/s.jpg" }, "description": null } ] }"#,
        )
        .unwrap();
        assert_eq!(results[0].alt, "Unsplash Image");
        assert_eq!(results[0].src, "https://u/s.jpg");

        let mut panels = Panels::new();
        panels.set_results(Panel::Unsplash, results);
        assert_eq!(panels.unsplash_results.len(), 1);
    }
}
