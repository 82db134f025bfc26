//! Public URLs for stored media paths
//!
//! FAQ/news images and partner logos are stored as paths relative to the
//! media directory (`news/2025/launch.jpg`) or as absolute URLs.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MEDIA_BASE_URL: &str = "http://bsuir.stacklevel.group/media/";

/// Where the server mounts the media directory
pub const MEDIA_ROUTE: &str = "/media/";

/// Resolves stored media paths against `MEDIA_BASE_URL`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaUrls {
    pub base_url: String,
}

impl MediaUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// - empty or missing → `None`
    /// - anything starting with `http` → unchanged
    /// - otherwise → base URL + path, concatenated as-is
    pub fn resolve(&self, path: Option<&str>) -> Option<String> {
        match path {
            None | Some("") => None,
            Some(p) if p.starts_with("http") => Some(p.to_owned()),
            Some(p) => Some(format!("{}{}", self.base_url, p)),
        }
    }

    /// Site-relative URL under [`MEDIA_ROUTE`]; partner logos use this form.
    pub fn local(path: Option<&str>) -> Option<String> {
        path.filter(|p| !p.is_empty())
            .map(|p| format!("{MEDIA_ROUTE}{p}"))
    }
}

impl Default for MediaUrls {
    fn default() -> Self {
        Self::new(DEFAULT_MEDIA_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_paths() {
        let media = MediaUrls::new("https://cdn.example/media/");
        assert_eq!(media.resolve(None), None);
        assert_eq!(media.resolve(Some("")), None);
        assert_eq!(
            media.resolve(Some("news/launch.jpg")).as_deref(),
            Some("https://cdn.example/media/news/launch.jpg")
        );
        assert_eq!(
            media.resolve(Some("https://other.example/logo.png")).as_deref(),
            Some("https://other.example/logo.png")
        );
        // prefix check only, no URL parsing
        assert_eq!(
            media.resolve(Some("httpdocs/a.png")).as_deref(),
            Some("httpdocs/a.png")
        );
    }

    #[test]
    fn local_paths_ignore_base_url() {
        assert_eq!(MediaUrls::local(Some("partners/a.svg")).as_deref(), Some("/media/partners/a.svg"));
        assert_eq!(MediaUrls::local(Some("")), None);
        assert_eq!(MediaUrls::local(None), None);
    }

    #[test]
    fn default_base() {
        assert_eq!(
            MediaUrls::default().resolve(Some("faq/1.png")).as_deref(),
            Some("http://bsuir.stacklevel.group/media/faq/1.png")
        );
    }
}
