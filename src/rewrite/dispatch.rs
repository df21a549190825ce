//! Rewrite rule chain
//!
//! Rules run in [`Rule::CHAIN`] order and the first one that finds a file
//! decides the response. A rule that finds nothing is silent; when every rule
//! passes, the static responder handles the request as sent.

use std::path::{Path, PathBuf};

use super::image::resolve_image;
use super::path::{decode_path, has_extension, join_verbatim};
use super::query::normalize_query;
use crate::config::SiteLayout;
use crate::http::{mime, CachePolicy};
use crate::logger;

/// A rewrite rule, in the order the chain tries them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// `<endpoint>%3F<query>`: the query separator was encoded into the path
    EncodedImage,
    /// Any extension-less path under the viewer prefix gets one fixed page
    PinnedViewer,
    /// `<endpoint>?<query>`
    Image,
    /// `/garden` -> `garden.html`
    PrettyUrl,
    /// `/bouquet?mode=color` -> `bouquet?mode=color.html`
    QuerySuffixed,
}

/// What a matching rule wants sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// Send this file as-is
    Serve(ServedFile),
    /// Send this file through the static responder
    Static(PathBuf),
}

/// A file answered directly by a rule, with the headers it dictates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServedFile {
    pub path: PathBuf,
    pub content_type: &'static str,
    pub cache: Option<CachePolicy>,
}

impl Rewrite {
    pub fn target(&self) -> &Path {
        match self {
            Self::Serve(file) => &file.path,
            Self::Static(path) => path,
        }
    }
}

impl Rule {
    pub const CHAIN: [Self; 5] = [
        Self::EncodedImage,
        Self::PinnedViewer,
        Self::Image,
        Self::PrettyUrl,
        Self::QuerySuffixed,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::EncodedImage => "encoded_image",
            Self::PinnedViewer => "pinned_viewer",
            Self::Image => "image",
            Self::PrettyUrl => "pretty_url",
            Self::QuerySuffixed => "query_suffixed",
        }
    }

    /// Try this rule alone; `query` is `None` when the request had none or it was empty
    pub fn apply(self, site: &SiteLayout, path: &str, query: Option<&str>) -> Option<Rewrite> {
        match self {
            Self::EncodedImage => {
                let fragment = path.strip_prefix(&site.encoded_image_marker())?;
                serve_image(site, fragment)
            }
            Self::PinnedViewer => {
                if !path.starts_with(&site.viewer_prefix) || has_extension(path) {
                    return None;
                }
                existing(join_verbatim(&site.root, &site.viewer_artifact)?).map(serve_html)
            }
            Self::Image => {
                if path != site.image_endpoint {
                    return None;
                }
                serve_image(site, query?)
            }
            Self::PrettyUrl => {
                if has_extension(path) {
                    return None;
                }
                let decoded = decode_path(path);
                let page = match decoded.trim_matches('/') {
                    "" => "index.html".to_string(),
                    route => format!("{route}.html"),
                };
                existing(join_verbatim(&site.root, &page)?).map(Rewrite::Static)
            }
            Self::QuerySuffixed => {
                let query = query?;
                let decoded = decode_path(path);
                let page = format!("{}?{query}.html", decoded.trim_matches('/'));
                existing(join_verbatim(&site.root, &page)?).map(serve_html)
            }
        }
    }
}

/// Run the rule chain for one GET request
///
/// Returns the rule that matched and its rewrite, or `None` to fall back to
/// plain static serving.
pub fn dispatch(site: &SiteLayout, path: &str, query: Option<&str>) -> Option<(Rule, Rewrite)> {
    let query = query.filter(|q| !q.is_empty());
    Rule::CHAIN.into_iter().find_map(|rule| {
        let rewrite = rule.apply(site, path, query)?;
        logger::log_rewrite(rule.name(), path, rewrite.target());
        Some((rule, rewrite))
    })
}

fn serve_image(site: &SiteLayout, raw_query: &str) -> Option<Rewrite> {
    let params = normalize_query(raw_query)?;
    let candidate = resolve_image(site, &params)?;
    Some(Rewrite::Serve(ServedFile {
        path: candidate.path,
        content_type: candidate.content_type,
        cache: Some(CachePolicy::Immutable),
    }))
}

fn serve_html(path: PathBuf) -> Rewrite {
    Rewrite::Serve(ServedFile {
        path,
        content_type: mime::HTML,
        cache: None,
    })
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.is_file().then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn site() -> (tempfile::TempDir, SiteLayout) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("_next/static")).unwrap();
        fs::create_dir_all(root.join("color")).unwrap();
        fs::write(root.join("index.html"), "<h1>home</h1>").unwrap();
        fs::write(root.join("garden.html"), "<h1>garden</h1>").unwrap();
        fs::write(root.join("bouquet.html"), "<h1>bouquet</h1>").unwrap();
        fs::write(root.join("bouquet?mode=color.html"), "<h1>color</h1>").unwrap();
        fs::write(root.join("bouquet?mode=mono.html"), "<h1>mono</h1>").unwrap();
        fs::write(root.join("_next/static/app.js"), "js").unwrap();
        fs::write(root.join("_next/image?url=%2Ffull%2Frose.png&w=640&q=75"), "rose").unwrap();
        fs::write(root.join("color/tulip.png"), "tulip").unwrap();
        let site = SiteLayout::new(root);
        (dir, site)
    }

    fn rule_for(site: &SiteLayout, path: &str, query: Option<&str>) -> Option<Rule> {
        dispatch(site, path, query).map(|(rule, _)| rule)
    }

    #[test]
    fn test_encoded_image_endpoint() {
        let (_dir, site) = site();
        let (rule, rewrite) = dispatch(
            &site,
            "/_next/image%3Furl=%252Ffull%252Frose.png&amp;w=640&amp;q=75",
            None,
        )
        .unwrap();
        assert_eq!(rule, Rule::EncodedImage);
        match rewrite {
            Rewrite::Serve(file) => {
                assert_eq!(file.content_type, "image/png");
                assert_eq!(file.cache, Some(CachePolicy::Immutable));
            }
            Rewrite::Static(_) => panic!("expected a served image"),
        }
    }

    #[test]
    fn test_image_endpoint() {
        let (_dir, site) = site();
        let (rule, rewrite) = dispatch(
            &site,
            "/_next/image",
            Some("url=%2Ffull%2Frose.png&w=640&q=75"),
        )
        .unwrap();
        assert_eq!(rule, Rule::Image);
        assert_eq!(
            rewrite.target(),
            site.asset_dir.join("image?url=%2Ffull%2Frose.png&w=640&q=75")
        );

        let (_, rewrite) =
            dispatch(&site, "/_next/image", Some("url=%2Ffull%2Ftulip.png&w=64")).unwrap();
        assert_eq!(rewrite.target(), site.root.join("color/tulip.png"));
    }

    #[test]
    fn test_image_miss_falls_through() {
        let (_dir, site) = site();
        assert_eq!(
            rule_for(&site, "/_next/image", Some("url=%2Ffull%2Fnone.png&w=1")),
            None
        );
        assert_eq!(rule_for(&site, "/_next/image", Some("")), None);
        assert_eq!(rule_for(&site, "/_next/image%3F", None), None);
    }

    #[test]
    fn test_pinned_viewer() {
        let (_dir, site) = site();
        for path in ["/bouquet/abc123", "/bouquet/other", "/bouquet/", "/bouquet/x/y"] {
            let (rule, rewrite) = dispatch(&site, path, None).unwrap();
            assert_eq!(rule, Rule::PinnedViewer, "{path}");
            assert_eq!(rewrite.target(), site.root.join("bouquet?mode=color.html"));
        }
        assert_ne!(
            rule_for(&site, "/bouquet/photo.png", None),
            Some(Rule::PinnedViewer)
        );
    }

    #[test]
    fn test_pinned_viewer_needs_artifact() {
        let (dir, site) = site();
        fs::remove_file(dir.path().join("bouquet?mode=color.html")).unwrap();
        assert_eq!(rule_for(&site, "/bouquet/abc", None), None);
    }

    #[test]
    fn test_pretty_urls() {
        let (_dir, site) = site();
        let (rule, rewrite) = dispatch(&site, "/garden", None).unwrap();
        assert_eq!(rule, Rule::PrettyUrl);
        assert_eq!(rewrite, Rewrite::Static(site.root.join("garden.html")));

        let (_, rewrite) = dispatch(&site, "/garden/", Some("ignored=1")).unwrap();
        assert_eq!(rewrite, Rewrite::Static(site.root.join("garden.html")));

        let (_, rewrite) = dispatch(&site, "/", None).unwrap();
        assert_eq!(rewrite, Rewrite::Static(site.root.join("index.html")));

        assert_eq!(rule_for(&site, "/missing", None), None);
    }

    #[test]
    fn test_pretty_url_wins_over_query_suffix() {
        let (_dir, site) = site();
        assert_eq!(
            rule_for(&site, "/bouquet", Some("mode=color")),
            Some(Rule::PrettyUrl)
        );
    }

    #[test]
    fn test_query_suffixed_page() {
        let (dir, site) = site();
        fs::remove_file(dir.path().join("bouquet.html")).unwrap();

        let (rule, rewrite) = dispatch(&site, "/bouquet", Some("mode=mono")).unwrap();
        assert_eq!(rule, Rule::QuerySuffixed);
        match rewrite {
            Rewrite::Serve(file) => {
                assert_eq!(file.path, site.root.join("bouquet?mode=mono.html"));
                assert_eq!(file.content_type, mime::HTML);
                assert_eq!(file.cache, None);
            }
            Rewrite::Static(_) => panic!("expected a served page"),
        }
        assert_eq!(rule_for(&site, "/bouquet", Some("mode=sepia")), None);
    }

    #[test]
    fn test_assets_fall_through() {
        let (_dir, site) = site();
        assert_eq!(rule_for(&site, "/_next/static/app.js", None), None);
        assert_eq!(rule_for(&site, "/garden.html", None), None);
    }

    #[test]
    fn test_traversal_never_leaves_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("site")).unwrap();
        fs::write(dir.path().join("secret.html"), "secret").unwrap();
        fs::write(dir.path().join("x?y=1.html"), "secret").unwrap();
        let site = SiteLayout::new(dir.path().join("site"));

        assert_eq!(rule_for(&site, "/../secret", None), None);
        assert_eq!(rule_for(&site, "/%2e%2e/secret", None), None);
        assert_eq!(rule_for(&site, "/../x", Some("y=1")), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_names_with_colons_are_looked_up_exactly() {
        let (dir, site) = site();
        fs::write(dir.path().join("share?t=12:00.html"), "noon").unwrap();
        fs::write(dir.path().join("a:b.html"), "colon").unwrap();

        let (rule, rewrite) = dispatch(&site, "/share", Some("t=12:00")).unwrap();
        assert_eq!(rule, Rule::QuerySuffixed);
        assert_eq!(rewrite.target(), site.root.join("share?t=12:00.html"));

        let (rule, rewrite) = dispatch(&site, "/a:b", None).unwrap();
        assert_eq!(rule, Rule::PrettyUrl);
        assert_eq!(rewrite, Rewrite::Static(site.root.join("a:b.html")));
    }

    #[test]
    fn test_stripped_names_are_not_substituted() {
        let (dir, site) = site();
        fs::write(dir.path().join("share?t=1200.html"), "other").unwrap();
        fs::write(dir.path().join("ab.html"), "other").unwrap();

        assert_eq!(rule_for(&site, "/share", Some("t=12:00")), None);
        assert_eq!(rule_for(&site, "/a:b", None), None);
        assert_eq!(rule_for(&site, "/a%5Cb", None), None);
    }

    #[test]
    fn test_dispatch_is_repeatable() {
        let (_dir, site) = site();
        let first = dispatch(&site, "/bouquet/abc", None);
        assert_eq!(first, dispatch(&site, "/bouquet/abc", None));
    }
}
