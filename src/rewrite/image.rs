//! Image-optimizer emulation
//!
//! The export flattens the optimizer API into files named
//! `_next/image?<canonical query>`. Assets come in several modes (`full`,
//! `color`, `mono`) and a page may ask for a mode that was never exported,
//! so sibling modes and finally the raw source image are probed in turn.

use std::path::PathBuf;

use super::path::join_verbatim;
use super::query::ImageParams;
use crate::config::SiteLayout;
use crate::http::mime;

/// URL prefix of the mode pages ask for first
const FULL_MODE_PREFIX: &str = "/full/";

/// Sibling modes probed when the full rendition is missing, in order
const MODE_VARIANTS: [&str; 2] = ["color", "mono"];

/// A file that can answer an image request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    pub path: PathBuf,
    pub content_type: &'static str,
}

/// Find the file answering an image-endpoint request
///
/// First hit wins: the exact export, then exports of sibling modes, then the
/// source image under the document root in any mode.
pub fn resolve_image(site: &SiteLayout, params: &ImageParams) -> Option<ImageCandidate> {
    exact_export(site, params)
        .or_else(|| sibling_mode_export(site, params))
        .or_else(|| source_image(site, params))
}

fn exact_export(site: &SiteLayout, params: &ImageParams) -> Option<ImageCandidate> {
    let path = exported_file(site, params);
    path.is_file().then(|| ImageCandidate {
        path,
        content_type: declared_image_type(params.first("url")),
    })
}

fn sibling_mode_export(site: &SiteLayout, params: &ImageParams) -> Option<ImageCandidate> {
    let rest = params.first("url")?.strip_prefix(FULL_MODE_PREFIX)?;
    MODE_VARIANTS.iter().find_map(|mode| {
        let url = format!("/{mode}/{rest}");
        let path = exported_file(site, &params.with_value("url", &url)?);
        path.is_file().then(|| ImageCandidate {
            path,
            content_type: mime::content_type_for_path(&url),
        })
    })
}

fn source_image(site: &SiteLayout, params: &ImageParams) -> Option<ImageCandidate> {
    let source = params.first("url")?.trim_start_matches('/');
    let mut candidates = vec![source.to_string()];
    candidates.extend(
        MODE_VARIANTS
            .iter()
            .map(|mode| source.replacen("full/", &format!("{mode}/"), 1)),
    );

    candidates
        .iter()
        .filter_map(|relative| join_verbatim(&site.root, relative))
        .find(|path| path.is_file())
        .map(|path| ImageCandidate {
            content_type: mime::content_type_for_path(&path),
            path,
        })
}

fn exported_file(site: &SiteLayout, params: &ImageParams) -> PathBuf {
    site.asset_dir.join(format!("image?{}", params.encode()))
}

/// Content type implied by the extension of the requested source URL
fn declared_image_type(url: Option<&str>) -> &'static str {
    let Some(url) = url else {
        return mime::OCTET_STREAM;
    };

    if url.ends_with(".png") {
        "image/png"
    } else if url.ends_with(".jpg") || url.ends_with(".jpeg") {
        "image/jpeg"
    } else if url.ends_with(".webp") {
        "image/webp"
    } else if url.ends_with(".gif") {
        "image/gif"
    } else {
        mime::OCTET_STREAM
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn site() -> (tempfile::TempDir, SiteLayout) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("_next")).unwrap();
        let site = SiteLayout::new(dir.path());
        (dir, site)
    }

    fn write(root: &Path, relative: &str, body: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    #[test]
    fn test_exact_export() {
        let (dir, site) = site();
        write(dir.path(), "_next/image?url=%2Ffull%2Frose.png&w=640&q=75", "png");

        let params = ImageParams::parse("url=%2Ffull%2Frose.png&w=640&q=75");
        let hit = resolve_image(&site, &params).unwrap();
        assert_eq!(hit.content_type, "image/png");
        assert_eq!(
            hit.path,
            site.asset_dir.join("image?url=%2Ffull%2Frose.png&w=640&q=75")
        );
    }

    #[test]
    fn test_declared_type_comes_from_url() {
        let (dir, site) = site();
        write(dir.path(), "_next/image?url=%2Fa.jpeg&w=16", "jpg");
        write(dir.path(), "_next/image?url=%2Fa.svg&w=16", "svg");

        let jpeg = resolve_image(&site, &ImageParams::parse("url=%2Fa.jpeg&w=16")).unwrap();
        assert_eq!(jpeg.content_type, "image/jpeg");
        let svg = resolve_image(&site, &ImageParams::parse("url=%2Fa.svg&w=16")).unwrap();
        assert_eq!(svg.content_type, mime::OCTET_STREAM);
    }

    #[test]
    fn test_color_sibling_preferred_over_mono() {
        let (dir, site) = site();
        write(dir.path(), "_next/image?url=%2Fcolor%2Frose.webp&w=64", "color");
        write(dir.path(), "_next/image?url=%2Fmono%2Frose.webp&w=64", "mono");

        let params = ImageParams::parse("url=%2Ffull%2Frose.webp&w=64");
        let hit = resolve_image(&site, &params).unwrap();
        assert_eq!(hit.path, site.asset_dir.join("image?url=%2Fcolor%2Frose.webp&w=64"));
        assert_eq!(hit.content_type, "image/webp");
    }

    #[test]
    fn test_mono_sibling() {
        let (dir, site) = site();
        write(dir.path(), "_next/image?url=%2Fmono%2Frose.png&w=64", "mono");

        let params = ImageParams::parse("url=%2Ffull%2Frose.png&w=64");
        let hit = resolve_image(&site, &params).unwrap();
        assert_eq!(hit.path, site.asset_dir.join("image?url=%2Fmono%2Frose.png&w=64"));
    }

    #[test]
    fn test_siblings_only_for_full_mode() {
        let (dir, site) = site();
        write(dir.path(), "_next/image?url=%2Fcolor%2Frose.png&w=64", "color");

        let params = ImageParams::parse("url=%2Fother%2Ffull%2Frose.png&w=64");
        assert_eq!(resolve_image(&site, &params), None);
    }

    #[test]
    fn test_source_fallbacks() {
        let (dir, site) = site();
        write(dir.path(), "color/tulip.gif", "gif");

        let params = ImageParams::parse("url=%2Ffull%2Ftulip.gif&w=64");
        let hit = resolve_image(&site, &params).unwrap();
        assert_eq!(hit.path, site.root.join("color/tulip.gif"));
        assert_eq!(hit.content_type, "image/gif");

        write(dir.path(), "full/tulip.gif", "gif");
        let hit = resolve_image(&site, &params).unwrap();
        assert_eq!(hit.path, site.root.join("full/tulip.gif"));
    }

    #[test]
    fn test_source_fallback_cannot_escape_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("site/_next")).unwrap();
        write(dir.path(), "secret.png", "png");
        let site = SiteLayout::new(dir.path().join("site"));

        let params = ImageParams::parse("url=%2F..%2Fsecret.png");
        assert_eq!(resolve_image(&site, &params), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_source_names_with_colons_are_exact() {
        let (dir, site) = site();
        write(dir.path(), "color/ab.png", "stripped");

        let params = ImageParams::parse("url=%2Ffull%2Fa%3Ab.png");
        assert_eq!(resolve_image(&site, &params), None);

        write(dir.path(), "color/a:b.png", "exact");
        let hit = resolve_image(&site, &params).unwrap();
        assert_eq!(hit.path, site.root.join("color/a:b.png"));
    }

    #[test]
    fn test_no_candidate() {
        let (_dir, site) = site();
        assert_eq!(
            resolve_image(&site, &ImageParams::parse("url=%2Ffull%2Fnone.png&w=1")),
            None
        );
        assert_eq!(resolve_image(&site, &ImageParams::parse("w=1")), None);
    }
}
