// Site layout module
// Resolved, absolute view of the `site` configuration handed to the rewrite chain

use std::io;
use std::path::{Path, PathBuf};

use super::types::SiteConfig;

/// Where the export lives and which URLs carry special meaning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLayout {
    pub root: PathBuf,
    pub asset_dir: PathBuf,
    pub image_endpoint: String,
    pub viewer_prefix: String,
    pub viewer_artifact: String,
    pub index_files: Vec<String>,
}

impl SiteLayout {
    /// Layout rooted at `root` with the conventional export names
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            asset_dir: root.join("_next"),
            root,
            image_endpoint: "/_next/image".to_string(),
            viewer_prefix: "/bouquet/".to_string(),
            viewer_artifact: "bouquet?mode=color.html".to_string(),
            index_files: vec!["index.html".to_string(), "index.htm".to_string()],
        }
    }

    /// Build from configuration, canonicalizing the document root
    ///
    /// Fails when the root does not exist or is not a directory.
    pub fn from_config(site: &SiteConfig) -> io::Result<Self> {
        let root = Path::new(&site.root).canonicalize()?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("document root is not a directory: {}", root.display()),
            ));
        }

        Ok(Self {
            asset_dir: root.join(&site.asset_dir),
            root,
            image_endpoint: site.image_endpoint.clone(),
            viewer_prefix: site.viewer_prefix.clone(),
            viewer_artifact: site.viewer_artifact.clone(),
            index_files: site.index_files.clone(),
        })
    }

    /// The image endpoint with its query separator percent-encoded into the path
    pub fn encoded_image_marker(&self) -> String {
        format!("{}%3F", self.image_endpoint)
    }
}
