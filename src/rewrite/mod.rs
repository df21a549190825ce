//! URL rewriting for a static export
//!
//! Recreates the URL behaviour the export's framework runtime provided:
//! extension-less routes, the image-optimizer endpoint, and pages whose
//! file names embed their query string. Everything is recomputed from the
//! request and the files on disk; nothing is cached between requests.

pub mod dispatch;
pub mod image;
pub mod path;
pub mod query;

pub use dispatch::{dispatch, Rewrite, Rule, ServedFile};
pub use image::{resolve_image, ImageCandidate};
pub use path::{has_extension, join_verbatim, join_within, resolve_path};
pub use query::{normalize_query, ImageParams};
