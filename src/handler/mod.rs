//! Request handler module
//!
//! Routes GET requests through the rewrite chain and serves everything else
//! from the document root.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
